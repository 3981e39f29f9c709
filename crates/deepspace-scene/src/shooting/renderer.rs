//! Trail points and head discs for active shooting stars.
//!
//! Inactive stars contribute no instances, which is how a finished star's
//! trail and head disappear.

use bytemuck::{Pod, Zeroable};
use deepspace_render::{
    BlendMode, DepthMode, InstanceBuffer, MeshBuffer, ShaderError, ShaderLibrary,
    VertexPositionNormalUv, geometry,
};

use super::ShootingStarPool;
use super::trail::{trail_alpha, trail_point_size};
use crate::renderer::{LayerContext, LayerShader};

/// One trail point, sized in pixels.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailInstance {
    pub position: [f32; 3],
    pub size_px: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

/// One head disc, sized in world units.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct HeadInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub opacity: f32,
}

static_assertions::assert_eq_size!(TrailInstance, [u8; 32]);
static_assertions::assert_eq_size!(HeadInstance, [u8; 32]);

const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    3 => Float32x3,
    4 => Float32,
    5 => Float32x3,
    6 => Float32
];

fn point_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 32,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &POINT_ATTRIBUTES,
    }
}

/// Flatten the pool into trail and head instances.
///
/// Every active star contributes exactly `trail.len()` trail points, newest
/// first, and one head.
pub fn collect_instances(
    pool: &ShootingStarPool,
    head_radius: f32,
    trails: &mut Vec<TrailInstance>,
    heads: &mut Vec<HeadInstance>,
) {
    trails.clear();
    heads.clear();

    for star in pool.stars().iter().filter(|s| s.is_active()) {
        let opacity = star.opacity();
        let color = star.color.to_array();
        let length = star.trail.len();

        trails.extend(
            star.trail
                .positions()
                .iter()
                .enumerate()
                .map(|(i, p)| TrailInstance {
                    position: p.to_array(),
                    size_px: trail_point_size(i, length),
                    color,
                    alpha: trail_alpha(i, length) * opacity,
                }),
        );
        heads.push(HeadInstance {
            position: star.position.to_array(),
            radius: head_radius,
            color,
            opacity,
        });
    }
}

pub struct ShootingStarRenderer {
    trail_pipeline: wgpu::RenderPipeline,
    head_pipeline: wgpu::RenderPipeline,
    quad: MeshBuffer,
    trails: InstanceBuffer<TrailInstance>,
    heads: InstanceBuffer<HeadInstance>,
    trail_scratch: Vec<TrailInstance>,
    head_scratch: Vec<HeadInstance>,
    head_radius: f32,
}

impl ShootingStarRenderer {
    pub fn new(
        ctx: &LayerContext,
        shaders: &mut ShaderLibrary,
        pool_size: usize,
        trail_length: usize,
        head_radius: f32,
    ) -> Result<Self, ShaderError> {
        let vertex_buffers = [VertexPositionNormalUv::layout(), point_layout()];
        let trail_pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "shooting-trails",
                source: TRAIL_SHADER_SOURCE,
                vertex_buffers: &vertex_buffers,
                blend: BlendMode::Additive,
                depth: DepthMode::TestOnly,
                cull_mode: None,
            },
        )?;
        let head_pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "shooting-heads",
                source: HEAD_SHADER_SOURCE,
                vertex_buffers: &vertex_buffers,
                blend: BlendMode::Alpha,
                depth: DepthMode::TestOnly,
                cull_mode: None,
            },
        )?;

        let allocator = ctx.allocator();
        let trail_capacity = pool_size * trail_length.max(1);

        Ok(Self {
            trail_pipeline,
            head_pipeline,
            quad: geometry::unit_quad().upload(&allocator, "shooting-quad"),
            trails: allocator.create_instances("shooting-trails", trail_capacity),
            heads: allocator.create_instances("shooting-heads", pool_size),
            trail_scratch: Vec::with_capacity(trail_capacity),
            head_scratch: Vec::with_capacity(pool_size),
            head_radius,
        })
    }

    pub fn update(&mut self, queue: &wgpu::Queue, pool: &ShootingStarPool) {
        collect_instances(
            pool,
            self.head_radius,
            &mut self.trail_scratch,
            &mut self.head_scratch,
        );
        self.trails.write(queue, &self.trail_scratch);
        self.heads.write(queue, &self.head_scratch);
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.heads.is_empty() {
            return;
        }
        self.quad.bind(pass);

        pass.set_pipeline(&self.trail_pipeline);
        self.trails.bind(pass);
        self.quad.draw_instanced(pass, self.trails.len());

        pass.set_pipeline(&self.head_pipeline);
        self.heads.bind(pass);
        self.quad.draw_instanced(pass, self.heads.len());
    }
}

pub const TRAIL_SHADER_SOURCE: &str = r#"
struct TrailPoint {
    @location(3) position: vec3<f32>,
    @location(4) size_px: f32,
    @location(5) color: vec3<f32>,
    @location(6) alpha: f32,
};

struct TrailVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) alpha: f32,
};

@vertex
fn vs_main(@location(0) corner: vec3<f32>, point: TrailPoint) -> TrailVarying {
    var out: TrailVarying;
    let clip = frame.view_proj * vec4<f32>(point.position, 1.0);
    out.clip = offset_clip_px(clip, corner.xy, point.size_px);
    out.local = corner.xy * 0.5;
    out.color = point.color;
    out.alpha = point.alpha;
    return out;
}

@fragment
fn fs_main(in: TrailVarying) -> @location(0) vec4<f32> {
    if (length(in.local) > 0.5) {
        discard;
    }
    return vec4<f32>(in.color, in.alpha);
}
"#;

pub const HEAD_SHADER_SOURCE: &str = r#"
struct Head {
    @location(3) position: vec3<f32>,
    @location(4) radius: f32,
    @location(5) color: vec3<f32>,
    @location(6) opacity: f32,
};

struct HeadVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) opacity: f32,
};

@vertex
fn vs_main(@location(0) corner: vec3<f32>, head: Head) -> HeadVarying {
    var out: HeadVarying;
    let depth = -(frame.view * vec4<f32>(head.position, 1.0)).z;
    var diameter_px = 0.0;
    if (depth > 0.0) {
        diameter_px = 2.0 * head.radius * frame.focal_px / depth;
    }
    let clip = frame.view_proj * vec4<f32>(head.position, 1.0);
    out.clip = offset_clip_px(clip, corner.xy, diameter_px);
    out.local = corner.xy;
    out.color = head.color;
    out.opacity = head.opacity;
    return out;
}

@fragment
fn fs_main(in: HeadVarying) -> @location(0) vec4<f32> {
    if (length(in.local) > 1.0) {
        discard;
    }
    return vec4<f32>(in.color, in.opacity);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::NebulaPalette;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_inactive_pool_emits_nothing() {
        let pool = ShootingStarPool::new(5, 10, 1.0, 0.1);
        let (mut trails, mut heads) = (Vec::new(), Vec::new());
        collect_instances(&pool, 3.0, &mut trails, &mut heads);
        assert!(trails.is_empty());
        assert!(heads.is_empty());
    }

    #[test]
    fn test_active_star_emits_full_trail_and_head() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut pool = ShootingStarPool::new(3, 12, 1.0, 0.1);
        let camera = Vec3::new(0.0, 0.0, 100.0);
        pool.trigger(camera, &NebulaPalette::new(true), &mut rng);
        pool.update(1.0 / 60.0, camera);

        let (mut trails, mut heads) = (Vec::new(), Vec::new());
        collect_instances(&pool, 2.0, &mut trails, &mut heads);
        assert_eq!(trails.len(), 12);
        assert_eq!(heads.len(), 1);
        assert_eq!(heads[0].radius, 2.0);

        let opacity = pool.stars()[0].opacity();
        assert_eq!(trails[0].size_px, 4.0);
        assert!((trails[0].alpha - opacity).abs() < 1e-6);
        assert!(trails[11].alpha < trails[0].alpha);
        assert_eq!(trails[0].position, heads[0].position);
    }

    #[test]
    fn test_point_layout_shared_by_both_instance_types() {
        assert_eq!(point_layout().array_stride as usize, std::mem::size_of::<TrailInstance>());
        assert_eq!(point_layout().array_stride as usize, std::mem::size_of::<HeadInstance>());
    }
}
