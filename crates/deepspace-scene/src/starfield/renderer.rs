//! Instanced sparkle sprites for the star field.

use bytemuck::{Pod, Zeroable};
use deepspace_render::{
    BlendMode, DepthMode, InstanceBuffer, MeshBuffer, ShaderError, ShaderLibrary,
    VertexPositionNormalUv, geometry,
};

use super::{Star, StarField};
use crate::renderer::{LayerContext, LayerShader};

/// Per-star instance data.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub phase: f32,
    pub spikes: f32,
    pub anim_mode: u32,
}

static_assertions::assert_eq_size!(StarInstance, [u8; 40]);

impl StarInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        3 => Float32x3,
        4 => Float32,
        5 => Float32x3,
        6 => Float32,
        7 => Float32,
        8 => Uint32
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&Star> for StarInstance {
    fn from(star: &Star) -> Self {
        Self {
            position: star.position.to_array(),
            size: star.size,
            color: star.color.to_array(),
            phase: star.phase,
            spikes: star.spike_count as f32,
            anim_mode: star.anim_mode as u32,
        }
    }
}

/// Draws every star as a camera-facing quad sized in pixels.
pub struct StarRenderer {
    pipeline: wgpu::RenderPipeline,
    quad: MeshBuffer,
    instances: InstanceBuffer<StarInstance>,
    scratch: Vec<StarInstance>,
}

impl StarRenderer {
    pub fn new(
        ctx: &LayerContext,
        shaders: &mut ShaderLibrary,
        capacity: usize,
    ) -> Result<Self, ShaderError> {
        let pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "stars",
                source: STAR_SHADER_SOURCE,
                vertex_buffers: &[VertexPositionNormalUv::layout(), StarInstance::layout()],
                blend: BlendMode::Additive,
                depth: DepthMode::TestOnly,
                cull_mode: None,
            },
        )?;
        let allocator = ctx.allocator();

        log::info!("Star renderer initialized ({capacity} instances)");

        Ok(Self {
            pipeline,
            quad: geometry::unit_quad().upload(&allocator, "star-quad"),
            instances: allocator.create_instances("star-instances", capacity),
            scratch: Vec::with_capacity(capacity),
        })
    }

    /// Upload the current star buffer.
    pub fn update(&mut self, queue: &wgpu::Queue, field: &StarField) {
        self.scratch.clear();
        self.scratch
            .extend(field.stars().iter().map(StarInstance::from));
        self.instances.write(queue, &self.scratch);
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        self.quad.bind(pass);
        self.instances.bind(pass);
        self.quad.draw_instanced(pass, self.instances.len());
    }
}

/// Star sprite shader. Expects the frame uniform block to be prepended.
pub const STAR_SHADER_SOURCE: &str = r#"
struct StarInstance {
    @location(3) position: vec3<f32>,
    @location(4) size: f32,
    @location(5) color: vec3<f32>,
    @location(6) phase: f32,
    @location(7) spikes: f32,
    @location(8) anim_mode: u32,
};

struct StarVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) spikes: f32,
    @location(3) intensity: f32,
};

fn star_intensity(mode: u32, phase: f32) -> f32 {
    let t = frame.time;
    if (mode == 0u) {
        let twinkle = sin(t * 3.0 + phase) * 0.5 + 0.5;
        return 0.6 + twinkle * twinkle * 0.4;
    }
    if (mode == 1u) {
        let pulse = sin(t * 0.8 + phase) * 0.5 + 0.5;
        return 0.7 + smoothstep(0.0, 1.0, pulse) * 0.3;
    }
    return 0.85 + sin(t * 0.2 + phase) * 0.05;
}

@vertex
fn vs_main(@location(0) corner: vec3<f32>, star: StarInstance) -> StarVarying {
    var out: StarVarying;
    let depth = -(frame.view * vec4<f32>(star.position, 1.0)).z;
    let intensity = star_intensity(star.anim_mode, star.phase);

    var size_px = 0.0;
    if (depth > 0.0) {
        size_px = min(star.size * (1200.0 / depth), star.size * 3.0) * intensity;
        // Rasterized points never shrink below one pixel.
        size_px = max(size_px, 1.0);
    }

    let clip = frame.view_proj * vec4<f32>(star.position, 1.0);
    out.clip = offset_clip_px(clip, corner.xy, size_px);
    out.local = corner.xy * 0.5;
    out.color = star.color;
    out.spikes = star.spikes;
    out.intensity = intensity;
    return out;
}

fn star_shape(uv: vec2<f32>, spikes: f32) -> f32 {
    let angle = atan2(uv.y, uv.x);
    let radius = length(uv);

    var spike = abs(cos(angle * spikes * 0.5));
    spike = spike * spike;

    let core = exp(-radius * 15.0);
    let rays = exp(-radius * 6.0) * spike;
    let cross_flare = max(
        exp(-abs(uv.x) * 25.0) * exp(-abs(uv.y) * 4.0),
        exp(-abs(uv.y) * 25.0) * exp(-abs(uv.x) * 4.0)
    );
    let glow = exp(-radius * 3.5) * 0.4;

    return core + rays * 0.8 + cross_flare * 0.5 + glow;
}

@fragment
fn fs_main(in: StarVarying) -> @location(0) vec4<f32> {
    let star = star_shape(in.local, in.spikes);
    if (star < 0.01) {
        discard;
    }

    var color = in.color * star * in.intensity;
    color = color + vec3<f32>(1.0, 0.98, 0.95) * exp(-length(in.local) * 18.0) * 0.6;
    return vec4<f32>(color, 1.0);
}
"#;
