use bytemuck::{Pod, Zeroable};
use deepspace_render::{
    BlendMode, DepthMode, InstanceBuffer, MeshBuffer, ShaderError, ShaderLibrary,
    VertexPositionNormalUv, compose, geometry,
};
use glam::Mat4;

use super::{
    PLANET_RADIUS, PLANET_SEGMENTS, PlanetState, RING_INNER, RING_OUTER, RING_SEGMENTS,
};
use crate::renderer::{LayerContext, LayerShader};

/// A model matrix passed as a single instance, columns at locations 3..=6.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelInstance {
    pub model: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(ModelInstance, [u8; 64]);

impl ModelInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<Mat4> for ModelInstance {
    fn from(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

pub struct PlanetRenderer {
    sphere_pipeline: wgpu::RenderPipeline,
    ring_pipeline: wgpu::RenderPipeline,
    sphere: MeshBuffer,
    ring: MeshBuffer,
    sphere_model: InstanceBuffer<ModelInstance>,
    ring_model: InstanceBuffer<ModelInstance>,
}

impl PlanetRenderer {
    pub fn new(ctx: &LayerContext, shaders: &mut ShaderLibrary) -> Result<Self, ShaderError> {
        let vertex_buffers = [VertexPositionNormalUv::layout(), ModelInstance::layout()];
        let sphere_source = compose(&[MODEL_INPUT_WGSL, SPHERE_SHADER_SOURCE]);
        let ring_source = compose(&[MODEL_INPUT_WGSL, RING_SHADER_SOURCE]);

        let sphere_pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "planet-sphere",
                source: &sphere_source,
                vertex_buffers: &vertex_buffers,
                blend: BlendMode::Opaque,
                depth: DepthMode::Opaque,
                cull_mode: None,
            },
        )?;
        let ring_pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "planet-ring",
                source: &ring_source,
                vertex_buffers: &vertex_buffers,
                blend: BlendMode::Alpha,
                depth: DepthMode::TestOnly,
                cull_mode: None,
            },
        )?;

        let allocator = ctx.allocator();
        let sphere = geometry::uv_sphere(PLANET_RADIUS, PLANET_SEGMENTS, PLANET_SEGMENTS);
        let ring = geometry::ring(RING_INNER, RING_OUTER, RING_SEGMENTS);

        log::info!(
            "Planet renderer initialized ({} + {} triangles)",
            sphere.triangle_count(),
            ring.triangle_count()
        );

        Ok(Self {
            sphere_pipeline,
            ring_pipeline,
            sphere: sphere.upload(&allocator, "planet-sphere"),
            ring: ring.upload(&allocator, "planet-ring"),
            sphere_model: allocator.create_instances("planet-sphere-model", 1),
            ring_model: allocator.create_instances("planet-ring-model", 1),
        })
    }

    pub fn update(&mut self, queue: &wgpu::Queue, planet: &PlanetState) {
        self.sphere_model
            .write(queue, &[ModelInstance::from(planet.group_matrix())]);
        self.ring_model
            .write(queue, &[ModelInstance::from(planet.ring_matrix())]);
    }

    /// The opaque sphere. Drawn first so every blended layer depth-tests against it.
    pub fn render_sphere<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.sphere_pipeline);
        self.sphere.bind(pass);
        self.sphere_model.bind(pass);
        self.sphere.draw_instanced(pass, self.sphere_model.len());
    }

    pub fn render_ring<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.ring_pipeline);
        self.ring.bind(pass);
        self.ring_model.bind(pass);
        self.ring.draw_instanced(pass, self.ring_model.len());
    }
}

/// Instance attributes carrying the model matrix. Prepended to both planet shaders.
const MODEL_INPUT_WGSL: &str = r#"
struct ModelInput {
    @location(3) c0: vec4<f32>,
    @location(4) c1: vec4<f32>,
    @location(5) c2: vec4<f32>,
    @location(6) c3: vec4<f32>,
};
"#;

pub const SPHERE_SHADER_SOURCE: &str = r#"
struct SphereVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    m: ModelInput,
) -> SphereVarying {
    let model = mat4x4<f32>(m.c0, m.c1, m.c2, m.c3);
    var out: SphereVarying;
    out.clip = frame.view_proj * model * vec4<f32>(position, 1.0);
    out.normal = (model * vec4<f32>(normal, 0.0)).xyz;
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: SphereVarying) -> @location(0) vec4<f32> {
    let deep_blue = vec3<f32>(0.2, 0.4, 0.8);
    let mint_green = vec3<f32>(0.4, 0.9, 0.7);
    let light_blue = vec3<f32>(0.5, 0.7, 0.9);
    let purple = vec3<f32>(0.6, 0.4, 0.8);
    let t = frame.time;

    let latitude = in.uv.y;
    let band1 = sin(latitude * 25.0 + t * 0.1) * 0.5 + 0.5;
    let band2 = sin(latitude * 15.0 + t * 0.08) * 0.5 + 0.5;
    let noise1 = sin(in.uv.x * 50.0 + t * 0.05) * 0.5 + 0.5;
    let noise2 = sin(in.uv.y * 30.0 + in.uv.x * 20.0) * 0.5 + 0.5;
    let combined = noise1 * 0.3 + noise2 * 0.3;

    var color = mix(deep_blue, mint_green, band1);
    color = mix(color, light_blue, band2 * 0.5);
    color = mix(color, purple, noise2 * 0.15);
    color = color + vec3<f32>(combined * 0.1);

    let light = normalize(vec3<f32>(1.0, 1.0, 1.0));
    let diffuse = max(dot(normalize(in.normal), light), 0.0);
    color = color * (0.3 + diffuse * 0.7);

    return vec4<f32>(color, 1.0);
}
"#;

pub const RING_SHADER_SOURCE: &str = r#"
struct RingVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) local: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, m: ModelInput) -> RingVarying {
    let model = mat4x4<f32>(m.c0, m.c1, m.c2, m.c3);
    var out: RingVarying;
    out.clip = frame.view_proj * model * vec4<f32>(position, 1.0);
    out.local = position;
    return out;
}

fn rainbow(hue: f32) -> vec3<f32> {
    let h = hue * 6.0;
    let x = 1.0 - abs(h % 2.0 - 1.0);
    if (h < 1.0) { return vec3<f32>(1.0, x, 0.0); }
    if (h < 2.0) { return vec3<f32>(x, 1.0, 0.0); }
    if (h < 3.0) { return vec3<f32>(0.0, 1.0, x); }
    if (h < 4.0) { return vec3<f32>(0.0, x, 1.0); }
    if (h < 5.0) { return vec3<f32>(x, 0.0, 1.0); }
    return vec3<f32>(1.0, 0.0, x);
}

@fragment
fn fs_main(in: RingVarying) -> @location(0) vec4<f32> {
    let dist = length(in.local);
    let hue = fract((dist - 40.0) / 30.0 + frame.time * 0.05);

    var pattern = sin(dist * 0.8) * 0.5 + 0.5;
    pattern = pattern + sin(dist * 2.5) * 0.3;

    let gap = 1.0 - smoothstep(53.0, 54.0, dist) * (1.0 - smoothstep(55.0, 56.0, dist));

    var color = rainbow(hue) * (0.7 + pattern * 0.3);
    var alpha = 0.7 + pattern * 0.3;
    alpha = alpha * gap;
    alpha = alpha * smoothstep(40.0, 42.0, dist);
    alpha = alpha * (1.0 - smoothstep(68.0, 70.0, dist));

    let shimmer = sin(dist * 10.0 + frame.time) * 0.1 + 0.9;
    color = color * shimmer;

    return vec4<f32>(color, alpha);
}
"#;
