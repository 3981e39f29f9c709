//! Instanced nebula billboards over one shared 64x64 grid.

use bytemuck::{Pod, Zeroable};
use deepspace_render::{
    BlendMode, DepthMode, InstanceBuffer, MeshBuffer, ShaderError, ShaderLibrary,
    VertexPositionNormalUv, geometry,
};

use super::{CLOUD_SEGMENTS, NebulaCloud, NebulaClouds};
use crate::renderer::{LayerContext, LayerShader};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CloudInstance {
    pub center: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub rotation_z: f32,
    pub noise_offset: f32,
}

static_assertions::assert_eq_size!(CloudInstance, [u8; 36]);

impl CloudInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x3,
        4 => Float32,
        5 => Float32x3,
        6 => Float32,
        7 => Float32
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CloudInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&NebulaCloud> for CloudInstance {
    fn from(cloud: &NebulaCloud) -> Self {
        Self {
            center: cloud.position.to_array(),
            size: cloud.size,
            color: cloud.base_color.to_array(),
            rotation_z: cloud.rotation_z,
            noise_offset: cloud.noise_offset,
        }
    }
}

pub struct CloudRenderer {
    pipeline: wgpu::RenderPipeline,
    grid: MeshBuffer,
    instances: InstanceBuffer<CloudInstance>,
    scratch: Vec<CloudInstance>,
}

impl CloudRenderer {
    pub fn new(
        ctx: &LayerContext,
        shaders: &mut ShaderLibrary,
        capacity: usize,
    ) -> Result<Self, ShaderError> {
        let pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "clouds",
                source: CLOUD_SHADER_SOURCE,
                vertex_buffers: &[VertexPositionNormalUv::layout(), CloudInstance::layout()],
                blend: BlendMode::Additive,
                depth: DepthMode::TestOnly,
                cull_mode: None,
            },
        )?;
        let allocator = ctx.allocator();

        Ok(Self {
            pipeline,
            grid: geometry::plane_grid(1.0, 1.0, CLOUD_SEGMENTS).upload(&allocator, "cloud-grid"),
            instances: allocator.create_instances("cloud-instances", capacity),
            scratch: Vec::with_capacity(capacity),
        })
    }

    pub fn update(&mut self, queue: &wgpu::Queue, clouds: &NebulaClouds) {
        self.scratch.clear();
        self.scratch
            .extend(clouds.clouds().iter().map(CloudInstance::from));
        self.instances.write(queue, &self.scratch);
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.instances.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        self.grid.bind(pass);
        self.instances.bind(pass);
        self.grid.draw_instanced(pass, self.instances.len());
    }
}

pub const CLOUD_SHADER_SOURCE: &str = r#"
struct CloudInstance {
    @location(3) center: vec3<f32>,
    @location(4) size: f32,
    @location(5) color: vec3<f32>,
    @location(6) rotation_z: f32,
    @location(7) noise_offset: f32,
};

struct CloudVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) displacement: f32,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(2) uv: vec2<f32>,
    cloud: CloudInstance,
) -> CloudVarying {
    let n = value_noise(uv * 2.0 + frame.time * 0.1 + cloud.noise_offset);
    let local = vec3<f32>(position.xy * cloud.size, n * 100.0);

    let c = cos(cloud.rotation_z);
    let s = sin(cloud.rotation_z);
    let rotated = vec3<f32>(local.x * c - local.y * s, local.x * s + local.y * c, local.z);

    var out: CloudVarying;
    out.clip = frame.view_proj * vec4<f32>(cloud.center + rotated, 1.0);
    out.uv = uv;
    out.color = cloud.color;
    out.displacement = n;
    return out;
}

@fragment
fn fs_main(in: CloudVarying) -> @location(0) vec4<f32> {
    let dist = length(in.uv - 0.5);
    var alpha = (1.0 - smoothstep(0.0, 0.5, dist)) * 0.4;
    alpha = alpha * in.displacement;
    let color = in.color * (1.0 + in.displacement * 0.5);
    return vec4<f32>(color, alpha);
}
"#;
