use deepspace_render::{
    BlendMode, DepthMode, MeshBuffer, ShaderError, ShaderLibrary, VertexPositionNormalUv,
    geometry,
};

use super::{BACKDROP_SEGMENTS, BACKDROP_SIZE};
use crate::renderer::{LayerContext, LayerShader};

pub struct BackdropRenderer {
    pipeline: wgpu::RenderPipeline,
    plane: MeshBuffer,
}

impl BackdropRenderer {
    pub fn new(ctx: &LayerContext, shaders: &mut ShaderLibrary) -> Result<Self, ShaderError> {
        let pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "backdrop",
                source: BACKDROP_SHADER_SOURCE,
                vertex_buffers: &[VertexPositionNormalUv::layout()],
                blend: BlendMode::Alpha,
                depth: DepthMode::TestOnly,
                cull_mode: None,
            },
        )?;
        let plane = geometry::plane_grid(BACKDROP_SIZE, BACKDROP_SIZE, BACKDROP_SEGMENTS);

        Ok(Self {
            pipeline,
            plane: plane.upload(&ctx.allocator(), "backdrop-plane"),
        })
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        self.plane.bind(pass);
        self.plane.draw(pass);
    }
}

pub const BACKDROP_SHADER_SOURCE: &str = r#"
const BACKDROP_DEPTH: f32 = -4000.0;
const DEEP_PURPLE: vec3<f32> = vec3<f32>(0.10196, 0.03922, 0.18039);
const DARK_VIOLET: vec3<f32> = vec3<f32>(0.17647, 0.10588, 0.30588);
const DEEP_BLUE: vec3<f32> = vec3<f32>(0.10196, 0.23922, 0.35294);

struct BackdropVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) elevation: f32,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(2) uv: vec2<f32>) -> BackdropVarying {
    let t = frame.time;
    let x = position.x;
    let y = position.y;

    let wave1 = sin(x * 0.001 + t * 0.3) * cos(y * 0.001 + t * 0.2) * 80.0;
    let wave2 = sin(x * 0.002 - t * 0.15) * sin(y * 0.002 + t * 0.25) * 60.0;
    let wave3 = cos(x * 0.0015 + t * 0.1) * cos(y * 0.0015 - t * 0.2) * 40.0;
    let elevation = wave1 + wave2 + wave3;

    var out: BackdropVarying;
    out.clip = frame.view_proj * vec4<f32>(x, y, BACKDROP_DEPTH + elevation, 1.0);
    out.uv = uv;
    out.elevation = elevation;
    return out;
}

@fragment
fn fs_main(in: BackdropVarying) -> @location(0) vec4<f32> {
    var color = mix(DEEP_PURPLE, DARK_VIOLET, (in.elevation + 150.0) / 300.0);
    color = mix(color, DEEP_BLUE, sin(in.uv.x * 3.0 + frame.time * 0.2) * 0.5 + 0.5);
    return vec4<f32>(color * 0.6, 1.0);
}
"#;
