use deepspace_render::{
    BlendMode, DepthMode, MeshBuffer, ShaderError, ShaderLibrary, VertexPositionNormalUv,
    geometry,
};

use crate::renderer::{LayerContext, LayerShader};

/// Screen-space haze. The unit quad already spans clip space, so no
/// transform is applied.
pub struct OverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    quad: MeshBuffer,
}

impl OverlayRenderer {
    pub fn new(ctx: &LayerContext, shaders: &mut ShaderLibrary) -> Result<Self, ShaderError> {
        let pipeline = ctx.pipeline(
            shaders,
            &LayerShader {
                label: "overlay",
                source: OVERLAY_SHADER_SOURCE,
                vertex_buffers: &[VertexPositionNormalUv::layout()],
                blend: BlendMode::Additive,
                depth: DepthMode::Ignore,
                cull_mode: None,
            },
        )?;

        Ok(Self {
            pipeline,
            quad: geometry::unit_quad().upload(&ctx.allocator(), "overlay-quad"),
        })
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        self.quad.bind(pass);
        self.quad.draw(pass);
    }
}

pub const OVERLAY_SHADER_SOURCE: &str = r#"
const RICH_PURPLE: vec3<f32> = vec3<f32>(0.23922, 0.17255, 0.36863);
const TEAL_BLUE: vec3<f32> = vec3<f32>(0.10196, 0.30196, 0.35294);
const DARK_TEAL: vec3<f32> = vec3<f32>(0.05882, 0.23922, 0.29020);
const BLUE_GREEN: vec3<f32> = vec3<f32>(0.05098, 0.30196, 0.29020);

struct OverlayVarying {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(2) uv: vec2<f32>) -> OverlayVarying {
    var out: OverlayVarying;
    out.clip = vec4<f32>(position.xy, 0.5, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: OverlayVarying) -> @location(0) vec4<f32> {
    let t = frame.time;
    let p = in.uv * 3.0;
    let cycle = sin(t * 0.08) * 0.5 + 0.5;

    let n1 = fbm(p + t * 0.05 + vec2<f32>(cycle * 2.0, 0.0));
    let n2 = fbm(p * 1.5 - t * 0.03 + vec2<f32>(0.0, cycle * 1.5));
    let n3 = fbm(p * 2.0 + t * 0.04 + vec2<f32>(cycle, -cycle));

    var color = mix(RICH_PURPLE, TEAL_BLUE, n1);
    color = mix(color, DARK_TEAL, n2);
    color = mix(color, BLUE_GREEN, n3);

    var alpha = (n1 * 0.5 + n2 * 0.3 + n3 * 0.2) * 0.35;
    alpha = alpha + frame.sparkle * 0.15;
    alpha = alpha * (1.0 - length(in.uv - 0.5) * 0.8);

    return vec4<f32>(color, alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLUE_GREEN, DARK_TEAL, RICH_PURPLE, TEAL_BLUE};

    #[test]
    fn test_shader_colors_match_palette() {
        for (name, color) in [
            ("RICH_PURPLE", RICH_PURPLE),
            ("TEAL_BLUE", TEAL_BLUE),
            ("DARK_TEAL", DARK_TEAL),
            ("BLUE_GREEN", BLUE_GREEN),
        ] {
            let decl = format!(
                "{name}: vec3<f32> = vec3<f32>({:.5}, {:.5}, {:.5})",
                color.x, color.y, color.z
            );
            assert!(OVERLAY_SHADER_SOURCE.contains(&decl), "missing {decl}");
        }
    }

    #[test]
    fn test_shader_reads_sparkle() {
        assert!(OVERLAY_SHADER_SOURCE.contains("frame.sparkle * 0.15"));
    }
}
