//! Shared per-frame uniform and the pipeline factory every scene layer uses.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::depth::DepthMode;

/// Per-frame values visible to every shader at `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Surface size in physical pixels.
    pub resolution: [f32; 2],
    /// Accumulated simulation seconds.
    pub time: f32,
    /// Wheel-driven brightness pulse in [0, 1].
    pub sparkle: f32,
    /// Pixels per world unit at view depth 1.
    pub focal_px: f32,
    pub _padding: [f32; 3],
}

static_assertions::assert_eq_size!(FrameUniform, [u8; 176]);

impl FrameUniform {
    pub fn new(camera: &Camera, resolution: (u32, u32), time: f32, sparkle: f32) -> Self {
        let Vec3 { x, y, z } = camera.position;
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_pos: [x, y, z, 1.0],
            resolution: [resolution.0 as f32, resolution.1 as f32],
            time,
            sparkle,
            focal_px: camera.focal_length_px(resolution.1 as f32),
            _padding: [0.0; 3],
        }
    }
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 0.0, 1.0],
            resolution: [1.0, 1.0],
            time: 0.0,
            sparkle: 0.0,
            focal_px: 1.0,
            _padding: [0.0; 3],
        }
    }
}

/// WGSL declaration matching [`FrameUniform`]. Prepended to every scene shader.
pub const FRAME_UNIFORM_WGSL: &str = r#"
struct FrameUniform {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera_pos: vec4<f32>,
    resolution: vec2<f32>,
    time: f32,
    sparkle: f32,
    focal_px: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

// Offset a clip-space position by a pixel-sized corner.
fn offset_clip_px(clip: vec4<f32>, corner: vec2<f32>, size_px: f32) -> vec4<f32> {
    let ndc_offset = corner * size_px / frame.resolution;
    return vec4<f32>(clip.xy + ndc_offset * clip.w, clip.zw);
}
"#;

/// The frame uniform buffer and its bind group (group 0).
pub struct FrameBindings {
    pub layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FrameBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<FrameUniform>() as u64),
                },
                count: None,
            }],
        });

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame-uniform-buffer"),
            contents: bytemuck::bytes_of(&FrameUniform::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            layout,
            buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &FrameUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// How a layer's color output combines with what is already on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    /// Standard "over" compositing.
    Alpha,
    /// Color scaled by alpha and added; glows never darken the layers below.
    Additive,
}

impl BlendMode {
    pub fn state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Opaque => None,
            BlendMode::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
            BlendMode::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            }),
        }
    }
}

/// Everything that distinguishes one scene layer's pipeline from another.
pub struct LayerPipelineDesc<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub blend: BlendMode,
    pub depth: DepthMode,
    pub cull_mode: Option<wgpu::Face>,
    /// Must match the color and depth attachments of the pass.
    pub sample_count: u32,
}

/// Build a triangle-list pipeline with `vs_main`/`fs_main` entry points that
/// reads the frame uniform at group 0.
pub fn create_layer_pipeline(
    device: &wgpu::Device,
    frame_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
    desc: &LayerPipelineDesc,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{}-layout", desc.label)),
        bind_group_layouts: &[frame_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(desc.depth.state()),
        multisample: wgpu::MultisampleState {
            count: desc.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: desc.blend.state(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VertexPositionNormalUv;
    use crate::gpu::request_headless_device;
    use crate::msaa::MSAA_SAMPLES;
    use crate::shader::{ShaderLibrary, compose};

    #[test]
    fn test_frame_uniform_carries_camera_and_clock() {
        let camera = Camera::default();
        let uniform = FrameUniform::new(&camera, (1280, 720), 12.5, 0.75);
        assert_eq!(uniform.camera_pos, [0.0, 0.0, 100.0, 1.0]);
        assert_eq!(uniform.resolution, [1280.0, 720.0]);
        assert_eq!(uniform.time, 12.5);
        assert_eq!(uniform.sparkle, 0.75);
        assert!((uniform.focal_px - camera.focal_length_px(720.0)).abs() < 1e-4);
    }

    #[test]
    fn test_frame_uniform_field_offsets_match_wgsl() {
        // WGSL offsets: view_proj 0, view 64, camera_pos 128, resolution 144,
        // time 152, sparkle 156, focal_px 160.
        assert_eq!(std::mem::offset_of!(FrameUniform, camera_pos), 128);
        assert_eq!(std::mem::offset_of!(FrameUniform, resolution), 144);
        assert_eq!(std::mem::offset_of!(FrameUniform, time), 152);
        assert_eq!(std::mem::offset_of!(FrameUniform, sparkle), 156);
        assert_eq!(std::mem::offset_of!(FrameUniform, focal_px), 160);
    }

    #[test]
    fn test_additive_blend_adds_onto_destination() {
        let blend = BlendMode::Additive.state().unwrap();
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);
        assert!(BlendMode::Opaque.state().is_none());
        assert_eq!(
            BlendMode::Alpha.state(),
            Some(wgpu::BlendState::ALPHA_BLENDING)
        );
    }

    #[test]
    fn test_layer_pipeline_builds_with_frame_uniform() {
        let Some((device, _queue)) = request_headless_device() else {
            return;
        };
        let source = compose(&[
            FRAME_UNIFORM_WGSL,
            r#"
            @vertex
            fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
                return frame.view_proj * vec4<f32>(position, 1.0);
            }

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(frame.sparkle, 0.0, 0.0, 1.0);
            }
            "#,
        ]);
        let mut library = ShaderLibrary::new();
        let shader = library
            .load_from_source(&device, "test-layer", &source)
            .unwrap();
        let bindings = FrameBindings::new(&device);

        for sample_count in [1, MSAA_SAMPLES] {
            let _pipeline = create_layer_pipeline(
                &device,
                &bindings.layout,
                wgpu::TextureFormat::Bgra8Unorm,
                &LayerPipelineDesc {
                    label: "test-layer",
                    shader: &shader,
                    vertex_buffers: &[VertexPositionNormalUv::layout()],
                    blend: BlendMode::Additive,
                    depth: DepthMode::TestOnly,
                    cull_mode: None,
                    sample_count,
                },
            );
        }
    }
}
