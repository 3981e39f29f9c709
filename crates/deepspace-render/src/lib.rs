//! wgpu plumbing for the backdrop: device and surface, camera, depth and
//! multisampled color targets, buffers and procedural meshes, render passes,
//! shader library and the shared per-frame uniform.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod geometry;
pub mod gpu;
pub mod msaa;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod surface;

pub use buffer::{BufferAllocator, IndexData, InstanceBuffer, MeshBuffer, VertexPositionNormalUv};
pub use camera::Camera;
pub use depth::{DepthBuffer, DepthMode};
pub use geometry::MeshData;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    request_headless_device,
};
pub use msaa::{MSAA_SAMPLES, MsaaTarget, supported_sample_count};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{
    BlendMode, FRAME_UNIFORM_WGSL, FrameBindings, FrameUniform, LayerPipelineDesc,
    create_layer_pipeline,
};
pub use shader::{ShaderError, ShaderLibrary, compose};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
