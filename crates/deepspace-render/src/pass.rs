//! Render pass setup and per-frame command encoding.
//!
//! [`RenderPassBuilder`] collects the clear color, depth attachment and
//! optional multisampled color target for a pass; [`FrameEncoder`] owns the
//! command encoder and surface texture for one frame and presents it on
//! [`FrameEncoder::submit`].

use std::sync::Arc;

/// Empty space behind every layer.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Depth attachment for a pass.
#[derive(Debug)]
pub struct DepthAttachmentConfig {
    pub view: wgpu::TextureView,
    pub clear_value: f32,
}

/// Builder for render pass descriptors.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_attachment: Option<DepthAttachmentConfig>,
    msaa_target: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// A pass that clears to [`SPACE_BLACK`] with no depth attachment.
    pub fn new() -> Self {
        Self {
            clear_color: SPACE_BLACK,
            depth_attachment: None,
            msaa_target: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a depth buffer cleared to `clear_value` at the start of the pass.
    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig { view, clear_value });
        self
    }

    /// Draw into the multisampled `view` and resolve it into the color view
    /// handed to [`begin`](Self::begin).
    pub fn msaa_target(mut self, view: wgpu::TextureView) -> Self {
        self.msaa_target = Some(view);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Begin the configured pass on `encoder`, drawing into `color_view`.
    pub fn begin<'encoder>(
        &'encoder self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        // Multisampled contents are dead once resolved.
        let (view, resolve_target, store) = match &self.msaa_target {
            Some(msaa) => (msaa, Some(color_view), wgpu::StoreOp::Discard),
            None => (color_view, None, wgpu::StoreOp::Store),
        };
        let color_attachment = wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Command encoding for one presented frame.
///
/// Dropping a `FrameEncoder` without calling [`submit`](Self::submit)
/// discards the frame.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    queue: Arc<wgpu::Queue>,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            queue,
            surface_texture,
            surface_view,
        }
    }

    /// Begin a render pass targeting the frame's surface texture.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Submit the recorded commands and present the surface texture.
    pub fn submit(self) {
        self.queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthBuffer;
    use crate::gpu::request_headless_device;
    use crate::msaa::{MSAA_SAMPLES, MsaaTarget};

    #[test]
    fn test_default_clear_color_is_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, SPACE_BLACK);
        assert_eq!(SPACE_BLACK.a, 1.0);
    }

    #[test]
    fn test_builder_sets_clear_color() {
        let builder = RenderPassBuilder::new().clear_color(wgpu::Color::RED);
        assert_eq!(builder.clear_color, wgpu::Color::RED);
    }

    #[test]
    fn test_depth_attachment_is_optional() {
        assert!(RenderPassBuilder::new().depth_attachment.is_none());
    }

    #[test]
    fn test_msaa_target_is_optional() {
        assert!(RenderPassBuilder::new().msaa_target.is_none());
    }

    #[test]
    fn test_msaa_pass_resolves_into_color_view() {
        let Some((device, queue)) = request_headless_device() else {
            return;
        };
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let msaa = MsaaTarget::new(&device, format, 64, 32, MSAA_SAMPLES);
        let depth = DepthBuffer::new(&device, 64, 32, MSAA_SAMPLES);
        let resolved = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("resolved"),
            size: wgpu::Extent3d {
                width: 64,
                height: 32,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let resolved_view = resolved.create_view(&wgpu::TextureViewDescriptor::default());

        let builder = RenderPassBuilder::new()
            .depth(depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .msaa_target(msaa.view.clone());
        assert!(builder.msaa_target.is_some());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("msaa-test"),
        });
        drop(builder.begin(&mut encoder, &resolved_view));
        queue.submit([encoder.finish()]);
    }

    #[test]
    fn test_label_is_stored() {
        let builder = RenderPassBuilder::new().label("backdrop-pass");
        assert_eq!(builder.label, Some("backdrop-pass"));
    }
}
