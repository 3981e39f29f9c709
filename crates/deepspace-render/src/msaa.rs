//! Multisampled color target.
//!
//! Layers draw into a 4x [`MsaaTarget`] that resolves into the surface texture
//! at the end of the pass. Adapters that cannot multisample the surface format
//! fall back to drawing straight into the surface.

use crate::depth::DepthBuffer;

/// Samples per pixel when the adapter supports multisampling.
pub const MSAA_SAMPLES: u32 = 4;

/// Sample count usable for a color format and the depth buffer, given their
/// adapter feature flags. Returns 1 when either cannot be multisampled or the
/// color format cannot be resolved.
pub fn sample_count_for(
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    let color_ok = color.sample_count_supported(MSAA_SAMPLES)
        && color.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE);
    if color_ok && depth.sample_count_supported(MSAA_SAMPLES) {
        MSAA_SAMPLES
    } else {
        1
    }
}

/// Sample count the adapter supports for `color_format` paired with
/// [`DepthBuffer::FORMAT`].
pub fn supported_sample_count(adapter: &wgpu::Adapter, color_format: wgpu::TextureFormat) -> u32 {
    sample_count_for(
        adapter.get_texture_format_features(color_format).flags,
        adapter.get_texture_format_features(DepthBuffer::FORMAT).flags,
    )
}

/// Multisampled color texture sized to the surface.
pub struct MsaaTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl MsaaTarget {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            format,
            width: width.max(1),
            height: height.max(1),
            sample_count,
        }
    }

    /// Recreate the texture for new dimensions. No-op if unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::new(device, self.format, width, height, self.sample_count);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}
