//! Window surface sizing.
//!
//! Tracks the physical pixel size the GPU surface must match, clamping the
//! zero-size windows Wayland and minimized Windows report to 1x1.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width over height, as fed to the camera projection.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Emitted when the surface must be reconfigured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    pub scale_factor: f64,
}

/// Physical size and scale factor of the window the backdrop is drawn into.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    /// Set once the compositor has reported a non-zero size.
    configured: bool,
}

impl SurfaceWrapper {
    /// Zero dimensions are clamped to 1 and leave the wrapper unconfigured
    /// until the first real resize arrives.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Returns an event only when the clamped dimensions actually changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;
        self.configured = true;

        Some(SurfaceResizeEvent {
            physical: self.physical_size(),
            scale_factor: self.scale_factor,
        })
    }

    /// A window moved to a display with a different DPI.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_window_is_clamped_and_unconfigured() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert!(!wrapper.is_configured());
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize {
                width: 1,
                height: 1
            }
        );

        let event = wrapper.handle_resize(1920, 1080).unwrap();
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
        assert!(wrapper.is_configured());
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(1280, 720, 1.0);
        assert!(wrapper.handle_resize(1280, 720).is_none());
    }

    #[test]
    fn test_shrinking_to_zero_clamps_to_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(0, 0).unwrap();
        assert_eq!(
            event.physical,
            PhysicalSize {
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn test_scale_factor_change_reports_new_physical_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_scale_factor_changed(2.0, 3840, 2160).unwrap();
        assert_eq!(event.physical.width, 3840);
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let size = PhysicalSize {
            width: 1920,
            height: 1080,
        };
        assert!((size.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
