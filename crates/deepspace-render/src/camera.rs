//! Fixed perspective camera the backdrop is viewed through.

use glam::{Mat4, Vec3};

/// Perspective camera looking down -Z.
///
/// The backdrop never moves its camera: everything that flies past moves in
/// world space instead. Only the aspect ratio changes, on resize.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
    pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 100.0);

    /// View matrix for a camera at `position` looking along -Z with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// Projection matrix with reverse-Z: near maps to 1, far maps to 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::NEG_Z
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height.max(1.0);
    }

    /// Pixels per world unit at view depth 1 for a viewport `height` pixels
    /// tall. A sphere of radius `r` at depth `d` covers `r * focal / d` pixels.
    pub fn focal_length_px(&self, height: f32) -> f32 {
        height / (2.0 * (self.fov_y * 0.5).tan())
    }

    /// Distance of `point` in front of the camera along its view axis.
    pub fn view_depth(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.forward())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Self::DEFAULT_POSITION,
            fov_y: Self::DEFAULT_FOV_DEGREES.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(camera: &Camera, point: Vec3) -> Vec3 {
        let clip = camera.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_default_camera_matches_backdrop_framing() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 100.0));
        assert!((camera.fov_y - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 10_000.0);
    }

    #[test]
    fn test_reverse_z_maps_near_to_one_far_to_zero() {
        let camera = Camera::default();
        let near = project(&camera, Vec3::new(0.0, 0.0, 100.0 - 0.1));
        let far = project(&camera, Vec3::new(0.0, 0.0, 100.0 - 10_000.0));
        assert!((near.z - 1.0).abs() < 1e-4, "near depth {}", near.z);
        assert!(far.z.abs() < 1e-4, "far depth {}", far.z);
    }

    #[test]
    fn test_point_ahead_projects_to_center() {
        let camera = Camera::default();
        let ndc = project(&camera, Vec3::new(0.0, 0.0, -3000.0));
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_aspect_ratio_update() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1000.0, 500.0);
        assert!((camera.aspect_ratio - 2.0).abs() < 1e-6);
        camera.set_aspect_ratio(10.0, 0.0);
        assert!(camera.aspect_ratio.is_finite());
    }

    #[test]
    fn test_focal_length_matches_projection() {
        let camera = Camera::default();
        let height = 720.0;
        let focal = camera.focal_length_px(height);

        // A point 1 unit above the axis at depth 500 should land focal/500
        // pixels above the viewport center.
        let ndc = project(&camera, Vec3::new(0.0, 1.0, 100.0 - 500.0));
        let pixels = ndc.y * height * 0.5;
        assert!((pixels - focal / 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_view_depth() {
        let camera = Camera::default();
        assert!((camera.view_depth(Vec3::new(5.0, 5.0, -400.0)) - 500.0).abs() < 1e-4);
        assert!(camera.view_depth(Vec3::new(0.0, 0.0, 200.0)) < 0.0);
    }
}
