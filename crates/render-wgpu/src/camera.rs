use glam::{Mat4, Vec3};
use roadstream_render::RenderView;

/// Perspective camera placed by the frame driver each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self::from_view(RenderView::default(), 16.0 / 9.0)
    }
}

impl ChaseCamera {
    pub fn from_view(view: RenderView, aspect: f32) -> Self {
        Self {
            eye: view.eye,
            target: view.target,
            fov: view.fov_degrees.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn apply(&mut self, view: RenderView) {
        self.eye = view.eye;
        self.target = view.target;
        self.fov = view.fov_degrees.to_radians();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).try_normalize().unwrap_or(Vec3::Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera() {
        let cam = ChaseCamera::default();
        assert_relative_eq!(cam.fov, 75.0_f32.to_radians());
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn target_lands_in_view_center() {
        let cam = ChaseCamera::from_view(
            RenderView {
                eye: Vec3::new(-1.25, 2.0, 25.0),
                target: Vec3::new(-1.25, 2.0, 35.0),
                fov_degrees: 75.0,
            },
            1.5,
        );
        let clip = cam.view_projection() * cam.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!((0.0..1.0).contains(&ndc.z));
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = ChaseCamera::default();
        cam.set_viewport(800, 0);
        assert_eq!(cam.aspect, 800.0);
        cam.set_viewport(1200, 600);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn degenerate_view_falls_back() {
        let mut cam = ChaseCamera::default();
        cam.apply(RenderView {
            eye: Vec3::ONE,
            target: Vec3::ONE,
            fov_degrees: 60.0,
        });
        assert_eq!(cam.forward(), Vec3::Z);
    }
}
