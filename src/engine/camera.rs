// Camera rig and view matrix bookkeeping

use glam::{Mat4, Vec3};

/// Distance moved per pan event, in world units
const CAMERA_SPEED: f32 = 0.5;

/// Heading change per turn event, in degrees
const TURN_STEP_DEGREES: f32 = 2.0;

/// User camera: a translation and a rotation, composed with the fixed
/// world-to-OpenGL change of basis (the world is Z-up, GL is Y-up).
///
/// Pan events move in the camera's own frame so "forward" always tracks
/// where the camera currently looks. Camera events never touch the
/// character or the blend engine.
#[derive(Debug, Clone)]
pub struct Camera {
    world_to_gl: Mat4,
    rotation: Mat4,
    translation: Mat4,
}

impl Camera {
    /// Camera at the default vantage point overlooking the origin
    pub fn new() -> Self {
        Self {
            world_to_gl: Mat4::from_rotation_x(90f32.to_radians()),
            rotation: Mat4::from_rotation_x(-30f32.to_radians())
                * Mat4::from_rotation_z(15f32.to_radians()),
            translation: Mat4::from_translation(Vec3::new(-5.0, 15.0, -15.5)),
        }
    }

    /// Combined view matrix to prepend to every world transform
    pub fn view_matrix(&self) -> Mat4 {
        self.world_to_gl * self.rotation * self.translation
    }

    /// Translate in the camera's own frame
    fn pan(&mut self, offset: Vec3) {
        self.translation = self.translation
            * self.rotation.transpose()
            * Mat4::from_translation(offset)
            * self.rotation;
    }

    pub fn pan_forward(&mut self) {
        self.pan(Vec3::new(0.0, -CAMERA_SPEED, 0.0));
    }

    pub fn pan_backward(&mut self) {
        self.pan(Vec3::new(0.0, CAMERA_SPEED, 0.0));
    }

    pub fn pan_left(&mut self) {
        self.pan(Vec3::new(CAMERA_SPEED, 0.0, 0.0));
    }

    pub fn pan_right(&mut self) {
        self.pan(Vec3::new(-CAMERA_SPEED, 0.0, 0.0));
    }

    pub fn pan_up(&mut self) {
        self.pan(Vec3::new(0.0, 0.0, -CAMERA_SPEED));
    }

    pub fn pan_down(&mut self) {
        self.pan(Vec3::new(0.0, 0.0, CAMERA_SPEED));
    }

    pub fn turn_left(&mut self) {
        self.rotation = self.rotation * Mat4::from_rotation_z(TURN_STEP_DEGREES.to_radians());
    }

    pub fn turn_right(&mut self) {
        self.rotation = self.rotation * Mat4::from_rotation_z(-TURN_STEP_DEGREES.to_radians());
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        for (left, right) in a.to_cols_array().iter().zip(b.to_cols_array()) {
            assert_relative_eq!(*left, right, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_pan_forward_and_back_round_trip() {
        let mut camera = Camera::new();
        let before = camera.view_matrix();
        camera.pan_forward();
        camera.pan_backward();
        assert_mat4_eq(camera.view_matrix(), before);
    }

    #[test]
    fn test_turn_left_and_right_round_trip() {
        let mut camera = Camera::new();
        let before = camera.view_matrix();
        camera.turn_left();
        camera.turn_right();
        assert_mat4_eq(camera.view_matrix(), before);
    }

    #[test]
    fn test_pan_moves_the_view() {
        let mut camera = Camera::new();
        let before = camera.view_matrix();
        camera.pan_left();
        let after = camera.view_matrix();
        assert!(before
            .to_cols_array()
            .iter()
            .zip(after.to_cols_array())
            .any(|(a, b)| (a - b).abs() > 1e-5));
    }

    #[test]
    fn test_pan_follows_camera_heading() {
        // After a quarter turn, "forward" pans along a different world axis
        let mut straight = Camera::new();
        let mut turned = Camera::new();
        for _ in 0..45 {
            turned.turn_left();
        }
        straight.pan_forward();
        turned.pan_forward();
        let a = straight.view_matrix().to_cols_array();
        let b = turned.view_matrix().to_cols_array();
        assert!(a.iter().zip(b).any(|(x, y)| (x - y).abs() > 1e-3));
    }
}
