//! # Fly Camera
//!
//! Free-moving viewpoint driven by keyboard movement, cursor look and scroll
//! zoom. Orientation is stored as yaw/pitch in degrees; the front/right/up
//! basis is derived from them and recomputed after every change.
//!
//! ## Conventions
//! - Right-handed, Y-up world; default front is -Z (yaw -90°, pitch 0°)
//! - View and projection follow OpenGL clip conventions (z in [-1, 1])
//! - Pitch is kept inside [-89°, 89°], zoom inside [1°, 45°]

use crate::core::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Pitch limit in degrees, both signs
pub const PITCH_LIMIT: f32 = 89.0;

/// Narrowest field of view in degrees
pub const MIN_ZOOM: f32 = 1.0;

/// Widest field of view in degrees
pub const MAX_ZOOM: f32 = 45.0;

/// Direction of a keyboard movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    /// Along front
    Forward,
    /// Against front
    Backward,
    /// Against right
    Left,
    /// Along right
    Right,
}

/// Fly camera with a yaw/pitch orientation
///
/// # Basis Invariant
/// `front`, `right` and `up` are unit length and mutually orthogonal after
/// every public mutation. `up` is derived from `right × front` rather than
/// from the world up vector, which keeps the basis orthonormal close to the
/// pitch limit.
///
/// # Example
/// ```rust
/// use render_engine::render::primitives::{Camera, CameraMovement};
///
/// let mut camera = Camera::default();
/// camera.process_movement(CameraMovement::Forward, 1.0);
/// let view = camera.view_matrix();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,

    yaw: f32,
    pitch: f32,

    /// World units per second
    pub movement_speed: f32,
    /// Degrees per cursor pixel
    pub mouse_sensitivity: f32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Create a camera at `position` with an explicit orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `world_up` - Reference up vector used to derive `right`
    /// * `yaw` - Heading in degrees (-90 looks down -Z)
    /// * `pitch` - Elevation in degrees, clamped to the pitch limit
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let defaults = CameraConfig::default();
        let mut camera = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: world_up,
            right: Vec3::x(),
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed: defaults.movement_speed,
            mouse_sensitivity: defaults.mouse_sensitivity,
            zoom: defaults.zoom,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Create a camera from its configuration section
    pub fn from_config(config: &CameraConfig) -> Self {
        let [x, y, z] = config.position;
        let [ux, uy, uz] = config.world_up;
        let mut camera = Self::new(Vec3::new(x, y, z), Vec3::new(ux, uy, uz), config.yaw, config.pitch);
        camera.movement_speed = config.movement_speed;
        camera.mouse_sensitivity = config.mouse_sensitivity;
        camera.zoom = config.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        camera
    }

    /// Position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the camera without touching its orientation
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit up vector of the camera basis
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Heading in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Elevation in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Move along the front or right basis vector by `movement_speed * dt`
    ///
    /// No bounds are enforced; the camera may fly anywhere.
    pub fn process_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a cursor offset to yaw and pitch
    ///
    /// Offsets are in cursor pixels and scaled by `mouse_sensitivity`. With
    /// `constrain_pitch` set, pitch is clamped to ±89° so the view never
    /// flips over the pole.
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_camera_vectors();
    }

    /// Narrow or widen the field of view by a scroll offset
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// World-to-view transform: look-at(position, position + front, up)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh_gl(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection from the current zoom
    ///
    /// Zoom is stored in degrees and converted to radians here. `aspect`
    /// must be positive; a zero-sized window is the caller's problem.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_gl(utils::deg_to_rad(self.zoom), aspect, near, far)
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (utils::deg_to_rad(self.yaw), utils::deg_to_rad(self.pitch));
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        // Order matters: up comes from right × front, not from world up
        self.front = front.normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert_relative_eq!(f.norm(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(r.norm(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(f.dot(&r), 0.0, epsilon = 1e-4);
        assert_relative_eq!(f.dot(&u), 0.0, epsilon = 1e-4);
        assert_relative_eq!(r.dot(&u), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let camera = Camera::default();

        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(camera.front(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-4);

        let expected = Mat4::look_at_rh_gl(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(camera.view_matrix(), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_forward_movement_scales_front_by_speed() {
        let mut camera = Camera::default();
        let before = camera.position();
        let front = camera.front();

        camera.process_movement(CameraMovement::Forward, 1.0);

        assert_relative_eq!(camera.position() - before, front * 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_strafe_and_backward_are_opposites() {
        let mut camera = Camera::default();
        let start = camera.position();

        camera.process_movement(CameraMovement::Left, 0.5);
        camera.process_movement(CameraMovement::Right, 0.5);
        camera.process_movement(CameraMovement::Forward, 0.25);
        camera.process_movement(CameraMovement::Backward, 0.25);

        assert_relative_eq!(camera.position(), start, epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.process_look(0.0, 500.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT);
        }
        for _ in 0..100 {
            camera.process_look(0.0, -731.0, true);
            assert!(camera.pitch() >= -PITCH_LIMIT);
        }
        assert_orthonormal(&camera);
    }

    #[test]
    fn test_basis_stays_orthonormal_over_look_sequence() {
        let mut camera = Camera::default();
        let deltas = [
            (13.0, 7.0),
            (-250.0, 890.0),
            (0.5, -0.25),
            (1000.0, -1000.0),
            (-3.3, 42.0),
            (77.0, 77.0),
            (-0.01, -900.0),
        ];
        for (dx, dy) in deltas {
            camera.process_look(dx, dy, true);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_zoom_stays_clamped() {
        let mut camera = Camera::default();
        camera.process_scroll(-10.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);

        camera.process_scroll(30.0);
        assert_relative_eq!(camera.zoom(), 15.0);

        camera.process_scroll(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_projection_uses_zoom_in_radians() {
        let camera = Camera::default();
        let projection = camera.projection_matrix(1.0, 0.1, 100.0);
        let expected = 1.0 / (utils::deg_to_rad(45.0) / 2.0).tan();
        assert_relative_eq!(projection[(1, 1)], expected, epsilon = 1e-4);
    }

    #[test]
    fn test_from_config_applies_sensitivities() {
        let config = CameraConfig {
            movement_speed: 10.0,
            mouse_sensitivity: 1.0,
            ..CameraConfig::default()
        };
        let mut camera = Camera::from_config(&config);
        camera.process_look(90.0, 0.0, true);

        assert_relative_eq!(camera.yaw(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.front(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-4);
    }
}
