//! Math utilities and types
//!
//! Provides the fundamental math types used by the camera, the scene builder
//! and the light descriptors. All matrices are column-major and follow the
//! right-handed OpenGL conventions (clip space z in [-1, 1]).

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Build a transform from raw translation / rotation / scale components
    ///
    /// Rotation is given in `[x, y, z, w]` order. Missing components contribute
    /// the identity (zero translation, identity rotation, unit scale).
    pub fn from_components(
        translation: Option<[f32; 3]>,
        rotation: Option<[f32; 4]>,
        scale: Option<[f32; 3]>,
    ) -> Self {
        let position = translation.map_or_else(Vec3::zeros, |[x, y, z]| Vec3::new(x, y, z));
        let rotation = rotation.map_or_else(Quat::identity, |[x, y, z, w]| {
            Quat::from_quaternion(Quaternion::new(w, x, y, z))
        });
        let scale = scale.map_or_else(|| Vec3::new(1.0, 1.0, 1.0), |[x, y, z]| Vec3::new(x, y, z));
        Self { position, rotation, scale }
    }

    /// Convert to a transformation matrix (T * R * S)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with the conventions used by the renderer
pub trait Mat4Ext {
    /// Right-handed look-at view matrix
    fn look_at_rh_gl(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Right-handed perspective projection, vertical field of view in radians
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed orthographic projection from six planes
    fn orthographic_gl(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Reinterpret 16 floats as a column-major matrix, element order untouched
    fn from_column_array(values: &[f32; 16]) -> Mat4;

    /// Flatten into 16 floats in column-major order
    fn to_column_array(&self) -> [f32; 16];
}

impl Mat4Ext for Mat4 {
    fn look_at_rh_gl(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // nalgebra takes aspect first; depth maps to [-1, 1] like glm::perspective
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn orthographic_gl(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_orthographic(left, right, bottom, top, near, far)
    }

    fn from_column_array(values: &[f32; 16]) -> Mat4 {
        Mat4::from_column_slice(values)
    }

    fn to_column_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.as_slice());
        out
    }
}
