//! Directional light
//!
//! Parallel light rays along a fixed direction. The position is only used to
//! place the shadow camera; it has no effect on shading.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::api::device::GraphicsDevice;
use crate::render::api::ShaderProgram;

/// Sun-like light with an orthographic shadow volume
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in
    pub direction: Vec3,
    /// Shadow camera position
    pub position: Vec3,
    /// Shadow camera up vector
    pub up: Vec3,
    /// RGB intensity
    pub intensity: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.571362, -0.816137, 0.0864038),
            position: Vec3::new(-9.98629, 15.9951, -2.02774),
            up: Vec3::new(0.806962, 0.577859, 0.122032),
            intensity: Vec3::new(1.8, 1.8, 1.8),
        }
    }
}

impl DirectionalLight {
    /// Light with explicit parameters
    pub fn new(direction: Vec3, position: Vec3, up: Vec3, intensity: Vec3) -> Self {
        Self { direction, position, up, intensity }
    }

    /// look-at(position, position + direction, up)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh_gl(self.position, self.position + self.direction, self.up)
    }

    /// Orthographic shadow projection from six planes
    pub fn projection_matrix(&self, left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4 {
        Mat4::orthographic_gl(left, right, bottom, top, near, far)
    }

    /// Symmetric orthographic projection with half extent `extent`
    pub fn symmetric_projection(&self, extent: f32, near: f32, far: f32) -> Mat4 {
        self.projection_matrix(-extent, extent, extent, -extent, near, far)
    }

    /// `projection * view` for a symmetric shadow volume
    pub fn light_space_matrix(&self, extent: f32, near: f32, far: f32) -> Mat4 {
        self.symmetric_projection(extent, near, far) * self.view_matrix()
    }

    /// Set `lightDir` and `lightColor`
    pub fn bind(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) {
        shader.set_vec3(device, "lightDir", self.direction);
        shader.set_vec3(device, "lightColor", self.intensity);
    }
}
