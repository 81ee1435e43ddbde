//! Point light with cube shadow transforms
//!
//! Shadow rendering covers all six directions around the light. The face
//! order (+X, -X, +Y, -Y, +Z, -Z) matches cubemap layer indexing, and each
//! face uses an up vector that is never parallel to its view axis.

use std::path::Path;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::render::api::device::{GraphicsDevice, TextureHandle};
use crate::render::api::ShaderProgram;
use crate::render::resources::{DrawCounts, Model};

/// Uniform scale of the debug sphere
pub const SPHERE_SCALE: f32 = 0.1;

/// One face of a cube shadow map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeFace {
    /// View axis of the face
    pub direction: Vec3,
    /// Up vector used to build the face view
    pub up: Vec3,
}

/// Faces in cubemap layer order
pub const CUBE_FACES: [CubeFace; 6] = [
    CubeFace { direction: Vec3::new(1.0, 0.0, 0.0), up: Vec3::new(0.0, -1.0, 0.0) },
    CubeFace { direction: Vec3::new(-1.0, 0.0, 0.0), up: Vec3::new(0.0, -1.0, 0.0) },
    CubeFace { direction: Vec3::new(0.0, 1.0, 0.0), up: Vec3::new(0.0, 0.0, 1.0) },
    CubeFace { direction: Vec3::new(0.0, -1.0, 0.0), up: Vec3::new(0.0, 0.0, -1.0) },
    CubeFace { direction: Vec3::new(0.0, 0.0, 1.0), up: Vec3::new(0.0, -1.0, 0.0) },
    CubeFace { direction: Vec3::new(0.0, 0.0, -1.0), up: Vec3::new(0.0, -1.0, 0.0) },
];

/// Omnidirectional light
///
/// Visibility only controls the debug sphere; the light shades and casts
/// shadows either way.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vec3,
    /// RGB intensity
    pub intensity: Vec3,
    sphere: Model,
    visible: bool,
}

impl PointLight {
    /// Default position of the light
    pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 5.5, 0.0);

    /// Default RGB intensity
    pub const DEFAULT_INTENSITY: Vec3 = Vec3::new(15.0, 15.0, 15.0);

    /// Light at `position` with a debug sphere model; starts hidden
    pub fn new(position: Vec3, intensity: Vec3, sphere: Model) -> Self {
        let mut light = Self { position, intensity, sphere, visible: false };
        light.place_sphere();
        light
    }

    /// Light whose sphere is loaded from a scene file
    pub fn load(
        device: &mut dyn GraphicsDevice,
        position: Vec3,
        intensity: Vec3,
        sphere_path: &Path,
        fallback: TextureHandle,
    ) -> Self {
        Self::new(position, intensity, Model::load(device, sphere_path, fallback))
    }

    /// Light position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the light and its sphere
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.place_sphere();
    }

    /// Debug sphere model
    pub fn sphere(&self) -> &Model {
        &self.sphere
    }

    /// Whether the debug sphere is drawn
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the debug sphere
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flip sphere visibility
    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// 90° square perspective used for every cube face
    pub fn shadow_projection(near: f32, far: f32) -> Mat4 {
        Mat4::perspective_gl(utils::deg_to_rad(90.0), 1.0, near, far)
    }

    /// `projection * view` for each cube face, in layer order
    pub fn shadow_transforms(&self, projection: &Mat4) -> [Mat4; 6] {
        CUBE_FACES.map(|face| {
            projection * Mat4::look_at_rh_gl(self.position, self.position + face.direction, face.up)
        })
    }

    /// Set `lightPos` and `lightColor`
    pub fn bind(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) {
        shader.set_vec3(device, "lightPos", self.position);
        shader.set_vec3(device, "lightColor", self.intensity);
    }

    /// Draw the debug sphere if visible
    pub fn draw(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) -> DrawCounts {
        if self.visible {
            self.sphere.draw(device, shader)
        } else {
            DrawCounts::default()
        }
    }

    fn place_sphere(&mut self) {
        let world = Mat4::new_translation(&self.position) * Mat4::new_scaling(SPHERE_SCALE);
        self.sphere.set_world_transform(world);
    }
}
