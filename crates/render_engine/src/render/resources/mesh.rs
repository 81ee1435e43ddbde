//! Mesh: primitives sharing one origin and one world transform

use crate::foundation::math::Mat4;
use crate::render::api::device::GraphicsDevice;
use crate::render::api::ShaderProgram;
use crate::render::resources::primitive::{DrawCounts, Primitive};

/// Group of primitives placed by the scene hierarchy
///
/// The origin transform is baked from the node hierarchy at load and never
/// changes. The world transform places the whole mesh at runtime. The
/// effective model matrix is `world * origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: Option<String>,
    primitives: Vec<Primitive>,
    origin: Mat4,
    world: Mat4,
}

impl Mesh {
    /// Create a mesh with an identity world transform
    pub fn new(name: Option<String>, primitives: Vec<Primitive>, origin: Mat4) -> Self {
        Self {
            name,
            primitives,
            origin,
            world: Mat4::identity(),
        }
    }

    /// Name from the asset, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Primitives in asset order
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Transform baked from the node hierarchy
    pub fn origin_transform(&self) -> &Mat4 {
        &self.origin
    }

    /// Runtime placement
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    /// Replace the runtime placement
    pub fn set_world_transform(&mut self, world: Mat4) {
        self.world = world;
    }

    /// `world * origin`
    pub fn model_matrix(&self) -> Mat4 {
        self.world * self.origin
    }

    /// Set `model` and `originModelMat`, then draw every primitive
    pub fn draw(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) -> DrawCounts {
        shader.set_mat4(device, "model", self.world);
        shader.set_mat4(device, "originModelMat", self.origin);

        let mut counts = DrawCounts::default();
        for primitive in &self.primitives {
            if primitive.draw(device, shader) {
                counts.drawn += 1;
            } else {
                counts.skipped += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::api::device::{ProgramSource, UniformValue};
    use crate::render::backends::HeadlessDevice;

    #[test]
    fn test_model_matrix_applies_origin_first() {
        let mut mesh = Mesh::new(None, Vec::new(), Mat4::new_scaling(2.0));
        mesh.set_world_transform(Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)));

        let moved = mesh.model_matrix().transform_point(&crate::foundation::math::Point3::new(1.0, 0.0, 0.0));
        assert_eq!(moved.x, 3.0);
        assert_eq!(*mesh.origin_transform(), Mat4::new_scaling(2.0));
    }

    #[test]
    fn test_draw_sets_both_transforms() {
        let mut device = HeadlessDevice::new();
        let shader = ShaderProgram::from_source(
            &mut device,
            &ProgramSource {
                name: "gbuffer".to_string(),
                vertex: "v".to_string(),
                fragment: "f".to_string(),
                geometry: None,
            },
        );
        let origin = Mat4::new_scaling(0.5);
        let mut mesh = Mesh::new(Some("arch".to_string()), Vec::new(), origin);
        mesh.set_world_transform(Mat4::new_scaling(3.0));

        let counts = mesh.draw(&mut device, &shader);

        assert_eq!(counts, DrawCounts::default());
        assert_eq!(device.uniform(shader.handle(), "originModelMat"), Some(&UniformValue::Mat4(origin)));
        assert_eq!(
            device.uniform(shader.handle(), "model"),
            Some(&UniformValue::Mat4(Mat4::new_scaling(3.0)))
        );
    }
}
