//! GPU-resident scene resources
//!
//! - [`uploader`]: asset buffers and textures to device handles
//! - [`builder`]: node hierarchy to a flat mesh list
//! - [`Material`], [`Primitive`], [`Mesh`], [`Model`]: the drawables

pub mod builder;
pub mod material;
pub mod mesh;
pub mod model;
pub mod primitive;
pub mod uploader;

pub use builder::{resolve_node_transform, SceneBuilder};
pub use material::Material;
pub use mesh::Mesh;
pub use model::Model;
pub use primitive::{DrawCounts, IndexRange, Primitive};
