//! Model: everything uploaded and built from one scene asset
//!
//! A [`Model`] owns the device buffer and texture tables of its asset and
//! the flattened mesh list. Primitives refer into those tables by handle and
//! never own them.

use std::path::Path;

use crate::assets::SceneAsset;
use crate::foundation::math::Mat4;
use crate::render::api::device::{BufferHandle, GraphicsDevice, TextureHandle};
use crate::render::api::ShaderProgram;
use crate::render::resources::builder::SceneBuilder;
use crate::render::resources::primitive::DrawCounts;
use crate::render::resources::uploader::{upload_buffers, upload_textures};
use crate::render::resources::Mesh;
use crate::render::RenderResult;

/// Uploaded scene ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    buffers: Vec<BufferHandle>,
    textures: Vec<TextureHandle>,
    fallback: TextureHandle,
    meshes: Vec<Mesh>,
}

impl Model {
    /// Model that draws nothing
    pub fn empty(fallback: TextureHandle) -> Self {
        Self {
            buffers: Vec::new(),
            textures: Vec::new(),
            fallback,
            meshes: Vec::new(),
        }
    }

    /// Upload an already parsed asset and build its meshes
    pub fn from_asset(
        device: &mut dyn GraphicsDevice,
        asset: &SceneAsset,
        fallback: TextureHandle,
    ) -> RenderResult<Self> {
        let buffers = upload_buffers(device, asset)?;
        let textures = upload_textures(device, asset, fallback);
        let meshes = SceneBuilder::new(asset, &buffers, &textures, fallback).build(device);
        crate::check_device_errors!(device);

        Ok(Self { buffers, textures, fallback, meshes })
    }

    /// Import, upload and build a scene file
    ///
    /// Parse and upload failures are logged and yield an empty model, which
    /// renders as a scene-less frame.
    pub fn load(device: &mut dyn GraphicsDevice, path: &Path, fallback: TextureHandle) -> Self {
        let asset = match SceneAsset::import(path) {
            Ok(asset) => asset,
            Err(e) => {
                log::error!("Failed to load scene {}: {}", path.display(), e);
                return Self::empty(fallback);
            }
        };

        match Self::from_asset(device, &asset, fallback) {
            Ok(model) => {
                log::info!(
                    "Scene {} loaded: {} meshes, {} primitives, {} textures",
                    path.display(),
                    model.meshes.len(),
                    model.primitive_count(),
                    model.textures.len()
                );
                model
            }
            Err(e) => {
                log::error!("Failed to upload scene {}: {}", path.display(), e);
                Self::empty(fallback)
            }
        }
    }

    /// Device buffers, indexed like the asset's buffer table
    pub fn buffers(&self) -> &[BufferHandle] {
        &self.buffers
    }

    /// Device textures, indexed like the asset's texture table
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Texture substituted for absent material slots
    pub fn fallback(&self) -> TextureHandle {
        self.fallback
    }

    /// Flattened meshes in build order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total number of primitives
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives().len()).sum()
    }

    /// Place every mesh of the model
    pub fn set_world_transform(&mut self, world: Mat4) {
        for mesh in &mut self.meshes {
            mesh.set_world_transform(world);
        }
    }

    /// Draw every mesh; undrawable primitives are skipped and counted
    pub fn draw(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) -> DrawCounts {
        let mut counts = DrawCounts::default();
        for mesh in &self.meshes {
            counts += mesh.draw(device, shader);
        }
        counts
    }
}
