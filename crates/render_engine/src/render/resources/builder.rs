//! Scene graph builder
//!
//! Walks the node hierarchy of every scene in a [`SceneAsset`] and emits one
//! [`Mesh`] per mesh-bearing node. Children are visited before their parent,
//! so a child's mesh precedes its parent's in the output. Transforms are
//! accumulated by parameter: each mesh's origin is the product of its
//! ancestors' local matrices and its own.

use crate::assets::{NodeDesc, SceneAsset};
use crate::foundation::math::Mat4;
use crate::render::api::device::{BufferHandle, GraphicsDevice, TextureHandle};
use crate::render::resources::{Mesh, Primitive};

/// Local matrix of a single node
pub fn resolve_node_transform(node: &NodeDesc) -> Mat4 {
    node.transform.to_matrix()
}

/// Binds meshes against handles that were already uploaded
pub struct SceneBuilder<'a> {
    asset: &'a SceneAsset,
    buffers: &'a [BufferHandle],
    textures: &'a [TextureHandle],
    fallback: TextureHandle,
}

impl<'a> SceneBuilder<'a> {
    /// Builder over one asset and its uploaded tables
    pub fn new(
        asset: &'a SceneAsset,
        buffers: &'a [BufferHandle],
        textures: &'a [TextureHandle],
        fallback: TextureHandle,
    ) -> Self {
        Self { asset, buffers, textures, fallback }
    }

    /// Visit every root of every scene and collect meshes
    pub fn build(&self, device: &mut dyn GraphicsDevice) -> Vec<Mesh> {
        let mut meshes = Vec::new();
        let mut on_path = vec![false; self.asset.nodes.len()];

        for scene in &self.asset.scenes {
            for &root in &scene.nodes {
                self.visit(device, root, &Mat4::identity(), &mut on_path, &mut meshes);
            }
        }

        log::debug!("Scene builder produced {} meshes", meshes.len());
        meshes
    }

    fn visit(
        &self,
        device: &mut dyn GraphicsDevice,
        node_index: usize,
        parent: &Mat4,
        on_path: &mut [bool],
        meshes: &mut Vec<Mesh>,
    ) {
        let Some(node) = self.asset.nodes.get(node_index) else {
            log::warn!("Scene references missing node {}", node_index);
            return;
        };
        if on_path[node_index] {
            log::warn!("Node {} is its own ancestor; cycle ignored", node_index);
            return;
        }
        on_path[node_index] = true;

        let transform = parent * resolve_node_transform(node);

        for &child in &node.children {
            self.visit(device, child, &transform, on_path, meshes);
        }

        if let Some(mesh_index) = node.mesh {
            match self.asset.meshes.get(mesh_index) {
                Some(desc) => {
                    let primitives = desc
                        .primitives
                        .iter()
                        .map(|primitive| {
                            Primitive::from_asset(&mut *device, self.asset, primitive, self.buffers, self.textures, self.fallback)
                        })
                        .collect();
                    meshes.push(Mesh::new(desc.name.clone(), primitives, transform));
                }
                None => log::warn!("Node {} references missing mesh {}", node_index, mesh_index),
            }
        }

        on_path[node_index] = false;
    }
}
