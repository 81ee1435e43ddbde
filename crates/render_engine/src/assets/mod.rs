//! Asset loading
//!
//! Scene descriptions are parsed into an owned, index-based
//! [`SceneAsset`] arena; images are decoded into RGBA8 [`ImageData`].
//! Nothing in this module touches the GPU.

pub mod gltf_import;
pub mod image_loader;
pub mod scene_asset;

pub use image_loader::ImageData;
pub use scene_asset::{
    Accessor, BufferView, MaterialDesc, MeshDesc, NodeDesc, NodeTransform, PrimitiveDesc,
    SamplerDesc, SceneAsset, SceneDesc, TextureDesc,
};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reported by the scene parser
    #[error("Scene parse error: {0}")]
    Parse(#[from] gltf::Error),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;
