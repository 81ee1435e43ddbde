//! GPU resource uploader
//!
//! Turns the blobs of a [`SceneAsset`] into device handles exactly once per
//! asset. Buffers are uploaded verbatim: attribute offsets and strides are
//! interpreted later against the same byte layout, so nothing is repacked.

use std::path::Path;

use crate::assets::{ImageData, SceneAsset, TextureDesc};
use crate::check_device_errors;
use crate::render::api::device::{
    BufferHandle, FilterMode, GraphicsDevice, SamplerState, TextureDescriptor, TextureFormat, TextureHandle,
    TextureKind, WrapMode,
};
use crate::render::RenderResult;

/// Handle used when even the 1x1 fallback could not be created
///
/// Binding it is harmless; sampling it yields undefined colour.
pub const NULL_TEXTURE: TextureHandle = TextureHandle(0);

/// Upload one device buffer per asset buffer, in table order
///
/// The returned vector is indexed exactly like `asset.buffers`.
pub fn upload_buffers(device: &mut dyn GraphicsDevice, asset: &SceneAsset) -> RenderResult<Vec<BufferHandle>> {
    let handles = asset
        .buffers
        .iter()
        .map(|bytes| device.create_buffer(bytes))
        .collect::<RenderResult<Vec<_>>>()?;

    log::debug!("Uploaded {} buffers ({} bytes)", handles.len(), asset.buffers.iter().map(Vec::len).sum::<usize>());
    check_device_errors!(device);
    Ok(handles)
}

/// Sampler state for a texture entry
///
/// Missing sampler objects and missing fields fall back to linear filtering
/// with repeat wrapping.
pub fn resolve_sampler(asset: &SceneAsset, texture: &TextureDesc) -> SamplerState {
    let defaults = SamplerState::default();
    let Some(sampler) = texture.sampler.and_then(|i| asset.samplers.get(i)) else {
        return defaults;
    };

    SamplerState {
        min_filter: sampler.min_filter.unwrap_or(defaults.min_filter),
        mag_filter: sampler.mag_filter.unwrap_or(defaults.mag_filter),
        wrap_s: sampler.wrap_s.unwrap_or(defaults.wrap_s),
        wrap_t: sampler.wrap_t.unwrap_or(defaults.wrap_t),
    }
}

/// Upload one texture per asset texture entry, in table order
///
/// Entries whose image is missing or whose upload fails are replaced by
/// `fallback`, so the table stays index-aligned with `asset.textures`.
/// Mipmaps are generated only for the four mipmap minification filters.
pub fn upload_textures(
    device: &mut dyn GraphicsDevice,
    asset: &SceneAsset,
    fallback: TextureHandle,
) -> Vec<TextureHandle> {
    let handles: Vec<TextureHandle> = asset
        .textures
        .iter()
        .enumerate()
        .map(|(index, texture)| {
            let Some(image) = asset.images.get(texture.source) else {
                log::warn!("Texture {} references missing image {}", index, texture.source);
                return fallback;
            };
            let sampler = resolve_sampler(asset, texture);
            match upload_image(device, image, sampler) {
                Ok(handle) => handle,
                Err(e) => {
                    log::warn!("Texture {} upload failed, using fallback: {}", index, e);
                    fallback
                }
            }
        })
        .collect();

    log::debug!("Uploaded {} textures", handles.len());
    check_device_errors!(device);
    handles
}

/// Upload a single RGBA8 image with the given sampler state
pub fn upload_image(
    device: &mut dyn GraphicsDevice,
    image: &ImageData,
    sampler: SamplerState,
) -> RenderResult<TextureHandle> {
    let descriptor = TextureDescriptor {
        kind: TextureKind::Texture2D,
        width: image.width,
        height: image.height,
        format: TextureFormat::Rgba8,
        sampler,
    };
    let handle = device.create_texture(&descriptor, Some(&image.data))?;
    if sampler.min_filter.uses_mipmaps() {
        device.generate_mipmaps(handle);
    }
    Ok(handle)
}

/// Sampler used for the flat fallback texture
pub fn fallback_sampler() -> SamplerState {
    SamplerState {
        min_filter: FilterMode::LinearMipmapLinear,
        mag_filter: FilterMode::Linear,
        wrap_s: WrapMode::Repeat,
        wrap_t: WrapMode::Repeat,
    }
}

/// Load the flat fallback texture from disk
///
/// The image is flipped vertically on load. A missing or unreadable file
/// is logged and replaced by a 1x1 white image, so the returned handle is
/// always bindable.
pub fn upload_fallback(device: &mut dyn GraphicsDevice, path: &Path) -> TextureHandle {
    let image = match ImageData::from_file(path) {
        Ok(mut image) => {
            image.flip_vertical();
            image
        }
        Err(e) => {
            log::error!("Texture failed to load at path {}: {}", path.display(), e);
            ImageData::solid_color(1, 1, [255, 255, 255, 255])
        }
    };

    let handle = upload_image(device, &image, fallback_sampler()).unwrap_or_else(|e| {
        log::error!("Fallback texture upload failed: {}", e);
        NULL_TEXTURE
    });
    check_device_errors!(device);
    handle
}
