//! glTF scene import
//!
//! Parses `.glb` / `.gltf` files with the `gltf` crate and copies the
//! document into an owned [`SceneAsset`]. Buffers keep their exact byte
//! layout; images are normalised to RGBA8.

use std::collections::BTreeMap;
use std::path::Path;

use gltf::image::Format;
use gltf::Semantic;

use crate::assets::scene_asset::{
    Accessor, BufferView, MaterialDesc, MeshDesc, NodeDesc, NodeTransform, PrimitiveDesc, SamplerDesc,
    SceneAsset, SceneDesc, TextureDesc,
};
use crate::assets::{AssetError, AssetResult, ImageData};
use crate::render::api::device::{ComponentType, DrawMode, FilterMode, WrapMode};

/// File extensions the importer accepts
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

impl SceneAsset {
    /// Parse a binary or text glTF file into an owned description
    pub fn import<P: AsRef<Path>>(path: P) -> AssetResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AssetError::UnsupportedFormat(format!(
                "{} (expected .glb or .gltf)",
                path.display()
            )));
        }
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let (document, buffers, images) = gltf::import(path)?;
        let asset = convert_document(&document, buffers, images)?;

        log::info!(
            "Imported {}: {} buffers, {} textures, {} meshes, {} primitives, {} nodes",
            path.display(),
            asset.buffers.len(),
            asset.textures.len(),
            asset.meshes.len(),
            asset.primitive_count(),
            asset.nodes.len()
        );
        Ok(asset)
    }
}

fn convert_document(
    document: &gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    images: Vec<gltf::image::Data>,
) -> AssetResult<SceneAsset> {
    let buffer_views = document
        .views()
        .map(|view| BufferView {
            buffer: view.buffer().index(),
            byte_offset: view.offset(),
            byte_length: view.length(),
            byte_stride: view.stride(),
        })
        .collect();

    let accessors = document
        .accessors()
        .map(|accessor| {
            let component_type = ComponentType::from_gl_enum(accessor.data_type().as_gl_enum()).ok_or_else(|| {
                AssetError::InvalidData(format!("accessor {} has an unknown component type", accessor.index()))
            })?;
            Ok(Accessor {
                buffer_view: accessor.view().map(|v| v.index()),
                byte_offset: accessor.offset(),
                count: accessor.count(),
                component_type,
                components: accessor.dimensions().multiplicity() as u8,
                normalized: accessor.normalized(),
            })
        })
        .collect::<AssetResult<Vec<_>>>()?;

    let images = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| {
            let format = image.format;
            let data = expand_to_rgba8(format, &image.pixels).ok_or_else(|| {
                AssetError::UnsupportedFormat(format!("image {} uses pixel format {:?}", index, format))
            })?;
            ImageData::from_rgba8(image.width, image.height, data)
        })
        .collect::<AssetResult<Vec<_>>>()?;

    let samplers = document
        .samplers()
        .map(|sampler| SamplerDesc {
            mag_filter: sampler.mag_filter().and_then(|f| FilterMode::from_gl_enum(f.as_gl_enum())),
            min_filter: sampler.min_filter().and_then(|f| FilterMode::from_gl_enum(f.as_gl_enum())),
            wrap_s: WrapMode::from_gl_enum(sampler.wrap_s().as_gl_enum()),
            wrap_t: WrapMode::from_gl_enum(sampler.wrap_t().as_gl_enum()),
        })
        .collect();

    let textures = document
        .textures()
        .map(|texture| TextureDesc {
            source: texture.source().index(),
            sampler: texture.sampler().index(),
        })
        .collect();

    let materials = document
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            MaterialDesc {
                name: material.name().map(str::to_string),
                base_color_texture: pbr.base_color_texture().map(|info| info.texture().index()),
                normal_texture: material.normal_texture().map(|info| info.texture().index()),
                metallic_roughness_texture: pbr.metallic_roughness_texture().map(|info| info.texture().index()),
            }
        })
        .collect();

    let meshes = document
        .meshes()
        .map(|mesh| MeshDesc {
            name: mesh.name().map(str::to_string),
            primitives: mesh.primitives().map(|primitive| convert_primitive(&primitive)).collect(),
        })
        .collect();

    let nodes = document
        .nodes()
        .map(|node| NodeDesc {
            name: node.name().map(str::to_string),
            transform: convert_transform(node.transform()),
            children: node.children().map(|child| child.index()).collect(),
            mesh: node.mesh().map(|mesh| mesh.index()),
        })
        .collect();

    let scenes = document
        .scenes()
        .map(|scene| SceneDesc { nodes: scene.nodes().map(|node| node.index()).collect() })
        .collect();

    Ok(SceneAsset {
        buffers: declared_buffers(document, buffers),
        buffer_views,
        accessors,
        images,
        samplers,
        textures,
        materials,
        meshes,
        nodes,
        scenes,
    })
}

/// Buffer blobs cut back to the byte length the document declares
///
/// The importer pads every blob to a multiple of four bytes.
fn declared_buffers(document: &gltf::Document, buffers: Vec<gltf::buffer::Data>) -> Vec<Vec<u8>> {
    buffers
        .into_iter()
        .zip(document.buffers())
        .map(|(data, buffer)| {
            let mut bytes = data.0;
            bytes.truncate(buffer.length());
            bytes
        })
        .collect()
}

fn convert_primitive(primitive: &gltf::Primitive<'_>) -> PrimitiveDesc {
    let attributes: BTreeMap<String, usize> = primitive
        .attributes()
        .map(|(semantic, accessor)| (semantic_name(&semantic), accessor.index()))
        .collect();

    PrimitiveDesc {
        attributes,
        indices: primitive.indices().map(|accessor| accessor.index()),
        material: primitive.material().index(),
        mode: DrawMode::from_gl_enum(primitive.mode().as_gl_enum()).unwrap_or_default(),
    }
}

fn semantic_name(semantic: &Semantic) -> String {
    match semantic {
        Semantic::Positions => "POSITION".to_string(),
        Semantic::Normals => "NORMAL".to_string(),
        Semantic::Tangents => "TANGENT".to_string(),
        Semantic::Colors(set) => format!("COLOR_{set}"),
        Semantic::TexCoords(set) => format!("TEXCOORD_{set}"),
        Semantic::Joints(set) => format!("JOINTS_{set}"),
        Semantic::Weights(set) => format!("WEIGHTS_{set}"),
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

fn convert_transform(transform: gltf::scene::Transform) -> NodeTransform {
    match transform {
        gltf::scene::Transform::Matrix { matrix } => {
            let mut values = [0.0; 16];
            for (column, chunk) in matrix.iter().zip(values.chunks_exact_mut(4)) {
                chunk.copy_from_slice(column);
            }
            NodeTransform::Matrix(values)
        }
        gltf::scene::Transform::Decomposed { translation, rotation, scale } => NodeTransform::Trs {
            translation: Some(translation),
            rotation: Some(rotation),
            scale: Some(scale),
        },
    }
}

/// Widen any decoded pixel layout to 8-bit RGBA
fn expand_to_rgba8(format: Format, pixels: &[u8]) -> Option<Vec<u8>> {
    let rgba = match format {
        Format::R8 => pixels.iter().flat_map(|&r| [r, r, r, 255]).collect(),
        Format::R8G8 => pixels.chunks_exact(2).flat_map(|p| [p[0], p[1], 0, 255]).collect(),
        Format::R8G8B8 => pixels.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
        Format::R8G8B8A8 => pixels.to_vec(),
        // 16-bit channels are little endian; keep the high byte
        Format::R16 => pixels.chunks_exact(2).flat_map(|p| [p[1], p[1], p[1], 255]).collect(),
        Format::R16G16 => pixels.chunks_exact(4).flat_map(|p| [p[1], p[3], 0, 255]).collect(),
        Format::R16G16B16 => pixels.chunks_exact(6).flat_map(|p| [p[1], p[3], p[5], 255]).collect(),
        Format::R16G16B16A16 => pixels.chunks_exact(8).flat_map(|p| [p[1], p[3], p[5], p[7]]).collect(),
        Format::R32G32B32FLOAT => pixels
            .chunks_exact(12)
            .flat_map(|p| [float_channel(&p[0..4]), float_channel(&p[4..8]), float_channel(&p[8..12]), 255])
            .collect(),
        Format::R32G32B32A32FLOAT => pixels
            .chunks_exact(16)
            .flat_map(|p| {
                [
                    float_channel(&p[0..4]),
                    float_channel(&p[4..8]),
                    float_channel(&p[8..12]),
                    float_channel(&p[12..16]),
                ]
            })
            .collect(),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(rgba)
}

fn float_channel(bytes: &[u8]) -> u8 {
    let value = bytemuck::pod_read_unaligned::<f32>(bytes);
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
