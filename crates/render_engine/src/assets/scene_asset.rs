//! Owned scene description
//!
//! Index-based arena with the same shape as a glTF document: buffers,
//! views into them, typed accessors, images, samplers, textures, materials,
//! meshes, a node hierarchy and scene roots. Every cross reference is an
//! index into one of the tables. The description is read-only once built.

use std::collections::BTreeMap;

use crate::assets::ImageData;
use crate::foundation::math::{Mat4, Mat4Ext, Transform};
use crate::render::api::device::{ComponentType, DrawMode, FilterMode, WrapMode};

/// Attribute name of vertex positions
pub const ATTRIBUTE_POSITION: &str = "POSITION";
/// Attribute name of vertex normals
pub const ATTRIBUTE_NORMAL: &str = "NORMAL";
/// Attribute name of the first texture coordinate set
pub const ATTRIBUTE_TEXCOORD_0: &str = "TEXCOORD_0";
/// Attribute name of tangents
pub const ATTRIBUTE_TANGENT: &str = "TANGENT";

/// Byte range of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferView {
    /// Index into [`SceneAsset::buffers`]
    pub buffer: usize,
    /// Start of the range in bytes
    pub byte_offset: usize,
    /// Length of the range in bytes
    pub byte_length: usize,
    /// Distance between consecutive elements; `None` means tightly packed
    pub byte_stride: Option<usize>,
}

/// Typed view into a buffer view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Index into [`SceneAsset::buffer_views`]; `None` for sparse/zero data
    pub buffer_view: Option<usize>,
    /// Offset relative to the start of the view
    pub byte_offset: usize,
    /// Number of elements
    pub count: usize,
    /// Scalar type of each component
    pub component_type: ComponentType,
    /// Components per element (1 for scalars, 3 for VEC3, ...)
    pub components: u8,
    /// Integer data is normalized to [0, 1] / [-1, 1]
    pub normalized: bool,
}

impl Accessor {
    /// Size of one element in bytes, ignoring stride
    pub fn element_size(&self) -> usize {
        self.component_type.size_bytes() * usize::from(self.components)
    }
}

/// Sampling parameters of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerDesc {
    /// Magnification filter, if specified
    pub mag_filter: Option<FilterMode>,
    /// Minification filter, if specified
    pub min_filter: Option<FilterMode>,
    /// Horizontal wrap mode, if specified
    pub wrap_s: Option<WrapMode>,
    /// Vertical wrap mode, if specified
    pub wrap_t: Option<WrapMode>,
}

/// Image plus optional sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    /// Index into [`SceneAsset::images`]
    pub source: usize,
    /// Index into [`SceneAsset::samplers`]
    pub sampler: Option<usize>,
}

/// Texture slots of a material
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterialDesc {
    /// Optional name
    pub name: Option<String>,
    /// Base colour texture index
    pub base_color_texture: Option<usize>,
    /// Normal map texture index
    pub normal_texture: Option<usize>,
    /// Metallic-roughness texture index
    pub metallic_roughness_texture: Option<usize>,
}

/// One draw call worth of geometry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimitiveDesc {
    /// Attribute name to accessor index
    pub attributes: BTreeMap<String, usize>,
    /// Index accessor
    pub indices: Option<usize>,
    /// Index into [`SceneAsset::materials`]
    pub material: Option<usize>,
    /// Primitive assembly mode
    pub mode: DrawMode,
}

/// Named group of primitives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeshDesc {
    /// Optional name
    pub name: Option<String>,
    /// Primitives in declaration order
    pub primitives: Vec<PrimitiveDesc>,
}

/// Local transform of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTransform {
    /// 16 floats in column-major order
    Matrix([f32; 16]),
    /// Optional translation, rotation (x, y, z, w) and scale
    Trs {
        /// Translation
        translation: Option<[f32; 3]>,
        /// Rotation quaternion in x, y, z, w order
        rotation: Option<[f32; 4]>,
        /// Scale
        scale: Option<[f32; 3]>,
    },
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::Trs { translation: None, rotation: None, scale: None }
    }
}

impl NodeTransform {
    /// Resolve into a local matrix
    ///
    /// A matrix is taken element for element. TRS components compose as
    /// `T * R * S`, an absent component contributing the identity.
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            Self::Matrix(values) => Mat4::from_column_array(values),
            Self::Trs { translation, rotation, scale } => {
                Transform::from_components(*translation, *rotation, *scale).to_matrix()
            }
        }
    }
}

/// Node of the hierarchy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeDesc {
    /// Optional name
    pub name: Option<String>,
    /// Local transform
    pub transform: NodeTransform,
    /// Child node indices
    pub children: Vec<usize>,
    /// Mesh drawn at this node
    pub mesh: Option<usize>,
}

/// Set of root nodes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneDesc {
    /// Root node indices
    pub nodes: Vec<usize>,
}

/// Complete parsed scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneAsset {
    /// Raw binary blobs
    pub buffers: Vec<Vec<u8>>,
    /// Byte ranges into the blobs
    pub buffer_views: Vec<BufferView>,
    /// Typed views
    pub accessors: Vec<Accessor>,
    /// Decoded RGBA8 images
    pub images: Vec<ImageData>,
    /// Sampler objects
    pub samplers: Vec<SamplerDesc>,
    /// Image + sampler pairs
    pub textures: Vec<TextureDesc>,
    /// Materials
    pub materials: Vec<MaterialDesc>,
    /// Meshes
    pub meshes: Vec<MeshDesc>,
    /// Node hierarchy
    pub nodes: Vec<NodeDesc>,
    /// Scene roots
    pub scenes: Vec<SceneDesc>,
}

impl SceneAsset {
    /// Whether the description holds nothing drawable
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() || self.nodes.is_empty()
    }

    /// Total primitive count across all meshes
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives.len()).sum()
    }

    /// Absolute byte offset of an accessor inside its buffer, with the buffer index
    pub fn accessor_location(&self, accessor: usize) -> Option<(usize, usize)> {
        let accessor = self.accessors.get(accessor)?;
        let view = self.buffer_views.get(accessor.buffer_view?)?;
        Some((view.buffer, view.byte_offset + accessor.byte_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_transform_is_taken_verbatim() {
        let values: [f32; 16] = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 2.0, 0.0, 0.0, //
            0.0, 0.0, 3.0, 0.0, //
            4.0, 5.0, 6.0, 1.0,
        ];
        let matrix = NodeTransform::Matrix(values).to_matrix();

        assert_eq!(matrix.to_column_array(), values);
        assert_relative_eq!(matrix.transform_vector(&Vec3::new(1.0, 1.0, 1.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_empty_trs_is_identity() {
        assert_eq!(NodeTransform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_trs_translation_only() {
        let transform = NodeTransform::Trs {
            translation: Some([0.0, 5.5, 0.0]),
            rotation: None,
            scale: None,
        };
        let origin = transform.to_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, 5.5, 0.0));
    }

    #[test]
    fn test_trs_scale_applies_before_translation() {
        let transform = NodeTransform::Trs {
            translation: Some([1.0, 0.0, 0.0]),
            rotation: None,
            scale: Some([0.1, 0.1, 0.1]),
        };
        let point = transform.to_matrix().transform_point(&Point3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(point, Point3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_accessor_location_adds_view_offset() {
        let asset = SceneAsset {
            buffers: vec![vec![0; 64]],
            buffer_views: vec![BufferView { buffer: 0, byte_offset: 16, byte_length: 48, byte_stride: None }],
            accessors: vec![Accessor {
                buffer_view: Some(0),
                byte_offset: 8,
                count: 3,
                component_type: ComponentType::U16,
                components: 1,
                normalized: false,
            }],
            ..SceneAsset::default()
        };

        assert_eq!(asset.accessor_location(0), Some((0, 24)));
        assert_eq!(asset.accessor_location(1), None);
        assert_eq!(asset.accessors[0].element_size(), 2);
    }
}
