//! Drawable unit
//!
//! A [`Primitive`] is one vertex-array binding, one index range and one
//! resolved [`Material`]. Its single operation is [`Primitive::draw`].

use std::ops::AddAssign;

use crate::assets::scene_asset::{
    ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION, ATTRIBUTE_TANGENT, ATTRIBUTE_TEXCOORD_0,
};
use crate::assets::{PrimitiveDesc, SceneAsset};
use crate::render::api::device::{
    BufferHandle, DrawMode, GraphicsDevice, IndexType, TextureHandle, VertexArrayDescriptor, VertexArrayHandle,
    VertexAttribute,
};
use crate::render::api::ShaderProgram;
use crate::render::resources::Material;

/// Fixed attribute locations shared with every shader
pub const ATTRIBUTE_LOCATIONS: [(&str, u32); 4] = [
    (ATTRIBUTE_POSITION, 0),
    (ATTRIBUTE_NORMAL, 1),
    (ATTRIBUTE_TEXCOORD_0, 2),
    (ATTRIBUTE_TANGENT, 3),
];

/// Draw and skip tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawCounts {
    /// Primitives that issued a draw call
    pub drawn: usize,
    /// Primitives that were not drawable
    pub skipped: usize,
}

impl AddAssign for DrawCounts {
    fn add_assign(&mut self, other: Self) {
        self.drawn += other.drawn;
        self.skipped += other.skipped;
    }
}

/// Index sub-range of an element buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    /// Buffer holding the indices
    pub buffer: BufferHandle,
    /// Number of indices
    pub count: u32,
    /// Width of one index
    pub index_type: IndexType,
    /// Byte offset of the first index
    pub offset: u64,
    /// Length of the backing buffer in bytes
    pub buffer_len: u64,
}

impl IndexRange {
    /// Whether `offset .. offset + count * width` lies inside the buffer
    pub fn is_within_buffer(&self) -> bool {
        let width = self.index_type.size_bytes() as u64;
        u64::from(self.count)
            .checked_mul(width)
            .and_then(|len| len.checked_add(self.offset))
            .is_some_and(|end| end <= self.buffer_len)
    }
}

/// One draw call worth of geometry plus its material
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    vertex_array: Option<VertexArrayHandle>,
    indices: Option<IndexRange>,
    mode: DrawMode,
    material: Material,
    has_normal_attribute: bool,
    has_texcoord: bool,
    has_tangent: bool,
}

impl Primitive {
    /// Bind a primitive description against uploaded buffers and textures
    ///
    /// Never fails. Attributes that can not be resolved are left disabled
    /// and flagged; a primitive without usable indices is kept but will be
    /// skipped when drawn.
    pub fn from_asset(
        device: &mut dyn GraphicsDevice,
        asset: &SceneAsset,
        desc: &PrimitiveDesc,
        buffers: &[BufferHandle],
        textures: &[TextureHandle],
        fallback: TextureHandle,
    ) -> Self {
        let mut attributes = Vec::with_capacity(ATTRIBUTE_LOCATIONS.len());
        for (name, location) in ATTRIBUTE_LOCATIONS {
            let Some(&accessor_index) = desc.attributes.get(name) else {
                continue;
            };
            match vertex_attribute(asset, accessor_index, location, buffers) {
                Some(attribute) => attributes.push(attribute),
                None => log::warn!("Attribute {} (accessor {}) has no backing buffer", name, accessor_index),
            }
        }
        let enabled = |location: u32| attributes.iter().any(|a| a.location == location);
        let has_normal_attribute = enabled(1);
        let has_texcoord = enabled(2);
        let has_tangent = enabled(3);

        let indices = desc.indices.and_then(|accessor| index_range(asset, accessor, buffers));
        if indices.is_none() {
            log::warn!("Primitive has no usable indices; it will not be drawn");
        }

        let vertex_array = match device.create_vertex_array(&VertexArrayDescriptor {
            attributes,
            element_buffer: indices.map(|range| range.buffer),
        }) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Vertex array creation failed: {}", e);
                None
            }
        };

        let material = Material::resolve(desc.material.and_then(|i| asset.materials.get(i)), textures, fallback);

        Self {
            vertex_array,
            indices,
            mode: desc.mode,
            material,
            has_normal_attribute,
            has_texcoord,
            has_tangent,
        }
    }

    /// Resolved material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Index range, if the primitive has one
    pub fn indices(&self) -> Option<&IndexRange> {
        self.indices.as_ref()
    }

    /// Vertex array, if it was created
    pub fn vertex_array(&self) -> Option<VertexArrayHandle> {
        self.vertex_array
    }

    /// Primitive assembly mode
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// NORMAL attribute is bound
    pub fn has_normal_attribute(&self) -> bool {
        self.has_normal_attribute
    }

    /// TEXCOORD_0 attribute is bound
    pub fn has_texcoord(&self) -> bool {
        self.has_texcoord
    }

    /// TANGENT attribute is bound
    pub fn has_tangent(&self) -> bool {
        self.has_tangent
    }

    /// Whether a draw call would be issued
    pub fn is_drawable(&self) -> bool {
        self.vertex_array.is_some() && self.indices.is_some_and(|range| range.is_within_buffer())
    }

    /// Bind material and geometry, then issue the indexed draw
    ///
    /// Attribute presence is sent as `hasNormalAttribute`, `hasTexcoord` and
    /// `hasTangent` so shaders never read a disabled attribute's default.
    /// The caller sets per-mesh inputs (model matrices) beforehand. Returns
    /// `false` without touching the device when the index range is missing
    /// or falls outside its buffer.
    pub fn draw(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) -> bool {
        let (Some(vertex_array), Some(range)) = (self.vertex_array, self.indices) else {
            log::trace!("Skipping primitive without geometry");
            return false;
        };
        if !range.is_within_buffer() {
            log::debug!(
                "Skipping primitive: {} indices at offset {} exceed {} byte buffer",
                range.count,
                range.offset,
                range.buffer_len
            );
            return false;
        }

        self.material.bind(device, shader);
        shader.set_bool(device, "hasNormalAttribute", self.has_normal_attribute);
        shader.set_bool(device, "hasTexcoord", self.has_texcoord);
        shader.set_bool(device, "hasTangent", self.has_tangent);
        device.bind_vertex_array(vertex_array);
        if device.current_program() != Some(shader.handle()) {
            shader.bind(device);
        }
        device.draw_elements(self.mode, range.count, range.index_type, range.offset);
        true
    }
}

fn vertex_attribute(
    asset: &SceneAsset,
    accessor_index: usize,
    location: u32,
    buffers: &[BufferHandle],
) -> Option<VertexAttribute> {
    let accessor = asset.accessors.get(accessor_index)?;
    let view = asset.buffer_views.get(accessor.buffer_view?)?;
    let buffer = *buffers.get(view.buffer)?;

    Some(VertexAttribute {
        location,
        buffer,
        components: accessor.components,
        component_type: accessor.component_type,
        normalized: accessor.normalized,
        stride: view.byte_stride.unwrap_or(0) as u32,
        offset: (view.byte_offset + accessor.byte_offset) as u64,
    })
}

fn index_range(asset: &SceneAsset, accessor_index: usize, buffers: &[BufferHandle]) -> Option<IndexRange> {
    let accessor = asset.accessors.get(accessor_index)?;
    let Some(index_type) = IndexType::from_component(accessor.component_type) else {
        log::warn!("Index accessor {} has non-index type {:?}", accessor_index, accessor.component_type);
        return None;
    };
    let view = asset.buffer_views.get(accessor.buffer_view?)?;
    let buffer = *buffers.get(view.buffer)?;
    let buffer_len = asset.buffers.get(view.buffer)?.len() as u64;

    Some(IndexRange {
        buffer,
        count: accessor.count as u32,
        index_type,
        offset: (view.byte_offset + accessor.byte_offset) as u64,
        buffer_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Accessor, BufferView, MaterialDesc};
    use crate::render::api::device::{ComponentType, ProgramSource, UniformValue};
    use crate::render::backends::{DeviceCommand, HeadlessDevice};
    use crate::render::resources::uploader::upload_buffers;
    use std::collections::BTreeMap;

    // Positions in buffer 0, u16 indices in buffer 1 at offset 2
    fn triangle_asset() -> SceneAsset {
        SceneAsset {
            buffers: vec![vec![0; 36], vec![0; 8]],
            buffer_views: vec![
                BufferView { buffer: 0, byte_offset: 0, byte_length: 36, byte_stride: Some(12) },
                BufferView { buffer: 1, byte_offset: 2, byte_length: 6, byte_stride: None },
            ],
            accessors: vec![
                Accessor {
                    buffer_view: Some(0),
                    byte_offset: 0,
                    count: 3,
                    component_type: ComponentType::F32,
                    components: 3,
                    normalized: false,
                },
                Accessor {
                    buffer_view: Some(1),
                    byte_offset: 0,
                    count: 3,
                    component_type: ComponentType::U16,
                    components: 1,
                    normalized: false,
                },
            ],
            materials: vec![MaterialDesc::default()],
            ..SceneAsset::default()
        }
    }

    fn triangle_desc() -> PrimitiveDesc {
        PrimitiveDesc {
            attributes: BTreeMap::from([(ATTRIBUTE_POSITION.to_string(), 0)]),
            indices: Some(1),
            material: Some(0),
            mode: DrawMode::Triangles,
        }
    }

    fn shader(device: &mut HeadlessDevice) -> ShaderProgram {
        ShaderProgram::from_source(
            device,
            &ProgramSource {
                name: "forward".to_string(),
                vertex: "void main() {}".to_string(),
                fragment: "void main() {}".to_string(),
                geometry: None,
            },
        )
    }

    #[test]
    fn test_binds_attributes_at_fixed_locations() {
        let mut device = HeadlessDevice::new();
        let asset = triangle_asset();
        let buffers = upload_buffers(&mut device, &asset).expect("buffers");

        let primitive = Primitive::from_asset(&mut device, &asset, &triangle_desc(), &buffers, &[], TextureHandle(0));

        let layout = device.vertex_array(primitive.vertex_array().expect("vao")).expect("layout");
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].location, 0);
        assert_eq!(layout.attributes[0].stride, 12);
        assert_eq!(layout.element_buffer, Some(buffers[1]));
        assert!(!primitive.has_normal_attribute());
        assert!(!primitive.has_tangent());

        let range = primitive.indices().expect("indices");
        assert_eq!((range.count, range.offset, range.buffer_len), (3, 2, 8));
    }

    #[test]
    fn test_draw_binds_material_units_then_draws() {
        let mut device = HeadlessDevice::new();
        let asset = triangle_asset();
        let buffers = upload_buffers(&mut device, &asset).expect("buffers");
        let fallback = crate::render::resources::uploader::upload_fallback(&mut device, std::path::Path::new("missing.png"));
        let primitive = Primitive::from_asset(&mut device, &asset, &triangle_desc(), &buffers, &[], fallback);
        let program = shader(&mut device);

        assert!(primitive.draw(&mut device, &program));

        assert!(device.drain_errors().is_empty());
        assert_eq!(device.bound_texture(0), Some(fallback));
        assert_eq!(device.bound_texture(1), Some(fallback));
        assert_eq!(device.bound_texture(2), Some(fallback));
        assert_eq!(device.uniform(program.handle(), "NormalTex"), Some(&UniformValue::Int(1)));
        assert_eq!(device.uniform(program.handle(), "hasBaseColor"), Some(&UniformValue::Bool(false)));
        assert!(matches!(
            device.commands().last(),
            Some(DeviceCommand::DrawElements { count: 3, offset: 2, index_type: IndexType::U16, .. })
        ));
    }

    #[test]
    fn test_draw_reports_absent_attributes() {
        let mut device = HeadlessDevice::new();
        let mut asset = triangle_asset();
        asset.materials[0].normal_texture = Some(0);
        let buffers = upload_buffers(&mut device, &asset).expect("buffers");
        let normal_map = TextureHandle(7);
        let primitive = Primitive::from_asset(&mut device, &asset, &triangle_desc(), &buffers, &[normal_map], TextureHandle(0));
        let program = shader(&mut device);

        primitive.draw(&mut device, &program);

        let handle = program.handle();
        assert_eq!(device.uniform(handle, "hasNormal"), Some(&UniformValue::Bool(true)));
        assert_eq!(device.uniform(handle, "hasTangent"), Some(&UniformValue::Bool(false)));
        assert_eq!(device.uniform(handle, "hasNormalAttribute"), Some(&UniformValue::Bool(false)));
        assert_eq!(device.uniform(handle, "hasTexcoord"), Some(&UniformValue::Bool(false)));
    }

    #[test]
    fn test_missing_indices_skip_draw() {
        let mut device = HeadlessDevice::new();
        let asset = triangle_asset();
        let buffers = upload_buffers(&mut device, &asset).expect("buffers");
        let mut desc = triangle_desc();
        desc.indices = None;
        let primitive = Primitive::from_asset(&mut device, &asset, &desc, &buffers, &[], TextureHandle(0));
        let program = shader(&mut device);

        assert!(!primitive.is_drawable());
        assert!(!primitive.draw(&mut device, &program));
        assert_eq!(device.draw_call_count(), 0);
    }

    #[test]
    fn test_out_of_range_indices_skip_draw() {
        let mut device = HeadlessDevice::new();
        let mut asset = triangle_asset();
        asset.accessors[1].count = 4;
        let buffers = upload_buffers(&mut device, &asset).expect("buffers");
        let primitive = Primitive::from_asset(&mut device, &asset, &triangle_desc(), &buffers, &[], TextureHandle(0));
        let program = shader(&mut device);

        assert!(!primitive.draw(&mut device, &program));
        assert_eq!(device.draw_call_count(), 0);
        assert!(device.drain_errors().is_empty());
    }

    #[test]
    fn test_index_range_bounds() {
        let range = IndexRange {
            buffer: BufferHandle(1),
            count: 3,
            index_type: IndexType::U32,
            offset: 4,
            buffer_len: 16,
        };
        assert!(range.is_within_buffer());
        assert!(!IndexRange { offset: 5, ..range }.is_within_buffer());
    }
}
