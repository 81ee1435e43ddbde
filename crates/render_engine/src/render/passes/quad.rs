//! Full-screen quad for the deferred composite

use crate::render::api::device::{
    BufferHandle, ComponentType, DrawMode, GraphicsDevice, VertexArrayDescriptor, VertexArrayHandle,
    VertexAttribute,
};
use crate::render::resources::primitive::ATTRIBUTE_LOCATIONS;
use crate::render::RenderResult;

/// Interleaved position (xyz) + texcoord (uv), as a triangle strip
const QUAD_VERTICES: [[f32; 5]; 4] = [
    [-1.0, 1.0, 0.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, 0.0, 0.0],
    [1.0, 1.0, 0.0, 1.0, 1.0],
    [1.0, -1.0, 0.0, 1.0, 0.0],
];

const STRIDE: u32 = (5 * std::mem::size_of::<f32>()) as u32;

/// Two-triangle quad covering clip space
#[derive(Debug, Clone, PartialEq)]
pub struct FullscreenQuad {
    buffer: BufferHandle,
    vertex_array: VertexArrayHandle,
}

impl FullscreenQuad {
    /// Upload the quad vertices
    pub fn new(device: &mut dyn GraphicsDevice) -> RenderResult<Self> {
        let buffer = device.create_buffer(bytemuck::cast_slice(&QUAD_VERTICES))?;
        let (position_location, texcoord_location) = (ATTRIBUTE_LOCATIONS[0].1, ATTRIBUTE_LOCATIONS[2].1);

        let vertex_array = device.create_vertex_array(&VertexArrayDescriptor {
            attributes: vec![
                VertexAttribute {
                    location: position_location,
                    buffer,
                    components: 3,
                    component_type: ComponentType::F32,
                    normalized: false,
                    stride: STRIDE,
                    offset: 0,
                },
                VertexAttribute {
                    location: texcoord_location,
                    buffer,
                    components: 2,
                    component_type: ComponentType::F32,
                    normalized: false,
                    stride: STRIDE,
                    offset: 3 * std::mem::size_of::<f32>() as u64,
                },
            ],
            element_buffer: None,
        })?;

        Ok(Self { buffer, vertex_array })
    }

    /// Vertex buffer handle
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    /// Vertex array handle
    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    /// Draw with whatever program is current
    pub fn draw(&self, device: &mut dyn GraphicsDevice) {
        device.bind_vertex_array(self.vertex_array);
        device.draw_arrays(DrawMode::TriangleStrip, 0, QUAD_VERTICES.len() as u32);
    }
}
