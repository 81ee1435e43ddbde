//! Headless reference backend
//!
//! Implements [`GraphicsDevice`] entirely in memory. Every resource gets a
//! table entry, every state change and draw is appended to a command log,
//! and invalid usage queues the same error codes a hardware driver would.
//! The frame renderer runs unchanged on top of it, which is what the test
//! suite relies on.

use std::collections::HashMap;

use crate::render::api::device::{
    BackendResult, BufferHandle, ClearFlags, CompileOutcome, DepthAttachment, DeviceErrorCode,
    DrawMode, FramebufferDescriptor, FramebufferHandle, GraphicsDevice, IndexType, ProgramHandle,
    ProgramSource, TextureDescriptor, TextureHandle, TextureKind, UniformValue,
    VertexArrayDescriptor, VertexArrayHandle,
};
use crate::render::RenderError;

/// One entry of the command log
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Render target switch (`None` = default framebuffer)
    BindFramebuffer(Option<FramebufferHandle>),
    /// Viewport change
    Viewport {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Attachment clear on the bound target
    Clear {
        /// Target the clear applied to
        framebuffer: Option<FramebufferHandle>,
        /// Attachments cleared
        flags: ClearFlags,
    },
    /// Depth copied from an off-screen target into the default framebuffer
    BlitDepth {
        /// Target the depth was read from
        source: FramebufferHandle,
        /// Copied width in pixels
        width: u32,
        /// Copied height in pixels
        height: u32,
    },
    /// Texture bound to a unit
    BindTexture {
        /// Texture unit
        unit: u32,
        /// Texture bound
        texture: TextureHandle,
    },
    /// Vertex array bound
    BindVertexArray(VertexArrayHandle),
    /// Program made current
    UseProgram(ProgramHandle),
    /// Accepted indexed draw
    DrawElements {
        /// Program in use
        program: ProgramHandle,
        /// Target drawn into
        framebuffer: Option<FramebufferHandle>,
        /// Vertex array drawn
        vertex_array: VertexArrayHandle,
        /// Assembly mode
        mode: DrawMode,
        /// Number of indices
        count: u32,
        /// Index width
        index_type: IndexType,
        /// Byte offset into the element buffer
        offset: u64,
    },
    /// Accepted non-indexed draw
    DrawArrays {
        /// Program in use
        program: ProgramHandle,
        /// Target drawn into
        framebuffer: Option<FramebufferHandle>,
        /// Assembly mode
        mode: DrawMode,
        /// Vertex count
        count: u32,
    },
}

/// Texture table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRecord {
    /// Allocation parameters
    pub descriptor: TextureDescriptor,
    /// Whether pixel data was supplied at creation
    pub has_pixels: bool,
    /// Whether a mip chain was generated
    pub has_mipmaps: bool,
}

#[derive(Debug, Clone)]
struct ProgramRecord {
    source: ProgramSource,
    linked: bool,
    uniforms: HashMap<String, UniformValue>,
    uniform_blocks: HashMap<String, u32>,
}

/// In-memory GPU device
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    buffers: Vec<Vec<u8>>,
    textures: Vec<TextureRecord>,
    vertex_arrays: Vec<VertexArrayDescriptor>,
    framebuffers: Vec<FramebufferDescriptor>,
    programs: Vec<ProgramRecord>,

    bound_framebuffer: Option<FramebufferHandle>,
    bound_vertex_array: Option<VertexArrayHandle>,
    current_program: Option<ProgramHandle>,
    texture_units: HashMap<u32, TextureHandle>,
    viewport: (i32, i32, u32, u32),

    commands: Vec<DeviceCommand>,
    errors: Vec<DeviceErrorCode>,
}

// Handles are 1-based so that 0 never names a live resource.
fn slot(id: u32) -> Option<usize> {
    (id as usize).checked_sub(1)
}

fn next_id(len: usize) -> u32 {
    (len + 1) as u32
}

impl HeadlessDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    fn push_error(&mut self, code: DeviceErrorCode) {
        log::trace!("headless device queued {}", code);
        self.errors.push(code);
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Forget recorded commands (resources and state are kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Bytes stored in a buffer
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        slot(buffer.0).and_then(|i| self.buffers.get(i)).map(Vec::as_slice)
    }

    /// Number of buffers created so far
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Texture table entry
    pub fn texture(&self, texture: TextureHandle) -> Option<&TextureRecord> {
        slot(texture.0).and_then(|i| self.textures.get(i))
    }

    /// Number of textures created so far
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Attribute layout of a vertex array
    pub fn vertex_array(&self, vertex_array: VertexArrayHandle) -> Option<&VertexArrayDescriptor> {
        slot(vertex_array.0).and_then(|i| self.vertex_arrays.get(i))
    }

    /// Attachment set of a framebuffer
    pub fn framebuffer(&self, framebuffer: FramebufferHandle) -> Option<&FramebufferDescriptor> {
        slot(framebuffer.0).and_then(|i| self.framebuffers.get(i))
    }

    /// Last value assigned to a named input of a program
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<&UniformValue> {
        self.program(program).and_then(|p| p.uniforms.get(name))
    }

    /// Binding index of a named uniform block
    pub fn uniform_block_binding(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        self.program(program).and_then(|p| p.uniform_blocks.get(name).copied())
    }

    /// Sources a program was compiled from
    pub fn program_source(&self, program: ProgramHandle) -> Option<&ProgramSource> {
        self.program(program).map(|p| &p.source)
    }

    /// Texture currently bound to a unit
    pub fn bound_texture(&self, unit: u32) -> Option<TextureHandle> {
        self.texture_units.get(&unit).copied()
    }

    /// Currently bound render target
    pub fn bound_framebuffer(&self) -> Option<FramebufferHandle> {
        self.bound_framebuffer
    }

    /// Current viewport as (x, y, width, height)
    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    /// Number of accepted draw calls in the command log
    pub fn draw_call_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::DrawElements { .. } | DeviceCommand::DrawArrays { .. }))
            .count()
    }

    /// Errors queued but not drained yet
    pub fn pending_errors(&self) -> &[DeviceErrorCode] {
        &self.errors
    }

    fn program(&self, program: ProgramHandle) -> Option<&ProgramRecord> {
        slot(program.0).and_then(|i| self.programs.get(i))
    }

    fn texture_exists(&self, texture: TextureHandle) -> bool {
        self.texture(texture).is_some()
    }

    fn buffer_exists(&self, buffer: BufferHandle) -> bool {
        self.buffer_data(buffer).is_some()
    }

    /// Check that a draw has a linked program; returns it when usable
    fn draw_program(&mut self) -> Option<ProgramHandle> {
        let Some(program) = self.current_program else {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return None;
        };
        if !self.program(program).is_some_and(|p| p.linked) {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return None;
        }
        Some(program)
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle> {
        self.buffers.push(data.to_vec());
        Ok(BufferHandle(next_id(self.buffers.len() - 1)))
    }

    fn create_texture(&mut self, desc: &TextureDescriptor, pixels: Option<&[u8]>) -> BackendResult<TextureHandle> {
        if desc.width == 0 || desc.height == 0 {
            self.push_error(DeviceErrorCode::InvalidValue);
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture size {}x{} is empty",
                desc.width, desc.height
            )));
        }
        if desc.kind == TextureKind::CubeMap && desc.width != desc.height {
            self.push_error(DeviceErrorCode::InvalidValue);
            return Err(RenderError::ResourceCreationFailed("cubemap faces must be square".to_string()));
        }
        if let Some(pixels) = pixels {
            if pixels.len() < desc.expected_rgba8_len() {
                self.push_error(DeviceErrorCode::InvalidOperation);
                return Err(RenderError::ResourceCreationFailed(format!(
                    "texture data holds {} bytes, {} expected",
                    pixels.len(),
                    desc.expected_rgba8_len()
                )));
            }
        }

        self.textures.push(TextureRecord {
            descriptor: *desc,
            has_pixels: pixels.is_some(),
            has_mipmaps: false,
        });
        Ok(TextureHandle(next_id(self.textures.len() - 1)))
    }

    fn generate_mipmaps(&mut self, texture: TextureHandle) {
        match slot(texture.0).and_then(|i| self.textures.get_mut(i)) {
            Some(record) => record.has_mipmaps = true,
            None => self.push_error(DeviceErrorCode::InvalidOperation),
        }
    }

    fn create_vertex_array(&mut self, desc: &VertexArrayDescriptor) -> BackendResult<VertexArrayHandle> {
        let buffers_valid = desc.attributes.iter().all(|a| self.buffer_exists(a.buffer))
            && desc.element_buffer.map_or(true, |b| self.buffer_exists(b));
        if !buffers_valid {
            self.push_error(DeviceErrorCode::InvalidValue);
            return Err(RenderError::ResourceCreationFailed(
                "vertex array references an unknown buffer".to_string(),
            ));
        }

        self.vertex_arrays.push(desc.clone());
        Ok(VertexArrayHandle(next_id(self.vertex_arrays.len() - 1)))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDescriptor) -> BackendResult<FramebufferHandle> {
        let has_any_attachment = !desc.color_attachments.is_empty() || desc.depth != DepthAttachment::None;
        let attachments_exist = desc.color_attachments.iter().all(|t| self.texture_exists(*t))
            && match desc.depth {
                DepthAttachment::Texture(t) => self.texture(t).is_some_and(|r| r.descriptor.format.is_depth()),
                DepthAttachment::None | DepthAttachment::Renderbuffer => true,
            };

        if !has_any_attachment || !attachments_exist {
            self.push_error(DeviceErrorCode::InvalidFramebufferOperation);
            return Err(RenderError::ResourceCreationFailed("framebuffer is not complete".to_string()));
        }

        self.framebuffers.push(desc.clone());
        Ok(FramebufferHandle(next_id(self.framebuffers.len() - 1)))
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        if let Some(fb) = framebuffer {
            if self.framebuffer(fb).is_none() {
                self.push_error(DeviceErrorCode::InvalidOperation);
                return;
            }
        }
        self.bound_framebuffer = framebuffer;
        self.commands.push(DeviceCommand::BindFramebuffer(framebuffer));
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        self.commands.push(DeviceCommand::Viewport { width, height });
    }

    fn clear(&mut self, flags: ClearFlags, _color: [f32; 4]) {
        let depth_only = self
            .bound_framebuffer
            .and_then(|fb| self.framebuffer(fb))
            .is_some_and(FramebufferDescriptor::is_depth_only);
        if depth_only && flags.contains(ClearFlags::COLOR) {
            // Colour writes are disabled on this target
            self.push_error(DeviceErrorCode::InvalidOperation);
        }
        self.commands.push(DeviceCommand::Clear { framebuffer: self.bound_framebuffer, flags });
    }

    fn blit_depth_to_default(&mut self, source: FramebufferHandle, width: u32, height: u32) {
        let has_depth = self.framebuffer(source).is_some_and(|fb| fb.depth != DepthAttachment::None);
        if !has_depth {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return;
        }
        self.bound_framebuffer = None;
        self.commands.push(DeviceCommand::BlitDepth { source, width, height });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if !self.texture_exists(texture) {
            self.push_error(DeviceErrorCode::InvalidValue);
            return;
        }
        self.texture_units.insert(unit, texture);
        self.commands.push(DeviceCommand::BindTexture { unit, texture });
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        if self.vertex_array(vertex_array).is_none() {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return;
        }
        self.bound_vertex_array = Some(vertex_array);
        self.commands.push(DeviceCommand::BindVertexArray(vertex_array));
    }

    fn compile_program(&mut self, source: &ProgramSource) -> CompileOutcome {
        let mut problems = Vec::new();
        if source.vertex.trim().is_empty() {
            problems.push("vertex stage: empty source");
        }
        if source.fragment.trim().is_empty() {
            problems.push("fragment stage: empty source");
        }
        if source.geometry.as_deref().is_some_and(|g| g.trim().is_empty()) {
            problems.push("geometry stage: empty source");
        }

        self.programs.push(ProgramRecord {
            source: source.clone(),
            linked: problems.is_empty(),
            uniforms: HashMap::new(),
            uniform_blocks: HashMap::new(),
        });

        CompileOutcome {
            handle: ProgramHandle(next_id(self.programs.len() - 1)),
            error_log: (!problems.is_empty()).then(|| problems.join("\n")),
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        if self.program(program).is_none() {
            self.push_error(DeviceErrorCode::InvalidValue);
            return;
        }
        self.current_program = Some(program);
        self.commands.push(DeviceCommand::UseProgram(program));
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.current_program
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &UniformValue) {
        if self.current_program != Some(program) {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return;
        }
        match slot(program.0).and_then(|i| self.programs.get_mut(i)) {
            Some(record) => {
                record.uniforms.insert(name.to_string(), value.clone());
            }
            None => self.push_error(DeviceErrorCode::InvalidValue),
        }
    }

    fn bind_uniform_block(&mut self, program: ProgramHandle, name: &str, binding: u32) {
        match slot(program.0).and_then(|i| self.programs.get_mut(i)) {
            Some(record) => {
                record.uniform_blocks.insert(name.to_string(), binding);
            }
            None => self.push_error(DeviceErrorCode::InvalidValue),
        }
    }

    fn draw_elements(&mut self, mode: DrawMode, count: u32, index_type: IndexType, offset: u64) {
        let Some(program) = self.draw_program() else { return };
        let Some(vertex_array) = self.bound_vertex_array else {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return;
        };
        let element_len = self
            .vertex_array(vertex_array)
            .and_then(|va| va.element_buffer)
            .and_then(|b| self.buffer_data(b))
            .map(<[u8]>::len);
        let Some(element_len) = element_len else {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return;
        };

        let end = offset + u64::from(count) * index_type.size_bytes() as u64;
        if end > element_len as u64 {
            self.push_error(DeviceErrorCode::InvalidValue);
            return;
        }

        self.commands.push(DeviceCommand::DrawElements {
            program,
            framebuffer: self.bound_framebuffer,
            vertex_array,
            mode,
            count,
            index_type,
            offset,
        });
    }

    fn draw_arrays(&mut self, mode: DrawMode, _first: u32, count: u32) {
        let Some(program) = self.draw_program() else { return };
        if self.bound_vertex_array.is_none() {
            self.push_error(DeviceErrorCode::InvalidOperation);
            return;
        }
        self.commands.push(DeviceCommand::DrawArrays {
            program,
            framebuffer: self.bound_framebuffer,
            mode,
            count,
        });
    }

    fn drain_errors(&mut self) -> Vec<DeviceErrorCode> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::device::{ComponentType, SamplerState, TextureFormat, VertexAttribute};

    fn linked_program(device: &mut HeadlessDevice) -> ProgramHandle {
        let outcome = device.compile_program(&ProgramSource {
            name: "test".to_string(),
            vertex: "v".to_string(),
            fragment: "f".to_string(),
            geometry: None,
        });
        assert!(outcome.error_log.is_none());
        outcome.handle
    }

    fn depth_texture(device: &mut HeadlessDevice) -> TextureHandle {
        device
            .create_texture(
                &TextureDescriptor {
                    kind: TextureKind::Texture2D,
                    width: 16,
                    height: 16,
                    format: TextureFormat::Depth24,
                    sampler: SamplerState::default(),
                },
                None,
            )
            .expect("depth texture")
    }

    fn indexed_vertex_array(device: &mut HeadlessDevice, index_bytes: usize) -> VertexArrayHandle {
        let vertices = device.create_buffer(&[0u8; 36]).expect("vertex buffer");
        let indices = device.create_buffer(&vec![0u8; index_bytes]).expect("index buffer");
        device
            .create_vertex_array(&VertexArrayDescriptor {
                attributes: vec![VertexAttribute {
                    location: 0,
                    buffer: vertices,
                    components: 3,
                    component_type: ComponentType::F32,
                    normalized: false,
                    stride: 0,
                    offset: 0,
                }],
                element_buffer: Some(indices),
            })
            .expect("vertex array")
    }

    #[test]
    fn test_buffers_are_stored_verbatim_with_one_based_handles() {
        let mut device = HeadlessDevice::new();
        let a = device.create_buffer(&[1, 2, 3]).expect("buffer");
        let b = device.create_buffer(&[4]).expect("buffer");

        assert_eq!(a, BufferHandle(1));
        assert_eq!(b, BufferHandle(2));
        assert_eq!(device.buffer_data(a), Some(&[1u8, 2, 3][..]));
        assert_eq!(device.buffer_data(BufferHandle(0)), None);
    }

    #[test]
    fn test_in_range_draw_is_recorded() {
        let mut device = HeadlessDevice::new();
        let program = linked_program(&mut device);
        let vao = indexed_vertex_array(&mut device, 6);

        device.use_program(program);
        device.bind_vertex_array(vao);
        device.draw_elements(DrawMode::Triangles, 3, IndexType::U16, 0);

        assert!(device.drain_errors().is_empty());
        assert_eq!(device.draw_call_count(), 1);
    }

    #[test]
    fn test_out_of_range_draw_queues_invalid_value() {
        let mut device = HeadlessDevice::new();
        let program = linked_program(&mut device);
        let vao = indexed_vertex_array(&mut device, 6);

        device.use_program(program);
        device.bind_vertex_array(vao);
        device.draw_elements(DrawMode::Triangles, 3, IndexType::U16, 2);

        assert_eq!(device.drain_errors(), vec![DeviceErrorCode::InvalidValue]);
        assert_eq!(device.draw_call_count(), 0);
    }

    #[test]
    fn test_unlinked_program_draws_nothing() {
        let mut device = HeadlessDevice::new();
        let outcome = device.compile_program(&ProgramSource::default());
        assert!(outcome.error_log.is_some());
        let vao = indexed_vertex_array(&mut device, 6);

        device.use_program(outcome.handle);
        device.bind_vertex_array(vao);
        device.draw_elements(DrawMode::Triangles, 3, IndexType::U16, 0);

        assert_eq!(device.drain_errors(), vec![DeviceErrorCode::InvalidOperation]);
        assert_eq!(device.draw_call_count(), 0);
    }

    #[test]
    fn test_color_clear_on_depth_only_target_is_flagged() {
        let mut device = HeadlessDevice::new();
        let depth = depth_texture(&mut device);
        let fb = device
            .create_framebuffer(&FramebufferDescriptor {
                color_attachments: Vec::new(),
                depth: DepthAttachment::Texture(depth),
                width: 16,
                height: 16,
            })
            .expect("framebuffer");

        device.bind_framebuffer(Some(fb));
        device.clear(ClearFlags::DEPTH, [0.0; 4]);
        assert!(device.drain_errors().is_empty());

        device.clear(ClearFlags::COLOR | ClearFlags::DEPTH, [0.0; 4]);
        assert_eq!(device.drain_errors(), vec![DeviceErrorCode::InvalidOperation]);
    }

    #[test]
    fn test_depth_blit_needs_a_depth_source() {
        let mut device = HeadlessDevice::new();
        let color = device
            .create_texture(
                &TextureDescriptor {
                    kind: TextureKind::Texture2D,
                    width: 16,
                    height: 16,
                    format: TextureFormat::Rgba8,
                    sampler: SamplerState::default(),
                },
                None,
            )
            .expect("color texture");
        let color_only = device
            .create_framebuffer(&FramebufferDescriptor {
                color_attachments: vec![color],
                depth: DepthAttachment::None,
                width: 16,
                height: 16,
            })
            .expect("color target");
        let with_depth = device
            .create_framebuffer(&FramebufferDescriptor {
                color_attachments: vec![color],
                depth: DepthAttachment::Renderbuffer,
                width: 16,
                height: 16,
            })
            .expect("depth target");

        device.blit_depth_to_default(color_only, 16, 16);
        assert_eq!(device.drain_errors(), vec![DeviceErrorCode::InvalidOperation]);

        device.bind_framebuffer(Some(with_depth));
        device.blit_depth_to_default(with_depth, 16, 16);
        assert!(device.drain_errors().is_empty());
        assert_eq!(device.bound_framebuffer(), None);
        assert_eq!(
            device.commands().last(),
            Some(&DeviceCommand::BlitDepth { source: with_depth, width: 16, height: 16 })
        );
    }

    #[test]
    fn test_framebuffer_without_attachments_is_incomplete() {
        let mut device = HeadlessDevice::new();
        let result = device.create_framebuffer(&FramebufferDescriptor {
            color_attachments: Vec::new(),
            depth: DepthAttachment::None,
            width: 4,
            height: 4,
        });
        assert!(result.is_err());
        assert_eq!(device.drain_errors(), vec![DeviceErrorCode::InvalidFramebufferOperation]);
    }

    #[test]
    fn test_short_pixel_data_is_rejected() {
        let mut device = HeadlessDevice::new();
        let desc = TextureDescriptor {
            kind: TextureKind::Texture2D,
            width: 2,
            height: 2,
            format: TextureFormat::Rgba8,
            sampler: SamplerState::default(),
        };
        assert!(device.create_texture(&desc, Some(&[255; 8])).is_err());
        assert!(device.create_texture(&desc, Some(&[255; 16])).is_ok());
    }

    #[test]
    fn test_setting_uniform_on_inactive_program_is_invalid() {
        let mut device = HeadlessDevice::new();
        let program = linked_program(&mut device);
        device.set_uniform(program, "model", &UniformValue::Float(1.0));
        assert_eq!(device.drain_errors(), vec![DeviceErrorCode::InvalidOperation]);
        assert_eq!(device.uniform(program, "model"), None);
    }
}
