//! OpenGL 3.3 core backend
//!
//! Implements [`GraphicsDevice`] on top of a [`glow::Context`]. The context
//! must be current on the calling thread for the lifetime of the device;
//! creating it is the windowing layer's job.
//!
//! Handles are 1-based indices into the device's own tables, exactly like
//! the headless device, so the renderer never sees raw GL names. GL errors
//! are not checked per call: they stay in the driver's queue until
//! [`GraphicsDevice::drain_errors`] pulls them.

#![allow(unsafe_code)]

use std::collections::HashMap;
use std::fmt;

use glow::HasContext;

use crate::render::api::device::{
    BackendResult, BufferHandle, ClearFlags, CompileOutcome, DepthAttachment, DeviceErrorCode, DrawMode,
    FilterMode, FramebufferDescriptor, FramebufferHandle, GraphicsDevice, IndexType, ProgramHandle, ProgramSource,
    TextureDescriptor, TextureFormat, TextureHandle, TextureKind, UniformValue, VertexArrayDescriptor,
    VertexArrayHandle, WrapMode,
};
use crate::render::RenderError;

type GlBuffer = <glow::Context as HasContext>::Buffer;
type GlTexture = <glow::Context as HasContext>::Texture;
type GlVertexArray = <glow::Context as HasContext>::VertexArray;
type GlFramebuffer = <glow::Context as HasContext>::Framebuffer;
type GlRenderbuffer = <glow::Context as HasContext>::Renderbuffer;
type GlProgram = <glow::Context as HasContext>::Program;
type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;

/// Upper bound on error codes pulled per drain; a lost context reports forever
const MAX_DRAINED_ERRORS: usize = 64;

struct TextureEntry {
    texture: GlTexture,
    descriptor: TextureDescriptor,
}

struct FramebufferEntry {
    framebuffer: GlFramebuffer,
    // Kept alive with the framebuffer
    _depth_storage: Option<GlRenderbuffer>,
}

struct ProgramEntry {
    program: GlProgram,
    locations: HashMap<String, Option<GlUniformLocation>>,
}

/// GPU device driving a current OpenGL context
pub struct GlDevice {
    gl: glow::Context,
    name: String,

    buffers: Vec<GlBuffer>,
    textures: Vec<TextureEntry>,
    vertex_arrays: Vec<GlVertexArray>,
    framebuffers: Vec<FramebufferEntry>,
    programs: Vec<ProgramEntry>,

    current_program: Option<ProgramHandle>,
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDevice")
            .field("name", &self.name)
            .field("buffers", &self.buffers.len())
            .field("textures", &self.textures.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("framebuffers", &self.framebuffers.len())
            .field("programs", &self.programs.len())
            .field("current_program", &self.current_program)
            .finish()
    }
}

fn slot(id: u32) -> Option<usize> {
    (id as usize).checked_sub(1)
}

fn next_id(len: usize) -> u32 {
    len as u32
}

impl GlDevice {
    /// Wrap a context that is current on this thread
    ///
    /// Enables depth testing, the only fixed-function state the passes rely on.
    pub fn new(gl: glow::Context) -> Self {
        let name = unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            format!(
                "OpenGL {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            )
        };
        log::info!("Created GL device: {}", name);

        Self {
            gl,
            name,
            buffers: Vec::new(),
            textures: Vec::new(),
            vertex_arrays: Vec::new(),
            framebuffers: Vec::new(),
            programs: Vec::new(),
            current_program: None,
        }
    }

    fn buffer(&self, handle: BufferHandle) -> Option<GlBuffer> {
        slot(handle.0).and_then(|i| self.buffers.get(i)).copied()
    }

    fn texture(&self, handle: TextureHandle) -> Option<&TextureEntry> {
        slot(handle.0).and_then(|i| self.textures.get(i))
    }

    fn program(&self, handle: ProgramHandle) -> Option<&ProgramEntry> {
        slot(handle.0).and_then(|i| self.programs.get(i))
    }

    fn framebuffer(&self, handle: FramebufferHandle) -> Option<GlFramebuffer> {
        slot(handle.0).and_then(|i| self.framebuffers.get(i)).map(|entry| entry.framebuffer)
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<GlUniformLocation> {
        let index = slot(program.0)?;
        let entry = self.programs.get_mut(index)?;
        if let Some(cached) = entry.locations.get(name) {
            return cached.clone();
        }
        let location = unsafe { self.gl.get_uniform_location(entry.program, name) };
        if location.is_none() {
            log::trace!("Program {} has no active input {}", program.0, name);
        }
        entry.locations.insert(name.to_string(), location.clone());
        location
    }

    fn compile_stage(&self, program: GlProgram, stage: u32, label: &str, source: &str) -> Result<(), String> {
        unsafe {
            let shader = self.gl.create_shader(stage)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            let result = if self.gl.get_shader_compile_status(shader) {
                self.gl.attach_shader(program, shader);
                Ok(())
            } else {
                Err(format!("{} stage: {}", label, self.gl.get_shader_info_log(shader)))
            };
            // The program keeps attached stages alive until it is linked
            self.gl.delete_shader(shader);
            result
        }
    }

    fn allocate_texture_storage(&self, desc: &TextureDescriptor, pixels: Option<&[u8]>) {
        let (internal_format, format, ty) = gl_texture_format(desc.format);
        let (width, height) = (desc.width as i32, desc.height as i32);
        unsafe {
            match desc.kind {
                TextureKind::Texture2D => {
                    self.gl.tex_image_2d(glow::TEXTURE_2D, 0, internal_format, width, height, 0, format, ty, pixels);
                }
                TextureKind::CubeMap => {
                    for face in 0..6 {
                        self.gl.tex_image_2d(
                            glow::TEXTURE_CUBE_MAP_POSITIVE_X + face,
                            0,
                            internal_format,
                            width,
                            height,
                            0,
                            format,
                            ty,
                            pixels,
                        );
                    }
                }
            }
        }
    }

    fn apply_sampler(&self, desc: &TextureDescriptor) {
        let target = gl_texture_target(desc.kind);
        let sampler = &desc.sampler;
        unsafe {
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, gl_filter(sampler.min_filter) as i32);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, gl_filter(sampler.mag_filter) as i32);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, gl_wrap(sampler.wrap_s) as i32);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, gl_wrap(sampler.wrap_t) as i32);
            if desc.kind == TextureKind::CubeMap {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_R, gl_wrap(sampler.wrap_t) as i32);
            }
            if desc.format.is_depth() && sampler.wrap_s == WrapMode::ClampToBorder {
                // Outside the shadow map counts as fully lit
                self.gl.tex_parameter_f32_slice(target, glow::TEXTURE_BORDER_COLOR, &[1.0, 1.0, 1.0, 1.0]);
            }
        }
    }
}

impl GraphicsDevice for GlDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle> {
        let buffer = unsafe {
            let buffer = self.gl.create_buffer().map_err(RenderError::ResourceCreationFailed)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            buffer
        };
        self.buffers.push(buffer);
        Ok(BufferHandle(next_id(self.buffers.len())))
    }

    fn create_texture(&mut self, desc: &TextureDescriptor, pixels: Option<&[u8]>) -> BackendResult<TextureHandle> {
        if desc.width == 0 || desc.height == 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture size {}x{} is empty",
                desc.width, desc.height
            )));
        }
        if let Some(pixels) = pixels {
            if pixels.len() < desc.expected_rgba8_len() {
                return Err(RenderError::ResourceCreationFailed(format!(
                    "texture data holds {} bytes, {} expected",
                    pixels.len(),
                    desc.expected_rgba8_len()
                )));
            }
        }

        let target = gl_texture_target(desc.kind);
        let texture = unsafe { self.gl.create_texture() }.map_err(RenderError::ResourceCreationFailed)?;
        unsafe {
            self.gl.bind_texture(target, Some(texture));
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }
        self.allocate_texture_storage(desc, pixels);
        self.apply_sampler(desc);
        unsafe { self.gl.bind_texture(target, None) };

        self.textures.push(TextureEntry { texture, descriptor: *desc });
        Ok(TextureHandle(next_id(self.textures.len())))
    }

    fn generate_mipmaps(&mut self, texture: TextureHandle) {
        let Some(entry) = self.texture(texture) else {
            log::warn!("Mipmap request for unknown texture {}", texture.0);
            return;
        };
        let target = gl_texture_target(entry.descriptor.kind);
        unsafe {
            self.gl.bind_texture(target, Some(entry.texture));
            self.gl.generate_mipmap(target);
            self.gl.bind_texture(target, None);
        }
    }

    fn create_vertex_array(&mut self, desc: &VertexArrayDescriptor) -> BackendResult<VertexArrayHandle> {
        let mut attributes = Vec::with_capacity(desc.attributes.len());
        for attribute in &desc.attributes {
            let buffer = self.buffer(attribute.buffer).ok_or_else(|| {
                RenderError::ResourceCreationFailed(format!("attribute {} reads an unknown buffer", attribute.location))
            })?;
            attributes.push((attribute, buffer));
        }
        let element_buffer = match desc.element_buffer {
            Some(handle) => Some(
                self.buffer(handle)
                    .ok_or_else(|| RenderError::ResourceCreationFailed("unknown element buffer".to_string()))?,
            ),
            None => None,
        };

        let vertex_array = unsafe {
            let vertex_array = self.gl.create_vertex_array().map_err(RenderError::ResourceCreationFailed)?;
            self.gl.bind_vertex_array(Some(vertex_array));
            for (attribute, buffer) in attributes {
                self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
                self.gl.enable_vertex_attrib_array(attribute.location);
                self.gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    i32::from(attribute.components),
                    attribute.component_type.gl_enum(),
                    attribute.normalized,
                    attribute.stride as i32,
                    attribute.offset as i32,
                );
            }
            // Captured by the vertex array, so it must stay bound until unbinding the array
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, element_buffer);
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            vertex_array
        };

        self.vertex_arrays.push(vertex_array);
        Ok(VertexArrayHandle(next_id(self.vertex_arrays.len())))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDescriptor) -> BackendResult<FramebufferHandle> {
        let mut colors = Vec::with_capacity(desc.color_attachments.len());
        for handle in &desc.color_attachments {
            let entry = self
                .texture(*handle)
                .ok_or_else(|| RenderError::ResourceCreationFailed(format!("unknown colour attachment {}", handle.0)))?;
            colors.push(entry.texture);
        }
        let depth_texture = match desc.depth {
            DepthAttachment::Texture(handle) => Some(
                self.texture(handle)
                    .filter(|entry| entry.descriptor.format.is_depth())
                    .map(|entry| (entry.texture, entry.descriptor.kind))
                    .ok_or_else(|| RenderError::ResourceCreationFailed(format!("invalid depth attachment {}", handle.0)))?,
            ),
            DepthAttachment::None | DepthAttachment::Renderbuffer => None,
        };

        let (framebuffer, depth_storage, status) = unsafe {
            let framebuffer = self.gl.create_framebuffer().map_err(RenderError::ResourceCreationFailed)?;
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));

            let mut draw_buffers = Vec::with_capacity(colors.len());
            for (i, texture) in colors.into_iter().enumerate() {
                let attachment = glow::COLOR_ATTACHMENT0 + i as u32;
                self.gl.framebuffer_texture_2d(glow::FRAMEBUFFER, attachment, glow::TEXTURE_2D, Some(texture), 0);
                draw_buffers.push(attachment);
            }

            let mut depth_storage = None;
            match depth_texture {
                Some((texture, TextureKind::Texture2D)) => {
                    self.gl.framebuffer_texture_2d(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::TEXTURE_2D,
                        Some(texture),
                        0,
                    );
                }
                Some((texture, TextureKind::CubeMap)) => {
                    // Layered attachment; the geometry stage picks the face
                    self.gl.framebuffer_texture(glow::FRAMEBUFFER, glow::DEPTH_ATTACHMENT, Some(texture), 0);
                }
                None if desc.depth == DepthAttachment::Renderbuffer => {
                    let renderbuffer = self.gl.create_renderbuffer().map_err(RenderError::ResourceCreationFailed)?;
                    self.gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
                    // Matches the default framebuffer so depth can be blitted across
                    self.gl.renderbuffer_storage(
                        glow::RENDERBUFFER,
                        glow::DEPTH24_STENCIL8,
                        desc.width as i32,
                        desc.height as i32,
                    );
                    self.gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_STENCIL_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(renderbuffer),
                    );
                    self.gl.bind_renderbuffer(glow::RENDERBUFFER, None);
                    depth_storage = Some(renderbuffer);
                }
                None => {}
            }

            if draw_buffers.is_empty() {
                self.gl.draw_buffer(glow::NONE);
                self.gl.read_buffer(glow::NONE);
            } else {
                self.gl.draw_buffers(&draw_buffers);
            }

            let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            (framebuffer, depth_storage, status)
        };

        if status != glow::FRAMEBUFFER_COMPLETE {
            return Err(RenderError::ResourceCreationFailed(format!(
                "framebuffer is not complete (status 0x{status:x})"
            )));
        }

        self.framebuffers.push(FramebufferEntry { framebuffer, _depth_storage: depth_storage });
        Ok(FramebufferHandle(next_id(self.framebuffers.len())))
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        let target = match framebuffer {
            Some(handle) => match self.framebuffer(handle) {
                Some(fb) => Some(fb),
                None => {
                    log::warn!("Bind of unknown framebuffer {}", handle.0);
                    return;
                }
            },
            None => None,
        };
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, target) };
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn clear(&mut self, flags: ClearFlags, color: [f32; 4]) {
        let mut mask = 0;
        if flags.contains(ClearFlags::COLOR) {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if flags.contains(ClearFlags::DEPTH) {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear_depth_f32(1.0);
            self.gl.clear(mask);
        }
    }

    fn blit_depth_to_default(&mut self, source: FramebufferHandle, width: u32, height: u32) {
        let Some(framebuffer) = self.framebuffer(source) else {
            log::warn!("Depth blit from unknown framebuffer {}", source.0);
            return;
        };
        let (w, h) = (width as i32, height as i32);
        unsafe {
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(framebuffer));
            self.gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
            self.gl.blit_framebuffer(0, 0, w, h, 0, 0, w, h, glow::DEPTH_BUFFER_BIT, glow::NEAREST);
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        let Some(entry) = self.texture(texture) else {
            log::trace!("Bind of unknown texture {} to unit {}", texture.0, unit);
            return;
        };
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(gl_texture_target(entry.descriptor.kind), Some(entry.texture));
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        let Some(&handle) = slot(vertex_array.0).and_then(|i| self.vertex_arrays.get(i)) else {
            log::trace!("Bind of unknown vertex array {}", vertex_array.0);
            return;
        };
        unsafe { self.gl.bind_vertex_array(Some(handle)) };
    }

    fn compile_program(&mut self, source: &ProgramSource) -> CompileOutcome {
        let program = match unsafe { self.gl.create_program() } {
            Ok(program) => program,
            Err(e) => {
                log::error!("Program object creation failed for {}: {}", source.name, e);
                return CompileOutcome { handle: ProgramHandle(0), error_log: Some(e) };
            }
        };

        let mut problems = Vec::new();
        let mut stages = vec![
            (glow::VERTEX_SHADER, "vertex", source.vertex.as_str()),
            (glow::FRAGMENT_SHADER, "fragment", source.fragment.as_str()),
        ];
        if let Some(geometry) = &source.geometry {
            stages.push((glow::GEOMETRY_SHADER, "geometry", geometry.as_str()));
        }
        for (stage, label, text) in stages {
            if let Err(e) = self.compile_stage(program, stage, label, text) {
                problems.push(e);
            }
        }

        if problems.is_empty() {
            unsafe {
                self.gl.link_program(program);
                if !self.gl.get_program_link_status(program) {
                    problems.push(format!("link: {}", self.gl.get_program_info_log(program)));
                }
            }
        }

        self.programs.push(ProgramEntry { program, locations: HashMap::new() });
        CompileOutcome {
            handle: ProgramHandle(next_id(self.programs.len())),
            error_log: (!problems.is_empty()).then(|| problems.join("\n")),
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        let Some(entry) = self.program(program) else {
            log::warn!("Use of unknown program {}", program.0);
            return;
        };
        let gl_program = entry.program;
        unsafe { self.gl.use_program(Some(gl_program)) };
        self.current_program = Some(program);
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.current_program
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &UniformValue) {
        if self.current_program != Some(program) {
            self.use_program(program);
        }
        let Some(location) = self.uniform_location(program, name) else {
            return;
        };
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, m.as_slice()),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Bool(b) => self.gl.uniform_1_i32(location, i32::from(*b)),
                UniformValue::Int(i) => self.gl.uniform_1_i32(location, *i),
                UniformValue::Float(f) => self.gl.uniform_1_f32(location, *f),
                UniformValue::Mat4Array(matrices) => {
                    let flat: Vec<f32> = matrices.iter().flat_map(|m| m.as_slice().iter().copied()).collect();
                    self.gl.uniform_matrix_4_f32_slice(location, false, &flat);
                }
            }
        }
    }

    fn bind_uniform_block(&mut self, program: ProgramHandle, name: &str, binding: u32) {
        let Some(entry) = self.program(program) else {
            log::warn!("Uniform block {} on unknown program {}", name, program.0);
            return;
        };
        let gl_program = entry.program;
        unsafe {
            match self.gl.get_uniform_block_index(gl_program, name) {
                Some(index) => self.gl.uniform_block_binding(gl_program, index, binding),
                None => log::warn!("Program {} has no uniform block {}", program.0, name),
            }
        }
    }

    fn draw_elements(&mut self, mode: DrawMode, count: u32, index_type: IndexType, offset: u64) {
        unsafe {
            self.gl.draw_elements(gl_draw_mode(mode), count as i32, gl_index_type(index_type), offset as i32);
        }
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) {
        unsafe { self.gl.draw_arrays(gl_draw_mode(mode), first as i32, count as i32) };
    }

    fn drain_errors(&mut self) -> Vec<DeviceErrorCode> {
        let mut errors = Vec::new();
        for _ in 0..MAX_DRAINED_ERRORS {
            let code = unsafe { self.gl.get_error() };
            if code == glow::NO_ERROR {
                break;
            }
            match device_error(code) {
                Some(error) => errors.push(error),
                None => log::warn!("Unrecognised GL error 0x{:x}", code),
            }
        }
        errors
    }
}

fn gl_texture_target(kind: TextureKind) -> u32 {
    match kind {
        TextureKind::Texture2D => glow::TEXTURE_2D,
        TextureKind::CubeMap => glow::TEXTURE_CUBE_MAP,
    }
}

/// (internal format, pixel format, pixel type)
fn gl_texture_format(format: TextureFormat) -> (i32, u32, u32) {
    match format {
        TextureFormat::Rgba8 => (glow::RGBA8 as i32, glow::RGBA, glow::UNSIGNED_BYTE),
        TextureFormat::Rgba16F => (glow::RGBA16F as i32, glow::RGBA, glow::FLOAT),
        TextureFormat::Depth24 => (glow::DEPTH_COMPONENT24 as i32, glow::DEPTH_COMPONENT, glow::FLOAT),
    }
}

fn gl_filter(filter: FilterMode) -> u32 {
    match filter {
        FilterMode::Nearest => glow::NEAREST,
        FilterMode::Linear => glow::LINEAR,
        FilterMode::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
        FilterMode::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
        FilterMode::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
        FilterMode::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }
}

fn gl_wrap(wrap: WrapMode) -> u32 {
    match wrap {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
        WrapMode::ClampToBorder => glow::CLAMP_TO_BORDER,
    }
}

fn gl_draw_mode(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Points => glow::POINTS,
        DrawMode::Lines => glow::LINES,
        DrawMode::LineLoop => glow::LINE_LOOP,
        DrawMode::LineStrip => glow::LINE_STRIP,
        DrawMode::Triangles => glow::TRIANGLES,
        DrawMode::TriangleStrip => glow::TRIANGLE_STRIP,
        DrawMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn gl_index_type(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U8 => glow::UNSIGNED_BYTE,
        IndexType::U16 => glow::UNSIGNED_SHORT,
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

fn device_error(code: u32) -> Option<DeviceErrorCode> {
    match code {
        glow::INVALID_ENUM => Some(DeviceErrorCode::InvalidEnum),
        glow::INVALID_VALUE => Some(DeviceErrorCode::InvalidValue),
        glow::INVALID_OPERATION => Some(DeviceErrorCode::InvalidOperation),
        glow::OUT_OF_MEMORY => Some(DeviceErrorCode::OutOfMemory),
        glow::INVALID_FRAMEBUFFER_OPERATION => Some(DeviceErrorCode::InvalidFramebufferOperation),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::device::ComponentType;

    #[test]
    fn test_draw_modes_keep_asset_codes() {
        // The asset format numbers its modes with the GL values
        for code in 0..=6 {
            let mode = DrawMode::from_gl_enum(code).expect("mode");
            assert_eq!(gl_draw_mode(mode), code);
        }
    }

    #[test]
    fn test_sampler_codes_match_asset_codes() {
        for code in [9728, 9729, 9984, 9985, 9986, 9987] {
            let filter = FilterMode::from_gl_enum(code).expect("filter");
            assert_eq!(gl_filter(filter), code);
        }
        for code in [10497, 33648, 33071, 33069] {
            let wrap = WrapMode::from_gl_enum(code).expect("wrap");
            assert_eq!(gl_wrap(wrap), code);
        }
    }

    #[test]
    fn test_index_types_match_component_codes() {
        assert_eq!(gl_index_type(IndexType::U8), ComponentType::U8.gl_enum());
        assert_eq!(gl_index_type(IndexType::U16), ComponentType::U16.gl_enum());
        assert_eq!(gl_index_type(IndexType::U32), ComponentType::U32.gl_enum());
    }

    #[test]
    fn test_depth_format_is_depth_component() {
        let (internal, format, _) = gl_texture_format(TextureFormat::Depth24);
        assert_eq!(internal, glow::DEPTH_COMPONENT24 as i32);
        assert_eq!(format, glow::DEPTH_COMPONENT);
        assert_eq!(gl_texture_target(TextureKind::CubeMap), glow::TEXTURE_CUBE_MAP);
    }

    #[test]
    fn test_error_codes_map_to_device_errors() {
        assert_eq!(device_error(glow::INVALID_ENUM), Some(DeviceErrorCode::InvalidEnum));
        assert_eq!(
            device_error(glow::INVALID_FRAMEBUFFER_OPERATION),
            Some(DeviceErrorCode::InvalidFramebufferOperation)
        );
        assert_eq!(device_error(glow::NO_ERROR), None);
    }
}
