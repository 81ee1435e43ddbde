//! Backend abstraction for GPU resources and commands
//!
//! The renderer never talks to a graphics API directly. Everything it needs
//! from the GPU goes through [`GraphicsDevice`]: resources are identified by
//! plain integer handles, state is bound explicitly, and errors are queued
//! on the device and drained by the caller rather than returned from every
//! call.

use std::fmt;

use bitflags::bitflags;

use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw identifier as stored by the backend
            pub fn id(self) -> u32 {
                self.0
            }
        }
    };
}

define_handle!(
    /// Block of vertex or index data resident on the GPU
    BufferHandle
);
define_handle!(
    /// Uploaded image (2D texture or cubemap)
    TextureHandle
);
define_handle!(
    /// Recorded vertex attribute layout plus element buffer binding
    VertexArrayHandle
);
define_handle!(
    /// Off-screen render target
    FramebufferHandle
);
define_handle!(
    /// Linked shader program
    ProgramHandle
);

/// Component type of an accessor, with the numeric values the asset format uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Signed 8-bit integer
    I8,
    /// Unsigned 8-bit integer
    U8,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// 32-bit float
    F32,
}

impl ComponentType {
    /// Size of one component in bytes
    pub fn size_bytes(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }

    /// Numeric enum value used by the asset format
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::I8 => 5120,
            Self::U8 => 5121,
            Self::I16 => 5122,
            Self::U16 => 5123,
            Self::U32 => 5125,
            Self::F32 => 5126,
        }
    }

    /// Parse the numeric enum value used by the asset format
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            5120 => Some(Self::I8),
            5121 => Some(Self::U8),
            5122 => Some(Self::I16),
            5123 => Some(Self::U16),
            5125 => Some(Self::U32),
            5126 => Some(Self::F32),
            _ => None,
        }
    }
}

/// Width of the indices consumed by an indexed draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 8-bit indices
    U8,
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Index type for an accessor component type, if it can hold indices
    pub fn from_component(component: ComponentType) -> Option<Self> {
        match component {
            ComponentType::U8 => Some(Self::U8),
            ComponentType::U16 => Some(Self::U16),
            ComponentType::U32 => Some(Self::U32),
            _ => None,
        }
    }

    /// Size of one index in bytes
    pub fn size_bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Primitive assembly mode of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Independent points
    Points,
    /// Independent line segments
    Lines,
    /// Closed line loop
    LineLoop,
    /// Connected line strip
    LineStrip,
    /// Independent triangles
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan
    TriangleFan,
}

impl DrawMode {
    /// Parse the numeric mode value used by the asset format (0..=6)
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Points),
            1 => Some(Self::Lines),
            2 => Some(Self::LineLoop),
            3 => Some(Self::LineStrip),
            4 => Some(Self::Triangles),
            5 => Some(Self::TriangleStrip),
            6 => Some(Self::TriangleFan),
            _ => None,
        }
    }
}

/// One vertex attribute read from a GPU buffer
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Buffer the attribute is read from
    pub buffer: BufferHandle,
    /// Number of components per vertex (1..=4)
    pub components: u8,
    /// Type of each component
    pub component_type: ComponentType,
    /// Whether integer data is normalized to [0, 1] / [-1, 1]
    pub normalized: bool,
    /// Byte distance between consecutive vertices, 0 means tightly packed
    pub stride: u32,
    /// Byte offset of the first element inside the buffer
    pub offset: u64,
}

/// Attribute bindings captured into a vertex array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexArrayDescriptor {
    /// Enabled attributes
    pub attributes: Vec<VertexAttribute>,
    /// Buffer indexed draws read their indices from
    pub element_buffer: Option<BufferHandle>,
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Single 2D image
    Texture2D,
    /// Six square faces
    CubeMap,
}

/// Texel storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA
    Rgba8,
    /// 16-bit float RGBA
    Rgba16F,
    /// 24-bit depth
    Depth24,
}

impl TextureFormat {
    /// Whether this format holds depth rather than colour
    pub fn is_depth(self) -> bool {
        matches!(self, Self::Depth24)
    }
}

/// Texture minification / magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest texel
    Nearest,
    /// Bilinear
    Linear,
    /// Nearest texel, nearest mip level
    NearestMipmapNearest,
    /// Bilinear, nearest mip level
    LinearMipmapNearest,
    /// Nearest texel, blend of mip levels
    NearestMipmapLinear,
    /// Trilinear
    LinearMipmapLinear,
}

impl FilterMode {
    /// Whether this filter samples from a mip chain
    pub fn uses_mipmaps(self) -> bool {
        matches!(
            self,
            Self::NearestMipmapNearest
                | Self::LinearMipmapNearest
                | Self::NearestMipmapLinear
                | Self::LinearMipmapLinear
        )
    }

    /// Parse the numeric filter value used by the asset format
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            9728 => Some(Self::Nearest),
            9729 => Some(Self::Linear),
            9984 => Some(Self::NearestMipmapNearest),
            9985 => Some(Self::LinearMipmapNearest),
            9986 => Some(Self::NearestMipmapLinear),
            9987 => Some(Self::LinearMipmapLinear),
            _ => None,
        }
    }
}

/// Texture coordinate wrapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Tile the texture
    Repeat,
    /// Tile with every other copy mirrored
    MirroredRepeat,
    /// Clamp to the edge texel
    ClampToEdge,
    /// Clamp to a border colour
    ClampToBorder,
}

impl WrapMode {
    /// Parse the numeric wrap value used by the asset format
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            10497 => Some(Self::Repeat),
            33648 => Some(Self::MirroredRepeat),
            33071 => Some(Self::ClampToEdge),
            33069 => Some(Self::ClampToBorder),
            _ => None,
        }
    }
}

/// Sampling state attached to a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerState {
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
    /// Wrap along U
    pub wrap_s: WrapMode,
    /// Wrap along V
    pub wrap_t: WrapMode,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
        }
    }
}

/// Everything needed to allocate a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDescriptor {
    /// 2D or cube
    pub kind: TextureKind,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Storage format
    pub format: TextureFormat,
    /// Sampling state
    pub sampler: SamplerState,
}

impl TextureDescriptor {
    /// Byte size of one face of pixel data for 8-bit formats
    pub fn expected_rgba8_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Depth storage of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthAttachment {
    /// No depth testing
    None,
    /// Sampled depth texture (shadow maps)
    Texture(TextureHandle),
    /// Write-only depth storage (G-buffer)
    Renderbuffer,
}

/// Attachment set of an off-screen render target
///
/// The colour list doubles as the draw-buffer list: attachment `i` is
/// written by fragment output `i`. An empty list means colour writes are
/// disabled for the target.
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferDescriptor {
    /// Colour attachments, in draw-buffer order
    pub color_attachments: Vec<TextureHandle>,
    /// Depth storage
    pub depth: DepthAttachment,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FramebufferDescriptor {
    /// Whether this target only stores depth
    pub fn is_depth_only(&self) -> bool {
        self.color_attachments.is_empty()
    }
}

bitflags! {
    /// Which attachments a clear touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Colour attachments
        const COLOR = 0b01;
        /// Depth attachment
        const DEPTH = 0b10;
    }
}

/// Value assigned to a named shader input
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// 4x4 matrix
    Mat4(Mat4),
    /// 2-vector
    Vec2(Vec2),
    /// 3-vector
    Vec3(Vec3),
    /// Boolean flag
    Bool(bool),
    /// Integer (also used for sampler units)
    Int(i32),
    /// Scalar
    Float(f32),
    /// Array of matrices
    Mat4Array(Vec<Mat4>),
}

/// Shader stage sources for one program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgramSource {
    /// Name used in diagnostics
    pub name: String,
    /// Vertex stage
    pub vertex: String,
    /// Fragment stage
    pub fragment: String,
    /// Optional geometry stage
    pub geometry: Option<String>,
}

/// Result of handing sources to the device
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutcome {
    /// Program handle, valid even when linking failed
    pub handle: ProgramHandle,
    /// Compiler / linker diagnostics, present when the program did not link
    pub error_log: Option<String>,
}

/// Error codes queued by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceErrorCode {
    /// Unacceptable enum argument
    InvalidEnum,
    /// Numeric argument out of range
    InvalidValue,
    /// Operation not allowed in the current state
    InvalidOperation,
    /// Allocation failed
    OutOfMemory,
    /// Bound framebuffer is not complete
    InvalidFramebufferOperation,
}

impl fmt::Display for DeviceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidEnum => "INVALID_ENUM",
            Self::InvalidValue => "INVALID_VALUE",
            Self::InvalidOperation => "INVALID_OPERATION",
            Self::OutOfMemory => "OUT_OF_MEMORY",
            Self::InvalidFramebufferOperation => "INVALID_FRAMEBUFFER_OPERATION",
        };
        f.write_str(name)
    }
}

/// GPU device trait
///
/// Implementations own every resource they hand out. Handles stay valid for
/// the lifetime of the device; there is no release path.
pub trait GraphicsDevice {
    /// Human readable backend name
    fn name(&self) -> &str;

    /// Upload a block of bytes verbatim
    fn create_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle>;

    /// Allocate a texture, optionally filling it with RGBA8 pixels
    fn create_texture(&mut self, desc: &TextureDescriptor, pixels: Option<&[u8]>) -> BackendResult<TextureHandle>;

    /// Build the mip chain of a texture
    fn generate_mipmaps(&mut self, texture: TextureHandle);

    /// Capture an attribute layout
    fn create_vertex_array(&mut self, desc: &VertexArrayDescriptor) -> BackendResult<VertexArrayHandle>;

    /// Create a render target; fails when the attachment set is incomplete
    fn create_framebuffer(&mut self, desc: &FramebufferDescriptor) -> BackendResult<FramebufferHandle>;

    /// Bind a render target, `None` selects the default framebuffer
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Set the viewport rectangle
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clear attachments of the bound framebuffer
    fn clear(&mut self, flags: ClearFlags, color: [f32; 4]);

    /// Copy the depth attachment of `source` into the default framebuffer
    ///
    /// The default framebuffer is bound afterwards.
    fn blit_depth_to_default(&mut self, source: FramebufferHandle, width: u32, height: u32);

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Bind a vertex array for subsequent draws
    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// Compile and link a program
    fn compile_program(&mut self, source: &ProgramSource) -> CompileOutcome;

    /// Make a program current
    fn use_program(&mut self, program: ProgramHandle);

    /// Program currently in use
    fn current_program(&self) -> Option<ProgramHandle>;

    /// Assign a named shader input of a program
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: &UniformValue);

    /// Attach a named uniform block to a binding index
    fn bind_uniform_block(&mut self, program: ProgramHandle, name: &str, binding: u32);

    /// Indexed draw from the bound vertex array's element buffer
    fn draw_elements(&mut self, mode: DrawMode, count: u32, index_type: IndexType, offset: u64);

    /// Non-indexed draw
    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32);

    /// Take every queued error code, oldest first
    fn drain_errors(&mut self) -> Vec<DeviceErrorCode>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_codes_round_trip() {
        for component in [
            ComponentType::I8,
            ComponentType::U8,
            ComponentType::I16,
            ComponentType::U16,
            ComponentType::U32,
            ComponentType::F32,
        ] {
            assert_eq!(ComponentType::from_gl_enum(component.gl_enum()), Some(component));
        }
        assert_eq!(ComponentType::from_gl_enum(1234), None);
    }

    #[test]
    fn test_only_unsigned_types_index() {
        assert_eq!(IndexType::from_component(ComponentType::U16), Some(IndexType::U16));
        assert_eq!(IndexType::from_component(ComponentType::F32), None);
        assert_eq!(IndexType::from_component(ComponentType::I16), None);
    }

    #[test]
    fn test_mipmap_filters() {
        let mipmapped: Vec<_> = [9728, 9729, 9984, 9985, 9986, 9987]
            .into_iter()
            .filter_map(FilterMode::from_gl_enum)
            .filter(|f| f.uses_mipmaps())
            .collect();
        assert_eq!(mipmapped.len(), 4);
        assert!(!FilterMode::Linear.uses_mipmaps());
    }

    #[test]
    fn test_default_sampler_is_linear_repeat() {
        let sampler = SamplerState::default();
        assert_eq!(sampler.min_filter, FilterMode::Linear);
        assert_eq!(sampler.mag_filter, FilterMode::Linear);
        assert_eq!(sampler.wrap_s, WrapMode::Repeat);
        assert_eq!(sampler.wrap_t, WrapMode::Repeat);
    }

    #[test]
    fn test_error_code_names() {
        assert_eq!(DeviceErrorCode::InvalidFramebufferOperation.to_string(), "INVALID_FRAMEBUFFER_OPERATION");
        assert_eq!(DeviceErrorCode::InvalidEnum.to_string(), "INVALID_ENUM");
    }

    #[test]
    fn test_draw_mode_codes() {
        assert_eq!(DrawMode::from_gl_enum(4), Some(DrawMode::Triangles));
        assert_eq!(DrawMode::from_gl_enum(5), Some(DrawMode::TriangleStrip));
        assert_eq!(DrawMode::from_gl_enum(7), None);
    }
}
