//! Public rendering API
//!
//! The device abstraction every other rendering module is written against,
//! the shader program wrapper, and the error-queue helpers.

pub mod device;
pub mod error_check;
pub mod shader;

// Re-export commonly used types
pub use device::{
    BackendResult, BufferHandle, ClearFlags, CompileOutcome, ComponentType, DepthAttachment,
    DeviceErrorCode, DrawMode, FilterMode, FramebufferDescriptor, FramebufferHandle,
    GraphicsDevice, IndexType, ProgramHandle, ProgramSource, SamplerState, TextureDescriptor,
    TextureFormat, TextureHandle, TextureKind, UniformValue, VertexArrayDescriptor,
    VertexArrayHandle, VertexAttribute, WrapMode,
};
pub use error_check::log_device_errors;
pub use shader::{ShaderProgram, ShaderSet};
