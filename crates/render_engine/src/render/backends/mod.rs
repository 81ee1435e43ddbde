//! Graphics backend implementations
//!
//! [`GlDevice`] drives a current OpenGL 3.3 core context. [`HeadlessDevice`]
//! records commands in memory and backs the test suite.

pub mod gl;
pub mod headless;

pub use gl::GlDevice;
pub use headless::{DeviceCommand, HeadlessDevice, TextureRecord};
