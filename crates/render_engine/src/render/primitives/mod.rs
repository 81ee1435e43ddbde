//! Core primitive types for rendering
//!
//! The viewpoint every pass renders from.

pub mod camera;

pub use camera::{Camera, CameraMovement};
