//! Lighting system
//!
//! One directional light (sun-like, orthographic shadow) and one point light
//! (cube shadow, optional debug sphere).

pub mod directional;
pub mod point;

pub use directional::DirectionalLight;
pub use point::{CubeFace, PointLight, CUBE_FACES};
