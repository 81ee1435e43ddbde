//! Rendering systems
//!
//! Scene-wide participants that feed matrices and shader inputs into passes.

pub mod lighting;
