//! Shader program wrapper
//!
//! A [`ShaderProgram`] is an opaque program handle plus a name-based setter
//! surface. Setting any value makes the program current first if another
//! program is in use. Construction never fails: a missing source file is
//! logged and replaced by an empty stage, a failed link is logged, and the
//! resulting program simply draws nothing.

use std::path::{Path, PathBuf};

use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::render::api::device::{GraphicsDevice, ProgramHandle, ProgramSource, UniformValue};

/// Linked program with named inputs
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    name: String,
    handle: ProgramHandle,
    linked: bool,
}

impl ShaderProgram {
    /// Compile a program from in-memory sources
    pub fn from_source(device: &mut dyn GraphicsDevice, source: &ProgramSource) -> Self {
        let outcome = device.compile_program(source);
        if let Some(error_log) = &outcome.error_log {
            log::error!("Shader program '{}' failed to build:\n{}", source.name, error_log);
        } else {
            log::debug!("Shader program '{}' built as {:?}", source.name, outcome.handle);
        }

        Self {
            name: source.name.clone(),
            handle: outcome.handle,
            linked: outcome.error_log.is_none(),
        }
    }

    /// Load `<name>.vert`, `<name>.frag` and, if present, `<name>.geom` from `dir`
    pub fn load(device: &mut dyn GraphicsDevice, dir: impl AsRef<Path>, name: &str) -> Self {
        let dir = dir.as_ref();
        let stage_path = |ext: &str| -> PathBuf { dir.join(format!("{name}.{ext}")) };

        let geometry_path = stage_path("geom");
        let source = ProgramSource {
            name: name.to_string(),
            vertex: read_stage(&stage_path("vert")),
            fragment: read_stage(&stage_path("frag")),
            geometry: geometry_path.exists().then(|| read_stage(&geometry_path)),
        };

        Self::from_source(device, &source)
    }

    /// Program name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend handle
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Whether the program linked successfully
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Make this program current
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        device.use_program(self.handle);
    }

    fn ensure_bound(&self, device: &mut dyn GraphicsDevice) {
        if device.current_program() != Some(self.handle) {
            device.use_program(self.handle);
        }
    }

    /// Assign any named input
    pub fn set(&self, device: &mut dyn GraphicsDevice, name: &str, value: &UniformValue) {
        self.ensure_bound(device);
        device.set_uniform(self.handle, name, value);
    }

    /// Assign a matrix input
    pub fn set_mat4(&self, device: &mut dyn GraphicsDevice, name: &str, value: Mat4) {
        self.set(device, name, &UniformValue::Mat4(value));
    }

    /// Assign an array of matrices
    pub fn set_mat4_array(&self, device: &mut dyn GraphicsDevice, name: &str, values: &[Mat4]) {
        self.set(device, name, &UniformValue::Mat4Array(values.to_vec()));
    }

    /// Assign a 2-vector input
    pub fn set_vec2(&self, device: &mut dyn GraphicsDevice, name: &str, value: Vec2) {
        self.set(device, name, &UniformValue::Vec2(value));
    }

    /// Assign a 3-vector input
    pub fn set_vec3(&self, device: &mut dyn GraphicsDevice, name: &str, value: Vec3) {
        self.set(device, name, &UniformValue::Vec3(value));
    }

    /// Assign a boolean input
    pub fn set_bool(&self, device: &mut dyn GraphicsDevice, name: &str, value: bool) {
        self.set(device, name, &UniformValue::Bool(value));
    }

    /// Assign an integer input (sampler units included)
    pub fn set_int(&self, device: &mut dyn GraphicsDevice, name: &str, value: i32) {
        self.set(device, name, &UniformValue::Int(value));
    }

    /// Assign a scalar input
    pub fn set_float(&self, device: &mut dyn GraphicsDevice, name: &str, value: f32) {
        self.set(device, name, &UniformValue::Float(value));
    }

    /// Attach a named uniform block to a binding index
    pub fn set_uniform_block(&self, device: &mut dyn GraphicsDevice, name: &str, binding: u32) {
        self.ensure_bound(device);
        device.bind_uniform_block(self.handle, name, binding);
    }
}

fn read_stage(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Can not find shader stage {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Every program the frame renderer may use
#[derive(Debug, Clone)]
pub struct ShaderSet {
    /// Lit forward shading straight into the default framebuffer
    pub forward: ShaderProgram,
    /// Writes position / normal+roughness / albedo+metallic
    pub gbuffer: ShaderProgram,
    /// Full-screen lighting over the G-buffer
    pub deferred_lighting: ShaderProgram,
    /// Depth-only pass for the directional light
    pub shadow_depth: ShaderProgram,
    /// Depth cubemap pass for the point light (geometry stage fans out faces)
    pub cube_depth: ShaderProgram,
    /// Unlit debug sphere at the point light
    pub light_sphere: ShaderProgram,
}

impl ShaderSet {
    /// File stem of each program, in field order
    pub const PROGRAM_NAMES: [&'static str; 6] = [
        "forward",
        "gbuffer",
        "deferred_lighting",
        "shadow_depth",
        "cube_depth",
        "light_sphere",
    ];

    /// Load every program from a shader directory
    pub fn load(device: &mut dyn GraphicsDevice, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        log::info!("Loading shaders from {}", dir.display());
        let [forward, gbuffer, deferred_lighting, shadow_depth, cube_depth, light_sphere] =
            Self::PROGRAM_NAMES.map(|name| ShaderProgram::load(&mut *device, dir, name));

        Self { forward, gbuffer, deferred_lighting, shadow_depth, cube_depth, light_sphere }
    }

    /// Number of programs that failed to link
    pub fn failed_count(&self) -> usize {
        [
            &self.forward,
            &self.gbuffer,
            &self.deferred_lighting,
            &self.shadow_depth,
            &self.cube_depth,
            &self.light_sphere,
        ]
        .iter()
        .filter(|program| !program.is_linked())
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessDevice;

    fn source(name: &str) -> ProgramSource {
        ProgramSource {
            name: name.to_string(),
            vertex: "void main() {}".to_string(),
            fragment: "void main() {}".to_string(),
            geometry: None,
        }
    }

    #[test]
    fn test_first_set_binds_program() {
        let mut device = HeadlessDevice::new();
        let program = ShaderProgram::from_source(&mut device, &source("base"));
        assert!(program.is_linked());
        assert_eq!(device.current_program(), None);

        program.set_bool(&mut device, "hasNormal", true);

        assert_eq!(device.current_program(), Some(program.handle()));
        assert_eq!(
            device.uniform(program.handle(), "hasNormal"),
            Some(&UniformValue::Bool(true))
        );
    }

    #[test]
    fn test_set_rebinds_after_other_program() {
        let mut device = HeadlessDevice::new();
        let first = ShaderProgram::from_source(&mut device, &source("first"));
        let second = ShaderProgram::from_source(&mut device, &source("second"));

        first.set_int(&mut device, "value", 1);
        second.set_int(&mut device, "value", 2);
        first.set_int(&mut device, "value", 3);

        assert_eq!(device.current_program(), Some(first.handle()));
        assert_eq!(device.uniform(first.handle(), "value"), Some(&UniformValue::Int(3)));
        assert_eq!(device.uniform(second.handle(), "value"), Some(&UniformValue::Int(2)));
    }

    #[test]
    fn test_missing_files_degrade_to_unlinked_program() {
        let mut device = HeadlessDevice::new();
        let program = ShaderProgram::load(&mut device, "definitely/not/a/dir", "ghost");

        assert_eq!(program.name(), "ghost");
        assert!(!program.is_linked());
    }

    #[test]
    fn test_load_reads_stage_files() {
        let dir = std::env::temp_dir().join(format!("render_engine_shader_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        std::fs::write(dir.join("probe.vert"), "void main() {}").expect("write vert");
        std::fs::write(dir.join("probe.frag"), "void main() {}").expect("write frag");

        let mut device = HeadlessDevice::new();
        let program = ShaderProgram::load(&mut device, &dir, "probe");
        assert!(program.is_linked());
        assert_eq!(device.program_source(program.handle()).and_then(|s| s.geometry.clone()), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_shader_set_counts_failures() {
        let mut device = HeadlessDevice::new();
        let set = ShaderSet::load(&mut device, "no/such/shaders");
        assert_eq!(set.failed_count(), ShaderSet::PROGRAM_NAMES.len());
    }
}
