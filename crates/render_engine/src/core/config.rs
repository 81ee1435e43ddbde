//! # Unified Configuration System
//!
//! Every tunable the viewer reads at startup lives here: window size, which
//! render passes run, camera defaults, and where assets are found on disk.
//!
//! ## Configuration Categories
//!
//! - **Window Config**: Size and title of the application window
//! - **Renderer Config**: Shading mode, shadow mode, projection planes
//! - **Camera Config**: Initial pose and input sensitivities
//! - **Asset Config**: Resource and shader directories, scene path
//!
//! All sections are serializable through the [`Config`] trait (TOML or RON).

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

use crate::config::{Config, ConfigError};

/// Which path the final image is produced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShadingMode {
    /// Draw every drawable straight into the default framebuffer
    Forward,
    /// Fill the G-buffer first, then light a full-screen quad
    #[default]
    Deferred,
}

/// Which shadow map, if any, is rendered before the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShadowMode {
    /// No shadow pass
    Disabled,
    /// 2D depth map rendered from the directional light
    Directional,
    /// Depth cubemap rendered from the point light
    #[default]
    PointCube,
}

/// # Window Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Window title
    pub title: String,
}

impl WindowConfig {
    /// Aspect ratio of the window
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Validate the window configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Sponza Viewer".to_string(),
        }
    }
}

/// # Renderer Configuration
///
/// Selects the pass chain the frame renderer plans every frame and the
/// fixed sizes of its render targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Forward or deferred shading
    pub shading: ShadingMode,
    /// Shadow pass selection
    pub shadows: ShadowMode,
    /// Square resolution of the shadow map (or each cube face)
    pub shadow_resolution: u32,
    /// Camera near plane
    pub near_plane: f32,
    /// Camera far plane
    pub far_plane: f32,
    /// Near plane of the shadow projection
    pub shadow_near_plane: f32,
    /// Far plane of the shadow projection
    pub shadow_far_plane: f32,
    /// Half extent of the orthographic volume used by the directional shadow
    pub shadow_ortho_extent: f32,
    /// Colour the default framebuffer is cleared to
    pub clear_color: [f32; 4],
}

impl RendererConfig {
    /// Validate the renderer configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shadow_resolution == 0 {
            return Err(ConfigError::Invalid("shadow resolution must be non-zero".to_string()));
        }
        if self.near_plane <= 0.0 || self.near_plane >= self.far_plane {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far, got {} / {}",
                self.near_plane, self.far_plane
            )));
        }
        if self.shadow_near_plane <= 0.0 || self.shadow_near_plane >= self.shadow_far_plane {
            return Err(ConfigError::Invalid(format!(
                "shadow planes must satisfy 0 < near < far, got {} / {}",
                self.shadow_near_plane, self.shadow_far_plane
            )));
        }
        if self.shadow_ortho_extent <= 0.0 {
            return Err(ConfigError::Invalid("shadow ortho extent must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shading: ShadingMode::default(),
            shadows: ShadowMode::default(),
            shadow_resolution: 1024,
            near_plane: 0.1,
            far_plane: 100.0,
            shadow_near_plane: 1.0,
            shadow_far_plane: 25.0,
            shadow_ortho_extent: 20.0,
            clear_color: [0.05, 0.05, 0.05, 1.0],
        }
    }
}

/// # Camera Configuration
///
/// Initial pose and input sensitivities for the fly camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Start position in world space
    pub position: [f32; 3],
    /// World up vector
    pub world_up: [f32; 3],
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees
    pub pitch: f32,
    /// Units per second
    pub movement_speed: f32,
    /// Degrees per cursor pixel
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
}

impl CameraConfig {
    /// Validate the camera configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1.0..=45.0).contains(&self.zoom) {
            return Err(ConfigError::Invalid(format!("zoom must lie in [1, 45], got {}", self.zoom)));
        }
        if self.movement_speed < 0.0 || self.mouse_sensitivity < 0.0 {
            return Err(ConfigError::Invalid("camera speeds must not be negative".to_string()));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
        }
    }
}

/// # Asset Configuration
///
/// Paths are resolved relative to `resources_dir` / `shaders_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Base directory for scene files and textures
    pub resources_dir: String,
    /// Directory holding `<name>.vert` / `<name>.frag` / `<name>.geom`
    pub shaders_dir: String,
    /// Scene asset, relative to the resources directory
    pub scene: String,
    /// Flat image used for every missing material slot
    pub fallback_texture: String,
    /// Small mesh drawn at the point light position
    pub light_sphere: String,
}

impl AssetConfig {
    /// Full path of a file inside the resources directory
    pub fn resource_path(&self, relative: &str) -> PathBuf {
        PathBuf::from(&self.resources_dir).join(relative)
    }

    /// Full path of the scene asset
    pub fn scene_path(&self) -> PathBuf {
        self.resource_path(&self.scene)
    }

    /// Full path of the fallback texture
    pub fn fallback_texture_path(&self) -> PathBuf {
        self.resource_path(&self.fallback_texture)
    }

    /// Full path of the point light sphere asset
    pub fn light_sphere_path(&self) -> PathBuf {
        self.resource_path(&self.light_sphere)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            resources_dir: "resources".to_string(),
            shaders_dir: "resources/shaders".to_string(),
            scene: "sponza-gltf-pbr/sponza.glb".to_string(),
            fallback_texture: "white.png".to_string(),
            light_sphere: "sphere/scene.gltf".to_string(),
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplicationConfig {
    /// Window configuration
    pub window: WindowConfig,
    /// Rendering system configuration
    pub renderer: RendererConfig,
    /// Camera defaults
    pub camera: CameraConfig,
    /// Asset locations
    pub assets: AssetConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.renderer.validate()?;
        self.camera.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
