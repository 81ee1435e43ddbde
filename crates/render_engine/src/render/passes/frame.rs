//! Per-frame pass orchestration
//!
//! [`FrameRenderer`] owns the render targets and the shader set, and turns
//! the camera, scene and lights of one frame into device commands. Draw
//! failures inside a pass are counted and logged; they never abort the pass.
//! Device errors are drained after every pass.

use crate::core::config::{RendererConfig, ShadingMode, ShadowMode};
use crate::foundation::math::Mat4;
use crate::render::api::device::{ClearFlags, GraphicsDevice};
use crate::render::api::{ShaderProgram, ShaderSet};
use crate::render::passes::quad::FullscreenQuad;
use crate::render::passes::targets::{CubeShadowMap, GBuffer, ShadowMap};
use crate::render::passes::{plan_for, PassKind, PassSequencer};
use crate::render::primitives::Camera;
use crate::render::resources::{DrawCounts, Model};
use crate::render::systems::lighting::{DirectionalLight, PointLight};
use crate::render::{RenderError, RenderResult};

/// Texture unit of the 2D shadow map in the composite pass
pub const SHADOW_MAP_UNIT: u32 = 3;

/// Texture unit of the cube shadow map in the composite pass
pub const CUBE_SHADOW_MAP_UNIT: u32 = 4;

/// Everything a frame reads
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    /// Viewpoint
    pub camera: &'a Camera,
    /// Scene to draw
    pub scene: &'a Model,
    /// Sun light
    pub directional: &'a DirectionalLight,
    /// Point light and its debug sphere
    pub point: &'a PointLight,
}

/// What a frame did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Passes executed, in order
    pub passes: Vec<PassKind>,
    /// Draw calls issued
    pub draw_calls: usize,
    /// Primitives skipped as undrawable
    pub skipped_primitives: usize,
    /// Device error codes drained during the frame
    pub device_errors: usize,
}

impl FrameStats {
    fn record(&mut self, pass: PassKind, counts: DrawCounts, errors: usize) {
        self.passes.push(pass);
        self.draw_calls += counts.drawn;
        self.skipped_primitives += counts.skipped;
        self.device_errors += errors;
    }
}

#[derive(Debug, Clone)]
enum ShadowTarget {
    Directional(ShadowMap),
    Cube(CubeShadowMap),
}

/// Owns targets and programs; renders one frame at a time
#[derive(Debug)]
pub struct FrameRenderer {
    config: RendererConfig,
    shaders: ShaderSet,
    shadow: Option<ShadowTarget>,
    gbuffer: Option<GBuffer>,
    quad: Option<FullscreenQuad>,
    width: u32,
    height: u32,
    sequencer: PassSequencer,
}

impl FrameRenderer {
    /// Create every target the configuration needs
    pub fn new(
        device: &mut dyn GraphicsDevice,
        config: &RendererConfig,
        shaders: ShaderSet,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        config
            .validate()
            .map_err(|e| RenderError::InitializationFailed(format!("renderer config: {e}")))?;

        let shadow = match config.shadows {
            ShadowMode::Disabled => None,
            ShadowMode::Directional => Some(ShadowTarget::Directional(ShadowMap::new(device, config.shadow_resolution)?)),
            ShadowMode::PointCube => Some(ShadowTarget::Cube(CubeShadowMap::new(device, config.shadow_resolution)?)),
        };

        let (gbuffer, quad) = match config.shading {
            ShadingMode::Deferred => (Some(GBuffer::new(device, width, height)?), Some(FullscreenQuad::new(device)?)),
            ShadingMode::Forward => (None, None),
        };

        let failed = shaders.failed_count();
        if failed > 0 {
            log::warn!("{} shader programs failed to link; their passes will draw nothing", failed);
        }
        crate::check_device_errors!(device);

        log::info!(
            "Frame renderer ready: {:?} shading, {:?} shadows, {}x{}",
            config.shading,
            config.shadows,
            width,
            height
        );

        Ok(Self {
            config: config.clone(),
            shaders,
            shadow,
            gbuffer,
            quad,
            width,
            height,
            sequencer: PassSequencer::new(),
        })
    }

    /// Passes each frame runs, in order
    pub fn plan(&self) -> Vec<PassKind> {
        plan_for(&self.config)
    }

    /// Renderer configuration
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Programs used by the passes
    pub fn shaders(&self) -> &ShaderSet {
        &self.shaders
    }

    /// Output size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Directional shadow map, when enabled
    pub fn shadow_map(&self) -> Option<&ShadowMap> {
        match &self.shadow {
            Some(ShadowTarget::Directional(map)) => Some(map),
            _ => None,
        }
    }

    /// Point-light shadow cubemap, when enabled
    pub fn cube_shadow_map(&self) -> Option<&CubeShadowMap> {
        match &self.shadow {
            Some(ShadowTarget::Cube(map)) => Some(map),
            _ => None,
        }
    }

    /// G-buffer, in deferred mode
    pub fn gbuffer(&self) -> Option<&GBuffer> {
        self.gbuffer.as_ref()
    }

    /// Follow a framebuffer size change
    ///
    /// A zero-sized framebuffer (minimized window) keeps the current targets.
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return Ok(());
        }
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }

        if self.gbuffer.is_some() {
            self.gbuffer = Some(GBuffer::new(device, width, height)?);
        }
        self.width = width;
        self.height = height;
        log::debug!("Frame renderer resized to {}x{}", width, height);
        Ok(())
    }

    /// Run every planned pass for one frame
    pub fn render_frame(&mut self, device: &mut dyn GraphicsDevice, inputs: &FrameInputs<'_>) -> RenderResult<FrameStats> {
        let plan = self.plan();
        self.sequencer.begin_frame(plan.clone());
        let mut stats = FrameStats::default();

        for pass in plan {
            self.sequencer.begin_pass(pass)?;
            let counts = match pass {
                PassKind::Shadow => self.shadow_pass(device, inputs),
                PassKind::Geometry => self.geometry_pass(device, inputs)?,
                PassKind::Composite => self.composite_pass(device, inputs)?,
            };
            let errors = crate::check_device_errors!(device);
            stats.record(pass, counts, errors.len());
        }

        self.sequencer.end_frame()?;

        if stats.skipped_primitives > 0 {
            log::trace!("Frame skipped {} primitives", stats.skipped_primitives);
        }
        Ok(stats)
    }

    fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    fn camera_matrices(&self, camera: &Camera) -> (Mat4, Mat4) {
        (
            camera.view_matrix(),
            camera.projection_matrix(self.aspect(), self.config.near_plane, self.config.far_plane),
        )
    }

    fn light_space_matrix(&self, light: &DirectionalLight) -> Mat4 {
        light.light_space_matrix(
            self.config.shadow_ortho_extent,
            self.config.shadow_near_plane,
            self.config.shadow_far_plane,
        )
    }

    fn cube_transforms(&self, light: &PointLight) -> [Mat4; 6] {
        let projection = PointLight::shadow_projection(self.config.shadow_near_plane, self.config.shadow_far_plane);
        light.shadow_transforms(&projection)
    }

    fn restore_default_target(&self, device: &mut dyn GraphicsDevice) {
        device.bind_framebuffer(None);
        device.set_viewport(0, 0, self.width, self.height);
    }

    fn shadow_pass(&self, device: &mut dyn GraphicsDevice, inputs: &FrameInputs<'_>) -> DrawCounts {
        let Some(target) = &self.shadow else {
            return DrawCounts::default();
        };

        let counts = match target {
            ShadowTarget::Directional(map) => {
                device.bind_framebuffer(Some(map.framebuffer()));
                device.set_viewport(0, 0, map.resolution(), map.resolution());
                device.clear(map.clear_flags(), [1.0; 4]);

                let shader = &self.shaders.shadow_depth;
                shader.bind(device);
                shader.set_mat4(device, "lightSpaceMatrix", self.light_space_matrix(inputs.directional));
                inputs.scene.draw(device, shader)
            }
            ShadowTarget::Cube(map) => {
                device.bind_framebuffer(Some(map.framebuffer()));
                device.set_viewport(0, 0, map.resolution(), map.resolution());
                device.clear(map.clear_flags(), [1.0; 4]);

                let shader = &self.shaders.cube_depth;
                shader.bind(device);
                shader.set_mat4_array(device, "shadowMatrices", &self.cube_transforms(inputs.point));
                shader.set_vec3(device, "lightPos", inputs.point.position());
                shader.set_float(device, "farPlane", self.config.shadow_far_plane);
                inputs.scene.draw(device, shader)
            }
        };

        self.restore_default_target(device);
        counts
    }

    fn geometry_pass(&self, device: &mut dyn GraphicsDevice, inputs: &FrameInputs<'_>) -> RenderResult<DrawCounts> {
        let gbuffer = self
            .gbuffer
            .as_ref()
            .ok_or_else(|| RenderError::RenderingFailed("geometry pass without a G-buffer".to_string()))?;

        device.bind_framebuffer(Some(gbuffer.framebuffer()));
        let (width, height) = gbuffer.size();
        device.set_viewport(0, 0, width, height);
        device.clear(gbuffer.clear_flags(), [0.0; 4]);

        let (view, projection) = self.camera_matrices(inputs.camera);
        let shader = &self.shaders.gbuffer;
        shader.bind(device);
        shader.set_mat4(device, "view", view);
        shader.set_mat4(device, "projection", projection);
        let counts = inputs.scene.draw(device, shader);

        self.restore_default_target(device);
        Ok(counts)
    }

    fn composite_pass(&self, device: &mut dyn GraphicsDevice, inputs: &FrameInputs<'_>) -> RenderResult<DrawCounts> {
        self.restore_default_target(device);
        device.clear(ClearFlags::COLOR | ClearFlags::DEPTH, self.config.clear_color);

        let (view, projection) = self.camera_matrices(inputs.camera);
        let mut counts = match self.config.shading {
            ShadingMode::Forward => {
                let shader = &self.shaders.forward;
                shader.bind(device);
                shader.set_mat4(device, "view", view);
                shader.set_mat4(device, "projection", projection);
                self.bind_lighting(device, shader, inputs);
                inputs.scene.draw(device, shader)
            }
            ShadingMode::Deferred => {
                let (gbuffer, quad) = match (&self.gbuffer, &self.quad) {
                    (Some(gbuffer), Some(quad)) => (gbuffer, quad),
                    _ => return Err(RenderError::RenderingFailed("deferred composite without a G-buffer".to_string())),
                };

                let shader = &self.shaders.deferred_lighting;
                shader.bind(device);
                for (unit, name, texture) in gbuffer.sampled_attachments() {
                    device.bind_texture(unit, texture);
                    shader.set_int(device, name, unit as i32);
                }
                self.bind_lighting(device, shader, inputs);
                quad.draw(device);

                // Forward-drawn overlays depth test against the scene
                let (width, height) = gbuffer.size();
                device.blit_depth_to_default(gbuffer.framebuffer(), width, height);
                DrawCounts { drawn: 1, skipped: 0 }
            }
        };

        if inputs.point.is_visible() {
            let shader = &self.shaders.light_sphere;
            shader.bind(device);
            shader.set_mat4(device, "view", view);
            shader.set_mat4(device, "projection", projection);
            shader.set_vec3(device, "lightColor", inputs.point.intensity);
            counts += inputs.point.draw(device, shader);
        }

        Ok(counts)
    }

    /// Camera position, the shading light and the live shadow map
    ///
    /// The directional light shades when its shadow map is in use; otherwise
    /// the point light does.
    fn bind_lighting(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram, inputs: &FrameInputs<'_>) {
        shader.set_vec3(device, "viewPos", inputs.camera.position());

        match &self.shadow {
            Some(ShadowTarget::Directional(map)) => {
                inputs.directional.bind(device, shader);
                shader.set_int(device, "shadowMode", 1);
                device.bind_texture(SHADOW_MAP_UNIT, map.depth_texture());
                shader.set_int(device, "shadowMap", SHADOW_MAP_UNIT as i32);
                shader.set_mat4(device, "lightSpaceMatrix", self.light_space_matrix(inputs.directional));
            }
            Some(ShadowTarget::Cube(map)) => {
                inputs.point.bind(device, shader);
                shader.set_int(device, "shadowMode", 2);
                device.bind_texture(CUBE_SHADOW_MAP_UNIT, map.depth_texture());
                shader.set_int(device, "shadowCubeMap", CUBE_SHADOW_MAP_UNIT as i32);
                shader.set_float(device, "farPlane", self.config.shadow_far_plane);
            }
            None => {
                inputs.point.bind(device, shader);
                shader.set_int(device, "shadowMode", 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::scene_asset::{ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD_0};
    use crate::assets::{Accessor, BufferView, MeshDesc, NodeDesc, PrimitiveDesc, SceneAsset, SceneDesc};
    use crate::render::api::device::{ComponentType, DrawMode, ProgramSource, UniformValue};
    use crate::render::backends::{DeviceCommand, HeadlessDevice};
    use crate::render::resources::uploader::upload_fallback;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn shaders(device: &mut HeadlessDevice) -> ShaderSet {
        let [forward, gbuffer, deferred_lighting, shadow_depth, cube_depth, light_sphere] =
            ShaderSet::PROGRAM_NAMES.map(|name| {
                ShaderProgram::from_source(
                    &mut *device,
                    &ProgramSource {
                        name: name.to_string(),
                        vertex: "void main() {}".to_string(),
                        fragment: "void main() {}".to_string(),
                        geometry: None,
                    },
                )
            });
        ShaderSet { forward, gbuffer, deferred_lighting, shadow_depth, cube_depth, light_sphere }
    }

    fn accessor(view: usize, component_type: ComponentType, components: u8) -> Accessor {
        Accessor {
            buffer_view: Some(view),
            byte_offset: 0,
            count: 3,
            component_type,
            components,
            normalized: false,
        }
    }

    fn triangle_asset() -> SceneAsset {
        SceneAsset {
            buffers: vec![vec![0; 102]],
            buffer_views: vec![
                BufferView { buffer: 0, byte_offset: 0, byte_length: 36, byte_stride: None },
                BufferView { buffer: 0, byte_offset: 36, byte_length: 36, byte_stride: None },
                BufferView { buffer: 0, byte_offset: 72, byte_length: 24, byte_stride: None },
                BufferView { buffer: 0, byte_offset: 96, byte_length: 6, byte_stride: None },
            ],
            accessors: vec![
                accessor(0, ComponentType::F32, 3),
                accessor(1, ComponentType::F32, 3),
                accessor(2, ComponentType::F32, 2),
                accessor(3, ComponentType::U16, 1),
            ],
            meshes: vec![MeshDesc {
                name: Some("triangle".to_string()),
                primitives: vec![PrimitiveDesc {
                    attributes: BTreeMap::from([
                        (ATTRIBUTE_POSITION.to_string(), 0),
                        (ATTRIBUTE_NORMAL.to_string(), 1),
                        (ATTRIBUTE_TEXCOORD_0.to_string(), 2),
                    ]),
                    indices: Some(3),
                    material: None,
                    mode: DrawMode::Triangles,
                }],
            }],
            nodes: vec![NodeDesc { mesh: Some(0), ..NodeDesc::default() }],
            scenes: vec![SceneDesc { nodes: vec![0] }],
            ..SceneAsset::default()
        }
    }

    struct Fixture {
        device: HeadlessDevice,
        camera: Camera,
        scene: Model,
        directional: DirectionalLight,
        point: PointLight,
    }

    impl Fixture {
        fn new(with_scene: bool) -> Self {
            let mut device = HeadlessDevice::new();
            let fallback = upload_fallback(&mut device, Path::new("no/such/white.png"));
            let scene = if with_scene {
                Model::from_asset(&mut device, &triangle_asset(), fallback).expect("scene")
            } else {
                Model::empty(fallback)
            };
            let point = PointLight::new(PointLight::DEFAULT_POSITION, PointLight::DEFAULT_INTENSITY, Model::empty(fallback));
            device.clear_commands();

            Self { device, camera: Camera::default(), scene, directional: DirectionalLight::default(), point }
        }

        fn renderer(&mut self, shading: ShadingMode, shadows: ShadowMode) -> FrameRenderer {
            let config = RendererConfig { shading, shadows, shadow_resolution: 256, ..RendererConfig::default() };
            let shaders = shaders(&mut self.device);
            let renderer = FrameRenderer::new(&mut self.device, &config, shaders, 640, 480).expect("renderer");
            self.device.clear_commands();
            renderer
        }

        fn render(&mut self, renderer: &mut FrameRenderer) -> FrameStats {
            let inputs = FrameInputs {
                camera: &self.camera,
                scene: &self.scene,
                directional: &self.directional,
                point: &self.point,
            };
            renderer.render_frame(&mut self.device, &inputs).expect("frame")
        }
    }

    #[test]
    fn test_deferred_cube_frame_runs_all_passes() {
        let mut fixture = Fixture::new(true);
        let mut renderer = fixture.renderer(ShadingMode::Deferred, ShadowMode::PointCube);

        let stats = fixture.render(&mut renderer);

        assert_eq!(stats.passes, vec![PassKind::Shadow, PassKind::Geometry, PassKind::Composite]);
        // shadow + geometry draw the triangle, composite draws the quad
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.skipped_primitives, 0);
        assert_eq!(stats.device_errors, 0);
        assert_eq!(fixture.device.bound_framebuffer(), None);
        assert_eq!(fixture.device.viewport(), (0, 0, 640, 480));
    }

    #[test]
    fn test_deferred_composite_copies_scene_depth_after_quad() {
        let mut fixture = Fixture::new(false);
        let mut renderer = fixture.renderer(ShadingMode::Deferred, ShadowMode::Disabled);
        let gbuffer_fb = renderer.gbuffer().expect("gbuffer").framebuffer();

        let stats = fixture.render(&mut renderer);

        assert_eq!(stats.device_errors, 0);
        let commands = fixture.device.commands();
        let quad = commands
            .iter()
            .position(|c| matches!(c, DeviceCommand::DrawArrays { framebuffer: None, .. }))
            .expect("quad draw");
        let blit = commands
            .iter()
            .position(|c| matches!(c, DeviceCommand::BlitDepth { source, width: 640, height: 480 } if *source == gbuffer_fb))
            .expect("depth blit");
        assert!(blit > quad);
        assert_eq!(fixture.device.bound_framebuffer(), None);
    }

    #[test]
    fn test_forward_composite_needs_no_depth_copy() {
        let mut fixture = Fixture::new(true);
        let mut renderer = fixture.renderer(ShadingMode::Forward, ShadowMode::Disabled);

        fixture.render(&mut renderer);

        assert!(!fixture.device.commands().iter().any(|c| matches!(c, DeviceCommand::BlitDepth { .. })));
    }

    #[test]
    fn test_shadow_pass_clears_depth_only() {
        let mut fixture = Fixture::new(true);
        let mut renderer = fixture.renderer(ShadingMode::Forward, ShadowMode::PointCube);
        let shadow_fb = renderer.cube_shadow_map().expect("cube map").framebuffer();

        fixture.render(&mut renderer);

        let shadow_clears: Vec<ClearFlags> = fixture
            .device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Clear { framebuffer: Some(fb), flags } if *fb == shadow_fb => Some(*flags),
                _ => None,
            })
            .collect();
        assert_eq!(shadow_clears, vec![ClearFlags::DEPTH]);
        assert!(fixture.device.pending_errors().is_empty());
    }

    #[test]
    fn test_cube_pass_uploads_six_face_matrices() {
        let mut fixture = Fixture::new(true);
        let mut renderer = fixture.renderer(ShadingMode::Forward, ShadowMode::PointCube);

        fixture.render(&mut renderer);

        let program = renderer.shaders().cube_depth.handle();
        match fixture.device.uniform(program, "shadowMatrices") {
            Some(UniformValue::Mat4Array(matrices)) => assert_eq!(matrices.len(), 6),
            other => panic!("unexpected shadowMatrices {other:?}"),
        }
        assert_eq!(fixture.device.uniform(program, "farPlane"), Some(&UniformValue::Float(25.0)));
    }

    #[test]
    fn test_deferred_composite_binds_gbuffer_and_cube_units() {
        let mut fixture = Fixture::new(false);
        let mut renderer = fixture.renderer(ShadingMode::Deferred, ShadowMode::PointCube);

        fixture.render(&mut renderer);

        let gbuffer = renderer.gbuffer().expect("gbuffer");
        for (unit, name, texture) in gbuffer.sampled_attachments() {
            assert_eq!(fixture.device.bound_texture(unit), Some(texture));
            let program = renderer.shaders().deferred_lighting.handle();
            assert_eq!(fixture.device.uniform(program, name), Some(&UniformValue::Int(unit as i32)));
        }
        let cube = renderer.cube_shadow_map().expect("cube").depth_texture();
        assert_eq!(fixture.device.bound_texture(CUBE_SHADOW_MAP_UNIT), Some(cube));
        let program = renderer.shaders().deferred_lighting.handle();
        assert_eq!(fixture.device.uniform(program, "shadowMode"), Some(&UniformValue::Int(2)));
    }

    #[test]
    fn test_forward_directional_frame() {
        let mut fixture = Fixture::new(true);
        let mut renderer = fixture.renderer(ShadingMode::Forward, ShadowMode::Directional);

        let stats = fixture.render(&mut renderer);

        assert_eq!(stats.passes, vec![PassKind::Shadow, PassKind::Composite]);
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.device_errors, 0);

        let forward = renderer.shaders().forward.handle();
        assert_eq!(fixture.device.uniform(forward, "shadowMode"), Some(&UniformValue::Int(1)));
        assert!(fixture.device.uniform(forward, "lightSpaceMatrix").is_some());
        assert!(fixture.device.uniform(forward, "lightDir").is_some());
        let map = renderer.shadow_map().expect("shadow map").depth_texture();
        assert_eq!(fixture.device.bound_texture(SHADOW_MAP_UNIT), Some(map));
    }

    #[test]
    fn test_scene_less_frame_still_composites() {
        let mut fixture = Fixture::new(false);
        let mut renderer = fixture.renderer(ShadingMode::Forward, ShadowMode::Disabled);

        let stats = fixture.render(&mut renderer);

        assert_eq!(stats.passes, vec![PassKind::Composite]);
        assert_eq!(stats.draw_calls, 0);
        assert_eq!(stats.device_errors, 0);
        let clears = fixture
            .device
            .commands()
            .iter()
            .filter(|c| matches!(c, DeviceCommand::Clear { framebuffer: None, .. }))
            .count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn test_resize_rebuilds_gbuffer() {
        let mut fixture = Fixture::new(false);
        let mut renderer = fixture.renderer(ShadingMode::Deferred, ShadowMode::Disabled);

        renderer.resize(&mut fixture.device, 800, 600).expect("resize");
        assert_eq!(renderer.size(), (800, 600));
        assert_eq!(renderer.gbuffer().expect("gbuffer").size(), (800, 600));

        renderer.resize(&mut fixture.device, 0, 0).expect("minimized");
        assert_eq!(renderer.size(), (800, 600));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut fixture = Fixture::new(false);
        let config = RendererConfig { shadow_resolution: 0, ..RendererConfig::default() };
        let shaders = shaders(&mut fixture.device);

        let result = FrameRenderer::new(&mut fixture.device, &config, shaders, 640, 480);

        assert!(matches!(result, Err(RenderError::InitializationFailed(_))));
    }

    #[test]
    fn test_unlinked_program_reports_errors_without_failing() {
        let mut fixture = Fixture::new(true);
        let config = RendererConfig { shading: ShadingMode::Forward, shadows: ShadowMode::Disabled, ..RendererConfig::default() };
        let mut set = shaders(&mut fixture.device);
        set.forward = ShaderProgram::from_source(&mut fixture.device, &ProgramSource::default());
        let mut renderer = FrameRenderer::new(&mut fixture.device, &config, set, 640, 480).expect("renderer");

        let stats = fixture.render(&mut renderer);

        assert_eq!(stats.passes, vec![PassKind::Composite]);
        assert!(stats.device_errors > 0);
    }
}
