//! Sponza scene viewer
//!
//! Opens an OpenGL 3.3 window, loads the configured scene, then flies a
//! camera through it with W/A/S/D and the mouse. Hold L to show the point light, scroll to zoom,
//! Escape to quit.
//!
//! Usage: `sponza_viewer [config.toml|config.ron]`

mod window;

use render_engine::foundation::logging;
use render_engine::prelude::*;
use window::{ViewerEvent, Window};

/// Frames between two statistics log lines
const STATS_INTERVAL: u64 = 300;

/// Everything the frame loop owns
pub struct SponzaApp {
    window: Window,
    device: GlDevice,
    renderer: FrameRenderer,
    camera: Camera,
    scene: Model,
    directional: DirectionalLight,
    point: PointLight,
    input: ViewerInput,
    timer: Timer,
}

impl SponzaApp {
    pub fn new(config: &ApplicationConfig) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Creating window...");
        let mut window = Window::new(&config.window.title, config.window.width, config.window.height)?;
        let (width, height) = window.framebuffer_size();

        let mut device = GlDevice::new(window.load_gl());
        log::info!("Using {} device", device.name());

        let shaders = ShaderSet::load(&mut device, &config.assets.shaders_dir);
        let fallback = upload_fallback(&mut device, &config.assets.fallback_texture_path());

        let mut scene = Model::load(&mut device, &config.assets.scene_path(), fallback);
        if scene.is_empty() {
            log::warn!("Scene is empty; rendering lights only");
        }
        scene.set_world_transform(Mat4::identity());

        let point = PointLight::load(
            &mut device,
            PointLight::DEFAULT_POSITION,
            PointLight::DEFAULT_INTENSITY,
            &config.assets.light_sphere_path(),
            fallback,
        );

        let renderer = FrameRenderer::new(&mut device, &config.renderer, shaders, width.max(1), height.max(1))?;

        Ok(Self {
            window,
            device,
            renderer,
            camera: Camera::from_config(&config.camera),
            scene,
            directional: DirectionalLight::default(),
            point,
            input: ViewerInput::new(),
            timer: Timer::new(),
        })
    }

    pub fn run(&mut self) -> Result<(), RenderError> {
        log::info!("Entering frame loop");

        while !self.window.should_close() {
            self.timer.update();

            for event in self.window.poll_events() {
                self.handle_event(event)?;
            }
            if self.input.close_requested() {
                self.window.set_should_close(true);
            }

            let light_visible = self.input.apply(&mut self.camera, self.timer.delta_time());
            self.point.set_visible(light_visible);

            let inputs = FrameInputs {
                camera: &self.camera,
                scene: &self.scene,
                directional: &self.directional,
                point: &self.point,
            };
            let stats = self.renderer.render_frame(&mut self.device, &inputs)?;
            self.window.swap_buffers();

            if self.timer.frame_count() % STATS_INTERVAL == 0 {
                log::info!(
                    "{:.1} fps | passes {:?} | {} draws, {} skipped, {} device errors",
                    self.timer.average_fps(),
                    stats.passes,
                    stats.draw_calls,
                    stats.skipped_primitives,
                    stats.device_errors
                );
            }
        }

        log::info!("Frame loop finished after {} frames", self.timer.frame_count());
        Ok(())
    }

    fn handle_event(&mut self, event: ViewerEvent) -> Result<(), RenderError> {
        match event {
            ViewerEvent::Key { key, pressed } => self.input.handle_key_input(key, pressed),
            ViewerEvent::CursorMoved { x, y } => self.input.handle_mouse_move(x, y),
            ViewerEvent::Scrolled { y } => self.input.handle_scroll(y),
            ViewerEvent::FramebufferResized { width, height } => {
                self.renderer.resize(&mut self.device, width, height)?;
            }
            ViewerEvent::CloseRequested => self.window.set_should_close(true),
        }
        Ok(())
    }
}

fn load_config() -> ApplicationConfig {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No configuration file given, using defaults");
        return ApplicationConfig::default();
    };

    match ApplicationConfig::load_from_file(&path) {
        Ok(config) => {
            log::info!("Loaded configuration from {}", path);
            config
        }
        Err(e) => {
            log::error!("Failed to load configuration {}: {}; using defaults", path, e);
            ApplicationConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level("info");
    log::info!("Starting Sponza viewer");

    let config = load_config();
    config.validate()?;

    let mut app = SponzaApp::new(&config)?;
    app.run()?;

    log::info!("Sponza viewer finished successfully");
    Ok(())
}
