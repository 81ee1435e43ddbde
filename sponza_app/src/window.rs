//! GLFW window, GL context and event translation
//!
//! The window owns an OpenGL 3.3 core context, captures the cursor and
//! forwards key, cursor, scroll and resize events as [`ViewerEvent`]s. Key
//! codes are mapped onto the renderer's [`KeyCode`] here so the engine never
//! sees GLFW types.

use glfw::Context;
use render_engine::input::KeyCode;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Window creation failed")]
    CreationFailed,
}

pub type WindowResult<T> = Result<T, WindowError>;

/// Event the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    Key { key: KeyCode, pressed: bool },
    CursorMoved { x: f64, y: f64 },
    Scrolled { y: f64 },
    FramebufferResized { width: u32, height: u32 },
    CloseRequested,
}

/// GLFW window with a current GL context and cursor capture
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        // Same depth layout as the G-buffer so scene depth can be blitted across
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(24)));
        glfw.window_hint(glfw::WindowHint::StencilBits(Some(8)));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_cursor_mode(glfw::CursorMode::Disabled);

        window.make_current();
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

        Ok(Self { glfw, window, events })
    }

    /// Load GL entry points for the context owned by this window
    #[allow(unsafe_code)]
    pub fn load_gl(&mut self) -> glow::Context {
        self.window.make_current();
        let window = &mut self.window;
        // The context was created with this window and is current on this thread
        unsafe { glow::Context::from_loader_function(|symbol| window.get_proc_address(symbol) as *const _) }
    }

    /// Present the frame just rendered
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Poll GLFW and translate everything that arrived since the last call
    pub fn poll_events(&mut self) -> Vec<ViewerEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| translate(event))
            .collect()
    }
}

fn map_key(key: glfw::Key) -> Option<KeyCode> {
    match key {
        glfw::Key::W => Some(KeyCode::W),
        glfw::Key::A => Some(KeyCode::A),
        glfw::Key::S => Some(KeyCode::S),
        glfw::Key::D => Some(KeyCode::D),
        glfw::Key::L => Some(KeyCode::L),
        glfw::Key::Escape => Some(KeyCode::Escape),
        _ => None,
    }
}

fn translate(event: glfw::WindowEvent) -> Option<ViewerEvent> {
    match event {
        glfw::WindowEvent::Key(key, _, action, _) => {
            let pressed = match action {
                glfw::Action::Press | glfw::Action::Repeat => true,
                glfw::Action::Release => false,
            };
            map_key(key).map(|key| ViewerEvent::Key { key, pressed })
        }
        glfw::WindowEvent::CursorPos(x, y) => Some(ViewerEvent::CursorMoved { x, y }),
        glfw::WindowEvent::Scroll(_, y) => Some(ViewerEvent::Scrolled { y }),
        glfw::WindowEvent::FramebufferSize(width, height) => Some(ViewerEvent::FramebufferResized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
        glfw::WindowEvent::Close => Some(ViewerEvent::CloseRequested),
        _ => None,
    }
}
