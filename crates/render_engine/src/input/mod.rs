//! Input handling for the viewer
//!
//! Window events are folded into a [`ViewerInput`] as they arrive and turned
//! into camera operations once per frame. Nothing here knows about the
//! windowing library; the application maps its own key codes to [`KeyCode`].

use crate::render::primitives::{Camera, CameraMovement};

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Move forward
    W,
    /// Strafe left
    A,
    /// Move backward
    S,
    /// Strafe right
    D,
    /// Show the point light sphere while held
    L,
    /// Close the viewer
    Escape,
}

impl KeyCode {
    /// Camera movement bound to this key
    pub fn movement(self) -> Option<CameraMovement> {
        match self {
            Self::W => Some(CameraMovement::Forward),
            Self::S => Some(CameraMovement::Backward),
            Self::A => Some(CameraMovement::Left),
            Self::D => Some(CameraMovement::Right),
            Self::L | Self::Escape => None,
        }
    }
}

/// Turns absolute cursor positions into per-event offsets
///
/// The first sample only records the position and yields no offset, so the
/// view does not jump when the cursor enters the window. Y is reversed
/// because window coordinates grow downwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    last: Option<(f64, f64)>,
}

impl CursorTracker {
    /// Tracker that has not seen a sample yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset `(dx, dy)` since the previous sample
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let offset = match self.last {
            Some((last_x, last_y)) => ((x - last_x) as f32, (last_y - y) as f32),
            None => (0.0, 0.0),
        };
        self.last = Some((x, y));
        offset
    }

    /// Forget the last position; the next sample yields no offset
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Input state for one viewer window
#[derive(Debug, Clone, Default)]
pub struct ViewerInput {
    movement: [bool; 4],
    light_held: bool,
    close_requested: bool,
    cursor: CursorTracker,
    look: (f32, f32),
    scroll: f32,
}

fn movement_slot(movement: CameraMovement) -> usize {
    match movement {
        CameraMovement::Forward => 0,
        CameraMovement::Backward => 1,
        CameraMovement::Left => 2,
        CameraMovement::Right => 3,
    }
}

const MOVEMENTS: [CameraMovement; 4] = [
    CameraMovement::Forward,
    CameraMovement::Backward,
    CameraMovement::Left,
    CameraMovement::Right,
];

impl ViewerInput {
    /// Nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if let Some(movement) = key.movement() {
            self.movement[movement_slot(movement)] = pressed;
            return;
        }
        match key {
            KeyCode::L => self.light_held = pressed,
            KeyCode::Escape if pressed => {
                log::info!("Close requested");
                self.close_requested = true;
            }
            _ => {}
        }
    }

    /// Record an absolute cursor position
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.cursor.offset(x, y);
        self.look.0 += dx;
        self.look.1 += dy;
    }

    /// Record a vertical scroll
    pub fn handle_scroll(&mut self, y_offset: f64) {
        self.scroll += y_offset as f32;
    }

    /// Whether `movement` is currently held
    pub fn is_moving(&self, movement: CameraMovement) -> bool {
        self.movement[movement_slot(movement)]
    }

    /// Whether the light key is held
    pub fn light_held(&self) -> bool {
        self.light_held
    }

    /// Whether Escape was pressed
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Apply this frame's input to `camera`
    ///
    /// Held movement keys move the camera for `delta_time` seconds; cursor
    /// and scroll deltas gathered since the last call are consumed. Returns
    /// whether the light sphere should be visible this frame.
    pub fn apply(&mut self, camera: &mut Camera, delta_time: f32) -> bool {
        for movement in MOVEMENTS {
            if self.is_moving(movement) {
                camera.process_movement(movement, delta_time);
            }
        }

        let (dx, dy) = std::mem::take(&mut self.look);
        if dx != 0.0 || dy != 0.0 {
            camera.process_look(dx, dy, true);
        }

        let scroll = std::mem::take(&mut self.scroll);
        if scroll != 0.0 {
            camera.process_scroll(scroll);
        }

        self.light_held
    }
}
