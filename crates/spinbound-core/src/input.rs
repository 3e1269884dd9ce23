use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical keys the harness reports to the core. The core never reads raw
/// platform events; the harness translates whatever backend it polls into
/// these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    W,
    S,
    E,
    Q,
    R,
    Space,
    Escape,
}

/// Primary-button mouse state in game coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub held: bool,
    pub pressed: bool,
    pub released: bool,
}

/// Polled input snapshot for one frame: held keys plus the press/release
/// edges observed since the previous frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
    pub mouse: MouseState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Harness hook: a key went down this frame.
    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    /// Harness hook: a key went up this frame.
    pub fn release(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    /// Harness hook: clear per-frame edges before polling the next frame.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.mouse.pressed = false;
        self.mouse.released = false;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Swallow a press edge so lower scenes don't see it again this frame.
    pub fn consume(&mut self, key: Key) {
        self.pressed.remove(&key);
    }
}

/// Key bindings for the actions the simulation core cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub jump: Vec<Key>,
    pub interact: Vec<Key>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            left: vec![Key::A, Key::ArrowLeft],
            right: vec![Key::D, Key::ArrowRight],
            jump: vec![Key::W, Key::ArrowUp, Key::Space],
            interact: vec![Key::E],
        }
    }
}

impl Bindings {
    pub fn any_down(&self, input: &InputState, keys: &[Key]) -> bool {
        keys.iter().any(|&k| input.is_down(k))
    }

    pub fn any_pressed(&self, input: &InputState, keys: &[Key]) -> bool {
        keys.iter().any(|&k| input.was_pressed(k))
    }

    /// Horizontal intent: -1, 0, or +1.
    pub fn move_dir(&self, input: &InputState) -> f32 {
        let left = self.any_down(input, &self.left);
        let right = self.any_down(input, &self.right);
        (right as i8 - left as i8) as f32
    }
}
