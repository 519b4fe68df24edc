use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Logical keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Z,
    X,
    Shift,
    Escape,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::Z,
        Key::X,
        Key::Shift,
        Key::Escape,
    ];

    /// Maps a physical keyboard key; `None` for keys the game ignores.
    pub fn from_keycode(code: KeyCode) -> Option<Self> {
        Some(match code {
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::KeyZ => Key::Z,
            KeyCode::KeyX => Key::X,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::Escape => Key::Escape,
            _ => return None,
        })
    }
}

/// Stick deflection that counts as holding a direction key.
pub const AXIS_THRESHOLD: f32 = 0.5;

/// Per-key held-frame counters from the keyboard and one gamepad.
///
/// A counter is 0 while released, 1 on the first [`update`](Self::update)
/// after the press, and grows by one every update while held.
#[derive(Debug, Default)]
pub struct InputManager {
    keyboard: HashMap<Key, u32>,
    gamepad: HashMap<Key, u32>,
    /// Directions the left stick is pushed past [`AXIS_THRESHOLD`].
    axes: HashMap<Key, u32>,
    button_to_key: HashMap<u32, Key>,
    key_to_button: HashMap<Key, u32>,
    pad_buttons: HashSet<u32>,
    active_pad: Option<usize>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager with the given gamepad button bindings.
    pub fn with_bindings(bindings: &HashMap<Key, u32>) -> Self {
        let mut manager = Self::new();
        for (&key, &button) in bindings {
            manager.bind_gamepad(key, button);
        }
        manager
    }

    /// Handles a keyboard event from winit. OS key-repeat is ignored.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            let Some(key) = Key::from_keycode(code) else {
                return;
            };
            match event.state {
                ElementState::Pressed => self.key_pressed(key),
                ElementState::Released => self.key_released(key),
            }
        }
    }

    pub fn key_pressed(&mut self, key: Key) {
        self.keyboard.entry(key).or_insert(0);
    }

    pub fn key_released(&mut self, key: Key) {
        self.keyboard.remove(&key);
    }

    /// Drops every held keyboard key, e.g. when the window loses focus.
    pub fn clear_keyboard(&mut self) {
        self.keyboard.clear();
    }

    /// Records the raw state of a gamepad button on the active pad.
    pub fn set_gamepad_button(&mut self, button: u32, pressed: bool) {
        if pressed {
            self.pad_buttons.insert(button);
        } else {
            self.pad_buttons.remove(&button);
        }
    }

    /// Records one stick axis on the active pad as a pair of direction keys.
    /// `value` runs from -1 (`negative`) to 1 (`positive`).
    pub fn set_axis(&mut self, negative: Key, positive: Key, value: f32) {
        if self.active_pad.is_none() {
            return;
        }
        self.set_axis_key(negative, value <= -AXIS_THRESHOLD);
        self.set_axis_key(positive, value >= AXIS_THRESHOLD);
    }

    fn set_axis_key(&mut self, key: Key, pushed: bool) {
        if pushed {
            self.axes.entry(key).or_insert(0);
        } else {
            self.axes.remove(&key);
        }
    }

    /// Adopts `pad` as the active gamepad if none is active yet.
    pub fn gamepad_connected(&mut self, pad: usize) {
        if self.active_pad.is_none() {
            log::info!("gamepad {pad} connected");
            self.active_pad = Some(pad);
        }
    }

    /// Forgets all gamepad state if `pad` is the active one. Keyboard
    /// counters are untouched.
    pub fn gamepad_disconnected(&mut self, pad: usize) {
        if self.active_pad == Some(pad) {
            log::info!("gamepad {pad} disconnected");
            self.active_pad = None;
            self.pad_buttons.clear();
            self.gamepad.clear();
            self.axes.clear();
        }
    }

    pub fn active_gamepad(&self) -> Option<usize> {
        self.active_pad
    }

    /// Advances every held counter by one tick. Called once per frame before
    /// the scene update.
    pub fn update(&mut self) {
        if self.active_pad.is_some() {
            for (&button, &key) in &self.button_to_key {
                let pressed = self.pad_buttons.contains(&button);
                let held = self.gamepad.contains_key(&key);
                if pressed && !held {
                    self.gamepad.insert(key, 0);
                } else if !pressed && held {
                    self.gamepad.remove(&key);
                }
            }
        }

        for counter in self
            .keyboard
            .values_mut()
            .chain(self.gamepad.values_mut())
            .chain(self.axes.values_mut())
        {
            *counter = counter.saturating_add(1);
        }
    }

    /// Held-frame count for `key` across every source.
    pub fn get(&self, key: Key) -> u32 {
        let count = |map: &HashMap<Key, u32>| map.get(&key).copied().unwrap_or(0);
        count(&self.keyboard)
            .max(count(&self.gamepad))
            .max(count(&self.axes))
    }

    /// Held-frame count for `key` from the keyboard only.
    pub fn get_keyboard(&self, key: Key) -> u32 {
        self.keyboard.get(&key).copied().unwrap_or(0)
    }

    pub fn gamepad_binding(&self, key: Key) -> Option<u32> {
        self.key_to_button.get(&key).copied()
    }

    /// Binds gamepad `button` to `key`, evicting any binding either side
    /// already had.
    pub fn bind_gamepad(&mut self, key: Key, button: u32) {
        if let Some(&previous) = self.button_to_key.get(&button) {
            self.unbind_gamepad(previous);
        }
        if self.key_to_button.contains_key(&key) {
            self.unbind_gamepad(key);
        }
        self.gamepad.remove(&key);
        self.button_to_key.insert(button, key);
        self.key_to_button.insert(key, button);
    }

    pub fn unbind_gamepad(&mut self, key: Key) {
        if let Some(button) = self.key_to_button.remove(&key) {
            self.button_to_key.remove(&button);
            self.gamepad.remove(&key);
        }
    }

    /// Lowest-numbered button currently down on the active pad.
    pub fn pressed_gamepad_button(&self) -> Option<u32> {
        self.active_pad?;
        self.pad_buttons.iter().copied().min()
    }
}

/// True on the first held frame, then every 8 frames after a 30 frame delay.
pub fn repeat_fires(held: u32) -> bool {
    held == 1 || (held >= 30 && held % 8 == 0)
}
