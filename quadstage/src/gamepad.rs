//! Native gamepad polling through gilrs.
//!
//! Buttons are reported with the standard-layout indices browsers use, so
//! bindings read the same on every platform.

use gilrs::{Axis, Button, Event, EventType, Gilrs};

use crate::input::{InputManager, Key};

/// Standard-layout index for a gilrs button.
pub fn standard_index(button: Button) -> Option<u32> {
    Some(match button {
        Button::South => 0,
        Button::East => 1,
        Button::West => 2,
        Button::North => 3,
        Button::LeftTrigger => 4,
        Button::RightTrigger => 5,
        Button::LeftTrigger2 => 6,
        Button::RightTrigger2 => 7,
        Button::Select => 8,
        Button::Start => 9,
        Button::LeftThumb => 10,
        Button::RightThumb => 11,
        Button::DPadUp => 12,
        Button::DPadDown => 13,
        Button::DPadLeft => 14,
        Button::DPadRight => 15,
        Button::Mode => 16,
        _ => return None,
    })
}

/// Drains gilrs events into an [`InputManager`] once per tick.
pub struct GamepadPump {
    gilrs: Option<Gilrs>,
}

impl GamepadPump {
    /// Starts gilrs. Failure disables gamepad input but is not fatal.
    pub fn new() -> Self {
        match Gilrs::new() {
            Ok(gilrs) => Self { gilrs: Some(gilrs) },
            Err(err) => {
                log::warn!("gamepad support unavailable: {err}");
                Self { gilrs: None }
            }
        }
    }

    /// A pump that never reports anything.
    pub fn disabled() -> Self {
        Self { gilrs: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.gilrs.is_some()
    }

    /// Reports pads that were already plugged in before the first poll.
    pub fn announce_connected(&self, input: &mut InputManager) {
        if let Some(gilrs) = &self.gilrs {
            for (id, _) in gilrs.gamepads() {
                input.gamepad_connected(usize::from(id));
            }
        }
    }

    pub fn poll(&mut self, input: &mut InputManager) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };

        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            let pad = usize::from(id);
            match event {
                EventType::Connected => input.gamepad_connected(pad),
                EventType::Disconnected => input.gamepad_disconnected(pad),
                EventType::ButtonPressed(button, _) if input.active_gamepad() == Some(pad) => {
                    forward_button(input, button, true);
                }
                EventType::ButtonReleased(button, _) if input.active_gamepad() == Some(pad) => {
                    forward_button(input, button, false);
                }
                EventType::AxisChanged(axis, value, _) if input.active_gamepad() == Some(pad) => {
                    forward_axis(input, axis, value);
                }
                _ => {}
            }
        }
    }
}

fn forward_button(input: &mut InputManager, button: Button, pressed: bool) {
    if let Some(index) = standard_index(button) {
        input.set_gamepad_button(index, pressed);
    }
}

/// The left stick doubles as the arrow keys. gilrs reports stick Y as
/// positive upwards.
fn forward_axis(input: &mut InputManager, axis: Axis, value: f32) {
    match axis {
        Axis::LeftStickX => input.set_axis(Key::ArrowLeft, Key::ArrowRight, value),
        Axis::LeftStickY => input.set_axis(Key::ArrowDown, Key::ArrowUp, value),
        _ => {}
    }
}

impl Default for GamepadPump {
    fn default() -> Self {
        Self::new()
    }
}
