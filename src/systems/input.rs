//! Input systems.
//!
//! - [`update_input_state`] reads hardware input from Raylib each frame and
//!   writes the results into [`crate::resources::input::InputState`].
//! - F1 triggers a [`SwitchDebugEvent`](crate::events::switchdebug::SwitchDebugEvent).
use bevy_ecs::prelude::*;
use raylib::prelude::MouseButton;

use crate::events::switchdebug::SwitchDebugEvent;
use crate::resources::input::InputState;

/// Poll Raylib for keyboard and mouse input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    mut rl: NonSendMut<raylib::RaylibHandle>,
    mut commands: Commands,
) {
    for key in input.keys_mut() {
        key.active = rl.is_key_down(key.key_binding);
        key.just_pressed = rl.is_key_pressed(key.key_binding);
        key.just_released = rl.is_key_released(key.key_binding);
    }

    let pointer = &mut input.pointer;
    pointer.position = rl.get_mouse_position();
    pointer.left_pressed = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
    pointer.left_down = rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT);
    pointer.wheel = rl.get_mouse_wheel_move();
    pointer.typed.clear();
    while let Some(c) = rl.get_char_pressed() {
        pointer.typed.push(c);
    }

    if input.mode_debug.just_pressed {
        commands.trigger(SwitchDebugEvent {});
    }
}
