//! Per-frame keyboard and mouse input resource.
//!
//! Captures the subset of input state the town cares about and exposes it to
//! systems via the [`InputState`] resource. Arrow keys move, X activates, Z
//! exits, and the letter/function keys drive control modes and diagnostics.
//! The mouse part feeds the GUI overlays.
use bevy_ecs::prelude::*;
use raylib::prelude::*;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held this frame.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL)
    }
}

impl BoolState {
    pub fn bound(key_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
        }
    }

    /// Simulate a key going down this frame.
    pub fn press(&mut self) {
        self.active = true;
        self.just_pressed = true;
        self.just_released = false;
    }

    /// Clear the edge flags, keeping the held state.
    pub fn settle(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Mouse and text input consumed by the GUI overlays.
#[derive(Debug, Clone)]
pub struct PointerState {
    pub position: Vector2,
    pub left_pressed: bool,
    pub left_down: bool,
    pub wheel: f32,
    /// Characters typed this frame, in order.
    pub typed: SmallVec<[char; 8]>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            left_pressed: false,
            left_down: false,
            wheel: 0.0,
            typed: SmallVec::new(),
        }
    }
}

/// Resource capturing the per-frame input state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    // Arrow keys
    pub move_up: BoolState,
    pub move_down: BoolState,
    pub move_left: BoolState,
    pub move_right: BoolState,
    // Actions
    pub activate: BoolState,
    pub exit: BoolState,
    pub confirm: BoolState,
    pub backspace: BoolState,
    // Control modes
    pub manual_mode: BoolState,
    pub wander_mode: BoolState,
    pub toggle_mode: BoolState,
    // Diagnostics
    pub mode_debug: BoolState,
    pub teleport: BoolState,

    pub pointer: PointerState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_up: BoolState::bound(KeyboardKey::KEY_UP),
            move_down: BoolState::bound(KeyboardKey::KEY_DOWN),
            move_left: BoolState::bound(KeyboardKey::KEY_LEFT),
            move_right: BoolState::bound(KeyboardKey::KEY_RIGHT),
            activate: BoolState::bound(KeyboardKey::KEY_X),
            exit: BoolState::bound(KeyboardKey::KEY_Z),
            confirm: BoolState::bound(KeyboardKey::KEY_ENTER),
            backspace: BoolState::bound(KeyboardKey::KEY_BACKSPACE),
            manual_mode: BoolState::bound(KeyboardKey::KEY_M),
            wander_mode: BoolState::bound(KeyboardKey::KEY_W),
            toggle_mode: BoolState::bound(KeyboardKey::KEY_T),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F1),
            teleport: BoolState::bound(KeyboardKey::KEY_F3),
            pointer: PointerState::default(),
        }
    }
}

impl InputState {
    /// Every key binding, for the poll loop.
    pub fn keys_mut(&mut self) -> [&mut BoolState; 13] {
        [
            &mut self.move_up,
            &mut self.move_down,
            &mut self.move_left,
            &mut self.move_right,
            &mut self.activate,
            &mut self.exit,
            &mut self.confirm,
            &mut self.backspace,
            &mut self.manual_mode,
            &mut self.wander_mode,
            &mut self.toggle_mode,
            &mut self.mode_debug,
            &mut self.teleport,
        ]
    }

    /// Drop this frame's edges and pointer events. Tests call it between
    /// simulated frames.
    pub fn settle(&mut self) {
        for key in self.keys_mut() {
            key.settle();
        }
        self.pointer.left_pressed = false;
        self.pointer.wheel = 0.0;
        self.pointer.typed.clear();
    }

    /// Net held direction on each axis, in {-1, 0, 1}; opposite keys cancel.
    pub fn direction(&self) -> (f32, f32) {
        let axis = |neg: &BoolState, pos: &BoolState| {
            (pos.active as i32 - neg.active as i32) as f32
        };
        (
            axis(&self.move_left, &self.move_right),
            axis(&self.move_up, &self.move_down),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_adds_axes() {
        let mut input = InputState::default();
        input.move_right.active = true;
        input.move_up.active = true;
        assert_eq!(input.direction(), (1.0, -1.0));
        input.move_left.active = true;
        assert_eq!(input.direction(), (0.0, -1.0));
    }

    #[test]
    fn test_settle_clears_edges_only() {
        let mut input = InputState::default();
        input.activate.press();
        input.pointer.typed.push('a');
        input.settle();
        assert!(input.activate.active);
        assert!(!input.activate.just_pressed);
        assert!(input.pointer.typed.is_empty());
    }
}
