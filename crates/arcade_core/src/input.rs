//! Input events and state tracking.
//!
//! The platform layer translates window-system events into [`InputEvent`]s
//! and feeds them to [`InputState::push`] as they arrive. Once per frame the
//! driver drains the queue with [`InputState::take_events`] and hands the
//! batch to the active scene, so every event is consumed exactly once.
//!
//! Alongside the raw queue the state keeps two views scenes can query:
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key
//!   is physically down. Used for continuous actions like walking.
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened; cleared by `end_frame()`.

use std::collections::HashSet;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    Enter,
    F3,
    W,
    A,
    S,
    D,
    Q,
    Num1,
    Num2,
    Num3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// One discrete input occurrence. Positions are in frame (logical) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    WindowClose,
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseBtn, Vec2),
    MouseUp(MouseBtn, Vec2),
    MouseMoved(Vec2),
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,

    pub mouse_position: Vec2,
    pending: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            mouse_position: Vec2::ZERO,
            pending: Vec::new(),
        }
    }

    /// Record an event. Key auto-repeat (a `KeyDown` for a key already held)
    /// is dropped so scenes see one press per physical press.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                if !self.held.insert(key) {
                    return;
                }
                self.just_pressed.insert(key);
            }
            InputEvent::KeyUp(key) => {
                if !self.held.remove(&key) {
                    return;
                }
                self.just_released.insert(key);
            }
            InputEvent::MouseDown(btn, position) => {
                self.mouse_position = position;
                if self.mouse_held.insert(btn) {
                    self.mouse_just_pressed.insert(btn);
                }
            }
            InputEvent::MouseUp(btn, position) => {
                self.mouse_position = position;
                self.mouse_held.remove(&btn);
            }
            InputEvent::MouseMoved(position) => {
                self.mouse_position = position;
            }
            InputEvent::WindowClose => {}
        }
        self.pending.push(event);
    }

    /// Drain every event recorded since the previous call.
    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyDown(Key::A));
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyDown(Key::A));
        input.push(InputEvent::KeyUp(Key::A));
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
    }

    #[test]
    fn test_auto_repeat_is_not_queued_twice() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyDown(Key::Space));
        input.push(InputEvent::KeyDown(Key::Space));
        let events = input.take_events();
        assert_eq!(events, vec![InputEvent::KeyDown(Key::Space)]);
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyUp(Key::A));
        assert!(!input.is_just_released(Key::A));
        assert!(input.take_events().is_empty());
    }

    #[test]
    fn test_take_events_drains_queue_once() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyDown(Key::W));
        input.push(InputEvent::WindowClose);
        assert_eq!(input.take_events().len(), 2);
        assert!(input.take_events().is_empty());
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyDown(Key::A));
        input.push(InputEvent::KeyDown(Key::Space));
        input.end_frame();
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_just_pressed(Key::Space));
        assert!(input.is_held(Key::A));
        assert!(input.is_held(Key::Space));
    }

    #[test]
    fn test_mouse_events_track_position_and_buttons() {
        let mut input = InputState::new();
        input.push(InputEvent::MouseMoved(Vec2::new(10.0, 20.0)));
        assert_eq!(input.mouse_position, Vec2::new(10.0, 20.0));

        input.push(InputEvent::MouseDown(MouseBtn::Left, Vec2::new(30.0, 40.0)));
        assert!(input.is_mouse_held(MouseBtn::Left));
        assert!(input.is_mouse_just_pressed(MouseBtn::Left));
        assert_eq!(input.mouse_position, Vec2::new(30.0, 40.0));

        input.end_frame();
        assert!(!input.is_mouse_just_pressed(MouseBtn::Left));

        input.push(InputEvent::MouseUp(MouseBtn::Left, Vec2::new(30.0, 40.0)));
        assert!(!input.is_mouse_held(MouseBtn::Left));
    }

    #[test]
    fn test_multiple_keys_independent() {
        let mut input = InputState::new();
        input.push(InputEvent::KeyDown(Key::A));
        input.push(InputEvent::KeyDown(Key::D));
        input.push(InputEvent::KeyUp(Key::A));
        assert!(!input.is_held(Key::A));
        assert!(input.is_held(Key::D));
        assert!(!input.is_just_released(Key::D));
    }
}
