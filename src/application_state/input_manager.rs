//! # Input Manager
//!
//! Collects raw winit keyboard, mouse button and mouse motion events between frames and
//! turns them into a [`ProcessedInputState`] once per frame.

use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 18] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
    KeyCode::ArrowLeft,
    KeyCode::ArrowRight,
    KeyCode::Escape,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const MOUSE_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

/// Manages the state of all input devices and processes input events.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
    /// Keys pressed since the last poll, even if already released again
    pub keyboard_presses: HashSet<KeyCode>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|button| (*button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            keyboard_presses: HashSet::new(),
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_button_presses: HashSet::new(),
                mouse_delta: None,
            },
        }
    }

    /// Copies the current down flags into the previous ones.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.intake_key(*key, *state),
            WindowEvent::MouseInput { button, state, .. } => {
                self.intake_mouse_button(*button, *state)
            }
            _ => {}
        }
    }

    /// Records a key transition, latching presses until the next poll.
    ///
    /// # Arguments
    /// * `key` - The physical key
    /// * `state` - Whether it went down or up
    pub fn intake_key(&mut self, key: KeyCode, state: ElementState) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = state == ElementState::Pressed;
            if state == ElementState::Pressed {
                self.keyboard_presses.insert(key);
            }
        }
    }

    /// Records a mouse button transition, latching presses until the next poll.
    ///
    /// # Arguments
    /// * `button` - The mouse button
    /// * `state` - Whether it went down or up
    pub fn intake_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = state == ElementState::Pressed;
            if state == ElementState::Pressed {
                self.mouse_inputs.mouse_button_presses.insert(button);
            }
        }
    }

    /// Accumulates raw mouse motion until the next frame.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of one motion event
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Creates a processed input state from the current raw flags.
    ///
    /// A press latched since the last poll reads as `Pressed` even when the button
    /// went back up before the frame ran.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                let input_state = if self.keyboard_presses.contains(key) {
                    RawInputState::Pressed
                } else {
                    RawInputState::from_raw_states(old_state, new_state)
                };
                (*key, input_state)
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                let input_state = if self.mouse_inputs.mouse_button_presses.contains(button) {
                    RawInputState::Pressed
                } else {
                    RawInputState::from_raw_states(old_state, new_state)
                };
                (*button, input_state)
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns the processed input state and resets internal state for the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Advances the edge tracking and drops accumulated motion.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.keyboard_presses.clear();
        self.mouse_inputs.mouse_button_presses.clear();
        self.mouse_inputs.mouse_delta = None;
    }

    /// Marks every key and button released, used when the window loses focus.
    pub fn release_all(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|down| *down = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|down| *down = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(manager: &mut InputManager, button: MouseButton, down: bool) {
        manager
            .mouse_inputs
            .mouse_button_inputs_new
            .insert(button, down);
    }

    #[test]
    fn press_hold_release_sequence() {
        let mut manager = InputManager::new();
        press(&mut manager, MouseButton::Left, true);
        let first = manager.get_and_reset_processed_input();
        assert_eq!(
            first.get_mouse_button_state(MouseButton::Left),
            RawInputState::Pressed
        );

        let second = manager.get_and_reset_processed_input();
        assert_eq!(
            second.get_mouse_button_state(MouseButton::Left),
            RawInputState::Held
        );

        press(&mut manager, MouseButton::Left, false);
        let third = manager.get_and_reset_processed_input();
        assert_eq!(
            third.get_mouse_button_state(MouseButton::Left),
            RawInputState::Released
        );
    }

    #[test]
    fn click_within_one_frame_still_reads_as_pressed() {
        let mut manager = InputManager::new();
        manager.intake_mouse_button(MouseButton::Right, ElementState::Pressed);
        manager.intake_mouse_button(MouseButton::Right, ElementState::Released);
        let input = manager.get_and_reset_processed_input();
        assert!(input
            .get_mouse_button_state(MouseButton::Right)
            .is_just_pressed());

        let next = manager.get_and_reset_processed_input();
        assert_eq!(
            next.get_mouse_button_state(MouseButton::Right),
            RawInputState::NotPressed
        );
    }

    #[test]
    fn key_tap_within_one_frame_still_reads_as_pressed() {
        let mut manager = InputManager::new();
        manager.intake_key(KeyCode::Digit2, ElementState::Pressed);
        manager.intake_key(KeyCode::Digit2, ElementState::Released);
        let input = manager.get_and_reset_processed_input();
        assert_eq!(input.get_key_state(KeyCode::Digit2), RawInputState::Pressed);

        // untracked keys are ignored
        manager.intake_key(KeyCode::KeyQ, ElementState::Pressed);
        assert!(manager.keyboard_presses.is_empty());
    }

    #[test]
    fn mouse_motion_accumulates_per_frame() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((1.0, 2.0));
        manager.intake_mouse_motion((3.0, -1.0));
        let input = manager.get_and_reset_processed_input();
        assert_eq!(input.get_mouse_delta(), Some((4.0, 1.0)));
        assert_eq!(manager.get_and_reset_processed_input().get_mouse_delta(), None);
    }

    #[test]
    fn losing_focus_releases_keys() {
        let mut manager = InputManager::new();
        manager.keyboard_inputs_new.insert(KeyCode::KeyW, true);
        manager.reset_inputs();
        manager.release_all();
        let input = manager.get_and_reset_processed_input();
        assert_eq!(input.get_key_state(KeyCode::KeyW), RawInputState::Released);
    }
}
