//! # Engine State Module
//!
//! The engine side of the game: it turns processed input into player actions, moves
//! the camera, runs one gameplay tick per frame and forwards the results to the
//! presenter.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - First-person camera and the look ray
//! * `voxels` - Grid index, block registry and world generation
//! * `interaction` - Ray queries and the breaking state machine
//! * `inventory` - Collected blocks and slot selection
//! * `animation` - Cosmetic swing and fade records
//! * `session` - The gameplay core advanced once per tick
//! * `presentation` - Presenter trait, textures and instance mirror
//!
//! ## Architecture
//!
//! Everything below `session` is plain data and logic with no window or GPU in sight,
//! so it is driven directly by the tests. `EngineState` is the thin adapter that owns
//! the camera and presenter and feeds the session from input.

use log::{debug, info, trace};
use web_time::{Duration, Instant};
use winit::{event::MouseButton, keyboard::KeyCode};

use camera_state::CameraState;
use presentation::{assets::AssetCatalog, Presenter, SceneMirror};
use session::{GameSession, HudSnapshot, TickInput};

use crate::{application_state::input_state::ProcessedInputState, config::GameConfig};

pub mod animation;
pub mod camera_state;
pub mod interaction;
pub mod inventory;
pub mod presentation;
pub mod session;
pub mod voxels;

/// Digit keys in slot order.
const SLOT_KEYS: [KeyCode; 9] = [
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

/// Flags carried between frames
#[derive(Default)]
pub struct EngineFlags {
    /// Whether the pointer is locked to the game
    pub view_locked: bool,
    /// Whether the current left-button press started while locked
    pub break_armed: bool,
}

/// The main state container for the game engine
///
/// This struct owns the camera, the gameplay session and the presenter and moves
/// data between them once per frame.
pub struct EngineState {
    /// Camera state managing position, orientation and movement
    pub camera_state: CameraState,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    /// The gameplay core
    pub session: GameSession,
    /// Mirror of the world for drawing
    pub presenter: SceneMirror,
    flags: EngineFlags,
}

impl EngineState {
    /// Creates a new engine state and generates the world
    ///
    /// # Arguments
    ///
    /// * `config` - Game tunables
    ///
    /// # Returns
    ///
    /// A fully initialized `EngineState` instance
    pub fn new(config: &GameConfig) -> Self {
        let assets = AssetCatalog::load(&config.asset_dir);
        Self::with_assets(config, assets)
    }

    /// Creates a new engine state drawing with the given textures
    pub fn with_assets(config: &GameConfig, assets: AssetCatalog) -> Self {
        let mut session = GameSession::new(config);
        let mut presenter = SceneMirror::new(assets);
        presenter.apply_events(session.drain_events());

        Self {
            camera_state: CameraState::new(config),
            player_actions: PlayerAction::default(),
            session,
            presenter,
            flags: EngineFlags::default(),
        }
    }

    /// Whether the pointer is locked to the game
    pub fn is_view_locked(&self) -> bool {
        self.flags.view_locked
    }

    /// Records the outcome of a pointer lock change
    ///
    /// # Arguments
    ///
    /// * `locked` - Whether the pointer is now locked
    pub fn set_view_locked(&mut self, locked: bool) {
        if self.flags.view_locked != locked {
            info!("View {}", if locked { "locked" } else { "unlocked" });
        }
        self.flags.view_locked = locked;
        if !locked {
            self.flags.break_armed = false;
            self.camera_state.halt();
        }
    }

    /// Instance buffer contents for an external renderer
    ///
    /// Nothing in this crate draws them; the window only shows the HUD in its title.
    /// Returns `None` when no instance changed since the last call.
    pub fn prepare_instance_upload(&mut self) -> Option<Vec<u8>> {
        let bytes = self.presenter.take_instance_upload()?;
        trace!(
            "Instance upload: {} bytes, hand at {:.2} rad",
            bytes.len(),
            self.presenter.hand_rotation()
        );
        Some(bytes)
    }

    /// Window title showing the HUD: inventory, selected slot and breaking progress
    pub fn hud_title(&self) -> String {
        hud_title(&self.session.hud())
    }

    /// Moves the camera and runs one gameplay tick
    ///
    /// # Arguments
    ///
    /// * `wait_duration` - The time elapsed since the last frame
    pub fn process_input(&mut self, wait_duration: Duration) {
        self.process_input_at(wait_duration, Instant::now());
    }

    /// Same as [`EngineState::process_input`] with an explicit frame time
    pub fn process_input_at(&mut self, wait_duration: Duration, now: Instant) {
        if let Some(slot) = self.player_actions.select_slot {
            debug!("Selected slot {}", slot + 1);
            self.session.select_slot(slot);
        }

        if self.flags.view_locked {
            self.camera_state.intake_actions(&self.player_actions);
            self.camera_state.update(wait_duration);
        }

        let input = TickInput {
            break_held: self.player_actions.break_held,
            place_fired: self.player_actions.place_fired,
            view_locked: self.flags.view_locked,
            look_ray: self.camera_state.look_ray(),
            now,
        };
        let report = self.session.tick(&input);

        self.presenter.apply_events(self.session.drain_events());
        self.presenter
            .present_frame(&report.animation, &self.session.hud());

        // one-shot actions are spent
        self.player_actions.place_fired = false;
        self.player_actions.select_slot = None;
    }

    /// Sets the input commands for the engine state.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        let player_action = self.translate_processed_input(input);
        self.player_actions = player_action;
    }

    /// Translates the processed input state into player actions.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    ///
    /// # Returns
    /// A PlayerAction struct with the appropriate actions set
    fn translate_processed_input(&mut self, input: ProcessedInputState) -> PlayerAction {
        let mut player_action = PlayerAction::default();

        let active = |a: KeyCode, b: KeyCode| {
            input.get_key_state(a).is_active() || input.get_key_state(b).is_active()
        };
        player_action.move_forward = active(KeyCode::KeyW, KeyCode::ArrowUp);
        player_action.move_backward = active(KeyCode::KeyS, KeyCode::ArrowDown);
        player_action.move_left = active(KeyCode::KeyA, KeyCode::ArrowLeft);
        player_action.move_right = active(KeyCode::KeyD, KeyCode::ArrowRight);

        if self.flags.view_locked {
            player_action.rotate_view = input.get_mouse_delta();
        }

        player_action.select_slot = SLOT_KEYS
            .iter()
            .position(|key| input.get_key_state(*key).is_just_pressed());

        let left = input.get_mouse_button_state(MouseButton::Left);
        let right = input.get_mouse_button_state(MouseButton::Right);

        if !self.flags.view_locked {
            // a click while unlocked only asks for the lock
            player_action.request_lock = left.is_just_pressed() || right.is_just_pressed();
        } else {
            if left.is_just_pressed() {
                self.flags.break_armed = true;
            }
            player_action.place_fired = right.is_just_pressed();
            player_action.release_lock = input.get_key_state(KeyCode::Escape).is_just_pressed();
        }
        if !left.is_active() {
            self.flags.break_armed = false;
        }
        player_action.break_held = self.flags.break_armed;

        player_action
    }
}

/// Formats a HUD snapshot as a single line.
fn hud_title(hud: &HudSnapshot) -> String {
    let mut title = String::from("Voxel Miner |");
    if hud.inventory.is_empty() {
        title.push_str(" empty");
    }
    for (slot, item) in hud.inventory.iter().enumerate() {
        if slot == hud.selected_slot {
            title.push_str(&format!(" [{}: {} x{}]", slot + 1, item.kind, item.count));
        } else {
            title.push_str(&format!(" {}: {} x{}", slot + 1, item.kind, item.count));
        }
    }
    if let Some(selection) = &hud.selection {
        title.push_str(&format!(
            " | {} {:.0}%",
            selection.kind,
            selection.progress_ratio * 100.0
        ));
    }
    title
}

/// Represents player actions derived from input
///
/// This struct contains flags for the actions a frame of input can trigger:
/// movement, view rotation, breaking, placing, slot selection and pointer lock.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct PlayerAction {
    /// Movement actions - true if key is pressed or held
    move_forward: bool,
    move_backward: bool,
    move_left: bool,
    move_right: bool,

    /// View rotation - Some if the mouse moved while locked
    rotate_view: Option<(f64, f64)>,

    /// Break action held, only when the press started while locked
    break_held: bool,

    /// Actions that should only trigger on press, not hold
    place_fired: bool,
    select_slot: Option<usize>,
    /// Pointer lock requests for the window
    pub request_lock: bool,
    /// Pointer release request for the window
    pub release_lock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        inventory::InventoryItem,
        voxels::{
            block::block_type::BlockKind,
            grid::{CellCoord, Layer},
        },
    };
    use std::collections::HashMap;

    use crate::application_state::input_state::RawInputState;

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(3),
            initial_block_count: 0,
            ..GameConfig::default()
        }
    }

    fn engine() -> EngineState {
        EngineState::with_assets(&config(), AssetCatalog::fallback_only())
    }

    fn input(
        keys: &[(KeyCode, RawInputState)],
        buttons: &[(MouseButton, RawInputState)],
    ) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect::<HashMap<_, _>>(),
            mouse_button_states: buttons.iter().copied().collect::<HashMap<_, _>>(),
            mouse_delta: None,
        }
    }

    #[test]
    fn click_while_unlocked_only_requests_lock() {
        let mut engine = engine();
        engine.set_input_commands(input(&[], &[(MouseButton::Left, RawInputState::Pressed)]));
        assert!(engine.player_actions.request_lock);
        assert!(!engine.player_actions.break_held);

        engine.set_view_locked(true);
        engine.set_input_commands(input(&[], &[(MouseButton::Left, RawInputState::Held)]));
        assert!(!engine.player_actions.break_held);

        engine.set_input_commands(input(&[], &[(MouseButton::Left, RawInputState::Released)]));
        engine.set_input_commands(input(&[], &[(MouseButton::Left, RawInputState::Pressed)]));
        assert!(engine.player_actions.break_held);
    }

    #[test]
    fn escape_requests_release() {
        let mut engine = engine();
        engine.set_view_locked(true);
        engine.set_input_commands(input(&[(KeyCode::Escape, RawInputState::Pressed)], &[]));
        assert!(engine.player_actions.release_lock);
    }

    #[test]
    fn digit_keys_select_slots() {
        let mut engine = engine();
        engine.set_input_commands(input(&[(KeyCode::Digit3, RawInputState::Pressed)], &[]));
        engine.process_input(Duration::from_millis(16));
        assert_eq!(engine.session.inventory().selected_slot(), 2);
    }

    #[test]
    fn instance_upload_follows_world_changes() {
        let mut engine = engine();
        engine.prepare_instance_upload();
        assert!(engine.prepare_instance_upload().is_none());

        engine
            .session
            .world_mut()
            .insert_block(CellCoord::new(5, Layer::GROUND, 5), BlockKind::Stone)
            .unwrap();
        engine.process_input(Duration::from_millis(16));
        let bytes = engine.prepare_instance_upload().unwrap();
        assert_eq!(bytes.len(), 32);

        engine.process_input(Duration::from_millis(16));
        assert!(engine.prepare_instance_upload().is_none());
    }

    #[test]
    fn hud_title_marks_selected_slot() {
        let hud = HudSnapshot {
            inventory: vec![
                InventoryItem {
                    kind: BlockKind::Wood,
                    count: 2,
                },
                InventoryItem {
                    kind: BlockKind::Iron,
                    count: 1,
                },
            ],
            selected_slot: 1,
            selection: None,
        };
        assert_eq!(hud_title(&hud), "Voxel Miner | 1: wood x2 [2: iron x1]");
    }
}
