//! # Application State Management
//!
//! This module handles the application's window and event plumbing, including:
//! - Window creation when the event loop resumes
//! - Input handling and per-frame input processing
//! - Pointer lock: a click locks the cursor, Escape or focus loss releases it
//! - Application lifecycle events

pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use input_manager::InputManager;
use log::{error, info, warn};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{config::GameConfig, engine_state::EngineState};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the config until the window exists, then the running state.
/// It implements `ApplicationHandler` to handle window and device events.
pub struct ApplicationState {
    /// Game tunables
    pub config: GameConfig,

    /// The initialized application state, if the window has been created
    pub state: Option<InitializedApplicationState>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The core game engine state and logic
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,

    /// Title currently shown, to skip redundant updates
    pub last_title: String,
}

impl ApplicationState {
    /// Creates the application state for the given config.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl InitializedApplicationState {
    /// Grabs or releases the cursor and tells the engine the result.
    ///
    /// # Arguments
    /// * `locked` - Whether the pointer should be locked
    fn set_pointer_lock(&mut self, locked: bool) {
        if !locked {
            if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Failed to release cursor: {err}");
            }
            self.window.set_cursor_visible(true);
            self.engine_state.set_view_locked(false);
            return;
        }

        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.engine_state.set_view_locked(true);
            }
            Err(err) => {
                warn!("Failed to grab cursor: {err}");
                self.engine_state.set_view_locked(false);
            }
        }
    }
}

impl ApplicationHandler for ApplicationState {
    /// Creates the window and the engine state the first time the loop resumes.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes().with_title("Voxel Miner");
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        info!("Window created");

        let engine_state = EngineState::new(&self.config);
        let last_title = engine_state.hud_title();
        window.set_title(&last_title);

        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
            last_wait_time: web_time::Instant::now(),
            last_title,
        });
    }

    /// Handles window-related events such as focus changes, input and close.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Focused(false) => {
                state.input_manager.release_all();
                state.set_pointer_lock(false);
            }
            WindowEvent::RedrawRequested => {
                // no drawing backend consumes the upload yet
                let _ = state.engine_state.prepare_instance_upload();
            }
            WindowEvent::CloseRequested => {
                info!("Close requested");
                event_loop.exit();
            }
            _ => (),
        }
    }

    /// Handles raw mouse motion, which drives the view while the pointer is locked.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `_device_id` - ID of the device that generated the event
    /// * `event` - The device event to process
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Runs one frame: input, pointer lock changes, the gameplay tick and the title HUD.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };

        let now = web_time::Instant::now();
        let wait_dt = now - state.last_wait_time;

        let processed_input = state.input_manager.get_and_reset_processed_input();
        state.engine_state.set_input_commands(processed_input);

        if state.engine_state.player_actions.request_lock {
            state.set_pointer_lock(true);
        } else if state.engine_state.player_actions.release_lock {
            state.set_pointer_lock(false);
        }

        state.engine_state.process_input_at(wait_dt, now);
        state.last_wait_time = now;

        let title = state.engine_state.hud_title();
        if title != state.last_title {
            state.window.set_title(&title);
            state.last_title = title;
        }

        state.window.request_redraw();
    }
}
