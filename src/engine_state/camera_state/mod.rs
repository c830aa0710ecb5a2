//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Eye position and yaw/pitch orientation
//! - Player input processing for movement and mouse look
//! - The screen-center look ray used by the interaction queries
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `CameraController`: Handles player input and the damped movement velocity

use camera::CameraController;
use cgmath::Point3;

use crate::config::GameConfig;

use super::{interaction::raycast::Ray, PlayerAction};

pub mod camera;

/// Manages the camera and its controller.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Handles player input and camera movement
    pub camera_controller: camera::CameraController,
    eye_height: f32,
}

impl CameraState {
    /// Creates a camera standing at the spawn point.
    ///
    /// # Arguments
    /// * `config` - Supplies eye height, speed, friction and mouse sensitivity
    ///
    /// # Returns
    /// A new `CameraState` at `(0, eye_height, 0)` looking down -Z
    pub fn new(config: &GameConfig) -> Self {
        let camera_position = Point3::new(0.0, config.eye_height, 0.0);
        let camera = camera::Camera::new(camera_position, cgmath::Rad(0.0), cgmath::Rad(0.0));
        let camera_controller = CameraController::new(
            config.movement_speed,
            config.friction,
            config.mouse_sensitivity,
        );

        CameraState {
            camera,
            camera_controller,
            eye_height: config.eye_height,
        }
    }

    /// Processes player actions and updates the camera controller state.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// Moves and turns the camera for one frame.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last update
    pub fn update(&mut self, dt: web_time::Duration) {
        self.camera
            .get_controller_updates_and_reset_controller(&mut self.camera_controller, dt);
        self.camera.position.y = self.eye_height;
    }

    /// Drops momentum, used when the view unlocks.
    pub fn halt(&mut self) {
        self.camera_controller.stop();
    }

    /// The current look ray.
    pub fn look_ray(&self) -> Ray {
        self.camera.look_ray()
    }
}
