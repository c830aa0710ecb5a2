//! # Camera Implementation
//!
//! This module contains the first-person camera:
//! - `Camera`: eye position and yaw/pitch orientation, source of the look ray
//! - `CameraController`: collects movement intent and mouse look, and owns the
//!   damped horizontal velocity
//!
//! Yaw 0 looks down -Z. Movement stays on the horizontal plane at a fixed eye height.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use web_time::Duration;

use crate::engine_state::{interaction::raycast::Ray, PlayerAction};

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial eye position. Can be any type that converts to `Point3<f32>`.
    /// * `yaw` - Initial yaw. Can be any type that converts to `Rad<f32>`.
    /// * `pitch` - Initial pitch. Can be any type that converts to `Rad<f32>`.
    ///
    /// # Returns
    /// A new `Camera` instance with the specified position and orientation.
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector representing the camera's look direction
    pub fn get_view_vec(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(-yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos).normalize()
    }

    /// Horizontal forward direction, ignoring pitch.
    pub fn forward_xz(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(-yaw_sin, 0.0, -yaw_cos)
    }

    /// Horizontal right direction.
    pub fn right_xz(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos, 0.0, -yaw_sin)
    }

    /// The screen-center ray from the eye along the view direction.
    pub fn look_ray(&self) -> Ray {
        Ray::new(self.position, self.get_view_vec())
    }

    /// Applies the controller's look and movement for one frame, then resets its
    /// per-frame intent.
    ///
    /// # Arguments
    /// * `controller` - The camera controller containing input state
    /// * `dt` - Time elapsed since the last update
    pub fn get_controller_updates_and_reset_controller(
        &mut self,
        controller: &mut CameraController,
        dt: Duration,
    ) {
        let dt = dt.as_secs_f32();

        // Rotate
        self.yaw -= Rad(controller.rotate_horizontal * controller.sensitivity);
        self.pitch -= Rad(controller.rotate_vertical * controller.sensitivity);
        self.pitch = Rad(self.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));

        // Damp, then accelerate along the normalized intent
        controller.velocity -= controller.velocity * (controller.friction * dt).min(1.0);
        let intent = Vector2::new(
            controller.amount_right - controller.amount_left,
            controller.amount_forward - controller.amount_backward,
        );
        if intent.magnitude2() > 0.0 {
            controller.velocity += intent.normalize() * controller.speed * dt;
        }

        self.position += self.right_xz() * controller.velocity.x * dt;
        self.position += self.forward_xz() * controller.velocity.y * dt;

        controller.rotate_horizontal = 0.0;
        controller.rotate_vertical = 0.0;
        controller.amount_left = 0.0;
        controller.amount_right = 0.0;
        controller.amount_forward = 0.0;
        controller.amount_backward = 0.0;
    }
}

/// Handles camera movement and rotation based on user input.
///
/// Velocity is kept in the camera's local horizontal frame: `x` is rightward and `y`
/// is forward.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,

    // Accumulated mouse delta this frame
    rotate_horizontal: f32,
    rotate_vertical: f32,

    velocity: Vector2<f32>,

    speed: f32,
    friction: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller.
    ///
    /// # Arguments
    /// * `speed` - Acceleration in units per second squared
    /// * `friction` - Velocity damping per second
    /// * `sensitivity` - Radians of rotation per mouse delta unit
    pub fn new(speed: f32, friction: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            velocity: Vector2::new(0.0, 0.0),
            speed,
            friction,
            sensitivity,
        }
    }

    /// Processes player actions and updates controller state accordingly.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        let amount = |active: bool| if active { 1.0 } else { 0.0 };
        self.amount_forward = amount(actions.move_forward);
        self.amount_backward = amount(actions.move_backward);
        self.amount_left = amount(actions.move_left);
        self.amount_right = amount(actions.move_right);
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            self.rotate_horizontal += delta_x as f32;
            self.rotate_vertical += delta_y as f32;
        }
    }

    /// Current local velocity, rightward then forward.
    pub fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    /// Drops all momentum.
    pub fn stop(&mut self) {
        self.velocity = Vector2::new(0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Point3::new(0.0, 2.0, 0.0), Rad(0.0), Rad(0.0))
    }

    #[test]
    fn default_view_looks_down_negative_z() {
        let view = camera().get_view_vec();
        assert!((view - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);
        assert_eq!(camera().look_ray().origin, Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn moving_forward_keeps_eye_height() {
        let mut camera = camera();
        let mut controller = CameraController::new(200.0, 5.0, 0.002);
        let actions = PlayerAction {
            move_forward: true,
            ..PlayerAction::default()
        };
        for _ in 0..10 {
            controller.intake_actions(&actions);
            camera.get_controller_updates_and_reset_controller(
                &mut controller,
                Duration::from_millis(16),
            );
        }
        assert!(camera.position.z < 0.0);
        assert_eq!(camera.position.y, 2.0);
        assert!(camera.position.x.abs() < 1e-4);
    }

    #[test]
    fn friction_slows_down_without_intent() {
        let mut camera = camera();
        let mut controller = CameraController::new(200.0, 5.0, 0.002);
        controller.intake_actions(&PlayerAction {
            move_right: true,
            ..PlayerAction::default()
        });
        camera.get_controller_updates_and_reset_controller(&mut controller, Duration::from_millis(16));
        let fast = controller.velocity().x;

        controller.intake_actions(&PlayerAction::default());
        camera.get_controller_updates_and_reset_controller(&mut controller, Duration::from_millis(16));
        assert!(controller.velocity().x < fast);
        assert!(controller.velocity().x > 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        let mut controller = CameraController::new(200.0, 5.0, 0.002);
        controller.intake_actions(&PlayerAction {
            rotate_view: Some((0.0, -10_000.0)),
            ..PlayerAction::default()
        });
        camera.get_controller_updates_and_reset_controller(&mut controller, Duration::from_millis(16));
        assert!(camera.pitch.0 <= SAFE_FRAC_PI_2);
        assert!(camera.get_view_vec().y > 0.99);
    }
}
