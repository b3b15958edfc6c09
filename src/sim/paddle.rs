//! Paddle controller
//!
//! Horizontal-only rigid body driven either by key state or by pointer
//! position. Velocity is recomputed fresh every update, never accumulated.
//! Keyboard keeps priority over the pointer for a short window so hybrid
//! mouse+keyboard devices do not fight over the paddle.

use glam::Vec2;

use crate::consts::KEYBOARD_PRIORITY_MS;
use crate::input::InputState;

#[derive(Debug, Clone)]
pub struct PaddleController {
    pos: Vec2,
    width: f32,
    height: f32,
    vx: f32,
    /// Last frame time a directional key was pressed or held
    last_key_ms: f64,
}

impl PaddleController {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
            vx: 0.0,
            last_key_ms: f64::NEG_INFINITY,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn vx(&self) -> f32 {
        self.vx
    }

    /// Keyboard-driven movement. Holding a key refreshes the priority
    /// window every frame, not just on the initial press.
    pub fn update(&mut self, input: &InputState, canvas_width: f32, paddle_speed: f32, now_ms: f64) {
        self.vx = 0.0;

        if input.left_pressed {
            self.vx = -paddle_speed;
            self.last_key_ms = now_ms;
        }
        if input.right_pressed {
            self.vx = paddle_speed;
            self.last_key_ms = now_ms;
        }

        self.pos.x += self.vx;
        self.clamp_x(canvas_width);
    }

    /// Pointer-driven movement: center the paddle under the pointer
    pub fn update_from_pointer(&mut self, pointer_x: f32, canvas_width: f32) {
        self.pos.x = pointer_x - self.width / 2.0;
        self.clamp_x(canvas_width);
    }

    /// Whether a directional key was active within the priority window
    pub fn is_keyboard_active(&self, now_ms: f64) -> bool {
        now_ms - self.last_key_ms < KEYBOARD_PRIORITY_MS
    }

    pub fn reset(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vx = 0.0;
    }

    fn clamp_x(&mut self, canvas_width: f32) {
        self.pos.x = self.pos.x.clamp(0.0, canvas_width - self.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> PaddleController {
        PaddleController::new(100.0, 196.0, 80.0, 4.0)
    }

    #[test]
    fn test_key_movement_sets_velocity() {
        let mut p = paddle();
        let input = InputState {
            right_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 6.0, 1000.0);
        assert_eq!(p.vx(), 6.0);
        assert_eq!(p.pos().x, 106.0);

        let input = InputState {
            left_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 6.0, 1016.0);
        assert_eq!(p.vx(), -6.0);
        assert_eq!(p.pos().x, 100.0);
    }

    #[test]
    fn test_velocity_zeroed_without_keys() {
        let mut p = paddle();
        let input = InputState {
            right_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 6.0, 0.0);
        p.update(&InputState::default(), 320.0, 6.0, 16.0);
        assert_eq!(p.vx(), 0.0);
        assert_eq!(p.pos().x, 106.0);
    }

    #[test]
    fn test_clamped_to_playfield() {
        let mut p = PaddleController::new(0.0, 196.0, 80.0, 4.0);
        let input = InputState {
            left_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 10.0, 0.0);
        assert_eq!(p.pos().x, 0.0);

        let mut p = PaddleController::new(239.0, 196.0, 80.0, 4.0);
        let input = InputState {
            right_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 10.0, 0.0);
        assert_eq!(p.pos().x, 240.0);
    }

    #[test]
    fn test_pointer_centers_and_clamps() {
        let mut p = paddle();
        p.update_from_pointer(160.0, 320.0);
        assert_eq!(p.pos().x, 120.0);

        p.update_from_pointer(0.0, 320.0);
        assert_eq!(p.pos().x, 0.0);

        p.update_from_pointer(320.0, 320.0);
        assert_eq!(p.pos().x, 240.0);
    }

    #[test]
    fn test_keyboard_priority_window() {
        let mut p = paddle();
        assert!(!p.is_keyboard_active(0.0));

        let input = InputState {
            right_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 6.0, 1000.0);
        assert!(p.is_keyboard_active(1499.0));
        assert!(!p.is_keyboard_active(1500.0));

        // Holding the key keeps refreshing the window.
        p.update(&input, 320.0, 6.0, 1400.0);
        assert!(p.is_keyboard_active(1899.0));
    }

    #[test]
    fn test_reset_zeroes_velocity() {
        let mut p = paddle();
        let input = InputState {
            right_pressed: true,
            ..InputState::default()
        };
        p.update(&input, 320.0, 6.0, 0.0);
        p.reset(120.0, 196.0);
        assert_eq!(p.pos(), Vec2::new(120.0, 196.0));
        assert_eq!(p.vx(), 0.0);
    }
}
