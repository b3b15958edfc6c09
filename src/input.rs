//! Host-updated input snapshot
//!
//! The engine never installs event listeners. The host records key state and
//! pointer movement into this struct and passes it to every frame call.

use crate::consts::POINTER_PRIORITY_MS;

/// Input state for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Left arrow / A held
    pub left_pressed: bool,
    /// Right arrow / D held
    pub right_pressed: bool,
    /// Last known pointer x in playfield coordinates
    pub pointer_x: f32,
    /// Timestamp of the last pointer move (ms), if any
    pub last_pointer_ms: Option<f64>,
}

impl InputState {
    /// Whether the pointer moved recently enough to drive the paddle
    pub fn pointer_active(&self, now_ms: f64) -> bool {
        match self.last_pointer_ms {
            Some(t) => now_ms - t < POINTER_PRIORITY_MS,
            None => false,
        }
    }

    /// Record a pointer move at the given timestamp
    pub fn pointer_moved(&mut self, x: f32, now_ms: f64) {
        self.pointer_x = x;
        self.last_pointer_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_activity_window() {
        let mut input = InputState::default();
        assert!(!input.pointer_active(0.0));

        input.pointer_moved(120.0, 1000.0);
        assert!(input.pointer_active(1000.0));
        assert!(input.pointer_active(1499.0));
        assert!(!input.pointer_active(1500.0));
    }
}
