//! Per-tick input sample consumed by the velocity integrator.

use crate::collision::settings::{FALL_THROUGH_AXIS, INPUT_DEAD_ZONE};
use crate::collision::types::Vec2;

/// One tick's worth of player input.
///
/// The caller samples its input device once per tick and hands the result in;
/// the controller never polls anything itself. Axes are clamped to [-1, 1],
/// jump press/release are edge events (true only on the tick the edge
/// happened).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Horizontal and vertical analog axes in [-1, 1].
    pub axis: Vec2,
    /// Jump was pressed this tick.
    pub jump_pressed: bool,
    /// Jump was released this tick.
    pub jump_released: bool,
}

impl FrameInput {
    pub fn new(axis_x: f32, axis_y: f32) -> Self {
        Self {
            axis: Vec2::new(axis_x.clamp(-1.0, 1.0), axis_y.clamp(-1.0, 1.0)),
            jump_pressed: false,
            jump_released: false,
        }
    }

    /// No input at all this tick.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_jump_pressed(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn with_jump_released(mut self) -> Self {
        self.jump_released = true;
        self
    }

    /// Held-down input strong enough to request dropping through a one-way
    /// platform.
    #[inline]
    pub fn wants_fall_through(&self) -> bool {
        self.axis.y <= -FALL_THROUGH_AXIS
    }

    /// Horizontal axis treated as neutral inside the dead zone.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        if self.axis.x.abs() <= INPUT_DEAD_ZONE {
            0.0
        } else {
            self.axis.x
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_clamped() {
        let input = FrameInput::new(2.5, -7.0);
        assert_eq!(input.axis, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn fall_through_needs_a_firm_down_input() {
        assert!(FrameInput::new(0.0, -1.0).wants_fall_through());
        assert!(FrameInput::new(0.0, -0.6).wants_fall_through());
        assert!(!FrameInput::new(0.0, -0.2).wants_fall_through());
        assert!(!FrameInput::new(0.0, 0.0).wants_fall_through());
    }

    #[test]
    fn dead_zone_zeroes_the_horizontal_axis() {
        assert_eq!(FrameInput::new(0.005, 0.0).horizontal(), 0.0);
        assert!(FrameInput::new(0.5, 0.0).horizontal() > 0.0);
    }
}
