/*!
Slope handling for the kinematic body: climbing, descending, and the
mid-step transition check.

All three convert between horizontal intent and slope-following motion using
the slope angle derived from the hit normal. Climbing is entered from the
horizontal resolver, descending runs before it (only when the requested
vertical motion points down), and the transition check runs after the
vertical resolver to catch a slope change that only becomes visible at the
resolved height.
*/

use super::body::KinematicBody;
use super::settings::ANGLE_EPS;
use super::types::Vec2;
use super::world::RayWorld;
use crate::utils::angle_from_up;

impl KinematicBody {
    /// Convert horizontal intent into motion along a climbable slope.
    ///
    /// Only overrides the vertical component when the requested dy is at or
    /// below the climb's dy: a jump arc that outruns the slope keeps its own
    /// vertical motion instead of being pinned to the surface.
    pub(crate) fn climb_slope(&mut self, displacement: &mut Vec2, slope_angle: f32) {
        let move_distance = displacement.x.abs();
        let climb_dy = slope_angle.sin() * move_distance;

        if displacement.y <= climb_dy {
            displacement.y = climb_dy;
            displacement.x = slope_angle.cos() * move_distance * displacement.x.signum();
            self.state.below = true;
            self.state.climbing_slope = true;
            self.state.slope_angle = slope_angle;
        }
    }

    /// Keep the actor hugging a downhill slope instead of free-falling off
    /// it every step.
    ///
    /// Probes straight down from the leading bottom corner with no distance
    /// limit. The conversion applies only when the surface is an actual
    /// slope within the descend limit, its downhill side faces the direction
    /// of travel, and it is close enough to matter this tick.
    pub(crate) fn descend_slope<W: RayWorld>(&mut self, world: &W, displacement: &mut Vec2) {
        let skin = self.config.params().skin_width;
        let direction = displacement.x.signum();
        let origin = if direction < 0.0 {
            self.origins.bottom_right
        } else {
            self.origins.bottom_left
        };

        let Some(hit) = world.cast(
            origin,
            Vec2::new(0.0, -1.0),
            f32::INFINITY,
            self.filter.vertical,
        ) else {
            return;
        };
        if self.filter.is_exempt(hit.surface) {
            return;
        }

        let slope_angle = angle_from_up(&hit.normal);
        if slope_angle <= ANGLE_EPS || slope_angle > self.config.params().max_descend_angle {
            return;
        }
        // The outward normal points downhill; matching travel direction
        // means we are moving down the slope, not into it.
        if hit.normal.x.signum() != direction {
            return;
        }
        // Far above the slope this tick's horizontal motion cannot reach it.
        if hit.distance - skin > slope_angle.tan() * displacement.x.abs() {
            return;
        }

        let move_distance = displacement.x.abs();
        displacement.x = slope_angle.cos() * move_distance * direction;
        displacement.y -= slope_angle.sin() * move_distance;

        self.state.slope_angle = slope_angle;
        self.state.descending_slope = true;
        self.state.below = true;
    }

    /// After the vertical clamp, re-probe horizontally at the resolved
    /// height; a different slope angle there means the current dx would
    /// tunnel into the new slope, so clip it to the new edge.
    pub(crate) fn slope_transition<W: RayWorld>(&mut self, world: &W, displacement: &mut Vec2) {
        let skin = self.config.params().skin_width;
        let direction = displacement.x.signum();
        let ray_length = displacement.x.abs() + skin;

        let base = if direction < 0.0 {
            self.origins.bottom_left
        } else {
            self.origins.bottom_right
        };
        let origin = base + Vec2::new(0.0, displacement.y);

        let Some(hit) = world.cast(
            origin,
            Vec2::new(direction, 0.0),
            ray_length,
            self.filter.horizontal,
        ) else {
            return;
        };
        if self.filter.is_exempt(hit.surface) {
            return;
        }

        let slope_angle = angle_from_up(&hit.normal);
        if !self.same_angle(slope_angle, self.state.slope_angle) {
            displacement.x = (hit.distance - skin) * direction;
            self.state.slope_angle = slope_angle;
        }
    }
}
