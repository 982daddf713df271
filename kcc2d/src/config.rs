//! Per-actor configuration: a plain immutable record, validated once.
//!
//! The controller cannot run on a half-configured actor, so construction is
//! fail-fast: [`ControllerConfig::validated`] checks every field and derives
//! the jump kinematics, and the rest of the crate only accepts a
//! [`ValidatedConfig`]. Jump behavior is authored as heights and a time to
//! apex because those are the quantities a designer reasons about; gravity
//! and the jump velocities fall out of the constant-acceleration relations.

use thiserror::Error;

use crate::collision::types::Vec2;

/// Error type for configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Fewer than two rays cannot bracket an edge reliably.
    #[error("{axis} ray count must be at least 2, got {count}")]
    RayCountTooSmall { axis: &'static str, count: u32 },
    /// A length, speed, or duration that must be positive and finite.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    /// Climb/descend limits must stay strictly between flat and vertical.
    #[error("{name} must lie in (0, pi/2) radians, got {value}")]
    AngleOutOfRange { name: &'static str, value: f32 },
    /// The short-press jump cannot be taller than the full jump.
    #[error("min jump height {min} exceeds max jump height {max}")]
    JumpHeightsInverted { min: f32, max: f32 },
    /// The wall-slide gravity scale must keep some downward pull.
    #[error("wall slide gravity buffer must lie in (0, 1], got {0}")]
    GravityBufferOutOfRange(f32),
}

/// Tuning record for one actor.
///
/// All lengths are world units, durations seconds, angles radians. Velocity
/// pairs are (horizontal, vertical) magnitudes; the horizontal component is
/// applied away from the wall by the integrator.
#[derive(Clone, Copy, Debug)]
pub struct ControllerConfig {
    /// Inward margin for probe origins; keeps rays off touching surfaces.
    pub skin_width: f32,
    pub horizontal_ray_count: u32,
    pub vertical_ray_count: u32,

    /// Steepest slope that converts horizontal intent into climbing.
    pub max_climb_angle: f32,
    /// Steepest slope the actor hugs on the way down instead of falling.
    pub max_descend_angle: f32,

    /// Horizontal speed at full input deflection.
    pub move_speed: f32,
    /// Smoothing time toward a faster target speed while grounded.
    pub accel_time_grounded: f32,
    /// Smoothing time toward a faster target speed while airborne.
    pub accel_time_airborne: f32,
    /// Smoothing time toward a slower or reversed target while grounded.
    pub decel_time_grounded: f32,
    /// Smoothing time toward a slower or reversed target while airborne.
    pub decel_time_airborne: f32,

    /// Apex height of a full (held) jump.
    pub max_jump_height: f32,
    /// Apex height of a tapped jump after the cutoff clamp.
    pub min_jump_height: f32,
    /// Seconds from jump start to the apex of a full jump.
    pub time_to_jump_apex: f32,

    /// Fastest downward speed while wall sliding.
    pub wall_slide_speed_max: f32,
    /// Gravity scale applied while wall sliding, in (0, 1].
    pub wall_slide_gravity_buffer: f32,
    /// Grace period the actor stays stuck to a wall against pull-away input.
    pub wall_stick_time: f32,
    /// Grace period under a slope ceiling before release into fall.
    pub ceiling_stick_time: f32,

    /// Jump velocities while pushing into the wall (climbing up it).
    pub wall_jump_climb: Vec2,
    /// Jump velocities with neutral input (hopping off the wall).
    pub wall_jump_off: Vec2,
    /// Jump velocities while pulling away (leaping to the far side).
    pub wall_leap: Vec2,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            skin_width: 0.015,
            horizontal_ray_count: 4,
            vertical_ray_count: 4,
            max_climb_angle: 80.0_f32.to_radians(),
            max_descend_angle: 75.0_f32.to_radians(),
            move_speed: 6.0,
            accel_time_grounded: 0.1,
            accel_time_airborne: 0.2,
            decel_time_grounded: 0.1,
            decel_time_airborne: 0.2,
            max_jump_height: 4.0,
            min_jump_height: 1.0,
            time_to_jump_apex: 0.4,
            wall_slide_speed_max: 3.0,
            wall_slide_gravity_buffer: 0.5,
            wall_stick_time: 0.25,
            ceiling_stick_time: 0.15,
            wall_jump_climb: Vec2::new(7.5, 16.0),
            wall_jump_off: Vec2::new(8.5, 7.0),
            wall_leap: Vec2::new(18.0, 17.0),
        }
    }
}

impl ControllerConfig {
    /// Validate every field and derive the jump kinematics.
    pub fn validated(self) -> Result<ValidatedConfig, ConfigError> {
        if self.horizontal_ray_count < 2 {
            return Err(ConfigError::RayCountTooSmall {
                axis: "horizontal",
                count: self.horizontal_ray_count,
            });
        }
        if self.vertical_ray_count < 2 {
            return Err(ConfigError::RayCountTooSmall {
                axis: "vertical",
                count: self.vertical_ray_count,
            });
        }

        let positives: [(&'static str, f32); 11] = [
            ("skin width", self.skin_width),
            ("move speed", self.move_speed),
            ("grounded acceleration time", self.accel_time_grounded),
            ("airborne acceleration time", self.accel_time_airborne),
            ("grounded deceleration time", self.decel_time_grounded),
            ("airborne deceleration time", self.decel_time_airborne),
            ("max jump height", self.max_jump_height),
            ("min jump height", self.min_jump_height),
            ("time to jump apex", self.time_to_jump_apex),
            ("wall stick time", self.wall_stick_time),
            ("ceiling stick time", self.ceiling_stick_time),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.wall_slide_speed_max.is_finite() && self.wall_slide_speed_max > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "wall slide speed max",
                value: self.wall_slide_speed_max,
            });
        }

        let half_pi = std::f32::consts::FRAC_PI_2;
        for (name, value) in [
            ("max climb angle", self.max_climb_angle),
            ("max descend angle", self.max_descend_angle),
        ] {
            if !(value.is_finite() && value > 0.0 && value < half_pi) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }

        if self.min_jump_height > self.max_jump_height {
            return Err(ConfigError::JumpHeightsInverted {
                min: self.min_jump_height,
                max: self.max_jump_height,
            });
        }
        if !(self.wall_slide_gravity_buffer.is_finite()
            && self.wall_slide_gravity_buffer > 0.0
            && self.wall_slide_gravity_buffer <= 1.0)
        {
            return Err(ConfigError::GravityBufferOutOfRange(
                self.wall_slide_gravity_buffer,
            ));
        }

        Ok(ValidatedConfig {
            jump: JumpKinematics::derive(&self),
            params: self,
        })
    }
}

/// Constants derived once from the configured jump heights and apex time.
#[derive(Clone, Copy, Debug)]
pub struct JumpKinematics {
    /// Downward acceleration (negative).
    pub gravity: f32,
    /// Takeoff speed of a full jump.
    pub max_jump_velocity: f32,
    /// Upward speed a cut-off jump is clamped down to.
    pub min_jump_velocity: f32,
}

impl JumpKinematics {
    fn derive(config: &ControllerConfig) -> Self {
        // s = g*t^2/2 at the apex, solved for g with s = max_jump_height.
        let gravity = -2.0 * config.max_jump_height / (config.time_to_jump_apex.powi(2));
        // v = -g*t reaches the apex exactly at time_to_jump_apex.
        let max_jump_velocity = -gravity * config.time_to_jump_apex;
        // v^2 = 2*|g|*s for the short-press height.
        let min_jump_velocity = (2.0 * gravity.abs() * config.min_jump_height).sqrt();
        Self {
            gravity,
            max_jump_velocity,
            min_jump_velocity,
        }
    }
}

/// A configuration that passed validation, plus its derived kinematics.
#[derive(Clone, Copy, Debug)]
pub struct ValidatedConfig {
    params: ControllerConfig,
    jump: JumpKinematics,
}

impl ValidatedConfig {
    #[inline]
    pub fn params(&self) -> &ControllerConfig {
        &self.params
    }

    #[inline]
    pub fn jump(&self) -> &JumpKinematics {
        &self.jump
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ControllerConfig::default().validated().is_ok());
    }

    #[test]
    fn ray_counts_below_two_are_fatal() {
        let config = ControllerConfig {
            horizontal_ray_count: 1,
            ..Default::default()
        };
        assert_eq!(
            config.validated().unwrap_err(),
            ConfigError::RayCountTooSmall {
                axis: "horizontal",
                count: 1
            }
        );

        let config = ControllerConfig {
            vertical_ray_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validated().unwrap_err(),
            ConfigError::RayCountTooSmall {
                axis: "vertical",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_durations_are_fatal() {
        let config = ControllerConfig {
            wall_stick_time: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validated().unwrap_err(),
            ConfigError::NonPositive {
                name: "wall stick time",
                ..
            }
        ));

        let config = ControllerConfig {
            time_to_jump_apex: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validated().unwrap_err(),
            ConfigError::NonPositive { .. }
        ));
    }

    #[test]
    fn vertical_climb_angle_is_rejected() {
        let config = ControllerConfig {
            max_climb_angle: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        assert!(matches!(
            config.validated().unwrap_err(),
            ConfigError::AngleOutOfRange { .. }
        ));
    }

    #[test]
    fn inverted_jump_heights_are_rejected() {
        let config = ControllerConfig {
            min_jump_height: 5.0,
            max_jump_height: 4.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validated().unwrap_err(),
            ConfigError::JumpHeightsInverted { .. }
        ));
    }

    #[test]
    fn jump_kinematics_match_the_closed_form() {
        // h = 4, t = 0.4: g = -2*4/0.16 = -50, v_max = 50*0.4 = 20,
        // v_min = sqrt(2*50*1) = 10.
        let validated = ControllerConfig::default().validated().unwrap();
        let jump = validated.jump();

        assert!((jump.gravity + 50.0).abs() < 1.0e-4);
        assert!((jump.max_jump_velocity - 20.0).abs() < 1.0e-4);
        assert!((jump.min_jump_velocity - 10.0).abs() < 1.0e-4);
    }
}
