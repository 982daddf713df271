/*!
The velocity integrator ("motor"): turns raw input, gravity, and the wall
state reported by the resolvers into the per-tick displacement request.

Output of a tick is the resolved displacement; the interesting state is the
velocity. Horizontal velocity chases the input target through a critically
damped smoother with separate accelerate/decelerate time constants for
ground and air. Vertical velocity follows the jump kinematics derived at
configuration time, with gravity scaled while wall sliding. Displacement
integration uses the closed-form identity dy = (v^2 - v0^2) / (2g) so the
position stays on the discretized parabola even when gravity changes scale
mid-flight.
*/

use log::debug;

use crate::collision::body::{KinematicBody, MoveOptions};
use crate::collision::settings::INPUT_DEAD_ZONE;
use crate::collision::types::Vec2;
use crate::collision::world::RayWorld;
use crate::config::ValidatedConfig;
use crate::input::FrameInput;
use crate::utils::smooth_damp;

/// Velocity and timer state persisting for the lifetime of the actor.
/// Mutated only by [`Motor::step`].
#[derive(Clone, Copy, Debug)]
pub struct VelocityState {
    pub velocity: Vec2,
    /// Accumulator of the horizontal smoother.
    pub smoothing: f32,
    /// Previous tick's target horizontal velocity, used to tell accelerating
    /// input from decelerating input.
    pub last_target_vx: f32,
    /// Wall-stick countdown; the actor stays pinned to the wall while > 0.
    pub time_to_wall_unstick: f32,
    /// Ceiling-stick countdown under a slope ceiling.
    pub time_to_ceiling_release: f32,
    /// A grounded jump is in flight and can still be cut short.
    pub jumping: bool,
}

/// Per-actor driver: owns the velocity state and advances one fixed tick at
/// a time via [`Motor::step`].
pub struct Motor {
    config: ValidatedConfig,
    state: VelocityState,
    /// Externally imposed cap on downward speed, if any.
    max_fall_speed: Option<f32>,
}

impl Motor {
    pub fn new(config: ValidatedConfig) -> Self {
        let params = config.params();
        Self {
            state: VelocityState {
                velocity: Vec2::zeros(),
                smoothing: 0.0,
                last_target_vx: 0.0,
                time_to_wall_unstick: params.wall_stick_time,
                time_to_ceiling_release: params.ceiling_stick_time,
                jumping: false,
            },
            config,
            max_fall_speed: None,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    /// Impose a velocity, e.g. for knockback or spawning.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.state.velocity = velocity;
    }

    /// Cap on downward speed pushed in by an external system (or `None` to
    /// remove the cap).
    pub fn set_max_fall_speed(&mut self, max_fall_speed: Option<f32>) {
        self.max_fall_speed = max_fall_speed;
    }

    /// Advance one fixed tick: update velocity from input and wall state,
    /// integrate the displacement, and resolve it through `body`.
    pub fn step<W: RayWorld>(
        &mut self,
        body: &mut KinematicBody,
        world: &W,
        input: &FrameInput,
        dt: f32,
    ) -> Vec2 {
        let params = *self.config.params();
        let jump = *self.config.jump();
        let info = *body.collision_info();
        let grounded = info.below || info.above;

        // Horizontal: chase the input target through the smoother. The time
        // constant depends on whether the input is asking for more speed or
        // less, and on whether there is ground under the actor.
        let target_vx = input.horizontal() * params.move_speed;
        let reversal = target_vx != 0.0
            && self.state.last_target_vx != 0.0
            && target_vx.signum() != self.state.last_target_vx.signum();
        let decelerating =
            reversal || target_vx.abs() < self.state.last_target_vx.abs() - f32::EPSILON;
        let smooth_time = match (decelerating, grounded) {
            (false, true) => params.accel_time_grounded,
            (false, false) => params.accel_time_airborne,
            (true, true) => params.decel_time_grounded,
            (true, false) => params.decel_time_airborne,
        };
        self.state.velocity.x = smooth_damp(
            self.state.velocity.x,
            target_vx,
            &mut self.state.smoothing,
            smooth_time,
            dt,
        );
        self.state.last_target_vx = target_vx;

        // Wall slide: touching a side wall, airborne, and falling.
        let wall_dir: f32 = if info.left { -1.0 } else { 1.0 };
        let wall_sliding = info.walled() && !info.below && self.state.velocity.y < 0.0;
        if wall_sliding {
            if self.state.velocity.y < -params.wall_slide_speed_max {
                self.state.velocity.y = -params.wall_slide_speed_max;
            }
            if self.state.time_to_wall_unstick > 0.0 {
                self.state.velocity.x = 0.0;
                self.state.smoothing = 0.0;

                let pointing_away = input.axis.x.abs() > INPUT_DEAD_ZONE
                    && input.axis.x.signum() == -wall_dir;
                if pointing_away {
                    self.state.time_to_wall_unstick -= dt;
                    if self.state.time_to_wall_unstick <= 0.0 {
                        debug!("wall stick expired, releasing horizontal velocity");
                    }
                } else {
                    // Neutral or into-wall input re-arms the stick so a
                    // stray tick cannot peel the actor off.
                    self.state.time_to_wall_unstick = params.wall_stick_time;
                }
            }
        } else {
            self.state.time_to_wall_unstick = params.wall_stick_time;
        }

        // Ceiling stick: a grace period pinned under a slope ceiling before
        // release into fall.
        let mut ceiling_pinned = false;
        if info.touching_slope_ceiling {
            if self.state.time_to_ceiling_release > 0.0 {
                self.state.time_to_ceiling_release -= dt;
                ceiling_pinned = true;
            }
        } else {
            self.state.time_to_ceiling_release = params.ceiling_stick_time;
        }

        // Jump start.
        if input.jump_pressed {
            if wall_sliding {
                let toward_wall = input.axis.x.abs() > INPUT_DEAD_ZONE
                    && input.axis.x.signum() == wall_dir;
                let pair = if toward_wall {
                    params.wall_jump_climb
                } else if input.axis.x.abs() <= INPUT_DEAD_ZONE {
                    params.wall_jump_off
                } else {
                    params.wall_leap
                };
                self.state.velocity.x = -wall_dir * pair.x;
                self.state.velocity.y = pair.y;
                self.state.smoothing = 0.0;
            } else if info.below {
                self.state.velocity.y = jump.max_jump_velocity;
                self.state.jumping = true;
            }
        }

        // Jump cutoff: releasing early clamps the remaining ascent down to
        // the short-jump speed; it never adds speed.
        if input.jump_released {
            if self.state.jumping && self.state.velocity.y > jump.min_jump_velocity {
                self.state.velocity.y = jump.min_jump_velocity;
            }
            self.state.jumping = false;
        }

        // Integrate. Gravity is scaled while wall sliding; the vertical
        // displacement comes from the kinematic identity so it matches the
        // discretized parabola under whichever gravity applied this tick.
        let dx = self.state.velocity.x * dt;
        let effective_gravity = if wall_sliding {
            jump.gravity * params.wall_slide_gravity_buffer
        } else {
            jump.gravity
        };
        let v0 = self.state.velocity.y;
        let mut v1 = v0 + effective_gravity * dt;

        let dy = match self.max_fall_speed {
            Some(max_fall) if v1 < -max_fall => {
                // Riding the externally imposed fall cap: uniform motion.
                v1 = -max_fall;
                v1 * dt
            }
            _ => (v1 * v1 - v0 * v0) / (2.0 * effective_gravity),
        };
        self.state.velocity.y = v1;

        let mut displacement = Vec2::new(dx, dy);
        if ceiling_pinned {
            displacement.y = 0.0;
            self.state.velocity.y = 0.0;
        }

        body.set_frame_intent(displacement.y, input.wants_fall_through());
        let resolved = body.move_by(world, displacement, MoveOptions::default());

        // Landing or bumping the ceiling kills vertical velocity on the
        // same tick the contact is reported.
        let info = body.collision_info();
        if info.below || info.above {
            self.state.velocity.y = 0.0;
        }
        resolved
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &VelocityState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut VelocityState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::body::KinematicBody;
    use crate::collision::mask::{CollisionFilter, SurfaceCategory, SurfaceMask};
    use crate::collision::types::{Bounds, Point2};
    use crate::collision::world::{StaticWorld, Surface, cuboid};
    use crate::config::ControllerConfig;

    const DT: f32 = 1.0 / 60.0;

    fn terrain() -> SurfaceMask {
        SurfaceMask::only(SurfaceCategory::Terrain)
    }

    fn empty_world() -> StaticWorld {
        StaticWorld::new(Vec::new())
    }

    /// Floor slab with its top face at y = 0.
    fn flat_world() -> StaticWorld {
        StaticWorld::new(vec![Surface::solid(
            cuboid(Vec2::new(0.0, -1.0), Vec2::new(50.0, 1.0)),
            terrain(),
        )])
    }

    fn actor_at(x: f32, y: f32) -> KinematicBody {
        let config = ControllerConfig::default().validated().unwrap();
        KinematicBody::new(
            Bounds::new(Point2::new(x, y), Vec2::new(0.5, 0.5)),
            config,
            CollisionFilter::default(),
        )
    }

    fn motor() -> Motor {
        Motor::new(ControllerConfig::default().validated().unwrap())
    }

    #[test]
    fn gravity_builds_downward_velocity_in_free_fall() {
        let world = empty_world();
        let mut body = actor_at(0.0, 10.0);
        let mut motor = motor();

        let resolved = motor.step(&mut body, &world, &FrameInput::idle(), DT);
        assert!(resolved.y < 0.0);
        assert!(motor.velocity().y < 0.0);
    }

    #[test]
    fn falling_onto_ground_zeroes_vertical_velocity_on_the_contact_tick() {
        let world = flat_world();
        let mut body = actor_at(0.0, 1.0);
        let mut motor = motor();

        let mut landed_tick = None;
        for tick in 0..120 {
            motor.step(&mut body, &world, &FrameInput::idle(), DT);
            if body.collision_info().below {
                landed_tick = Some(tick);
                break;
            }
        }
        let landed_tick = landed_tick.expect("never landed");
        assert!(landed_tick > 0);
        // The same tick that reports ground contact reports zero vy.
        assert_eq!(motor.velocity().y, 0.0);
    }

    #[test]
    fn grounded_jump_uses_the_derived_takeoff_speed() {
        let world = flat_world();
        let mut body = actor_at(0.0, 0.5);
        let mut motor = motor();

        // Settle onto the floor first.
        for _ in 0..5 {
            motor.step(&mut body, &world, &FrameInput::idle(), DT);
        }
        assert!(body.collision_info().below);

        motor.step(
            &mut body,
            &world,
            &FrameInput::idle().with_jump_pressed(),
            DT,
        );
        assert!(motor.state().jumping);
        // One tick of gravity has already been applied to the takeoff speed.
        let jump = ControllerConfig::default().validated().unwrap().jump().max_jump_velocity;
        assert!(motor.velocity().y > 0.0);
        assert!(motor.velocity().y <= jump);
    }

    #[test]
    fn jump_cutoff_only_lowers_velocity_and_only_while_jumping() {
        let world = empty_world();
        let mut body = actor_at(0.0, 10.0);
        let mut motor = motor();

        // A release above the short-jump speed clamps down to it.
        motor.state_mut().jumping = true;
        motor.set_velocity(Vec2::new(0.0, 18.0));
        motor.step(
            &mut body,
            &world,
            &FrameInput::idle().with_jump_released(),
            DT,
        );
        let min_jump = ControllerConfig::default().validated().unwrap().jump().min_jump_velocity;
        // Gravity for this tick applies after the clamp.
        assert!(motor.velocity().y <= min_jump);
        assert!(motor.velocity().y > min_jump - 2.0);
        assert!(!motor.state().jumping);

        // A release below the short-jump speed changes nothing.
        motor.state_mut().jumping = true;
        motor.set_velocity(Vec2::new(0.0, 4.0));
        motor.step(
            &mut body,
            &world,
            &FrameInput::idle().with_jump_released(),
            DT,
        );
        assert!(motor.velocity().y < 4.0); // only gravity acted
        assert!(motor.velocity().y > 4.0 - 2.0);

        // Without the jumping flag, a release is inert.
        motor.set_velocity(Vec2::new(0.0, 18.0));
        motor.step(
            &mut body,
            &world,
            &FrameInput::idle().with_jump_released(),
            DT,
        );
        assert!(motor.velocity().y > 17.0);
    }

    #[test]
    fn external_fall_cap_limits_downward_speed() {
        let world = empty_world();
        let mut body = actor_at(0.0, 100.0);
        let mut motor = motor();
        motor.set_max_fall_speed(Some(5.0));

        for _ in 0..120 {
            motor.step(&mut body, &world, &FrameInput::idle(), DT);
        }
        assert!(motor.velocity().y >= -5.0 - 1.0e-4);
    }

    #[test]
    fn wall_stick_pins_horizontal_velocity_until_pull_away_outlasts_it() {
        let world = empty_world();
        let mut body = actor_at(0.0, 50.0);
        let mut motor = motor();
        motor.set_velocity(Vec2::new(0.0, -1.0));
        let stick_time = ControllerConfig::default().wall_stick_time;

        // Pulling away drains the timer, but the pin holds while it runs.
        let away = FrameInput::new(1.0, 0.0);
        for _ in 0..5 {
            // Wall contact as the resolver would report it on a left wall.
            body.state.left = true;
            motor.step(&mut body, &world, &away, DT);
            assert_eq!(motor.velocity().x, 0.0);
        }
        assert!(motor.state().time_to_wall_unstick < stick_time);

        // A single neutral tick re-arms the full stick duration.
        body.state.left = true;
        motor.step(&mut body, &world, &FrameInput::idle(), DT);
        assert!((motor.state().time_to_wall_unstick - stick_time).abs() < 1.0e-6);

        // Into-wall input also re-arms.
        body.state.left = true;
        motor.step(&mut body, &world, &FrameInput::new(-1.0, 0.0), DT);
        assert!((motor.state().time_to_wall_unstick - stick_time).abs() < 1.0e-6);

        // Sustained pull-away finally outlasts the stick and releases.
        for _ in 0..30 {
            body.state.left = true;
            motor.step(&mut body, &world, &away, DT);
        }
        assert!(motor.velocity().x > 0.0);
    }

    #[test]
    fn ceiling_stick_pins_vertical_motion_for_the_grace_period() {
        let world = empty_world();
        let mut body = actor_at(0.0, 5.0);
        let mut motor = motor();

        // Well inside the grace period the vertical axis is pinned.
        for _ in 0..7 {
            body.state.touching_slope_ceiling = true;
            let resolved = motor.step(&mut body, &world, &FrameInput::idle(), DT);
            assert_eq!(resolved.y, 0.0);
            assert_eq!(motor.velocity().y, 0.0);
        }

        // Once the timer runs out the actor is released into fall.
        let mut released = false;
        for _ in 0..5 {
            body.state.touching_slope_ceiling = true;
            let resolved = motor.step(&mut body, &world, &FrameInput::idle(), DT);
            if resolved.y < 0.0 {
                released = true;
                break;
            }
        }
        assert!(released, "grace period never expired");

        // Leaving the ceiling re-arms the grace timer.
        motor.step(&mut body, &world, &FrameInput::idle(), DT);
        let ceiling_time = ControllerConfig::default().ceiling_stick_time;
        assert!((motor.state().time_to_ceiling_release - ceiling_time).abs() < 1.0e-6);
    }

    #[test]
    fn wall_jump_picks_climb_hop_or_leap_from_input_direction() {
        let params = ControllerConfig::default();
        let cases = [
            // (input x, expected velocity pair) on a left wall
            (-1.0, params.wall_jump_climb), // pushing into the wall: climb
            (0.0, params.wall_jump_off),    // neutral: hop off
            (1.0, params.wall_leap),        // pulling away: leap
        ];

        for (axis_x, pair) in cases {
            let world = empty_world();
            let mut body = actor_at(0.0, 50.0);
            let mut motor = motor();
            motor.set_velocity(Vec2::new(0.0, -1.0));

            body.state.left = true;
            let input = FrameInput::new(axis_x, 0.0).with_jump_pressed();
            motor.step(&mut body, &world, &input, DT);

            // Horizontal velocity points away from the wall at the pair's
            // magnitude; vertical starts at the pair's y minus one tick of
            // buffered gravity.
            assert!(
                (motor.velocity().x - pair.x).abs() < 1.0e-4,
                "input {axis_x}: vx {}",
                motor.velocity().x
            );
            assert!(motor.velocity().y > pair.y - 1.0);
            assert!(motor.velocity().y <= pair.y);
        }
    }

    #[test]
    fn deceleration_time_constant_applies_when_input_reverses() {
        let world = flat_world();
        let mut body = actor_at(0.0, 0.5);
        let mut motor = motor();

        for _ in 0..30 {
            motor.step(&mut body, &world, &FrameInput::new(1.0, 0.0), DT);
        }
        let cruising = motor.velocity().x;
        assert!(cruising > 4.0);

        // Reversal decelerates (the decel constant), never snaps.
        motor.step(&mut body, &world, &FrameInput::new(-1.0, 0.0), DT);
        assert!(motor.velocity().x < cruising);
        assert!(motor.velocity().x > 0.0);
    }
}
