/*!
The kinematic body: corner ray origins plus the horizontal and vertical
displacement resolvers.

A [`KinematicBody`] is a plain value (box + validated config + filter +
contact state) driven by explicit [`KinematicBody::move_by`] calls from an
external loop; it has no ties to any engine lifecycle. Each call resolves one
requested displacement into a collision-safe one:

1. refresh the shrunk-box ray origins and spacing,
2. reset the contact state,
3. convert downhill motion through the descend handler (requested dy < 0),
4. clamp the horizontal axis against wall/slope probes,
5. clamp the vertical axis (probes offset by the already-resolved dx),
   re-checking for a slope change at the resolved height,
6. apply the result and publish it as `last_displacement`.

The ordering is load-bearing: vertical probes must see the committed
horizontal motion, and the slope-transition re-check is only meaningful after
the vertical clamp.
*/

use log::debug;

use super::mask::CollisionFilter;
use super::settings::DIST_EPS;
use super::state::CollisionState;
use super::types::{Bounds, Point2, RayOrigins, SurfaceKind, Vec2};
use super::world::RayWorld;
use crate::config::ValidatedConfig;
use crate::utils::angle_from_up;

/// Options for a single [`KinematicBody::move_by`] call.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveOptions {
    /// Force `below` after resolution. Set by moving-platform code when the
    /// platform pushes a rider horizontally with zero vertical intent, so the
    /// rider still counts as grounded.
    pub standing_on_platform: bool,
    /// Replace the requested vertical displacement with the actor's own last
    /// vertical intent. Platform pushes carry dy = 0, which would skip the
    /// downward probes and let a rider fall through its floor.
    pub overwrite_platform_push: bool,
}

/// A kinematic actor box resolved against the world by corner raycasts.
pub struct KinematicBody {
    pub(crate) bounds: Bounds,
    pub(crate) config: ValidatedConfig,
    pub(crate) filter: CollisionFilter,
    pub(crate) state: CollisionState,

    pub(crate) origins: RayOrigins,
    pub(crate) horizontal_spacing: f32,
    pub(crate) vertical_spacing: f32,

    last_displacement: Vec2,
    /// The actor's own requested vertical displacement this tick, kept so
    /// platform pushes can restore it (`overwrite_platform_push`).
    vertical_intent: f32,
    /// Down-input strong enough to drop through a one-way platform, sampled
    /// by the integrator for the current tick.
    drop_through: bool,
}

impl KinematicBody {
    pub fn new(bounds: Bounds, config: ValidatedConfig, filter: CollisionFilter) -> Self {
        let mut body = Self {
            bounds,
            config,
            filter,
            state: CollisionState::new(),
            origins: RayOrigins::of(&bounds),
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
            last_displacement: Vec2::zeros(),
            vertical_intent: 0.0,
            drop_through: false,
        };
        body.update_ray_origins();
        body
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.bounds.center
    }

    pub fn set_position(&mut self, position: Point2) {
        self.bounds.center = position;
        self.update_ray_origins();
    }

    /// Read-only snapshot of the contact state from the latest step.
    #[inline]
    pub fn collision_info(&self) -> &CollisionState {
        &self.state
    }

    /// The displacement actually applied by the latest step. Consumed by
    /// camera smoothing and fall-speed observers.
    #[inline]
    pub fn last_displacement(&self) -> Vec2 {
        self.last_displacement
    }

    #[inline]
    pub fn filter_mut(&mut self) -> &mut CollisionFilter {
        &mut self.filter
    }

    /// Record this tick's input-derived intent: the vertical displacement the
    /// actor itself asked for, and whether down-input requests dropping
    /// through one-way platforms. Called once per tick by the integrator,
    /// before any `move_by` (the actor's own or a platform push).
    pub fn set_frame_intent(&mut self, vertical_displacement: f32, drop_through: bool) {
        self.vertical_intent = vertical_displacement;
        self.drop_through = drop_through;
    }

    /// Resolve `displacement` against the world, apply it, and return it.
    pub fn move_by<W: RayWorld>(
        &mut self,
        world: &W,
        mut displacement: Vec2,
        options: MoveOptions,
    ) -> Vec2 {
        self.update_ray_origins();
        self.state.reset();

        if options.overwrite_platform_push {
            displacement.y = self.vertical_intent;
        }

        if displacement.y < 0.0 {
            self.descend_slope(world, &mut displacement);
        }
        if displacement.x != 0.0 {
            self.state.face_direction = if displacement.x > 0.0 { 1 } else { -1 };
        }

        self.resolve_horizontal(world, &mut displacement);
        if displacement.y != 0.0 {
            self.resolve_vertical(world, &mut displacement);
            // A slope change that only becomes visible at the resolved
            // height must clip dx before the move is committed.
            if self.state.climbing_slope {
                self.slope_transition(world, &mut displacement);
            }
        }

        self.bounds.center += displacement;
        self.last_displacement = displacement;

        if options.standing_on_platform {
            self.state.below = true;
        }
        displacement
    }

    /// Recompute corner origins and ray spacing from the current box.
    fn update_ray_origins(&mut self) {
        let params = self.config.params();
        let shrunk = self.bounds.shrunk(params.skin_width);
        self.origins = RayOrigins::of(&shrunk);

        let size = shrunk.half_extents * 2.0;
        self.horizontal_spacing = size.y / (params.horizontal_ray_count - 1) as f32;
        self.vertical_spacing = size.x / (params.vertical_ray_count - 1) as f32;
    }

    /// Clamp the horizontal component against wall and slope probes cast from
    /// the leading edge, bottom corner upward.
    fn resolve_horizontal<W: RayWorld>(&mut self, world: &W, displacement: &mut Vec2) {
        let params = *self.config.params();
        let skin = params.skin_width;
        let direction = f32::from(self.state.face_direction);

        let mut ray_length = displacement.x.abs() + skin;
        if displacement.x.abs() < skin {
            // Stationary: a minimal probe still detects a touching wall.
            ray_length = 2.0 * skin;
        }

        for i in 0..params.horizontal_ray_count {
            let base = if direction < 0.0 {
                self.origins.bottom_left
            } else {
                self.origins.bottom_right
            };
            let origin = base + Vec2::new(0.0, self.horizontal_spacing * i as f32);

            if let Some(hit) = world.cast(
                origin,
                Vec2::new(direction, 0.0),
                ray_length,
                self.filter.horizontal,
            ) {
                // Zero-distance hits carry no separation information, and
                // exempt surfaces are invisible to this actor.
                if hit.distance <= DIST_EPS || self.filter.is_exempt(hit.surface) {
                    continue;
                }

                // A downward-facing normal means the probe found the
                // underside of a slope: a sloped ceiling.
                if hit.normal.y < 0.0 {
                    self.state.touching_slope_ceiling = true;
                }

                let slope_angle = angle_from_up(&hit.normal);

                // The bottom ray decides whether this is a climbable slope.
                if i == 0 && slope_angle <= params.max_climb_angle {
                    if !self.same_angle(slope_angle, self.state.slope_angle_old) {
                        // New slope: walk to its edge this tick instead of
                        // climbing immediately, so the box doesn't pop.
                        self.state.descending_slope = false;
                        self.state.slope_angle = slope_angle;
                        displacement.x = (hit.distance - skin) * direction;
                    } else {
                        self.climb_slope(displacement, slope_angle);
                    }
                }

                // Not climbing, or the surface is too steep: plain clamp.
                if !self.state.climbing_slope || slope_angle > params.max_climb_angle {
                    displacement.x = displacement.x.abs().min(hit.distance - skin) * direction;
                    ray_length = (displacement.x.abs() + skin).min(hit.distance);

                    if self.state.climbing_slope {
                        // Keep motion diagonal along the slope already
                        // being climbed.
                        displacement.y = self.state.slope_angle.tan() * displacement.x.abs();
                    }

                    self.state.left = direction < 0.0;
                    self.state.right = direction > 0.0;
                }
            }

            // Short probe the opposite way from the trailing corner: detects
            // being pinched between two surfaces with zero net motion.
            let trailing = if direction < 0.0 {
                self.origins.bottom_right
            } else {
                self.origins.bottom_left
            };
            let origin = trailing + Vec2::new(0.0, self.horizontal_spacing * i as f32);
            if let Some(hit) = world.cast(
                origin,
                Vec2::new(-direction, 0.0),
                2.0 * skin,
                self.filter.horizontal,
            ) {
                if displacement.x == 0.0 && !self.filter.is_exempt(hit.surface) {
                    displacement.x = (hit.distance - skin) * -direction;
                }
            }
        }
    }

    /// Clamp the vertical component against floor/ceiling probes offset by
    /// the already-resolved horizontal motion. One-way platform handling and
    /// the fall-through latch live here.
    fn resolve_vertical<W: RayWorld>(&mut self, world: &W, displacement: &mut Vec2) {
        let params = *self.config.params();
        let skin = params.skin_width;
        let direction = if displacement.y > 0.0 { 1.0 } else { -1.0 };

        let mut ray_length = displacement.y.abs() + skin;

        for i in 0..params.vertical_ray_count {
            let base = if direction < 0.0 {
                self.origins.bottom_left
            } else {
                self.origins.top_left
            };
            let origin =
                base + Vec2::new(self.vertical_spacing * i as f32 + displacement.x, 0.0);

            let Some(hit) = world.cast(
                origin,
                Vec2::new(0.0, direction),
                ray_length,
                self.filter.vertical,
            ) else {
                continue;
            };
            if self.filter.is_exempt(hit.surface) {
                continue;
            }

            if hit.kind == SurfaceKind::OneWay {
                // One-way platforms never block ascent, and never block an
                // actor already touching them from inside.
                if direction > 0.0 || hit.distance <= DIST_EPS {
                    continue;
                }
                if self.drop_through {
                    if self.state.fall_through_platform != Some(hit.surface) {
                        debug!("drop-through latched onto surface {:?}", hit.surface);
                    }
                    self.state.fall_through_platform = Some(hit.surface);
                    continue;
                }
                // The down input may have been released mid-pass; keep
                // skipping the same platform until we are clear of it.
                if self.state.fall_through_platform == Some(hit.surface) {
                    continue;
                }
                if self.state.fall_through_platform.take().is_some() {
                    debug!("drop-through latch cleared by a different platform");
                }
            } else if let Some(stale) = self.state.fall_through_platform.take() {
                debug!("drop-through latch cleared by solid contact, was {stale:?}");
            }

            displacement.y = (hit.distance - skin) * direction;
            ray_length = hit.distance;

            if self.state.climbing_slope {
                // The vertical clamp moved us off the slope line; pull the
                // horizontal component back onto it.
                let tangent = self.state.slope_angle.tan();
                if tangent > DIST_EPS {
                    displacement.x = displacement.y / tangent * displacement.x.signum();
                }
            }

            self.state.below = direction < 0.0;
            self.state.above = direction > 0.0;
        }
    }

    /// Slope angles re-derived from cast normals compare with a tolerance.
    #[inline]
    pub(crate) fn same_angle(&self, a: f32, b: f32) -> bool {
        (a - b).abs() <= super::settings::ANGLE_EPS
    }
}
