//! The per-actor contact record, reset and rebuilt every step.

use super::types::SurfaceId;

/// Contact and slope state owned by a single actor.
///
/// Every resolution step starts with [`CollisionState::reset`] and rebuilds
/// the flags from that tick's probes. Three fields deliberately survive the
/// reset:
/// - `slope_angle_old` receives the previous step's `slope_angle` so the
///   resolvers can tell a new slope from a continuing one,
/// - `face_direction` is the actor's facing memory,
/// - `fall_through_platform` latches across the whole drop through a one-way
///   platform so releasing the down input mid-pass cannot flicker the actor
///   back onto it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionState {
    /// Contact on the actor's top edge.
    pub above: bool,
    /// Contact on the actor's bottom edge (grounded).
    pub below: bool,
    /// Contact on the actor's left edge.
    pub left: bool,
    /// Contact on the actor's right edge.
    pub right: bool,

    /// Currently converting horizontal intent into up-slope motion.
    pub climbing_slope: bool,
    /// Currently hugging a downhill slope.
    pub descending_slope: bool,
    /// A surface normal pointing downward was seen by the horizontal probes
    /// (the underside of a slope forming a sloped ceiling).
    pub touching_slope_ceiling: bool,

    /// Angle of the slope in contact this step, radians from flat.
    pub slope_angle: f32,
    /// `slope_angle` carried over from the previous step.
    pub slope_angle_old: f32,

    /// Horizontal facing, +1 or -1.
    pub face_direction: i8,

    /// The one-way platform currently being dropped through, if any.
    pub fall_through_platform: Option<SurfaceId>,
}

impl CollisionState {
    pub fn new() -> Self {
        Self {
            above: false,
            below: false,
            left: false,
            right: false,
            climbing_slope: false,
            descending_slope: false,
            touching_slope_ceiling: false,
            slope_angle: 0.0,
            slope_angle_old: 0.0,
            face_direction: 1,
            fall_through_platform: None,
        }
    }

    /// Clear the per-step fields; see the type docs for what survives.
    pub(crate) fn reset(&mut self) {
        self.above = false;
        self.below = false;
        self.left = false;
        self.right = false;
        self.climbing_slope = false;
        self.descending_slope = false;
        self.touching_slope_ceiling = false;

        self.slope_angle_old = self.slope_angle;
        self.slope_angle = 0.0;
    }

    /// True when a side wall is in contact.
    #[inline]
    pub fn walled(&self) -> bool {
        self.left || self.right
    }
}

impl Default for CollisionState {
    fn default() -> Self {
        Self::new()
    }
}
