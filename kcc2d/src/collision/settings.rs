/*!
Controller tolerances.

These constants centralize the numeric guards used by the resolvers and the
velocity integrator. Keeping them together makes tuning easier and keeps
behavior consistent across modules.

Notes
- Distances are in world units, time in seconds, angles in radians.
- Favor practical world-space tolerances over machine epsilon for robust
  behavior.
*/

/// Practical small distance for comparisons (world units).
/// Hits at or below this distance carry no usable separation information.
pub const DIST_EPS: f32 = 1.0e-6;

/// Tolerance for slope-angle equality (radians).
/// Angles re-derived from cast normals wobble in the last bits; two angles
/// closer than this are the same slope.
pub const ANGLE_EPS: f32 = 1.0e-4;

/// Vertical-axis threshold at which held-down input requests a drop through
/// a one-way platform. Analog sticks rarely report exactly -1.
pub const FALL_THROUGH_AXIS: f32 = 0.5;

/// Horizontal-axis magnitude below which input counts as neutral.
pub const INPUT_DEAD_ZONE: f32 = 1.0e-2;

/// Floor for smoothing time constants so the critically damped smoother
/// never divides by zero.
pub const SMOOTH_TIME_MIN: f32 = 1.0e-4;
