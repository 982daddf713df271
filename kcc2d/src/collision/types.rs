/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data
exchanged between:
- world (broad-phase pruning and narrow-phase ray queries)
- the kinematic body (horizontal/vertical resolvers)
- the slope handler
- the velocity integrator
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;
pub type Iso2 = na::Isometry2<f32>;

/// Opaque identity of a surface registered in a world.
///
/// Ids are handed out by the world at build time and are only meaningful to
/// the world that produced them. The controller stores one to remember which
/// one-way platform it is currently dropping through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Collision behavior of a surface.
///
/// - `Solid`: blocks from every direction.
/// - `OneWay`: blocks only while landing from above; never blocks ascent,
///   and can be dropped through on demand while descending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Solid,
    OneWay,
}

/// Result of a world ray query.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Distance from the ray origin to the impact, in world units.
    /// Zero means the origin already touches (or is inside) the surface.
    pub distance: f32,
    /// Unit surface normal at the impact, oriented against the ray.
    pub normal: Vec2,
    /// Identity of the surface that was hit.
    pub surface: SurfaceId,
    /// Collision behavior of the surface that was hit.
    pub kind: SurfaceKind,
}

/// Axis-aligned box tracked for the actor: center plus half-extents.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub center: Point2,
    pub half_extents: Vec2,
}

impl Bounds {
    #[inline]
    pub fn new(center: Point2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Minimum corner (bottom-left).
    #[inline]
    pub fn min(&self) -> Point2 {
        self.center - self.half_extents
    }

    /// Maximum corner (top-right).
    #[inline]
    pub fn max(&self) -> Point2 {
        self.center + self.half_extents
    }

    /// The same box shrunk inward by `margin` on every side.
    ///
    /// Probe rays start from the shrunk box so they never begin exactly on a
    /// touching surface.
    #[inline]
    pub fn shrunk(&self, margin: f32) -> Bounds {
        Bounds {
            center: self.center,
            half_extents: Vec2::new(
                (self.half_extents.x - margin).max(0.0),
                (self.half_extents.y - margin).max(0.0),
            ),
        }
    }
}

/// The four corner ray origins of the shrunk actor box.
///
/// Recomputed every step before any query; there is no persistent identity.
#[derive(Clone, Copy, Debug)]
pub struct RayOrigins {
    pub bottom_left: Point2,
    pub bottom_right: Point2,
    pub top_left: Point2,
    pub top_right: Point2,
}

impl RayOrigins {
    /// Corner points of `bounds` (already shrunk by the caller).
    #[inline]
    pub fn of(bounds: &Bounds) -> Self {
        let min = bounds.min();
        let max = bounds.max();
        Self {
            bottom_left: Point2::new(min.x, min.y),
            bottom_right: Point2::new(max.x, min.y),
            top_left: Point2::new(min.x, max.y),
            top_right: Point2::new(max.x, max.y),
        }
    }
}
