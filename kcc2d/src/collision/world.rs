/*!
Static world geometry and ray queries.

The controller consumes the world through the [`RayWorld`] trait: a single
`cast` that returns the nearest hit along a ray, or `None`. [`StaticWorld`]
is the crate's implementation: immutable surfaces built once when content
loads, a BVH over their world-space AABBs for broad-phase pruning, and
parry2d narrow-phase ray casts against the pruned candidates.
*/

use parry2d::bounding_volume::Aabb;
use parry2d::partitioning::{Bvh, BvhBuildStrategy};
use parry2d::query::{Ray, RayCast};
use parry2d::shape as pshape;

use super::mask::SurfaceMask;
use super::settings::DIST_EPS;
use super::types::{Hit, Iso2, Point2, SurfaceId, SurfaceKind, Vec2};

/// A rigid 2D transform in world space.
#[derive(Clone, Copy, Debug)]
pub struct Transform2 {
    pub translation: Vec2,
    /// Counter-clockwise rotation in radians.
    pub rotation: f32,
}

impl Transform2 {
    #[inline]
    pub fn new(translation: Vec2, rotation: f32) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Convert to a nalgebra `Isometry2` for use with parry2d queries.
    #[inline]
    pub fn iso(&self) -> Iso2 {
        Iso2::new(self.translation, self.rotation)
    }
}

/// Static collision shapes supported by the world.
///
/// - Cuboid: oriented box with half-extents in local space, placed by
///   `transform`. A rotated cuboid is the usual way to author a ramp.
/// - Segment: a world-space line segment; the usual shape for thin one-way
///   platforms.
/// - Triangle: a world-space triangle; useful for slope wedges.
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    Cuboid {
        /// Local-space half-extents (hx, hy).
        half_extents: Vec2,
        /// World-space pose of the cuboid.
        transform: Transform2,
    },
    Segment {
        a: Point2,
        b: Point2,
    },
    Triangle {
        a: Point2,
        b: Point2,
        c: Point2,
    },
}

impl StaticShape {
    /// World-space AABB, used to index the shape in the broad phase.
    fn aabb(&self) -> Aabb {
        match *self {
            StaticShape::Cuboid {
                half_extents,
                transform,
            } => pshape::Cuboid::new(half_extents).aabb(&transform.iso()),
            StaticShape::Segment { a, b } => pshape::Segment::new(a, b).aabb(&Iso2::identity()),
            StaticShape::Triangle { a, b, c } => {
                pshape::Triangle::new(a, b, c).aabb(&Iso2::identity())
            }
        }
    }

    /// Cast `ray` against this shape and return `(distance, normal)` of the
    /// earliest impact within `max_dist`, if any. The ray direction must be
    /// unit length so the parry time-of-impact is a distance.
    fn cast_ray(&self, ray: &Ray, max_dist: f32) -> Option<(f32, Vec2)> {
        let intersection = match *self {
            StaticShape::Cuboid {
                half_extents,
                transform,
            } => pshape::Cuboid::new(half_extents).cast_ray_and_get_normal(
                &transform.iso(),
                ray,
                max_dist,
                true,
            ),
            StaticShape::Segment { a, b } => pshape::Segment::new(a, b).cast_ray_and_get_normal(
                &Iso2::identity(),
                ray,
                max_dist,
                true,
            ),
            StaticShape::Triangle { a, b, c } => pshape::Triangle::new(a, b, c)
                .cast_ray_and_get_normal(&Iso2::identity(), ray, max_dist, true),
        }?;

        // Orient the normal against the ray, consistent with the resolvers'
        // expectation that a floor hit from above reports an upward normal.
        let mut normal = intersection.normal;
        if normal.dot(&ray.dir) > 0.0 {
            normal = -normal;
        }
        Some((intersection.time_of_impact, normal))
    }
}

/// One registered surface: shape plus its collision behavior and categories.
#[derive(Clone, Debug)]
pub struct Surface {
    pub shape: StaticShape,
    pub kind: SurfaceKind,
    pub categories: SurfaceMask,
}

impl Surface {
    /// A solid surface in the given categories.
    pub fn solid(shape: StaticShape, categories: SurfaceMask) -> Self {
        Self {
            shape,
            kind: SurfaceKind::Solid,
            categories,
        }
    }

    /// A one-way platform in the given categories.
    pub fn one_way(shape: StaticShape, categories: SurfaceMask) -> Self {
        Self {
            shape,
            kind: SurfaceKind::OneWay,
            categories,
        }
    }
}

/// Ray-cast capability the controller depends on.
///
/// `cast` must return the nearest matching hit along the ray, or `None`.
/// Implementations are read-only within a tick.
pub trait RayWorld {
    fn cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Option<Hit>;
}

/// Immutable world of static surfaces with a BVH broad phase.
pub struct StaticWorld {
    surfaces: Vec<Surface>,
    bvh: Bvh,
}

impl StaticWorld {
    /// Build the world and its acceleration structure. Surface ids are the
    /// insertion indices and stay valid for the lifetime of the world.
    pub fn new(surfaces: Vec<Surface>) -> Self {
        let aabbs: Vec<Aabb> = surfaces.iter().map(|s| s.shape.aabb()).collect();
        let bvh = Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs);
        Self { surfaces, bvh }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Look up a surface by the id reported in a [`Hit`].
    #[inline]
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0 as usize)
    }

    /// Candidate surface indices whose AABB intersects the ray's AABB.
    fn candidates(&self, origin: Point2, direction: Vec2, max_distance: f32) -> Vec<usize> {
        let end = origin + direction * max_distance;
        let mins = Point2::new(origin.x.min(end.x), origin.y.min(end.y));
        let maxs = Point2::new(origin.x.max(end.x), origin.y.max(end.y));
        let swept = Aabb::new(mins, maxs);

        self.bvh
            .intersect_aabb(&swept)
            .map(|leaf_idx| leaf_idx as usize)
            .collect()
    }
}

impl RayWorld for StaticWorld {
    fn cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Option<Hit> {
        let len_sq = direction.norm_squared();
        if len_sq <= DIST_EPS * DIST_EPS || max_distance <= 0.0 {
            // Zero-length probes are a normal no-op, not an error.
            return None;
        }
        let dir = direction / len_sq.sqrt();
        let ray = Ray::new(origin, dir);

        // Unbounded probes (the descend-slope ray) skip the broad phase:
        // an infinite swept AABB would cover every leaf anyway.
        let candidates: Vec<usize> = if max_distance.is_finite() {
            self.candidates(origin, dir, max_distance)
        } else {
            (0..self.surfaces.len()).collect()
        };

        let mut best: Option<Hit> = None;
        for idx in candidates {
            let surface = &self.surfaces[idx];
            if !surface.categories.intersects(mask) {
                continue;
            }
            if let Some((distance, normal)) = surface.shape.cast_ray(&ray, max_distance) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(Hit {
                        distance,
                        normal,
                        surface: SurfaceId(idx as u32),
                        kind: surface.kind,
                    });
                }
            }
        }
        best
    }
}

/// Convenience: an axis-aligned solid cuboid from its center and half-extents.
#[inline]
pub fn cuboid(center: Vec2, half_extents: Vec2) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform2::new(center, 0.0),
    }
}

/// Convenience: a rotated solid cuboid (the usual authoring form for ramps).
#[inline]
pub fn ramp(center: Vec2, half_extents: Vec2, angle: f32) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform2::new(center, angle),
    }
}

/// Convenience: a world-space segment (thin platform or slope face).
#[inline]
pub fn segment(a: Point2, b: Point2) -> StaticShape {
    StaticShape::Segment { a, b }
}
