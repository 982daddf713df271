//! Surface categories and the per-actor collision filter.
//!
//! World content is tagged with a closed set of categories when it loads;
//! queries and exemptions compare bits, never strings. The filter carries two
//! independent masks because horizontal and vertical probes legitimately see
//! different sets of surfaces (one-way platforms are usually invisible to
//! horizontal rays), plus an exemption list for surfaces a specific actor
//! should pass through even though they are collidable in general.

use super::types::SurfaceId;

/// Closed set of world-surface categories.
///
/// The discriminant is the bit index inside a [`SurfaceMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SurfaceCategory {
    /// Solid level geometry: ground, walls, ceilings, slopes.
    Terrain,
    /// One-way or moving platforms.
    Platform,
    /// Harmful surfaces; collidable like terrain but flagged for game code.
    Hazard,
}

impl SurfaceCategory {
    #[inline]
    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Bitmask over [`SurfaceCategory`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceMask(u32);

impl SurfaceMask {
    /// Mask matching nothing.
    pub const NONE: SurfaceMask = SurfaceMask(0);
    /// Mask matching every category.
    pub const ALL: SurfaceMask = SurfaceMask(u32::MAX);

    /// Mask of a single category.
    #[inline]
    pub fn only(category: SurfaceCategory) -> Self {
        SurfaceMask(category.bit())
    }

    /// This mask with `category` added.
    #[inline]
    pub fn with(self, category: SurfaceCategory) -> Self {
        SurfaceMask(self.0 | category.bit())
    }

    /// This mask with `category` removed.
    #[inline]
    pub fn without(self, category: SurfaceCategory) -> Self {
        SurfaceMask(self.0 & !category.bit())
    }

    #[inline]
    pub fn contains(self, category: SurfaceCategory) -> bool {
        self.0 & category.bit() != 0
    }

    /// True when the two masks share at least one category.
    #[inline]
    pub fn intersects(self, other: SurfaceMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// Per-actor filter applied to collision queries.
#[derive(Clone, Debug)]
pub struct CollisionFilter {
    /// Categories visible to horizontal probes.
    pub horizontal: SurfaceMask,
    /// Categories visible to vertical probes.
    pub vertical: SurfaceMask,
    /// Surfaces this actor ignores even when the mask matches.
    pub exempt: Vec<SurfaceId>,
}

impl CollisionFilter {
    pub fn new(horizontal: SurfaceMask, vertical: SurfaceMask) -> Self {
        Self {
            horizontal,
            vertical,
            exempt: Vec::new(),
        }
    }

    /// Mark a surface as ignored for this actor.
    pub fn exempt_surface(&mut self, surface: SurfaceId) {
        if !self.exempt.contains(&surface) {
            self.exempt.push(surface);
        }
    }

    #[inline]
    pub fn is_exempt(&self, surface: SurfaceId) -> bool {
        self.exempt.contains(&surface)
    }
}

impl Default for CollisionFilter {
    /// Walls come from terrain only; floors and ceilings also include
    /// platforms, since one-way platforms only ever matter vertically.
    fn default() -> Self {
        Self::new(
            SurfaceMask::only(SurfaceCategory::Terrain).with(SurfaceCategory::Hazard),
            SurfaceMask::only(SurfaceCategory::Terrain)
                .with(SurfaceCategory::Platform)
                .with(SurfaceCategory::Hazard),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_bit_ops_round_trip() {
        let m = SurfaceMask::only(SurfaceCategory::Terrain).with(SurfaceCategory::Platform);

        assert!(m.contains(SurfaceCategory::Terrain));
        assert!(m.contains(SurfaceCategory::Platform));
        assert!(!m.contains(SurfaceCategory::Hazard));

        let m = m.without(SurfaceCategory::Platform);
        assert!(!m.contains(SurfaceCategory::Platform));
    }

    #[test]
    fn mask_intersection() {
        let a = SurfaceMask::only(SurfaceCategory::Terrain);
        let b = SurfaceMask::only(SurfaceCategory::Platform);

        assert!(!a.intersects(b));
        assert!(a.intersects(a.with(SurfaceCategory::Platform)));
        assert!(SurfaceMask::ALL.intersects(a));
        assert!(!SurfaceMask::NONE.intersects(SurfaceMask::ALL));
    }

    #[test]
    fn default_filter_hides_platforms_from_horizontal_rays() {
        let f = CollisionFilter::default();
        assert!(!f.horizontal.contains(SurfaceCategory::Platform));
        assert!(f.vertical.contains(SurfaceCategory::Platform));
    }

    #[test]
    fn exemptions_deduplicate() {
        let mut f = CollisionFilter::default();
        f.exempt_surface(SurfaceId(7));
        f.exempt_surface(SurfaceId(7));

        assert_eq!(f.exempt.len(), 1);
        assert!(f.is_exempt(SurfaceId(7)));
        assert!(!f.is_exempt(SurfaceId(8)));
    }
}
