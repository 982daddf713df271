/*!
Collision root module.

This module re-exports submodules that implement the raycast-based collision
core of the controller. The code is split for clarity:

- types:     shared data types (math aliases, Hit, Bounds, ray origins)
- settings:  numeric tolerances and input thresholds
- mask:      surface categories and the per-actor collision filter
- world:     static world geometry, BVH broad phase, nearest-hit ray casts
- state:     the per-actor contact/slope record
- body:      the kinematic body and its horizontal/vertical resolvers
- slopes:    climb / descend / mid-step slope transition
*/

pub mod body;
pub mod mask;
pub mod settings;
pub mod slopes;
pub mod state;
pub mod types;
pub mod world;

// Re-export commonly used types and functions.
pub use body::{KinematicBody, MoveOptions};
pub use mask::{CollisionFilter, SurfaceCategory, SurfaceMask};
pub use state::CollisionState;
pub use types::{Bounds, Hit, Point2, RayOrigins, SurfaceId, SurfaceKind, Vec2};
pub use world::{RayWorld, StaticShape, StaticWorld, Surface, Transform2};
