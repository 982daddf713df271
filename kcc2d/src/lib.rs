/*!
kcc2d: a raycast-based kinematic character controller for 2D platformers.

The controller moves a single axis-aligned actor box through a world of
static and one-way surfaces using discrete corner raycasts instead of a
rigid-body simulation. It resolves a requested per-tick displacement into a
collision-safe one, tracks contact state (grounded, walled, ceilinged,
sloped), climbs and descends slopes, latches through one-way platforms, and
drives variable-height jumps and wall interactions from closed-form
kinematics.

Typical wiring: build a [`StaticWorld`] when content loads, validate a
[`ControllerConfig`] once, then drive a [`KinematicBody`] with a [`Motor`]
from a fixed-step loop:

```no_run
use kcc2d::{
    Bounds, CollisionFilter, ControllerConfig, FrameInput, KinematicBody, Motor, Point2,
    StaticWorld, Vec2,
};

let world = StaticWorld::new(Vec::new());
let config = ControllerConfig::default().validated().expect("valid config");
let mut body = KinematicBody::new(
    Bounds::new(Point2::new(0.0, 2.0), Vec2::new(0.5, 0.5)),
    config,
    CollisionFilter::default(),
);
let mut motor = Motor::new(config);

loop {
    let input = FrameInput::idle(); // sample your input device here
    let displacement = motor.step(&mut body, &world, &input, 1.0 / 60.0);
    let _ = (displacement, body.collision_info());
}
```
*/

pub mod collision;
pub mod config;
pub mod input;
pub mod movement;
pub mod utils;

pub use collision::{
    Bounds, CollisionFilter, CollisionState, Hit, KinematicBody, MoveOptions, Point2, RayOrigins,
    RayWorld, StaticShape, StaticWorld, Surface, SurfaceCategory, SurfaceId, SurfaceKind,
    SurfaceMask, Transform2, Vec2,
};
pub use config::{ConfigError, ControllerConfig, JumpKinematics, ValidatedConfig};
pub use input::FrameInput;
pub use movement::{Motor, VelocityState};
