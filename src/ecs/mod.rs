//! Entity Component System module
//!
//! Built on top of the hecs ECS library. This is the world collaborator the
//! steering system queries for nearby entities and writes agent motion into.

mod bounds;
mod components;
mod world;

pub use bounds::{Aabb, BoundingSphere, Bounds, Ray, RayHit};
pub use components::{EntityKind, MaxSpeed, Transform, Velocity};
pub use world::{EntitySnapshot, SpatialQuery, SteeringWorld, World};
