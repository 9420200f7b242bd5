//! Optional physics collaborator
//!
//! Built on top of rapier3d. Agents bound to a body hand their velocity to
//! the body and read its position back instead of integrating it.

mod world;

pub use world::{Physics, RigidBodyHandle};
