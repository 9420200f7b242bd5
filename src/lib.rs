//! Autonomous-agent steering for NPC movement in a 3D world
//!
//! This crate provides:
//! - A stateless steering force library (seek, flee, arrive, pursuit, flocking, ...)
//! - Behaviors with eligibility checks and entity context filters
//! - Per-agent priority ordering and force combination strategies
//! - Force integration with smooth rotation and banking
//! - Deterministic seed replication for distributed simulations

pub mod ai;
pub mod core;
pub mod ecs;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        AutonomousAgent, BehaviorKind, BehaviorSettings, Behaviors, CombinationStrategy,
        ComputeSteeringForces, Deceleration, NavGrid, Path, SeedMessage, SeedReplication,
        SeedRole, SteeringBehavior, SteeringContext, SteeringFrame, Target,
    };
    pub use crate::core::{AgentConfig, BehaviorConfig, SteeringError, SteeringResult, Time};
    pub use crate::ecs::{Bounds, EntityKind, SpatialQuery, SteeringWorld, Transform, World};
    pub use crate::physics::{Physics, RigidBodyHandle};
    pub use glam::{Quat, Vec3};
}
