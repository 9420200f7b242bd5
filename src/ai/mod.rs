//! Steering module
//!
//! Force algorithms, the behaviors built on them, the per-agent orchestrator
//! that runs behaviors in priority order, and the agent that integrates the
//! combined force. Also grid pathfinding for `PathFollowing` and seed
//! replication for reproducible wander and dithering.

pub mod behaviors;
pub mod forces;

mod agent;
mod behavior;
mod bundle;
mod combine;
mod compute;
mod context;
mod pathfinding;
mod seed;

pub use agent::{AutonomousAgent, Deceleration};
pub use behavior::{AgentState, BehaviorKind, BehaviorSettings, SteeringBehavior, SteeringFrame};
pub use behaviors::{
    Alignment, Arrive, Cohesion, Evade, Flee, Hide, Interpose, ObstacleAvoidance, OffsetPursuit,
    Path, PathFollowing, Pursuit, Separation, Seek, Target, WallAvoidance, Wander,
};
pub use bundle::Behaviors;
pub use combine::{CombinationStrategy, Contribution};
pub use compute::ComputeSteeringForces;
pub use context::{ContextEntry, SteeringContext};
pub use pathfinding::{NavGrid, NavPath};
pub use seed::{SeedChannel, SeedMessage, SeedReplication, SeedRole};

pub(crate) use behavior::{behavior_settings, contextual_behavior};
