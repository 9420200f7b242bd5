//! Error type shared by the steering crate

use hecs::Entity;
use thiserror::Error;

use crate::ai::BehaviorKind;

/// Errors surfaced to the caller at the point of misuse.
///
/// Per-frame numeric work never produces these; a behavior that cannot run
/// simply contributes no force that frame.
#[derive(Debug, Error)]
pub enum SteeringError {
    /// A behavior of the same type is already active and unicity was requested
    #[error("a {0:?} behavior is already active on this agent")]
    DuplicateBehavior(BehaviorKind),

    /// The behavior is not part of the agent's active set
    #[error("no active {0:?} behavior on this agent")]
    BehaviorNotActive(BehaviorKind),

    /// Custom behaviors have no bundled instance and must be added boxed
    #[error("{0:?} is not a built-in behavior")]
    NotBuiltIn(BehaviorKind),

    /// The agent's entity is missing from the world
    #[error("entity {0:?} has no transform in the world")]
    MissingEntity(Entity),

    /// Seed replication was used before the session started
    #[error("seed replication for network id {0} has not started")]
    SessionNotStarted(u64),

    /// Only the authoritative host may generate and broadcast seeds
    #[error("network id {0} is not the seed authority")]
    NotAuthority(u64),

    /// Transport collaborator failed to deliver a message
    #[error("seed channel error: {0}")]
    Channel(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

/// Shorthand result type for the crate
pub type SteeringResult<T> = Result<T, SteeringError>;
