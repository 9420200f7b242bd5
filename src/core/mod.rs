//! Core module
//!
//! Error type, agent configuration, deterministic randomness, and the frame clock

mod config;
mod error;
mod rng;
mod time;

pub use config::{AgentConfig, BehaviorConfig};
pub use error::{SteeringError, SteeringResult};
pub use rng::SteeringRng;
pub use time::Time;
