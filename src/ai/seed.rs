//! Random seed replication
//!
//! Every replica of an agent has to draw from the same random stream, or
//! wander and dithering diverge between machines. The authoritative host
//! picks one seed per agent and ships it through whatever reliable, ordered
//! transport the session layer provides; replicas build their stream only
//! once it arrives, and stay unseeded (wander and dithering idle) until then.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use super::AutonomousAgent;
use crate::core::{SteeringError, SteeringResult};

/// Seed for one replicated agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedMessage {
    pub network_id: u64,
    pub seed: u64,
}

/// Outgoing side of the session transport.
///
/// Implementations are expected to deliver reliably and in order; no retry
/// happens here.
pub trait SeedChannel {
    /// Send a seed to every replica
    fn broadcast(&mut self, message: SeedMessage) -> SteeringResult<()>;
}

impl SeedChannel for Vec<SeedMessage> {
    fn broadcast(&mut self, message: SeedMessage) -> SteeringResult<()> {
        self.push(message);
        Ok(())
    }
}

impl SeedChannel for mpsc::Sender<SeedMessage> {
    fn broadcast(&mut self, message: SeedMessage) -> SteeringResult<()> {
        self.send(message)
            .map_err(|e| SteeringError::Channel(e.to_string()))
    }
}

/// Who decides the seed in a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedRole {
    /// No session; seeds are local
    #[default]
    Standalone,
    /// Generates and broadcasts seeds
    Authority,
    /// Waits for the authority's seed
    Replica,
}

/// Seed state of one replicated agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReplication {
    network_id: u64,
    role: SeedRole,
    seed: Option<u64>,
}

impl SeedReplication {
    pub fn new(network_id: u64, role: SeedRole) -> Self {
        Self {
            network_id,
            role,
            seed: None,
        }
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    pub fn role(&self) -> SeedRole {
        self.role
    }

    /// Seed in use, once started or received
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_synchronized(&self) -> bool {
        self.seed.is_some()
    }

    /// Seed the agent with `seed`, broadcasting it first when authoritative.
    ///
    /// A session that already has a seed keeps it; nothing is sent again.
    ///
    /// # Errors
    ///
    /// `NotAuthority` on a replica, or the channel's error if the broadcast
    /// fails. The agent stays unseeded on error.
    pub fn start(
        &mut self,
        agent: &mut AutonomousAgent,
        channel: &mut impl SeedChannel,
        seed: u64,
    ) -> SteeringResult<()> {
        if let Some(existing) = self.seed {
            log::debug!(
                "seed session {} already started with {existing}",
                self.network_id
            );
            return Ok(());
        }

        match self.role {
            SeedRole::Replica => return Err(SteeringError::NotAuthority(self.network_id)),
            SeedRole::Authority => channel.broadcast(SeedMessage {
                network_id: self.network_id,
                seed,
            })?,
            SeedRole::Standalone => {}
        }

        agent.seed(seed);
        self.seed = Some(seed);
        log::debug!("seed session {} started as {:?}", self.network_id, self.role);
        Ok(())
    }

    /// `start` with a seed drawn from the thread-local generator
    ///
    /// # Errors
    ///
    /// Same as `start`
    pub fn start_with_entropy(
        &mut self,
        agent: &mut AutonomousAgent,
        channel: &mut impl SeedChannel,
    ) -> SteeringResult<()> {
        self.start(agent, channel, rand::random())
    }

    /// Apply a seed from the authority.
    ///
    /// Returns `true` when the message seeded the agent. Messages for other
    /// network ids, repeats after the first, and anything reaching a
    /// non-replica are ignored.
    pub fn receive(&mut self, agent: &mut AutonomousAgent, message: &SeedMessage) -> bool {
        if self.role != SeedRole::Replica || message.network_id != self.network_id {
            return false;
        }
        if self.seed.is_some() {
            log::trace!("duplicate seed for {} ignored", self.network_id);
            return false;
        }

        agent.seed(message.seed);
        self.seed = Some(message.seed);
        log::debug!("replica {} received its seed", self.network_id);
        true
    }

    /// Send the session's seed again, for replicas that joined late
    ///
    /// # Errors
    ///
    /// `NotAuthority` unless authoritative, `SessionNotStarted` before `start`
    pub fn resync(&self, channel: &mut impl SeedChannel) -> SteeringResult<()> {
        if self.role != SeedRole::Authority {
            return Err(SteeringError::NotAuthority(self.network_id));
        }
        let seed = self
            .seed
            .ok_or(SteeringError::SessionNotStarted(self.network_id))?;
        channel.broadcast(SeedMessage {
            network_id: self.network_id,
            seed,
        })
    }
}
