//! Wander: a seeded random walk ahead of the agent

use glam::Vec3;

use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::forces::{self, WanderParams};
use crate::ai::{BehaviorKind, BehaviorSettings};

/// Random walk on a sphere projected ahead of the agent.
///
/// Draws three values per frame from the agent's seeded stream, so the
/// behavior stays idle until the agent has been seeded.
#[derive(Debug, Clone)]
pub struct Wander {
    pub settings: BehaviorSettings,
    pub radius: f32,
    pub distance: f32,
    pub jitter: f32,
    /// Offset from the wander sphere's center, of length `radius`
    target: Vec3,
}

impl Wander {
    #[must_use]
    pub fn new(radius: f32, distance: f32, jitter: f32) -> Self {
        Self {
            radius,
            distance,
            jitter,
            target: Vec3::NEG_Z * radius,
            ..Default::default()
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Put the target back in front of the agent
    pub fn reset_target(&mut self) {
        self.target = Vec3::NEG_Z * self.radius;
    }

    fn params(&self) -> WanderParams {
        WanderParams {
            radius: self.radius,
            distance: self.distance,
            jitter: self.jitter,
        }
    }
}

impl Default for Wander {
    fn default() -> Self {
        Self {
            settings: BehaviorSettings::default(),
            radius: 1.2,
            distance: 2.0,
            jitter: 0.8,
            target: Vec3::NEG_Z * 1.2,
        }
    }
}

impl SteeringBehavior for Wander {
    crate::ai::behavior_settings!(BehaviorKind::Wander);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        self.jitter != 0.0 && self.radius > 0.0 && frame.has_rng()
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let params = self.params();
        let agent = frame.agent;
        let Some(rng) = frame.rng.as_deref_mut() else {
            return Vec3::ZERO;
        };
        forces::wander(
            rng,
            agent.position(),
            agent.velocity,
            agent.forward(),
            &mut self.target,
            &params,
            agent.max_speed,
            self.settings.force_influence(),
        )
    }
}
