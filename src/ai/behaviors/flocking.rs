//! Group behaviors driven by the entities in a context

use glam::Vec3;
use smallvec::SmallVec;

use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::{BehaviorKind, BehaviorSettings, SteeringContext, forces};
use crate::ecs::EntityKind;

/// Neighborhood radius used by flocking behaviors unless configured otherwise
pub const DEFAULT_NEIGHBOR_RADIUS: f32 = 10.0;

type Neighbors = SmallVec<[Vec3; 16]>;

fn flock_context() -> SteeringContext {
    let mut context = SteeringContext::within(DEFAULT_NEIGHBOR_RADIUS);
    context.consider_kind(EntityKind::Agent, 1.0);
    context
}

/// Keep a distance from neighbors, stronger the closer they are
#[derive(Debug, Clone)]
pub struct Separation {
    pub settings: BehaviorSettings,
    pub context: SteeringContext,
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            settings: BehaviorSettings::default(),
            context: flock_context(),
        }
    }
}

impl SteeringBehavior for Separation {
    crate::ai::contextual_behavior!(BehaviorKind::Separation);

    fn can_compute(&self, _frame: &SteeringFrame<'_>) -> bool {
        true
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let position = frame.agent.position();
        let mask = self.settings.force_influence();
        self.context
            .entries()
            .iter()
            .map(|entry| forces::separation(position, &[entry.position()], mask) * entry.weight)
            .sum()
    }
}

/// Steer towards the average heading of neighbors
#[derive(Debug, Clone)]
pub struct Alignment {
    pub settings: BehaviorSettings,
    pub context: SteeringContext,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            settings: BehaviorSettings::default(),
            context: flock_context(),
        }
    }
}

impl SteeringBehavior for Alignment {
    crate::ai::contextual_behavior!(BehaviorKind::Alignment);

    fn can_compute(&self, _frame: &SteeringFrame<'_>) -> bool {
        true
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let forwards: Neighbors = self
            .context
            .entries()
            .iter()
            .map(|entry| entry.snapshot.forward())
            .collect();
        forces::alignment(
            frame.agent.heading,
            &forwards,
            self.settings.force_influence(),
        )
    }
}

/// Steer towards the center of neighbors
#[derive(Debug, Clone)]
pub struct Cohesion {
    pub settings: BehaviorSettings,
    pub context: SteeringContext,
}

impl Default for Cohesion {
    fn default() -> Self {
        Self {
            settings: BehaviorSettings::default(),
            context: flock_context(),
        }
    }
}

impl SteeringBehavior for Cohesion {
    crate::ai::contextual_behavior!(BehaviorKind::Cohesion);

    fn can_compute(&self, _frame: &SteeringFrame<'_>) -> bool {
        true
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let positions: Neighbors = self
            .context
            .entries()
            .iter()
            .map(|entry| entry.position())
            .collect();
        let agent = frame.agent;
        forces::cohesion(
            agent.position(),
            agent.velocity,
            agent.max_speed,
            &positions,
            self.settings.force_influence(),
        )
    }
}
