//! Behaviors that react to another moving entity

use glam::Vec3;
use hecs::Entity;

use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::forces::{self, Moving, Quarry};
use crate::ai::{BehaviorKind, BehaviorSettings};
use crate::ecs::{EntitySnapshot, SpatialQuery};

fn quarry(snapshot: &EntitySnapshot) -> Quarry {
    Quarry {
        position: snapshot.position(),
        forward: snapshot.forward(),
        velocity: snapshot.velocity,
        speed: snapshot.speed(),
    }
}

fn present(world: &dyn SpatialQuery, entity: Option<Entity>) -> bool {
    entity.is_some_and(|e| world.snapshot(e).is_some())
}

/// Chase another entity, leading it by its current velocity
#[derive(Debug, Clone, Default)]
pub struct Pursuit {
    pub settings: BehaviorSettings,
    pub target: Option<Entity>,
}

impl Pursuit {
    #[must_use]
    pub fn new(target: Entity) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }
}

impl SteeringBehavior for Pursuit {
    crate::ai::behavior_settings!(BehaviorKind::Pursuit);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        present(frame.world, self.target)
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some(evader) = self.target.and_then(|e| frame.world.snapshot(e)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::pursuit(
            agent.position(),
            agent.heading,
            agent.velocity,
            agent.max_speed,
            &quarry(&evader),
            self.settings.force_influence(),
        )
    }
}

/// Run from a pursuer, fleeing its predicted position
#[derive(Debug, Clone, Default)]
pub struct Evade {
    pub settings: BehaviorSettings,
    pub pursuer: Option<Entity>,
}

impl Evade {
    #[must_use]
    pub fn new(pursuer: Entity) -> Self {
        Self {
            pursuer: Some(pursuer),
            ..Default::default()
        }
    }
}

impl SteeringBehavior for Evade {
    crate::ai::behavior_settings!(BehaviorKind::Evade);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        present(frame.world, self.pursuer)
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some(pursuer) = self.pursuer.and_then(|e| frame.world.snapshot(e)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::evade(
            agent.position(),
            agent.velocity,
            agent.max_speed,
            pursuer.position(),
            pursuer.velocity,
            pursuer.max_speed,
            agent.panic_distance_sq,
            self.settings.force_influence(),
        )
    }
}

/// Hold a slot expressed in the leader's local frame
#[derive(Debug, Clone, Default)]
pub struct OffsetPursuit {
    pub settings: BehaviorSettings,
    pub leader: Option<Entity>,
    /// Offset in the leader's local space
    pub offset: Vec3,
}

impl OffsetPursuit {
    #[must_use]
    pub fn new(leader: Entity, offset: Vec3) -> Self {
        Self {
            leader: Some(leader),
            offset,
            ..Default::default()
        }
    }
}

impl SteeringBehavior for OffsetPursuit {
    crate::ai::behavior_settings!(BehaviorKind::OffsetPursuit);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        frame.agent.deceleration_tweak > 0.0 && present(frame.world, self.leader)
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some(leader) = self.leader.and_then(|e| frame.world.snapshot(e)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::offset_pursuit(
            agent.position(),
            agent.velocity,
            agent.max_speed,
            agent.deceleration,
            leader.velocity,
            leader.max_speed,
            leader.transform.transform_point(self.offset),
            self.settings.force_influence(),
        )
    }
}

/// Get between two entities
#[derive(Debug, Clone, Default)]
pub struct Interpose {
    pub settings: BehaviorSettings,
    pub first: Option<Entity>,
    pub second: Option<Entity>,
}

impl Interpose {
    #[must_use]
    pub fn new(first: Entity, second: Entity) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
            ..Default::default()
        }
    }
}

impl SteeringBehavior for Interpose {
    crate::ai::behavior_settings!(BehaviorKind::Interpose);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        frame.agent.deceleration_tweak > 0.0
            && present(frame.world, self.first)
            && present(frame.world, self.second)
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let lookup = |e: Option<Entity>| {
            e.and_then(|e| frame.world.snapshot(e)).map(|s| Moving {
                position: s.position(),
                velocity: s.velocity,
            })
        };
        let (Some(a), Some(b)) = (lookup(self.first), lookup(self.second)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::interpose(
            agent.position(),
            agent.velocity,
            &a,
            &b,
            agent.max_speed,
            agent.deceleration,
            self.settings.force_influence(),
        )
    }
}
