//! Seek, flee and arrive

use glam::Vec3;

use super::Target;
use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::{BehaviorKind, BehaviorSettings, forces};

/// Seek behavior - move towards a target at full speed
#[derive(Debug, Clone, Default)]
pub struct Seek {
    pub settings: BehaviorSettings,
    pub target: Option<Target>,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            target: Some(target.into()),
            ..Default::default()
        }
    }

    pub fn set_target(&mut self, target: impl Into<Target>) {
        self.target = Some(target.into());
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }
}

impl SteeringBehavior for Seek {
    crate::ai::behavior_settings!(BehaviorKind::Seek);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        self.target
            .is_some_and(|target| target.resolve(frame.world).is_some())
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some(target) = self.target.and_then(|t| t.resolve(frame.world)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::seek(
            agent.position(),
            target,
            agent.velocity,
            agent.max_speed,
            self.settings.force_influence(),
        )
    }
}

/// Flee behavior - move away from a threat inside the panic radius
#[derive(Debug, Clone, Default)]
pub struct Flee {
    pub settings: BehaviorSettings,
    pub threat: Option<Target>,
}

impl Flee {
    /// Create a new flee behavior
    #[must_use]
    pub fn new(threat: impl Into<Target>) -> Self {
        Self {
            threat: Some(threat.into()),
            ..Default::default()
        }
    }

    pub fn set_threat(&mut self, threat: impl Into<Target>) {
        self.threat = Some(threat.into());
    }

    pub fn clear_threat(&mut self) {
        self.threat = None;
    }
}

impl SteeringBehavior for Flee {
    crate::ai::behavior_settings!(BehaviorKind::Flee);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        self.threat
            .is_some_and(|threat| threat.resolve(frame.world).is_some())
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some(threat) = self.threat.and_then(|t| t.resolve(frame.world)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::flee(
            agent.position(),
            threat,
            agent.panic_distance_sq,
            agent.velocity,
            agent.max_speed,
            self.settings.force_influence(),
        )
    }
}

/// Arrive behavior - move towards a destination and slow down
#[derive(Debug, Clone, Default)]
pub struct Arrive {
    pub settings: BehaviorSettings,
    pub destination: Option<Target>,
}

impl Arrive {
    /// Create a new arrive behavior
    #[must_use]
    pub fn new(destination: impl Into<Target>) -> Self {
        Self {
            destination: Some(destination.into()),
            ..Default::default()
        }
    }

    pub fn set_destination(&mut self, destination: impl Into<Target>) {
        self.destination = Some(destination.into());
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
    }
}

impl SteeringBehavior for Arrive {
    crate::ai::behavior_settings!(BehaviorKind::Arrive);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        frame.agent.deceleration_tweak > 0.0
            && self
                .destination
                .is_some_and(|destination| destination.resolve(frame.world).is_some())
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some(destination) = self.destination.and_then(|d| d.resolve(frame.world)) else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        forces::arrive(
            agent.position(),
            destination,
            agent.deceleration,
            agent.velocity,
            agent.max_speed,
            self.settings.force_influence(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behaviors::test_support::agent_state;
    use crate::ecs::{Transform, World};

    #[test]
    fn test_seek_requires_target() {
        let mut world = World::new();
        let entity = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(entity, Vec3::ZERO, Vec3::ZERO);
        let frame = SteeringFrame::new(&state, &world, None);

        let mut seek = Seek::default();
        assert!(!seek.can_compute(&frame));

        seek.set_target(Vec3::new(10.0, 0.0, 0.0));
        assert!(seek.can_compute(&frame));
    }

    #[test]
    fn test_seek_stores_force() {
        let mut world = World::new();
        let entity = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(entity, Vec3::ZERO, Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);

        let mut seek = Seek::new(Vec3::new(10.0, 0.0, 0.0));
        seek.compute(&mut frame);
        assert!((seek.force() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_seek_tracks_entity_and_goes_ineligible_when_gone() {
        let mut world = World::new();
        let entity = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let quarry = world.spawn_agent(Transform::from_position(Vec3::Z * 5.0), 0.5, 10.0);
        let state = agent_state(entity, Vec3::ZERO, Vec3::ZERO);

        let mut seek = Seek::new(quarry);
        {
            let mut frame = SteeringFrame::new(&state, &world, None);
            assert!(seek.can_compute(&frame));
            assert!(seek.calculate(&mut frame).z > 0.0);
        }

        world.despawn(quarry).unwrap();
        let frame = SteeringFrame::new(&state, &world, None);
        assert!(!seek.can_compute(&frame));
    }

    #[test]
    fn test_flee_panic_distance() {
        let mut world = World::new();
        let entity = world.spawn_agent(Transform::new(), 0.5, 10.0);
        // Panic distance 5 (squared 25), threat 10 away
        let state = agent_state(entity, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);

        let mut flee = Flee::new(Vec3::ZERO);
        assert_eq!(flee.calculate(&mut frame), Vec3::ZERO);
    }

    #[test]
    fn test_arrive_needs_positive_tweak() {
        let mut world = World::new();
        let entity = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let mut state = agent_state(entity, Vec3::ZERO, Vec3::ZERO);
        let arrive = Arrive::new(Vec3::X);

        assert!(arrive.can_compute(&SteeringFrame::new(&state, &world, None)));

        state.deceleration_tweak = 0.0;
        assert!(!arrive.can_compute(&SteeringFrame::new(&state, &world, None)));
    }
}
