//! Hide behind obstacles from a hunter

use glam::Vec3;
use hecs::Entity;

use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::{BehaviorKind, BehaviorSettings, Deceleration, SteeringContext, forces};
use crate::ecs::EntityKind;

/// Put an obstacle between the agent and a hunter.
///
/// Candidate spots come from the context; with none in range the agent
/// evades the hunter instead.
#[derive(Debug, Clone)]
pub struct Hide {
    pub settings: BehaviorSettings,
    pub context: SteeringContext,
    pub hunter: Option<Entity>,
    /// Gap kept between the hiding spot and the obstacle's surface
    pub distance_from_boundary: f32,
}

impl Hide {
    #[must_use]
    pub fn new(hunter: Entity) -> Self {
        Self {
            hunter: Some(hunter),
            ..Default::default()
        }
    }

    fn best_spot(&self, agent_position: Vec3, hunter_position: Vec3, hunter: Entity) -> Option<Vec3> {
        self.context
            .entries()
            .iter()
            .filter(|entry| entry.entity() != hunter)
            .map(|entry| {
                forces::hiding_position(
                    entry.position(),
                    entry.snapshot.radius(),
                    self.distance_from_boundary,
                    hunter_position,
                )
            })
            .min_by(|a, b| {
                a.distance_squared(agent_position)
                    .total_cmp(&b.distance_squared(agent_position))
            })
    }
}

impl Default for Hide {
    fn default() -> Self {
        let mut context = SteeringContext::within(20.0);
        context.consider_kind(EntityKind::Obstacle, 1.0);
        Self {
            settings: BehaviorSettings::default(),
            context,
            hunter: None,
            distance_from_boundary: 2.0,
        }
    }
}

impl SteeringBehavior for Hide {
    crate::ai::contextual_behavior!(BehaviorKind::Hide);

    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        frame.agent.deceleration_tweak > 0.0
            && self.hunter.is_some_and(|h| frame.world.snapshot(h).is_some())
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let Some((hunter, snapshot)) = self
            .hunter
            .and_then(|h| frame.world.snapshot(h).map(|s| (h, s)))
        else {
            return Vec3::ZERO;
        };
        let agent = frame.agent;
        let mask = self.settings.force_influence();

        match self.best_spot(agent.position(), snapshot.position(), hunter) {
            Some(spot) => forces::arrive(
                agent.position(),
                spot,
                Deceleration::Fast.factor(agent.deceleration_tweak),
                agent.velocity,
                agent.max_speed,
                mask,
            ),
            None => forces::evade(
                agent.position(),
                agent.velocity,
                agent.max_speed,
                snapshot.position(),
                snapshot.velocity,
                snapshot.max_speed,
                agent.panic_distance_sq,
                mask,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behaviors::test_support::agent_state;
    use crate::ecs::{Bounds, Transform, World};

    #[test]
    fn test_hide_behind_nearest_obstacle() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let hunter = world.spawn_agent(Transform::from_position(Vec3::X * -6.0), 0.5, 10.0);
        world.spawn_obstacle(Vec3::X * 3.0, Bounds::sphere(1.0), EntityKind::Obstacle);
        world.spawn_obstacle(Vec3::Z * 15.0, Bounds::sphere(1.0), EntityKind::Obstacle);

        let state = agent_state(me, Vec3::ZERO, Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);
        let mut hide = Hide::new(hunter);
        hide.refresh_context(&frame);
        assert_eq!(hide.context.len(), 2);

        // Spot behind the first obstacle is at x = 6
        let force = hide.calculate(&mut frame);
        assert!(force.x > 0.0);
        assert!(force.z.abs() < 1e-4);
    }

    #[test]
    fn test_hide_evades_without_cover() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let hunter = world.spawn_agent(Transform::from_position(Vec3::X * 2.0), 0.5, 10.0);

        let state = agent_state(me, Vec3::ZERO, Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);
        let mut hide = Hide::new(hunter);
        hide.refresh_context(&frame);
        assert!(hide.context.is_empty());

        let force = hide.calculate(&mut frame);
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_hide_needs_hunter() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(me, Vec3::ZERO, Vec3::ZERO);

        assert!(!Hide::default().can_compute(&SteeringFrame::new(&state, &world, None)));
    }

    #[test]
    fn test_hide_needs_braking() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let hunter = world.spawn_agent(Transform::from_position(Vec3::X * -6.0), 0.5, 10.0);
        let mut state = agent_state(me, Vec3::ZERO, Vec3::ZERO);
        let hide = Hide::new(hunter);
        assert!(hide.can_compute(&SteeringFrame::new(&state, &world, None)));

        state.deceleration_tweak = 0.0;
        assert!(!hide.can_compute(&SteeringFrame::new(&state, &world, None)));
    }
}
