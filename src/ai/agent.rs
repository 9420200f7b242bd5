//! Autonomous agent: owns the behaviors and integrates their forces

use glam::{Quat, Vec3};
use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::{
    AgentState, Behaviors, BehaviorKind, CombinationStrategy, ComputeSteeringForces,
    SteeringBehavior, SteeringContext, SteeringFrame,
};
use crate::core::{AgentConfig, SteeringError, SteeringResult, SteeringRng};
use crate::ecs::{SpatialQuery, SteeringWorld, Transform};
use crate::physics::{Physics, RigidBodyHandle};

/// Velocities below this squared length leave the orientation untouched
const MIN_VELOCITY_SQ: f32 = 1e-9;

/// Braking profile of arrive-style behaviors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deceleration {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Deceleration {
    /// Base value; larger brakes earlier
    #[must_use]
    pub fn value(self) -> f32 {
        match self {
            Self::Slow => 3.0,
            Self::Normal => 2.0,
            Self::Fast => 1.0,
        }
    }

    /// Factor handed to `forces::arrive`
    #[must_use]
    pub fn factor(self, tweak: f32) -> f32 {
        self.value() * tweak
    }
}

/// A steered entity.
///
/// The agent does not own its position: the transform lives in the world
/// and is read at the start of `update` and written back at the end. All
/// other kinematic state (velocity, smoothed acceleration, banked up axis)
/// belongs to the agent.
#[derive(Debug)]
pub struct AutonomousAgent {
    entity: Entity,
    mass: f32,
    max_force: f32,
    max_turn_rate: f32,
    min_speed: f32,
    max_speed: f32,
    deceleration: Deceleration,
    deceleration_tweak: f32,
    panic_distance_sq: f32,
    pub smooth_rotation: bool,
    pub banking: bool,
    pub banking_up_bias: f32,
    pub banking_acceleration_scale: f32,
    pub banking_smoothing: f32,
    pub strategy: CombinationStrategy,

    velocity: Vec3,
    acceleration: Vec3,
    speed: f32,
    up: Vec3,
    steering_force: Vec3,

    steering: ComputeSteeringForces,
    rng: Option<SteeringRng>,
    body: Option<RigidBodyHandle>,
}

impl AutonomousAgent {
    /// Agent with default tunables and no behaviors
    pub fn new(entity: Entity) -> Self {
        let config = AgentConfig::default();
        let mut agent = Self {
            entity,
            mass: 1.0,
            max_force: 0.0,
            max_turn_rate: 0.0,
            min_speed: 0.0,
            max_speed: 0.0,
            deceleration: Deceleration::Normal,
            deceleration_tweak: 0.0,
            panic_distance_sq: 0.0,
            smooth_rotation: false,
            banking: false,
            banking_up_bias: 0.0,
            banking_acceleration_scale: 0.0,
            banking_smoothing: 0.0,
            strategy: CombinationStrategy::default(),
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            speed: 0.0,
            up: Vec3::Y,
            steering_force: Vec3::ZERO,
            steering: ComputeSteeringForces::new(),
            rng: None,
            body: None,
        };
        agent.apply_tunables(&config);
        agent
    }

    /// Agent configured from a file-backed config, behaviors activated in list order
    ///
    /// # Errors
    ///
    /// Returns an error if the config lists a kind twice or a custom kind
    pub fn from_config(entity: Entity, config: &AgentConfig) -> SteeringResult<Self> {
        let mut agent = Self::new(entity);
        agent.apply_tunables(config);

        for entry in &config.behaviors {
            let behavior = agent.add(entry.kind)?;
            let settings = behavior.settings_mut();
            settings.weight = entry.weight;
            settings.enabled = entry.enabled;
            settings.set_probability(entry.probability);
            settings.set_force_influence(entry.force_influence);
        }
        Ok(agent)
    }

    fn apply_tunables(&mut self, config: &AgentConfig) {
        self.set_mass(config.mass);
        self.max_force = config.max_force;
        self.max_turn_rate = config.max_turn_rate;
        self.min_speed = config.min_speed;
        self.max_speed = config.max_speed;
        self.deceleration = config.deceleration;
        self.deceleration_tweak = config.deceleration_tweak;
        self.set_panic_distance(config.panic_distance);
        self.smooth_rotation = config.smooth_rotation;
        self.banking = config.banking;
        self.banking_up_bias = config.banking_up_bias;
        self.banking_acceleration_scale = config.banking_acceleration_scale;
        self.banking_smoothing = config.banking_smoothing;
        self.strategy = config.strategy;
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass; non-positive values are raised to a tiny positive mass
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(f32::EPSILON);
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    pub fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force;
    }

    pub fn max_turn_rate(&self) -> f32 {
        self.max_turn_rate
    }

    /// Radians per second; zero or less disables the limit
    pub fn set_max_turn_rate(&mut self, rate: f32) {
        self.max_turn_rate = rate;
    }

    pub fn min_speed(&self) -> f32 {
        self.min_speed
    }

    /// Speed floor applied after the cap, so it wins when above `max_speed`
    pub fn set_min_speed(&mut self, speed: f32) {
        self.min_speed = speed;
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn set_max_speed(&mut self, speed: f32) {
        self.max_speed = speed;
    }

    pub fn deceleration(&self) -> Deceleration {
        self.deceleration
    }

    pub fn set_deceleration(&mut self, deceleration: Deceleration) {
        self.deceleration = deceleration;
    }

    pub fn deceleration_tweak(&self) -> f32 {
        self.deceleration_tweak
    }

    pub fn set_deceleration_tweak(&mut self, tweak: f32) {
        self.deceleration_tweak = tweak;
    }

    pub fn panic_distance(&self) -> f32 {
        self.panic_distance_sq.sqrt()
    }

    pub fn set_panic_distance(&mut self, distance: f32) {
        self.panic_distance_sq = distance * distance;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.speed = velocity.length();
    }

    /// Magnitude of the velocity after the last update
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Smoothed acceleration
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Velocity-aligned up axis, including banking
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Combined force of the last update
    pub fn steering_force(&self) -> Vec3 {
        self.steering_force
    }

    /// Activate the bundled behavior of `kind` at the lowest priority
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is already active or is a custom kind
    pub fn add(&mut self, kind: BehaviorKind) -> SteeringResult<&mut dyn SteeringBehavior> {
        self.steering.add(kind)
    }

    /// Activate an owned behavior at the lowest priority
    ///
    /// # Errors
    ///
    /// Returns an error under `unicity` if the kind is already active
    pub fn add_boxed(
        &mut self,
        behavior: Box<dyn SteeringBehavior>,
        unicity: bool,
    ) -> SteeringResult<&mut dyn SteeringBehavior> {
        self.steering.add_boxed(behavior, unicity)
    }

    /// Deactivate a behavior; the remaining priorities stay contiguous
    ///
    /// # Errors
    ///
    /// Returns an error if no behavior of that kind is active
    pub fn remove(&mut self, kind: BehaviorKind) -> SteeringResult<()> {
        self.steering.remove(kind)
    }

    /// Bundled behaviors, active or not
    pub fn behaviors(&self) -> &Behaviors {
        self.steering.behaviors()
    }

    pub fn behaviors_mut(&mut self) -> &mut Behaviors {
        self.steering.behaviors_mut()
    }

    /// The active, priority-ordered set
    pub fn steering(&self) -> &ComputeSteeringForces {
        &self.steering
    }

    pub fn steering_mut(&mut self) -> &mut ComputeSteeringForces {
        &mut self.steering
    }

    /// Context of the active behavior of `kind`, or of the bundled one
    pub fn context_mut(&mut self, kind: BehaviorKind) -> Option<&mut SteeringContext> {
        if self.steering.contains(kind) {
            return self.steering.get_mut(kind)?.context_mut();
        }
        self.steering.behaviors_mut().get_mut(kind)?.context_mut()
    }

    /// Build the random stream; until then wander and dithering stay idle
    pub fn seed(&mut self, seed: u64) {
        log::debug!("agent {:?} seeded with {seed}", self.entity);
        self.rng = Some(SteeringRng::from_seed(seed));
    }

    pub fn has_rng(&self) -> bool {
        self.rng.is_some()
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng.as_ref().map(SteeringRng::seed)
    }

    /// Move through a physics body instead of integrating position directly
    pub fn bind_physics_body(&mut self, body: RigidBodyHandle) {
        self.body = Some(body);
    }

    pub fn physics_body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    fn state(&self, transform: Transform, radius: f32) -> AgentState {
        let heading = self
            .velocity
            .try_normalize()
            .unwrap_or_else(|| transform.forward());
        let side = heading
            .cross(self.up)
            .try_normalize()
            .unwrap_or_else(|| transform.right());
        AgentState {
            entity: self.entity,
            transform,
            velocity: self.velocity,
            speed: self.speed,
            heading,
            side,
            up: side.cross(heading),
            radius,
            mass: self.mass,
            max_force: self.max_force,
            max_speed: self.max_speed,
            min_speed: self.min_speed,
            deceleration: self.deceleration.factor(self.deceleration_tweak),
            deceleration_tweak: self.deceleration_tweak,
            panic_distance_sq: self.panic_distance_sq,
        }
    }

    /// Run one frame: compute, combine, integrate and write back.
    ///
    /// When both a physics world and a bound body are present the body's
    /// velocity is set and its position is written back; the body moves when
    /// the caller steps the physics world.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent's entity is missing from the world
    pub fn update<W: SteeringWorld>(
        &mut self,
        dt: f32,
        world: &mut W,
        physics: Option<&mut Physics>,
    ) -> SteeringResult<()> {
        let dt = dt.max(0.0);
        let snapshot = world
            .snapshot(self.entity)
            .ok_or(SteeringError::MissingEntity(self.entity))?;
        let state = self.state(snapshot.transform, snapshot.radius());

        {
            let query: &dyn SpatialQuery = &*world;
            let mut frame = SteeringFrame::new(&state, query, self.rng.as_mut());
            self.steering.run(&mut frame);
        }

        let contributions = self.steering.contributions();
        let mut force = self
            .strategy
            .combine(&contributions, self.max_force, self.rng.as_mut());
        if !force.is_finite() {
            log::warn!("agent {:?} produced a non-finite force, discarded", self.entity);
            force = Vec3::ZERO;
        }
        self.steering_force = force;

        self.integrate_velocity(force, dt, &snapshot.transform);
        let mut transform = self.orient(snapshot.transform, dt);

        transform.position = match (physics, self.body) {
            (Some(physics), Some(body)) => {
                physics.set_linear_velocity(body, self.velocity);
                physics
                    .position(body)
                    .unwrap_or(transform.position + self.velocity * dt)
            }
            _ => transform.position + self.velocity * dt,
        };

        self.speed = self.velocity.length();
        self.steering.reset_forces();
        world.write_back(self.entity, transform, self.velocity)?;

        log::trace!(
            "agent {:?} force {force} speed {:.3} at {}",
            self.entity,
            self.speed,
            transform.position
        );
        Ok(())
    }

    fn integrate_velocity(&mut self, force: Vec3, dt: f32, transform: &Transform) {
        let target = force / self.mass;
        let rate = (9.0 * dt).clamp(0.15, 0.4);
        self.acceleration = self.acceleration.lerp(target, rate);

        self.velocity += self.acceleration * dt;
        if self.max_speed > 0.0 {
            self.velocity = self.velocity.clamp_length_max(self.max_speed);
        }
        if self.min_speed > 0.0 && self.velocity.length() < self.min_speed {
            let direction = self
                .velocity
                .try_normalize()
                .unwrap_or_else(|| transform.forward());
            self.velocity = direction * self.min_speed;
        }
    }

    /// New transform from the velocity-aligned frame; unchanged at rest
    fn orient(&mut self, transform: Transform, dt: f32) -> Transform {
        let speed_sq = self.velocity.length_squared();
        if speed_sq <= MIN_VELOCITY_SQ || !speed_sq.is_finite() {
            return transform;
        }
        let speed = speed_sq.sqrt();
        let mut heading = self.velocity / speed;

        if self.smooth_rotation && self.max_turn_rate > 0.0 {
            let facing = transform.forward();
            let angle = facing.angle_between(heading);
            let max_angle = self.max_turn_rate * dt;
            if angle.is_finite() && angle > max_angle {
                let axis = facing
                    .cross(heading)
                    .try_normalize()
                    .unwrap_or_else(|| transform.up());
                heading = (Quat::from_axis_angle(axis, max_angle) * facing).normalize();
                self.velocity = heading * speed;
            }
        }

        let right = heading
            .cross(self.up)
            .try_normalize()
            .unwrap_or_else(|| transform.right());
        let mut up = right.cross(heading);

        if self.banking {
            let lateral = self.acceleration - heading * self.acceleration.dot(heading);
            let target = (Vec3::Y * self.banking_up_bias + lateral * self.banking_acceleration_scale)
                .try_normalize()
                .unwrap_or(up);
            let blend = (dt * self.banking_smoothing).clamp(0.0, 1.0);
            let banked = up.lerp(target, blend);
            let right = heading.cross(banked).try_normalize().unwrap_or(right);
            up = right.cross(heading);
        }

        self.up = up;
        Transform::from_basis(transform.position, heading, up, transform.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{BoundingSphere, EntitySnapshot, World};

    fn spawn(world: &mut World, position: Vec3) -> AutonomousAgent {
        let entity = world.spawn_agent(Transform::from_position(position), 0.5, 10.0);
        let mut agent = AutonomousAgent::new(entity);
        agent.set_max_speed(10.0);
        agent.set_max_force(100.0);
        agent.smooth_rotation = false;
        agent
    }

    #[test]
    fn test_deceleration_factor() {
        assert!((Deceleration::Slow.factor(0.5) - 1.5).abs() < 1e-6);
        assert!((Deceleration::Normal.factor(0.3) - 0.6).abs() < 1e-6);
        assert!((Deceleration::Fast.factor(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_panic_distance_stored_squared() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.set_panic_distance(5.0);
        assert!((agent.panic_distance() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_seek_first_frame_is_smoothed() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.add(BehaviorKind::Seek).unwrap();
        agent.behaviors_mut().seek.set_target(Vec3::new(10.0, 0.0, 0.0));

        agent.update(1.0, &mut world, None).unwrap();

        assert!((agent.steering_force() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        // Blend rate clamps to 0.4 at dt = 1
        assert!((agent.velocity() - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
        assert!((agent.speed() - 4.0).abs() < 1e-4);

        let transform = *world.get::<Transform>(agent.entity()).unwrap();
        assert!((transform.position - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
        assert!((transform.forward() - Vec3::X).length() < 1e-4);
        // Forces do not leak into the next frame
        assert_eq!(agent.behaviors().seek.settings.force(), Vec3::ZERO);
    }

    #[test]
    fn test_speed_limits() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.set_velocity(Vec3::X * 50.0);
        agent.update(0.1, &mut world, None).unwrap();
        assert!((agent.speed() - 10.0).abs() < 1e-4);

        let mut slow = spawn(&mut world, Vec3::ONE);
        slow.set_min_speed(2.0);
        slow.update(0.1, &mut world, None).unwrap();
        // At rest the floor pushes along the facing
        assert!((slow.velocity() - Vec3::NEG_Z * 2.0).length() < 1e-4);
    }

    #[test]
    fn test_turn_rate_limits_heading() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.smooth_rotation = true;
        agent.set_max_turn_rate(std::f32::consts::FRAC_PI_4);
        agent.set_velocity(Vec3::X * 5.0);

        agent.update(1.0, &mut world, None).unwrap();

        let transform = *world.get::<Transform>(agent.entity()).unwrap();
        // Facing was -Z, so the heading may only swing 45 degrees toward +X
        let expected = Vec3::new(1.0, 0.0, -1.0).normalize();
        assert!((transform.forward() - expected).length() < 1e-3);
        assert!((agent.velocity().normalize() - expected).length() < 1e-3);
    }

    #[test]
    fn test_reverse_heading_does_not_nan() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.smooth_rotation = true;
        agent.set_max_turn_rate(1.0);
        agent.set_velocity(Vec3::Z * 3.0);

        agent.update(0.5, &mut world, None).unwrap();
        assert!(agent.velocity().is_finite());
        let transform = *world.get::<Transform>(agent.entity()).unwrap();
        assert!(transform.rotation.is_finite());
    }

    #[test]
    fn test_banking_leans_into_turn() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.banking = true;
        agent.banking_acceleration_scale = 0.5;
        agent.banking_smoothing = 10.0;
        agent.set_velocity(Vec3::NEG_Z * 5.0);
        agent.add(BehaviorKind::Seek).unwrap();
        agent.behaviors_mut().seek.set_target(Vec3::new(20.0, 0.0, -5.0));

        agent.update(0.1, &mut world, None).unwrap();

        // Turning toward +X tilts up toward +X
        assert!(agent.up().x > 0.0);
        assert!((agent.up().length() - 1.0).abs() < 1e-4);
    }

    fn assert_orthonormal(transform: &Transform) {
        let (forward, right, up) = (transform.forward(), transform.right(), transform.up());
        for axis in [forward, right, up] {
            assert!((axis.length() - 1.0).abs() < 1e-3);
        }
        assert!(forward.dot(right).abs() < 1e-3);
        assert!(forward.dot(up).abs() < 1e-3);
        assert!(right.dot(up).abs() < 1e-3);
    }

    #[test]
    fn test_frame_stays_orthonormal_while_banking() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.smooth_rotation = true;
        agent.set_max_turn_rate(std::f32::consts::PI);
        agent.banking = true;
        agent.banking_acceleration_scale = 0.5;
        agent.banking_smoothing = 5.0;
        agent.add(BehaviorKind::Seek).unwrap();

        // Straight up, then a reversing dive
        for target in [Vec3::new(0.0, 60.0, 0.0), Vec3::new(30.0, -50.0, 7.0)] {
            agent.behaviors_mut().seek.set_target(target);
            for _ in 0..100 {
                agent.update(1.0 / 30.0, &mut world, None).unwrap();

                let transform = *world.get::<Transform>(agent.entity()).unwrap();
                assert!(transform.position.is_finite());
                assert_orthonormal(&transform);

                assert!((agent.up().length() - 1.0).abs() < 1e-3);
                let heading = agent.velocity().normalize_or_zero();
                assert!(agent.up().dot(heading).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_min_speed_floor_wins_over_cap() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.set_max_speed(2.0);
        agent.set_min_speed(5.0);
        agent.set_velocity(Vec3::X * 10.0);

        agent.update(0.1, &mut world, None).unwrap();
        assert!((agent.speed() - 5.0).abs() < 1e-4);
        assert!((agent.velocity().normalize() - Vec3::X).length() < 1e-4);
    }

    /// Readable world whose write-back always fails
    struct ReadOnlyWorld(World);

    impl SpatialQuery for ReadOnlyWorld {
        fn find_all(&self, out: &mut Vec<EntitySnapshot>) {
            self.0.find_all(out);
        }

        fn find_within_bounds(&self, out: &mut Vec<EntitySnapshot>, bounds: &BoundingSphere) {
            self.0.find_within_bounds(out, bounds);
        }

        fn snapshot(&self, entity: Entity) -> Option<EntitySnapshot> {
            self.0.snapshot(entity)
        }
    }

    impl SteeringWorld for ReadOnlyWorld {
        fn write_back(&mut self, entity: Entity, _: Transform, _: Vec3) -> SteeringResult<()> {
            Err(SteeringError::MissingEntity(entity))
        }
    }

    #[test]
    fn test_forces_reset_when_write_back_fails() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.add(BehaviorKind::Seek).unwrap();
        agent.behaviors_mut().seek.set_target(Vec3::X * 10.0);

        let mut world = ReadOnlyWorld(world);
        assert!(agent.update(0.1, &mut world, None).is_err());
        assert_ne!(agent.steering_force(), Vec3::ZERO);
        assert_eq!(agent.behaviors().seek.settings.force(), Vec3::ZERO);
    }

    #[test]
    fn test_preserves_scale() {
        let mut world = World::new();
        let mut transform = Transform::new();
        transform.scale = Vec3::new(1.0, 2.0, 3.0);
        let entity = world.spawn_agent(transform, 0.5, 10.0);
        let mut agent = AutonomousAgent::new(entity);
        agent.set_velocity(Vec3::X);

        agent.update(0.1, &mut world, None).unwrap();
        assert_eq!(world.get::<Transform>(entity).unwrap().scale, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_missing_entity() {
        let mut world = World::new();
        let agent = spawn(&mut world, Vec3::ZERO);
        world.despawn(agent.entity()).unwrap();

        let mut agent = agent;
        assert!(matches!(
            agent.update(0.1, &mut world, None),
            Err(SteeringError::MissingEntity(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let mut world = World::new();
        let entity = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let config = AgentConfig {
            max_speed: 4.0,
            panic_distance: 3.0,
            behaviors: vec![
                crate::core::BehaviorConfig::new(BehaviorKind::Wander).with_weight(0.5),
                crate::core::BehaviorConfig::new(BehaviorKind::Separation).with_probability(0.2),
            ],
            ..Default::default()
        };

        let agent = AutonomousAgent::from_config(entity, &config).unwrap();
        assert!((agent.max_speed() - 4.0).abs() < 1e-6);
        assert!((agent.panic_distance() - 3.0).abs() < 1e-6);

        let active: Vec<_> = agent.steering().iter().map(|b| b.kind()).collect();
        assert_eq!(active, vec![BehaviorKind::Wander, BehaviorKind::Separation]);
        assert!((agent.behaviors().wander.settings.weight - 0.5).abs() < 1e-6);
        assert!((agent.behaviors().separation.settings.probability() - 0.2).abs() < 1e-6);

        let duplicate = AgentConfig {
            behaviors: vec![
                crate::core::BehaviorConfig::new(BehaviorKind::Seek),
                crate::core::BehaviorConfig::new(BehaviorKind::Seek),
            ],
            ..Default::default()
        };
        assert!(matches!(
            AutonomousAgent::from_config(entity, &duplicate),
            Err(SteeringError::DuplicateBehavior(BehaviorKind::Seek))
        ));
    }

    #[test]
    fn test_wander_idle_until_seeded() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        agent.add(BehaviorKind::Wander).unwrap();

        agent.update(0.1, &mut world, None).unwrap();
        assert_eq!(agent.steering_force(), Vec3::ZERO);

        agent.seed(9);
        agent.update(0.1, &mut world, None).unwrap();
        assert_ne!(agent.steering_force(), Vec3::ZERO);
    }

    #[test]
    fn test_context_mut_reaches_bundle() {
        let mut world = World::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        let other = world.spawn_agent(Transform::from_position(Vec3::X), 0.5, 1.0);

        agent
            .context_mut(BehaviorKind::Separation)
            .unwrap()
            .ignore(other);
        assert!(agent.behaviors().separation.context.is_ignored(other));
        assert!(agent.context_mut(BehaviorKind::Seek).is_none());
    }

    #[test]
    fn test_physics_body_drives_position() {
        let mut world = World::new();
        let mut physics = Physics::new();
        let mut agent = spawn(&mut world, Vec3::ZERO);
        let body = physics.create_agent_body(Vec3::ZERO, 0.5);
        agent.bind_physics_body(body);
        agent.set_velocity(Vec3::X * 2.0);

        agent.update(0.5, &mut world, Some(&mut physics)).unwrap();
        // Body has not been stepped yet
        let transform = *world.get::<Transform>(agent.entity()).unwrap();
        assert!(transform.position.length() < 1e-5);

        physics.step(0.5);
        agent.update(0.5, &mut world, Some(&mut physics)).unwrap();
        let transform = *world.get::<Transform>(agent.entity()).unwrap();
        assert!((transform.position.x - 1.0).abs() < 1e-3);
    }
}
