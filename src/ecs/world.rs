//! World wrapper around hecs and the spatial queries agents rely on

use glam::Vec3;
use hecs::Entity;

use super::{BoundingSphere, Bounds, EntityKind, MaxSpeed, Transform, Velocity};
use crate::core::{SteeringError, SteeringResult};

/// Read-only view of a world entity as seen by the steering system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    /// Stable handle, doubles as the unique identity for filters
    pub entity: Entity,
    /// Type tag
    pub kind: EntityKind,
    /// Current transform
    pub transform: Transform,
    /// World-space bounding volume
    pub bounds: Bounds,
    /// Linear velocity
    pub velocity: Vec3,
    /// Top speed, zero when unknown
    pub max_speed: f32,
}

impl EntitySnapshot {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.bounds.radius()
    }
}

/// Spatial queries consumed by contextual behaviors.
///
/// Agents only read through this trait. Updating many agents in parallel
/// against one shared world is sound only if the implementation is
/// thread-safe for concurrent reads, or if callers serialize access.
pub trait SpatialQuery {
    /// Append every entity in the world to `out`
    fn find_all(&self, out: &mut Vec<EntitySnapshot>);

    /// Append every entity whose bounds touch `bounds` to `out`
    fn find_within_bounds(&self, out: &mut Vec<EntitySnapshot>, bounds: &BoundingSphere);

    /// Look up a single entity
    fn snapshot(&self, entity: Entity) -> Option<EntitySnapshot>;
}

/// World collaborator an agent both reads from and writes its result into
pub trait SteeringWorld: SpatialQuery {
    /// Store the agent's integrated transform and velocity
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no transform
    fn write_back(&mut self, entity: Entity, transform: Transform, velocity: Vec3)
    -> SteeringResult<()>;
}

/// Game world containing all entities and components
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a steerable entity with everything agents look at
    pub fn spawn_agent(
        &mut self,
        transform: Transform,
        radius: f32,
        max_speed: f32,
    ) -> Entity {
        self.inner.spawn((
            transform,
            EntityKind::Agent,
            Bounds::sphere(radius),
            Velocity::default(),
            MaxSpeed(max_speed),
        ))
    }

    /// Spawn a static obstacle
    pub fn spawn_obstacle(&mut self, position: Vec3, bounds: Bounds, kind: EntityKind) -> Entity {
        self.inner
            .spawn((Transform::from_position(position), kind, bounds))
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Clear all entities from the world
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    fn collect(&self, out: &mut Vec<EntitySnapshot>, filter: Option<&BoundingSphere>) {
        let mut query = self.inner.query::<(
            &Transform,
            &EntityKind,
            Option<&Bounds>,
            Option<&Velocity>,
            Option<&MaxSpeed>,
        )>();

        for (entity, (transform, kind, bounds, velocity, max_speed)) in query.iter() {
            let snapshot = make_snapshot(entity, transform, kind, bounds, velocity, max_speed);
            let inside = filter
                .is_none_or(|sphere| snapshot.bounds.bounding_sphere().intersects(sphere));
            if inside {
                out.push(snapshot);
            }
        }
    }
}

fn make_snapshot(
    entity: Entity,
    transform: &Transform,
    kind: &EntityKind,
    bounds: Option<&Bounds>,
    velocity: Option<&Velocity>,
    max_speed: Option<&MaxSpeed>,
) -> EntitySnapshot {
    EntitySnapshot {
        entity,
        kind: *kind,
        transform: *transform,
        bounds: bounds.copied().unwrap_or_default().to_world(transform),
        velocity: velocity.map_or(Vec3::ZERO, |v| v.linear),
        max_speed: max_speed.map_or(0.0, |s| s.0),
    }
}

impl SpatialQuery for World {
    fn find_all(&self, out: &mut Vec<EntitySnapshot>) {
        self.collect(out, None);
    }

    fn find_within_bounds(&self, out: &mut Vec<EntitySnapshot>, bounds: &BoundingSphere) {
        self.collect(out, Some(bounds));
    }

    fn snapshot(&self, entity: Entity) -> Option<EntitySnapshot> {
        let mut query = self
            .inner
            .query_one::<(
                &Transform,
                &EntityKind,
                Option<&Bounds>,
                Option<&Velocity>,
                Option<&MaxSpeed>,
            )>(entity)
            .ok()?;
        let (transform, kind, bounds, velocity, max_speed) = query.get()?;
        Some(make_snapshot(entity, transform, kind, bounds, velocity, max_speed))
    }
}

impl SteeringWorld for World {
    fn write_back(
        &mut self,
        entity: Entity,
        transform: Transform,
        velocity: Vec3,
    ) -> SteeringResult<()> {
        match self.inner.get::<&mut Transform>(entity) {
            Ok(mut current) => *current = transform,
            Err(_) => return Err(SteeringError::MissingEntity(entity)),
        }

        let updated = if let Ok(mut current) = self.inner.get::<&mut Velocity>(entity) {
            current.linear = velocity;
            true
        } else {
            false
        };
        if !updated {
            self.inner
                .insert_one(
                    entity,
                    Velocity {
                        linear: velocity,
                        angular: Vec3::ZERO,
                    },
                )
                .map_err(|_| SteeringError::MissingEntity(entity))?;
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
