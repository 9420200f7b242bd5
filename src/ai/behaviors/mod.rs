//! Concrete steering behaviors

mod avoidance;
mod flocking;
mod hide;
mod path;
mod pursuit;
mod seek;
mod wander;

pub use avoidance::{ObstacleAvoidance, WallAvoidance};
pub use flocking::{Alignment, Cohesion, Separation};
pub use hide::Hide;
pub use path::{Path, PathFollowing};
pub use pursuit::{Evade, Interpose, OffsetPursuit, Pursuit};
pub use seek::{Arrive, Flee, Seek};
pub use wander::Wander;

use glam::Vec3;
use hecs::Entity;

use crate::ecs::SpatialQuery;

/// A fixed point or a tracked entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Point(Vec3),
    Entity(Entity),
}

impl Target {
    /// Current world position, `None` if the tracked entity is gone
    pub fn resolve(&self, world: &dyn SpatialQuery) -> Option<Vec3> {
        match self {
            Target::Point(point) => Some(*point),
            Target::Entity(entity) => world.snapshot(*entity).map(|s| s.position()),
        }
    }
}

impl From<Vec3> for Target {
    fn from(point: Vec3) -> Self {
        Target::Point(point)
    }
}

impl From<Entity> for Target {
    fn from(entity: Entity) -> Self {
        Target::Entity(entity)
    }
}
