//! Steering behavior trait and the state every behavior carries

use std::fmt;

use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::SteeringContext;
use crate::core::SteeringRng;
use crate::ecs::{SpatialQuery, Transform};

/// Identity of a behavior type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    Seek,
    Flee,
    Arrive,
    Pursuit,
    Evade,
    OffsetPursuit,
    Interpose,
    Separation,
    Alignment,
    Cohesion,
    Wander,
    Hide,
    ObstacleAvoidance,
    WallAvoidance,
    PathFollowing,
    /// Application-defined behavior
    Custom(u32),
}

/// Configuration and last computed force shared by all behaviors
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorSettings {
    /// Scalar importance
    pub weight: f32,
    /// Chance in [0, 1] of being sampled by dithering
    probability: f32,
    /// Position in the agent's evaluation order, lower runs first
    priority: usize,
    /// Disabled behaviors are skipped entirely
    pub enabled: bool,
    /// Per-axis mask, each axis in [0, 1]
    force_influence: Vec3,
    /// Force written by the last `compute`
    force: Vec3,
}

impl BehaviorSettings {
    /// Settings with the given weight
    #[must_use]
    pub fn new(weight: f32) -> Self {
        Self {
            weight,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn probability(&self) -> f32 {
        self.probability
    }

    /// Set the dithering probability, clamped to [0, 1]
    pub fn set_probability(&mut self, probability: f32) {
        self.probability = probability.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn priority(&self) -> usize {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: usize) {
        self.priority = priority;
    }

    #[must_use]
    pub fn force_influence(&self) -> Vec3 {
        self.force_influence
    }

    /// Set the per-axis mask; each axis is clamped to [0, 1]
    pub fn set_force_influence(&mut self, mask: Vec3) {
        self.force_influence = mask.clamp(Vec3::ZERO, Vec3::ONE);
    }

    #[must_use]
    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub(crate) fn set_force(&mut self, force: Vec3) {
        self.force = force;
    }

    pub(crate) fn reset_force(&mut self) {
        self.force = Vec3::ZERO;
    }
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            weight: 1.0,
            probability: 1.0,
            priority: 0,
            enabled: true,
            force_influence: Vec3::ONE,
            force: Vec3::ZERO,
        }
    }
}

/// Kinematic snapshot of the agent that owns the behaviors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentState {
    pub entity: Entity,
    /// Entity transform at the start of the frame
    pub transform: Transform,
    pub velocity: Vec3,
    pub speed: f32,
    /// Velocity-aligned forward, or the entity forward when at rest
    pub heading: Vec3,
    /// Velocity-aligned right
    pub side: Vec3,
    /// Velocity-aligned up
    pub up: Vec3,
    /// Radius of the agent's bounding volume
    pub radius: f32,
    pub mass: f32,
    pub max_force: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    /// Braking factor for arrive-style behaviors
    pub deceleration: f32,
    pub deceleration_tweak: f32,
    pub panic_distance_sq: f32,
}

impl AgentState {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Facing of the entity transform
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }
}

/// Everything a behavior may look at during one frame
pub struct SteeringFrame<'a> {
    pub agent: &'a AgentState,
    pub world: &'a dyn SpatialQuery,
    /// Absent until the agent has been seeded
    pub rng: Option<&'a mut SteeringRng>,
}

impl<'a> SteeringFrame<'a> {
    pub fn new(
        agent: &'a AgentState,
        world: &'a dyn SpatialQuery,
        rng: Option<&'a mut SteeringRng>,
    ) -> Self {
        Self { agent, world, rng }
    }

    #[inline]
    pub fn has_rng(&self) -> bool {
        self.rng.is_some()
    }
}

/// One steering algorithm bound to its configuration.
///
/// Each frame an enabled behavior is asked `can_compute`; only if that
/// passes is its context refreshed and `compute` called. `compute` stores
/// the force in the behavior's settings rather than returning it.
pub trait SteeringBehavior: fmt::Debug + Send {
    fn kind(&self) -> BehaviorKind;

    fn settings(&self) -> &BehaviorSettings;

    fn settings_mut(&mut self) -> &mut BehaviorSettings;

    /// Behavior-specific preconditions; a false result means no force this frame
    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool;

    /// Calculate the force for this frame
    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3;

    /// Spatial context, for behaviors that react to nearby entities
    fn context(&self) -> Option<&SteeringContext> {
        None
    }

    fn context_mut(&mut self) -> Option<&mut SteeringContext> {
        None
    }

    /// Rebuild the spatial context. Called only after `can_compute` passes.
    fn refresh_context(&mut self, frame: &SteeringFrame<'_>) {
        if let Some(context) = self.context_mut() {
            context.refresh(frame.agent.entity, frame.agent.position(), frame.world);
        }
    }

    /// Calculate and store the force
    fn compute(&mut self, frame: &mut SteeringFrame<'_>) {
        let force = self.calculate(frame);
        self.settings_mut().set_force(force);
    }

    fn is_enabled(&self) -> bool {
        self.settings().enabled
    }

    fn force(&self) -> Vec3 {
        self.settings().force()
    }
}

/// Implements the settings accessors of `SteeringBehavior` for a struct
/// with a `settings` field
macro_rules! behavior_settings {
    ($kind:expr) => {
        fn kind(&self) -> $crate::ai::BehaviorKind {
            $kind
        }

        fn settings(&self) -> &$crate::ai::BehaviorSettings {
            &self.settings
        }

        fn settings_mut(&mut self) -> &mut $crate::ai::BehaviorSettings {
            &mut self.settings
        }
    };
}

/// Same as `behavior_settings!`, plus context accessors for a struct with
/// a `context` field
macro_rules! contextual_behavior {
    ($kind:expr) => {
        $crate::ai::behavior_settings!($kind);

        fn context(&self) -> Option<&$crate::ai::SteeringContext> {
            Some(&self.context)
        }

        fn context_mut(&mut self) -> Option<&mut $crate::ai::SteeringContext> {
            Some(&mut self.context)
        }
    };
}

pub(crate) use {behavior_settings, contextual_behavior};
