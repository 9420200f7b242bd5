//! Spatial context of contextual behaviors
//!
//! A context is the weighted set of nearby entities a behavior reacts to.
//! It is rebuilt from a world query every frame the behavior is eligible,
//! and narrowed by consider/ignore filters keyed on entity handle or on
//! `EntityKind`.

use glam::Vec3;
use hecs::Entity;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ecs::{BoundingSphere, EntityKind, EntitySnapshot, SpatialQuery};

/// One entity in the context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextEntry {
    pub snapshot: EntitySnapshot,
    pub weight: f32,
}

impl ContextEntry {
    #[inline]
    pub fn entity(&self) -> Entity {
        self.snapshot.entity
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.snapshot.position()
    }
}

/// Filters and the last gathered set of nearby entities
#[derive(Debug, Clone, Default)]
pub struct SteeringContext {
    considered_kinds: FxHashMap<EntityKind, f32>,
    considered_entities: FxHashMap<Entity, f32>,
    ignored_kinds: FxHashSet<EntityKind>,
    ignored_entities: FxHashSet<Entity>,
    /// Query only around the agent instead of the whole world
    pub filter_by_distance: bool,
    /// Radius of the distance filter
    pub filter_distance: f32,
    /// Cap on candidates scanned when filters are configured
    pub maximum_lookups: Option<usize>,
    entries: Vec<ContextEntry>,
    candidates: Vec<EntitySnapshot>,
}

impl SteeringContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context limited to a radius around the agent
    pub fn within(distance: f32) -> Self {
        Self {
            filter_by_distance: true,
            filter_distance: distance,
            ..Default::default()
        }
    }

    /// Consider an entity with the given weight.
    ///
    /// If the entity is currently ignored this only lifts the ignore.
    pub fn consider(&mut self, entity: Entity, weight: f32) {
        if !self.ignored_entities.remove(&entity) {
            self.considered_entities.insert(entity, weight);
        }
    }

    /// Consider every entity of a kind with the given weight.
    ///
    /// If the kind is currently ignored this only lifts the ignore.
    pub fn consider_kind(&mut self, kind: EntityKind, weight: f32) {
        if !self.ignored_kinds.remove(&kind) {
            self.considered_kinds.insert(kind, weight);
        }
    }

    /// Ignore an entity.
    ///
    /// If the entity is currently considered this only drops the consider.
    pub fn ignore(&mut self, entity: Entity) {
        if self.considered_entities.remove(&entity).is_none() {
            self.ignored_entities.insert(entity);
        }
    }

    /// Ignore every entity of a kind.
    ///
    /// If the kind is currently considered this only drops the consider.
    pub fn ignore_kind(&mut self, kind: EntityKind) {
        if self.considered_kinds.remove(&kind).is_none() {
            self.ignored_kinds.insert(kind);
        }
    }

    /// Empty all four filter lists
    pub fn clear_agent_filters(&mut self) {
        self.considered_kinds.clear();
        self.considered_entities.clear();
        self.ignored_kinds.clear();
        self.ignored_entities.clear();
    }

    /// Weight an entity would be considered with, if it is on the list
    pub fn considered_weight(&self, entity: Entity) -> Option<f32> {
        self.considered_entities.get(&entity).copied()
    }

    pub fn considered_kind_weight(&self, kind: EntityKind) -> Option<f32> {
        self.considered_kinds.get(&kind).copied()
    }

    pub fn is_ignored(&self, entity: Entity) -> bool {
        self.ignored_entities.contains(&entity)
    }

    pub fn is_kind_ignored(&self, kind: EntityKind) -> bool {
        self.ignored_kinds.contains(&kind)
    }

    fn has_considered(&self) -> bool {
        !self.considered_kinds.is_empty() || !self.considered_entities.is_empty()
    }

    fn has_ignored(&self) -> bool {
        !self.ignored_kinds.is_empty() || !self.ignored_entities.is_empty()
    }

    fn ignores(&self, candidate: &EntitySnapshot) -> bool {
        self.ignored_kinds.contains(&candidate.kind)
            || self.ignored_entities.contains(&candidate.entity)
    }

    /// Override weight of a candidate; kind matches win over entity matches
    fn override_weight(&self, candidate: &EntitySnapshot) -> Option<f32> {
        self.considered_kinds
            .get(&candidate.kind)
            .or_else(|| self.considered_entities.get(&candidate.entity))
            .copied()
    }

    /// Rebuild the context around `agent_position`, never including `agent`
    pub fn refresh(&mut self, agent: Entity, agent_position: Vec3, world: &dyn SpatialQuery) {
        self.entries.clear();
        self.candidates.clear();

        if self.filter_by_distance && self.filter_distance > 0.0 {
            let bounds = BoundingSphere::new(agent_position, self.filter_distance);
            world.find_within_bounds(&mut self.candidates, &bounds);
        } else {
            world.find_all(&mut self.candidates);
        }

        let considered = self.has_considered();
        let ignored = self.has_ignored();

        if !considered && !ignored {
            self.entries.extend(
                self.candidates
                    .iter()
                    .filter(|candidate| candidate.entity != agent)
                    .map(|&snapshot| ContextEntry {
                        snapshot,
                        weight: 1.0,
                    }),
            );
            return;
        }

        let lookups = self.maximum_lookups.unwrap_or(usize::MAX);
        let mut entries = std::mem::take(&mut self.entries);
        for candidate in self.candidates.iter().take(lookups) {
            if candidate.entity == agent || self.ignores(candidate) {
                continue;
            }

            let weight = if considered {
                match self.override_weight(candidate) {
                    Some(weight) => weight,
                    None => continue,
                }
            } else {
                1.0
            };

            entries.push(ContextEntry {
                snapshot: *candidate,
                weight,
            });
        }
        self.entries = entries;

        log::trace!(
            "context refreshed: {} of {} candidates kept",
            self.entries.len(),
            self.candidates.len()
        );
    }

    /// Entities gathered by the last refresh, in query order
    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Weight of an entity in the current context
    pub fn weight_of(&self, entity: Entity) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.entity() == entity)
            .map(|entry| entry.weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
