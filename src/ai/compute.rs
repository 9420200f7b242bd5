//! Ordered set of active behaviors for one agent

use smallvec::SmallVec;

use super::{Behaviors, BehaviorKind, Contribution, SteeringBehavior, SteeringFrame};
use crate::core::{SteeringError, SteeringResult};

#[derive(Debug)]
enum Slot {
    /// Lives in the bundle
    Bundled(BehaviorKind),
    /// Extra instance owned by the slot itself
    Owned(Box<dyn SteeringBehavior>),
}

/// Active behaviors of an agent in ascending priority.
///
/// A behavior's priority is its position in the active list, so it follows
/// insertion order and stays contiguous across removals.
#[derive(Debug, Default)]
pub struct ComputeSteeringForces {
    behaviors: Behaviors,
    active: Vec<Slot>,
}

fn resolve<'a>(behaviors: &'a Behaviors, slot: &'a Slot) -> Option<&'a dyn SteeringBehavior> {
    match slot {
        Slot::Bundled(kind) => behaviors.get(*kind),
        Slot::Owned(behavior) => Some(behavior.as_ref()),
    }
}

fn resolve_mut<'a>(
    behaviors: &'a mut Behaviors,
    slot: &'a mut Slot,
) -> Option<&'a mut dyn SteeringBehavior> {
    match slot {
        Slot::Bundled(kind) => behaviors.get_mut(*kind),
        Slot::Owned(behavior) => Some(behavior.as_mut()),
    }
}

impl ComputeSteeringForces {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundle, for configuring behavior-specific fields
    pub fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }

    pub fn behaviors_mut(&mut self) -> &mut Behaviors {
        &mut self.behaviors
    }

    fn slot_kind(&self, slot: &Slot) -> Option<BehaviorKind> {
        resolve(&self.behaviors, slot).map(|b| b.kind())
    }

    pub fn contains(&self, kind: BehaviorKind) -> bool {
        self.active
            .iter()
            .any(|slot| self.slot_kind(slot) == Some(kind))
    }

    /// Activate the bundled behavior of `kind` at the lowest priority.
    ///
    /// # Errors
    ///
    /// `DuplicateBehavior` if a behavior of that kind is already active,
    /// `NotBuiltIn` for custom kinds.
    pub fn add(&mut self, kind: BehaviorKind) -> SteeringResult<&mut dyn SteeringBehavior> {
        if self.behaviors.get(kind).is_none() {
            return Err(SteeringError::NotBuiltIn(kind));
        }
        if self.contains(kind) {
            return Err(SteeringError::DuplicateBehavior(kind));
        }
        self.push(Slot::Bundled(kind), kind)
    }

    /// Activate an owned behavior at the lowest priority.
    ///
    /// With `unicity` set this fails like `add` when the kind is already
    /// active; without it several instances of one kind may coexist.
    ///
    /// # Errors
    ///
    /// `DuplicateBehavior` under `unicity` if the kind is already active.
    pub fn add_boxed(
        &mut self,
        behavior: Box<dyn SteeringBehavior>,
        unicity: bool,
    ) -> SteeringResult<&mut dyn SteeringBehavior> {
        let kind = behavior.kind();
        if unicity && self.contains(kind) {
            return Err(SteeringError::DuplicateBehavior(kind));
        }
        self.push(Slot::Owned(behavior), kind)
    }

    fn push(&mut self, slot: Slot, kind: BehaviorKind) -> SteeringResult<&mut dyn SteeringBehavior> {
        let priority = self.active.len();
        self.active.push(slot);

        let Self { behaviors, active } = self;
        let behavior = active
            .last_mut()
            .and_then(move |slot| resolve_mut(behaviors, slot))
            .ok_or(SteeringError::NotBuiltIn(kind))?;
        behavior.settings_mut().set_priority(priority);
        log::debug!("{kind:?} active at priority {priority}");
        Ok(behavior)
    }

    /// Deactivate the highest-priority behavior of `kind`
    ///
    /// # Errors
    ///
    /// `BehaviorNotActive` if no behavior of that kind is active
    pub fn remove(&mut self, kind: BehaviorKind) -> SteeringResult<()> {
        let index = self
            .active
            .iter()
            .position(|slot| self.slot_kind(slot) == Some(kind))
            .ok_or(SteeringError::BehaviorNotActive(kind))?;

        let mut slot = self.active.remove(index);
        if let Some(behavior) = resolve_mut(&mut self.behaviors, &mut slot) {
            behavior.settings_mut().reset_force();
        }

        let Self { behaviors, active } = self;
        for (priority, slot) in active.iter_mut().enumerate().skip(index) {
            if let Some(behavior) = resolve_mut(behaviors, slot) {
                behavior.settings_mut().set_priority(priority);
            }
        }
        log::debug!("{kind:?} removed, {} behaviors remain", self.active.len());
        Ok(())
    }

    /// Highest-priority active behavior of `kind`
    pub fn get(&self, kind: BehaviorKind) -> Option<&dyn SteeringBehavior> {
        self.iter().find(|b| b.kind() == kind)
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> Option<&mut dyn SteeringBehavior> {
        let Self { behaviors, active } = self;
        let slot = active.iter_mut().find(|slot| match slot {
            Slot::Bundled(k) => *k == kind,
            Slot::Owned(b) => b.kind() == kind,
        })?;
        resolve_mut(behaviors, slot)
    }

    /// Active behaviors in ascending priority
    pub fn iter(&self) -> impl Iterator<Item = &dyn SteeringBehavior> + '_ {
        self.active
            .iter()
            .filter_map(|slot| resolve(&self.behaviors, slot))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Compute the force of every enabled, eligible behavior in priority order
    pub fn run(&mut self, frame: &mut SteeringFrame<'_>) {
        let Self { behaviors, active } = self;
        for slot in active.iter_mut() {
            let Some(behavior) = resolve_mut(behaviors, slot) else {
                continue;
            };
            if !behavior.is_enabled() || !behavior.can_compute(frame) {
                continue;
            }
            behavior.refresh_context(frame);
            behavior.compute(frame);
        }
    }

    /// Forces of the enabled behaviors in priority order
    pub fn contributions(&self) -> SmallVec<[Contribution; 8]> {
        self.iter()
            .filter(|b| b.is_enabled())
            .map(|b| {
                let settings = b.settings();
                Contribution {
                    force: settings.force(),
                    weight: settings.weight,
                    probability: settings.probability(),
                }
            })
            .collect()
    }

    /// Zero the stored force of every enabled behavior
    pub fn reset_forces(&mut self) {
        let Self { behaviors, active } = self;
        for slot in active.iter_mut() {
            if let Some(behavior) = resolve_mut(behaviors, slot)
                .filter(|b| b.is_enabled())
            {
                behavior.settings_mut().reset_force();
            }
        }
    }
}
