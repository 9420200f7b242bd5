//! Bundle holding one instance of every built-in behavior

use super::behaviors::{
    Alignment, Arrive, Cohesion, Evade, Flee, Hide, Interpose, ObstacleAvoidance, OffsetPursuit,
    PathFollowing, Pursuit, Separation, Seek, WallAvoidance, Wander,
};
use super::{BehaviorKind, SteeringBehavior};

/// One instance of every built-in behavior.
///
/// The bundle only stores behaviors; which of them run, and in what order,
/// is decided by `ComputeSteeringForces`.
#[derive(Debug, Clone, Default)]
pub struct Behaviors {
    pub seek: Seek,
    pub flee: Flee,
    pub arrive: Arrive,
    pub pursuit: Pursuit,
    pub evade: Evade,
    pub offset_pursuit: OffsetPursuit,
    pub interpose: Interpose,
    pub separation: Separation,
    pub alignment: Alignment,
    pub cohesion: Cohesion,
    pub wander: Wander,
    pub hide: Hide,
    pub obstacle_avoidance: ObstacleAvoidance,
    pub wall_avoidance: WallAvoidance,
    pub path_following: PathFollowing,
}

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in behavior of a kind, `None` for custom kinds
    pub fn get(&self, kind: BehaviorKind) -> Option<&dyn SteeringBehavior> {
        Some(match kind {
            BehaviorKind::Seek => &self.seek,
            BehaviorKind::Flee => &self.flee,
            BehaviorKind::Arrive => &self.arrive,
            BehaviorKind::Pursuit => &self.pursuit,
            BehaviorKind::Evade => &self.evade,
            BehaviorKind::OffsetPursuit => &self.offset_pursuit,
            BehaviorKind::Interpose => &self.interpose,
            BehaviorKind::Separation => &self.separation,
            BehaviorKind::Alignment => &self.alignment,
            BehaviorKind::Cohesion => &self.cohesion,
            BehaviorKind::Wander => &self.wander,
            BehaviorKind::Hide => &self.hide,
            BehaviorKind::ObstacleAvoidance => &self.obstacle_avoidance,
            BehaviorKind::WallAvoidance => &self.wall_avoidance,
            BehaviorKind::PathFollowing => &self.path_following,
            BehaviorKind::Custom(_) => return None,
        })
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> Option<&mut dyn SteeringBehavior> {
        Some(match kind {
            BehaviorKind::Seek => &mut self.seek,
            BehaviorKind::Flee => &mut self.flee,
            BehaviorKind::Arrive => &mut self.arrive,
            BehaviorKind::Pursuit => &mut self.pursuit,
            BehaviorKind::Evade => &mut self.evade,
            BehaviorKind::OffsetPursuit => &mut self.offset_pursuit,
            BehaviorKind::Interpose => &mut self.interpose,
            BehaviorKind::Separation => &mut self.separation,
            BehaviorKind::Alignment => &mut self.alignment,
            BehaviorKind::Cohesion => &mut self.cohesion,
            BehaviorKind::Wander => &mut self.wander,
            BehaviorKind::Hide => &mut self.hide,
            BehaviorKind::ObstacleAvoidance => &mut self.obstacle_avoidance,
            BehaviorKind::WallAvoidance => &mut self.wall_avoidance,
            BehaviorKind::PathFollowing => &mut self.path_following,
            BehaviorKind::Custom(_) => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_matches_kind() {
        let mut behaviors = Behaviors::new();
        for kind in [
            BehaviorKind::Seek,
            BehaviorKind::Cohesion,
            BehaviorKind::WallAvoidance,
            BehaviorKind::PathFollowing,
        ] {
            assert_eq!(behaviors.get(kind).map(|b| b.kind()), Some(kind));
            assert_eq!(behaviors.get_mut(kind).map(|b| b.kind()), Some(kind));
        }
        assert!(behaviors.get(BehaviorKind::Custom(3)).is_none());
    }

    #[test]
    fn test_contextual_flags() {
        let behaviors = Behaviors::new();
        assert!(behaviors.get(BehaviorKind::Separation).and_then(|b| b.context()).is_some());
        assert!(behaviors.get(BehaviorKind::Seek).and_then(|b| b.context()).is_none());
    }
}
