//! Waypoint paths and the behavior that follows them

use glam::Vec3;

use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::pathfinding::NavPath;
use crate::ai::{BehaviorKind, BehaviorSettings, forces};

/// Ordered waypoints with a cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec3>,
    /// Wrap back to the first waypoint after the last
    pub looped: bool,
    current: usize,
}

impl Path {
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, looped: bool) -> Self {
        Self {
            waypoints,
            looped,
            current: 0,
        }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.current).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.waypoints.len()
    }

    /// A non-looped path is finished once its cursor passes the last waypoint
    pub fn is_finished(&self) -> bool {
        self.current >= self.waypoints.len()
    }

    /// Move the cursor forward, wrapping when looped
    pub fn advance(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.current += 1;
        if self.looped && self.current >= self.waypoints.len() {
            self.current = 0;
        }
    }

    pub fn restart(&mut self) {
        self.current = 0;
    }
}

impl From<NavPath> for Path {
    fn from(path: NavPath) -> Self {
        Self::new(path.waypoints, false)
    }
}

/// Follow a path waypoint by waypoint.
///
/// Intermediate waypoints are sought; the last waypoint of an open path is
/// arrived at. The cursor advances once the agent is within `seek_distance`,
/// and an open path finishes within `arrival_tolerance` of its end.
#[derive(Debug, Clone)]
pub struct PathFollowing {
    pub settings: BehaviorSettings,
    pub path: Path,
    pub seek_distance: f32,
    /// Distance to the final waypoint at which an open path is finished
    pub arrival_tolerance: f32,
}

impl PathFollowing {
    #[must_use]
    pub fn new(path: Path) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn set_path(&mut self, path: impl Into<Path>) {
        self.path = path.into();
    }
}

impl Default for PathFollowing {
    fn default() -> Self {
        Self {
            settings: BehaviorSettings::default(),
            path: Path::default(),
            seek_distance: 1.0,
            arrival_tolerance: 0.05,
        }
    }
}

impl SteeringBehavior for PathFollowing {
    crate::ai::behavior_settings!(BehaviorKind::PathFollowing);

    /// The final waypoint of an open path is arrived at, which needs braking
    fn can_compute(&self, frame: &SteeringFrame<'_>) -> bool {
        if self.path.is_finished() {
            return false;
        }
        self.path.looped || !self.path.is_last() || frame.agent.deceleration_tweak > 0.0
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let agent = frame.agent;
        let position = agent.position();
        let mask = self.settings.force_influence();

        let Some(mut waypoint) = self.path.current_waypoint() else {
            return Vec3::ZERO;
        };
        let distance_sq = position.distance_squared(waypoint);

        if self.path.is_last() && !self.path.looped {
            if distance_sq <= self.arrival_tolerance * self.arrival_tolerance {
                self.path.advance();
                log::debug!("path finished");
                return Vec3::ZERO;
            }
        } else if distance_sq <= self.seek_distance * self.seek_distance {
            self.path.advance();
            log::trace!("path cursor at {}", self.path.current_index());
            let Some(next) = self.path.current_waypoint() else {
                return Vec3::ZERO;
            };
            waypoint = next;
        }

        if self.path.is_last() && !self.path.looped {
            forces::arrive(
                position,
                waypoint,
                agent.deceleration,
                agent.velocity,
                agent.max_speed,
                mask,
            )
        } else {
            forces::seek(position, waypoint, agent.velocity, agent.max_speed, mask)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behaviors::test_support::agent_state;
    use crate::ecs::{Transform, World};

    #[test]
    fn test_path_cursor() {
        let mut path = Path::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z], false);
        path.advance();
        path.advance();
        assert!(path.is_last());
        path.advance();
        assert!(path.is_finished());
        assert!(path.current_waypoint().is_none());

        let mut looped = Path::new(vec![Vec3::ZERO, Vec3::X], true);
        looped.advance();
        looped.advance();
        assert_eq!(looped.current_index(), 0);
    }

    #[test]
    fn test_empty_path_is_ineligible() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(me, Vec3::ZERO, Vec3::ZERO);

        let following = PathFollowing::default();
        assert!(!following.can_compute(&SteeringFrame::new(&state, &world, None)));
    }

    #[test]
    fn test_advances_within_seek_distance() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(me, Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);

        let path = Path::new(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0), Vec3::X * 40.0], false);
        let mut following = PathFollowing::new(path);
        let force = following.calculate(&mut frame);

        assert_eq!(following.path.current_index(), 1);
        assert!(force.z > 0.0);
        assert!((force.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_arrives_at_last_waypoint() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(me, Vec3::ZERO, Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);

        // Close to the end: arrive brakes below max speed
        let mut following = PathFollowing::new(Path::new(vec![Vec3::X * 2.0], false));
        let force = following.calculate(&mut frame);
        assert!(force.x > 0.0);
        assert!(force.length() < 10.0);
        assert_eq!(following.path.current_index(), 0);
    }

    #[test]
    fn test_finishes_on_arrival() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let state = agent_state(me, Vec3::new(2.0, 0.0, 0.01), Vec3::ZERO);
        let mut frame = SteeringFrame::new(&state, &world, None);

        let mut following = PathFollowing::new(Path::new(vec![Vec3::X * 2.0], false));
        assert_eq!(following.calculate(&mut frame), Vec3::ZERO);
        assert!(following.path.is_finished());
        assert!(!following.can_compute(&frame));
    }

    #[test]
    fn test_open_path_end_needs_braking() {
        let mut world = World::new();
        let me = world.spawn_agent(Transform::new(), 0.5, 10.0);
        let mut state = agent_state(me, Vec3::ZERO, Vec3::ZERO);
        state.deceleration_tweak = 0.0;
        let frame = SteeringFrame::new(&state, &world, None);

        let mut open = PathFollowing::new(Path::new(vec![Vec3::X * 5.0, Vec3::X * 10.0], false));
        assert!(open.can_compute(&frame));
        open.path.advance();
        assert!(!open.can_compute(&frame));

        let mut looped = PathFollowing::new(Path::new(vec![Vec3::X * 5.0, Vec3::X * 10.0], true));
        looped.path.advance();
        assert!(looped.can_compute(&frame));
    }

    #[test]
    fn test_follows_nav_grid_path() {
        use crate::ai::NavGrid;

        let grid = NavGrid::new(8, 8, 1.0);
        let nav = grid.find_path(Vec3::new(0.5, 0.0, 0.5), Vec3::new(6.5, 0.0, 0.5));
        let path = Path::from(nav);
        assert_eq!(path.waypoints().len(), 7);
        assert!(!path.looped);
    }
}
