//! Collision avoidance against obstacles and walls

use glam::{Quat, Vec3};

use crate::ai::behavior::{SteeringBehavior, SteeringFrame};
use crate::ai::{BehaviorKind, BehaviorSettings, SteeringContext, forces};
use crate::ecs::{Bounds, EntityKind, Ray, RayHit};

/// Steer sideways around obstacles in a detection corridor ahead.
///
/// The corridor grows with speed, from `detection_length` at rest to twice
/// that at top speed. Only the nearest obstacle inside it is avoided.
#[derive(Debug, Clone)]
pub struct ObstacleAvoidance {
    pub settings: BehaviorSettings,
    pub context: SteeringContext,
    pub detection_length: f32,
}

impl ObstacleAvoidance {
    #[must_use]
    pub fn new(detection_length: f32) -> Self {
        Self {
            detection_length,
            ..Default::default()
        }
    }
}

impl Default for ObstacleAvoidance {
    fn default() -> Self {
        let mut context = SteeringContext::within(10.0);
        context.consider_kind(EntityKind::Obstacle, 1.0);
        Self {
            settings: BehaviorSettings::default(),
            context,
            detection_length: 4.0,
        }
    }
}

impl SteeringBehavior for ObstacleAvoidance {
    crate::ai::contextual_behavior!(BehaviorKind::ObstacleAvoidance);

    fn can_compute(&self, _frame: &SteeringFrame<'_>) -> bool {
        self.detection_length > 0.0
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let agent = frame.agent;
        let position = agent.position();
        let heading = agent.heading;
        let speed_ratio = if agent.max_speed > 0.0 {
            (agent.speed / agent.max_speed).min(1.0)
        } else {
            0.0
        };
        let length = self.detection_length * (1.0 + speed_ratio);

        // (ahead, lateral distance, combined radius, entry)
        let nearest = self
            .context
            .entries()
            .iter()
            .filter_map(|entry| {
                let offset = entry.position() - position;
                let ahead = offset.dot(heading);
                let lateral = (offset - heading * ahead).length();
                let reach = entry.snapshot.radius() + agent.radius;
                (ahead > 0.0 && ahead - reach <= length && lateral < reach)
                    .then_some((ahead, lateral, reach, entry))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((ahead, lateral, reach, entry)) = nearest else {
            return Vec3::ZERO;
        };

        let mask = self.settings.force_influence();
        let push = forces::obstacle_avoidance_new(position, entry.position(), heading, mask);
        // Dead ahead the off-axis component vanishes, pick the agent's side
        let direction = push.try_normalize().unwrap_or(agent.side * mask);
        let penetration = reach - lateral;
        let proximity = 1.0 + (length - ahead).max(0.0) / length;

        direction * penetration * proximity * agent.max_speed * entry.weight
    }
}

/// Steer away from box-shaped walls hit by three feelers.
#[derive(Debug, Clone)]
pub struct WallAvoidance {
    pub settings: BehaviorSettings,
    pub context: SteeringContext,
    pub feeler_length: f32,
    /// Angle in radians of the side feelers from the heading
    pub feeler_angle: f32,
}

impl WallAvoidance {
    #[must_use]
    pub fn new(feeler_length: f32, feeler_angle: f32) -> Self {
        Self {
            feeler_length,
            feeler_angle,
            ..Default::default()
        }
    }

    fn feelers(&self, heading: Vec3, up: Vec3) -> [Vec3; 3] {
        let left = Quat::from_axis_angle(up, self.feeler_angle);
        let right = Quat::from_axis_angle(up, -self.feeler_angle);
        [heading, left * heading, right * heading]
    }
}

impl Default for WallAvoidance {
    fn default() -> Self {
        let mut context = SteeringContext::within(10.0);
        context.consider_kind(EntityKind::Wall, 1.0);
        Self {
            settings: BehaviorSettings::default(),
            context,
            feeler_length: 4.0,
            feeler_angle: std::f32::consts::FRAC_PI_4,
        }
    }
}

impl SteeringBehavior for WallAvoidance {
    crate::ai::contextual_behavior!(BehaviorKind::WallAvoidance);

    fn can_compute(&self, _frame: &SteeringFrame<'_>) -> bool {
        self.feeler_length > 0.0
    }

    fn calculate(&mut self, frame: &mut SteeringFrame<'_>) -> Vec3 {
        let agent = frame.agent;
        let up = agent.up.try_normalize().unwrap_or(Vec3::Y);

        let mut closest: Option<(RayHit, f32)> = None;
        for feeler in self.feelers(agent.heading, up) {
            let ray = Ray::new(agent.position(), feeler, self.feeler_length);
            for entry in self.context.entries() {
                if !matches!(entry.snapshot.bounds, Bounds::Box(_)) {
                    continue;
                }
                let Some(hit) = entry.snapshot.bounds.intersect_ray(&ray) else {
                    continue;
                };
                if closest.is_none_or(|(best, _)| hit.distance < best.distance) {
                    closest = Some((hit, entry.weight));
                }
            }
        }

        closest.map_or(Vec3::ZERO, |(hit, weight)| {
            forces::wall_avoidance(
                hit.normal,
                self.feeler_length,
                hit.distance,
                self.settings.force_influence(),
            ) * weight
        })
    }
}
