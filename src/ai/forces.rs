//! Steering force library
//!
//! Stateless force algorithms. Each function takes kinematic state in and
//! returns a force out; `mask` is a per-axis multiplier used to zero out
//! axes (for example `(1, 0, 1)` for ground units). Every function applies
//! the mask exactly once.
//!
//! Degenerate inputs (coincident points, zero speeds) yield a zero force
//! rather than NaN.

use glam::Vec3;

use crate::core::SteeringRng;

/// Lengths below this are treated as zero
pub const EPSILON: f32 = 1e-6;

/// Direction of `v`, or zero for a degenerate vector
#[inline]
fn direction(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Lookahead time for predicting a target, zero when both speeds are zero
#[inline]
fn lookahead(distance: f32, speed_sum: f32) -> f32 {
    if speed_sum > EPSILON {
        distance / speed_sum
    } else {
        0.0
    }
}

/// Steer toward `target` at full speed.
pub fn seek(position: Vec3, target: Vec3, velocity: Vec3, max_speed: f32, mask: Vec3) -> Vec3 {
    let desired = direction(target - position) * max_speed;
    (desired - velocity) * mask
}

/// Steer away from `target` while it is within the panic radius.
///
/// The mask applies to the desired velocity only; the current velocity is
/// subtracted unmasked.
pub fn flee(
    position: Vec3,
    target: Vec3,
    panic_distance_sq: f32,
    velocity: Vec3,
    max_speed: f32,
    mask: Vec3,
) -> Vec3 {
    if position.distance_squared(target) > panic_distance_sq {
        return Vec3::ZERO;
    }

    direction(position - target) * max_speed * mask - velocity
}

/// Steer toward `destination`, braking as it gets close.
///
/// Larger `deceleration` values brake earlier and more softly.
pub fn arrive(
    position: Vec3,
    destination: Vec3,
    deceleration: f32,
    velocity: Vec3,
    max_speed: f32,
    mask: Vec3,
) -> Vec3 {
    let to_destination = destination - position;
    let distance = to_destination.length();
    if distance <= EPSILON || deceleration <= 0.0 {
        return Vec3::ZERO;
    }

    let speed = (distance / deceleration).min(max_speed);
    to_destination / distance * speed * mask - velocity
}

/// Kinematic state of the other party in a pursuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quarry {
    pub position: Vec3,
    pub forward: Vec3,
    pub velocity: Vec3,
    pub speed: f32,
}

/// Chase `evader`, aiming at where it will be.
///
/// When the evader is ahead and heading straight at the pursuer the
/// prediction is skipped and the current position is sought.
pub fn pursuit(
    pursuer_position: Vec3,
    pursuer_forward: Vec3,
    pursuer_velocity: Vec3,
    pursuer_max_speed: f32,
    evader: &Quarry,
    mask: Vec3,
) -> Vec3 {
    let to_evader = evader.position - pursuer_position;
    let relative_heading = pursuer_forward.dot(evader.forward);

    if to_evader.dot(pursuer_forward) > 0.0 && relative_heading < -0.95 {
        return seek(
            pursuer_position,
            evader.position,
            pursuer_velocity,
            pursuer_max_speed,
            mask,
        );
    }

    let look_ahead = lookahead(to_evader.length(), pursuer_max_speed + evader.speed);
    seek(
        pursuer_position,
        evader.position + evader.velocity * look_ahead,
        pursuer_velocity,
        pursuer_max_speed,
        mask,
    )
}

/// Flee from where the pursuer will be.
#[allow(clippy::too_many_arguments)]
pub fn evade(
    evader_position: Vec3,
    evader_velocity: Vec3,
    evader_max_speed: f32,
    pursuer_position: Vec3,
    pursuer_velocity: Vec3,
    pursuer_max_speed: f32,
    panic_distance_sq: f32,
    mask: Vec3,
) -> Vec3 {
    let distance = pursuer_position.distance(evader_position);
    let look_ahead = lookahead(distance, evader_max_speed + pursuer_max_speed);

    flee(
        evader_position,
        pursuer_position + pursuer_velocity * look_ahead,
        panic_distance_sq,
        evader_velocity,
        evader_max_speed,
        mask,
    )
}

/// Parameters of the wander sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderParams {
    /// Radius of the sphere the target moves on
    pub radius: f32,
    /// How far ahead of the agent the sphere sits
    pub distance: f32,
    /// Maximum per-axis displacement of the target per call
    pub jitter: f32,
}

/// Random walk of a target constrained to a sphere ahead of the agent.
///
/// `wander_target` is the persistent offset on the sphere and is updated in
/// place. Identical streams and identical prior targets give bit-identical
/// output.
#[allow(clippy::too_many_arguments)]
pub fn wander(
    rng: &mut SteeringRng,
    position: Vec3,
    velocity: Vec3,
    forward: Vec3,
    wander_target: &mut Vec3,
    params: &WanderParams,
    max_speed: f32,
    mask: Vec3,
) -> Vec3 {
    let jitter = Vec3::new(
        rng.next_clamped() * params.jitter,
        rng.next_clamped() * params.jitter,
        rng.next_clamped() * params.jitter,
    );

    let moved = *wander_target + jitter;
    let on_sphere = if moved.length_squared() > EPSILON {
        moved.normalize()
    } else {
        forward
    };
    *wander_target = on_sphere * params.radius;

    let target = position + forward * params.distance + *wander_target;
    seek(position, target, velocity, max_speed, mask)
}

/// Lateral push away from the line through `obstacle_position` along `axis`.
///
/// The offset from the entity to the obstacle is split into its component
/// along the axis and the remainder; the negated remainder points from the
/// line toward the entity.
pub fn obstacle_avoidance_new(
    entity_position: Vec3,
    obstacle_position: Vec3,
    axis: Vec3,
    mask: Vec3,
) -> Vec3 {
    let axis = direction(axis);
    let offset = obstacle_position - entity_position;
    let off_axis = offset - axis * offset.dot(axis);
    -off_axis * mask
}

/// Kinematic state of one party in an interpose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moving {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Get between `a` and `b`, aiming at their predicted midpoint.
pub fn interpose(
    entity_position: Vec3,
    entity_velocity: Vec3,
    a: &Moving,
    b: &Moving,
    max_speed: f32,
    deceleration: f32,
    mask: Vec3,
) -> Vec3 {
    let midpoint = (a.position + b.position) * 0.5;
    let time_to_reach = if max_speed > EPSILON {
        entity_position.distance(midpoint) / max_speed
    } else {
        0.0
    };

    let a_future = a.position + a.velocity * time_to_reach;
    let b_future = b.position + b.velocity * time_to_reach;
    let predicted = (a_future + b_future) * 0.5;

    arrive(
        entity_position,
        predicted,
        deceleration,
        entity_velocity,
        max_speed,
        mask,
    )
}

/// Hold a slot relative to a leader, aiming ahead of its motion.
///
/// `world_offset_position` is the slot already mapped into world space.
#[allow(clippy::too_many_arguments)]
pub fn offset_pursuit(
    entity_position: Vec3,
    entity_velocity: Vec3,
    max_speed: f32,
    deceleration: f32,
    leader_velocity: Vec3,
    leader_max_speed: f32,
    world_offset_position: Vec3,
    mask: Vec3,
) -> Vec3 {
    let distance = entity_position.distance(world_offset_position);
    let look_ahead = lookahead(distance, max_speed + leader_max_speed);

    arrive(
        entity_position,
        world_offset_position + leader_velocity * look_ahead,
        deceleration,
        entity_velocity,
        max_speed,
        mask,
    )
}

/// Push away from neighbors, weighted by inverse distance.
///
/// Neighbors coincident with the entity are skipped: they have no direction
/// to push along.
pub fn separation(entity_position: Vec3, neighbors: &[Vec3], mask: Vec3) -> Vec3 {
    neighbors.iter().fold(Vec3::ZERO, |total, &neighbor| {
        let away = entity_position - neighbor;
        let distance = away.length();
        if distance <= EPSILON {
            return total;
        }
        total + (away / distance) / distance * mask
    })
}

/// Match the average heading of neighbors. Zero for no neighbors.
pub fn alignment(entity_forward: Vec3, neighbor_forwards: &[Vec3], mask: Vec3) -> Vec3 {
    if neighbor_forwards.is_empty() {
        return Vec3::ZERO;
    }

    let average = neighbor_forwards.iter().copied().sum::<Vec3>() / neighbor_forwards.len() as f32;
    (average - entity_forward) * mask
}

/// Seek the centroid of neighbors. Zero for no neighbors.
pub fn cohesion(
    entity_position: Vec3,
    entity_velocity: Vec3,
    max_speed: f32,
    neighbors: &[Vec3],
    mask: Vec3,
) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }

    let centroid = neighbors.iter().copied().sum::<Vec3>() / neighbors.len() as f32;
    seek(entity_position, centroid, entity_velocity, max_speed, mask)
}

/// Spot on the far side of an obstacle from a hunter.
pub fn hiding_position(
    obstacle_position: Vec3,
    obstacle_radius: f32,
    distance_from_boundary: f32,
    hunter_position: Vec3,
) -> Vec3 {
    let away = direction(obstacle_position - hunter_position);
    obstacle_position + away * (obstacle_radius + distance_from_boundary)
}

/// Push out along a wall normal in proportion to how far a feeler overshoots.
pub fn wall_avoidance(normal: Vec3, feeler_length: f32, hit_distance: f32, mask: Vec3) -> Vec3 {
    let overshoot = (feeler_length - hit_distance).max(0.0);
    normal * overshoot * mask
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASK: Vec3 = Vec3::ONE;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_seek_from_rest() {
        let force = seek(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 10.0, MASK);
        assert!(approx(force, Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_seek_mask_applied_once() {
        let masks = [
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let position = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(-4.0, 7.0, 0.5);
        let velocity = Vec3::new(0.3, -1.0, 2.0);

        for mask in masks {
            let unmasked = seek(position, target, velocity, 6.0, Vec3::ONE);
            let masked = seek(position, target, velocity, 6.0, mask);
            assert!(approx(unmasked * mask, masked));
        }
    }

    #[test]
    fn test_seek_at_target_cancels_velocity() {
        let force = seek(Vec3::ONE, Vec3::ONE, Vec3::X, 5.0, MASK);
        assert!(approx(force, Vec3::NEG_X));
    }

    #[test]
    fn test_flee_outside_panic_radius() {
        let force = flee(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 25.0, Vec3::Y, 10.0, MASK);
        assert_eq!(force, Vec3::ZERO);
    }

    #[test]
    fn test_flee_inside_panic_radius() {
        let force = flee(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO, 25.0, Vec3::ZERO, 10.0, MASK);
        assert!(approx(force, Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_arrive_zero_distance() {
        let p = Vec3::new(3.0, -1.0, 2.0);
        for decel in [0.3, 0.6, 0.9, 5.0] {
            let force = arrive(p, p, decel, Vec3::new(1.0, 2.0, 3.0), 8.0, MASK);
            assert_eq!(force, Vec3::ZERO);
        }
    }

    #[test]
    fn test_arrive_brakes_near_destination() {
        let far = arrive(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), 0.6, Vec3::ZERO, 10.0, MASK);
        let near = arrive(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 0.6, Vec3::ZERO, 10.0, MASK);

        assert!(approx(far, Vec3::new(10.0, 0.0, 0.0)));
        assert!(near.length() < far.length());
        assert!(approx(near, Vec3::new(1.0 / 0.6, 0.0, 0.0)));
    }

    #[test]
    fn test_pursuit_head_on_seeks_current_position() {
        let evader = Quarry {
            position: Vec3::new(0.0, 0.0, -10.0),
            forward: Vec3::Z,
            velocity: Vec3::new(0.0, 0.0, 5.0),
            speed: 5.0,
        };
        let force = pursuit(Vec3::ZERO, Vec3::NEG_Z, Vec3::ZERO, 10.0, &evader, MASK);
        assert!(approx(force, Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_pursuit_leads_crossing_target() {
        let evader = Quarry {
            position: Vec3::new(0.0, 0.0, -10.0),
            forward: Vec3::X,
            velocity: Vec3::new(5.0, 0.0, 0.0),
            speed: 5.0,
        };
        let force = pursuit(Vec3::ZERO, Vec3::NEG_Z, Vec3::ZERO, 5.0, &evader, MASK);
        // Predicted position is ahead of the evader along +X
        assert!(force.x > 0.0);
        assert!(force.z < 0.0);
    }

    #[test]
    fn test_evade_predicts_pursuer() {
        let force = evade(
            Vec3::ZERO,
            Vec3::ZERO,
            5.0,
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(-5.0, 0.0, 0.0),
            5.0,
            100.0,
            MASK,
        );
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_evade_zero_speeds_does_not_nan() {
        let force = evade(Vec3::ZERO, Vec3::ZERO, 0.0, Vec3::X, Vec3::ZERO, 0.0, 100.0, MASK);
        assert!(force.is_finite());
    }

    #[test]
    fn test_wander_determinism() {
        let params = WanderParams {
            radius: 2.0,
            distance: 4.0,
            jitter: 0.8,
        };
        let mut rng_a = SteeringRng::from_seed(99);
        let mut rng_b = SteeringRng::from_seed(99);
        let mut target_a = Vec3::NEG_Z;
        let mut target_b = Vec3::NEG_Z;

        for step in 0..50 {
            let position = Vec3::new(step as f32, 0.0, 0.0);
            let a = wander(&mut rng_a, position, Vec3::X, Vec3::NEG_Z, &mut target_a, &params, 5.0, MASK);
            let b = wander(&mut rng_b, position, Vec3::X, Vec3::NEG_Z, &mut target_b, &params, 5.0, MASK);
            assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
        }
        assert!((target_a.length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_obstacle_avoidance_pushes_away_from_line() {
        // Entity sits to the +X side of a line running along -Z through the obstacle
        let force = obstacle_avoidance_new(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::NEG_Z,
            MASK,
        );
        assert!(approx(force, Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_interpose_static_midpoint() {
        let a = Moving {
            position: Vec3::new(-10.0, 0.0, 0.0),
            velocity: Vec3::ZERO,
        };
        let b = Moving {
            position: Vec3::new(10.0, 0.0, 0.0),
            velocity: Vec3::ZERO,
        };
        let force = interpose(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, &a, &b, 5.0, 0.3, MASK);
        assert!(approx(force.normalize(), Vec3::NEG_Z));
    }

    #[test]
    fn test_offset_pursuit_arrives_at_slot() {
        let slot = Vec3::new(0.0, 0.0, 5.0);
        let force = offset_pursuit(Vec3::ZERO, Vec3::ZERO, 5.0, 0.3, Vec3::ZERO, 5.0, slot, MASK);
        assert!(approx(force, Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_separation_inverse_distance() {
        let near = separation(Vec3::ZERO, &[Vec3::new(1.0, 0.0, 0.0)], MASK);
        let far = separation(Vec3::ZERO, &[Vec3::new(4.0, 0.0, 0.0)], MASK);

        assert!(near.length() > far.length());
        assert!(approx(near, Vec3::new(-1.0, 0.0, 0.0)));
        assert!(approx(far, Vec3::new(-0.25, 0.0, 0.0)));
    }

    #[test]
    fn test_separation_skips_coincident() {
        let force = separation(Vec3::ONE, &[Vec3::ONE, Vec3::new(1.0, 1.0, 3.0)], MASK);
        assert!(force.is_finite());
        assert!(approx(force, Vec3::new(0.0, 0.0, -0.5)));
    }

    #[test]
    fn test_alignment() {
        let force = alignment(Vec3::X, &[Vec3::Z, Vec3::Z], MASK);
        assert!(approx(force, Vec3::new(-1.0, 0.0, 1.0)));
        assert_eq!(alignment(Vec3::X, &[], MASK), Vec3::ZERO);
    }

    #[test]
    fn test_cohesion_single_neighbor_is_seek() {
        let neighbor = Vec3::new(2.0, 0.0, 0.0);
        let force = cohesion(Vec3::ZERO, Vec3::ZERO, 10.0, &[neighbor], MASK);
        assert_eq!(force, seek(Vec3::ZERO, neighbor, Vec3::ZERO, 10.0, MASK));
        assert_eq!(cohesion(Vec3::ZERO, Vec3::ZERO, 10.0, &[], MASK), Vec3::ZERO);
    }

    #[test]
    fn test_hiding_position_behind_obstacle() {
        let spot = hiding_position(Vec3::new(5.0, 0.0, 0.0), 1.0, 2.0, Vec3::ZERO);
        assert!(approx(spot, Vec3::new(8.0, 0.0, 0.0)));
    }

    #[test]
    fn test_wall_avoidance_overshoot() {
        let force = wall_avoidance(Vec3::Z, 5.0, 2.0, MASK);
        assert!(approx(force, Vec3::new(0.0, 0.0, 3.0)));
        assert_eq!(wall_avoidance(Vec3::Z, 5.0, 6.0, MASK), Vec3::ZERO);
    }
}
