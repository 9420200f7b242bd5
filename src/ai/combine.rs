//! Force combination strategies

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::SteeringRng;

/// One enabled behavior's force, as seen by the combiner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub force: Vec3,
    pub weight: f32,
    pub probability: f32,
}

/// How the per-behavior forces of an agent become one force
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationStrategy {
    /// Weighted sum, truncated once at the end
    TruncatedWeighted,
    /// Weighted sum in priority order, each addition capped by the remaining budget
    #[default]
    PrioritizedTruncatedWeighted,
    /// Probabilistic sampling in priority order; stops at the first sampled force
    PrioritizedDithering,
}

impl CombinationStrategy {
    /// Combine contributions given in ascending priority order.
    ///
    /// Dithering needs a random stream and yields zero without one.
    pub fn combine(
        self,
        contributions: &[Contribution],
        max_force: f32,
        rng: Option<&mut SteeringRng>,
    ) -> Vec3 {
        match self {
            Self::TruncatedWeighted => truncated_weighted(contributions, max_force),
            Self::PrioritizedTruncatedWeighted => {
                prioritized_truncated_weighted(contributions, max_force)
            }
            Self::PrioritizedDithering => match rng {
                Some(rng) => prioritized_dithering(contributions, max_force, rng),
                None => Vec3::ZERO,
            },
        }
    }
}

fn truncate(force: Vec3, max: f32) -> Vec3 {
    force.clamp_length_max(max.max(0.0))
}

fn truncated_weighted(contributions: &[Contribution], max_force: f32) -> Vec3 {
    let total = contributions
        .iter()
        .map(|c| c.force * c.weight)
        .sum::<Vec3>();
    truncate(total, max_force)
}

fn prioritized_truncated_weighted(contributions: &[Contribution], max_force: f32) -> Vec3 {
    let mut total = Vec3::ZERO;
    for contribution in contributions {
        let remaining = max_force - total.length();
        if remaining <= 0.0 {
            break;
        }

        let force = contribution.force * contribution.weight;
        if force.length() < remaining {
            total += force;
        } else {
            total += force.normalize_or_zero() * remaining;
        }
    }
    total
}

fn prioritized_dithering(
    contributions: &[Contribution],
    max_force: f32,
    rng: &mut SteeringRng,
) -> Vec3 {
    let mut total = Vec3::ZERO;
    for contribution in contributions {
        if rng.next_f32() < contribution.probability {
            total += contribution.force * contribution.weight / contribution.probability;
            if total != Vec3::ZERO {
                return truncate(total, max_force);
            }
        }
    }
    total
}
