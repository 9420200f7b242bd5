//! Agent configuration files
//!
//! Agent tunables and the behaviors to activate can be saved and loaded in
//! RON (Rusty Object Notation) or JSON format.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{SteeringError, SteeringResult};
use crate::ai::{BehaviorKind, CombinationStrategy, Deceleration};

/// Per-behavior tunables applied when the agent activates the behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Which bundled behavior to activate
    pub kind: BehaviorKind,
    /// Scalar importance
    pub weight: f32,
    /// Chance of being sampled by dithering, in [0, 1]
    pub probability: f32,
    /// Whether the behavior starts enabled
    pub enabled: bool,
    /// Per-axis force mask
    pub force_influence: Vec3,
}

impl BehaviorConfig {
    /// Default settings for a behavior kind
    #[must_use]
    pub fn new(kind: BehaviorKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set weight
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set dithering probability
    #[must_use]
    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            kind: BehaviorKind::Seek,
            weight: 1.0,
            probability: 1.0,
            enabled: true,
            force_influence: Vec3::ONE,
        }
    }
}

/// Kinematic limits and integration options of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Mass used to turn force into acceleration
    pub mass: f32,
    /// Cap on the combined steering force
    pub max_force: f32,
    /// Maximum heading change in radians per second
    pub max_turn_rate: f32,
    /// Speed floor, ignored when zero
    pub min_speed: f32,
    /// Speed cap, ignored when zero
    pub max_speed: f32,
    /// Braking profile used by arrive-style behaviors
    pub deceleration: Deceleration,
    /// Multiplier on the braking profile
    pub deceleration_tweak: f32,
    /// Radius within which flee and evade react
    pub panic_distance: f32,
    /// Rate-limit heading changes by `max_turn_rate`
    pub smooth_rotation: bool,
    /// Roll into turns
    pub banking: bool,
    /// Weight of world up in the banking target
    pub banking_up_bias: f32,
    /// Fraction of lateral acceleration tilting the banking target
    pub banking_acceleration_scale: f32,
    /// How quickly the up axis follows the banking target, per second
    pub banking_smoothing: f32,
    /// How behavior forces are combined
    pub strategy: CombinationStrategy,
    /// Behaviors to activate, in priority order
    pub behaviors: Vec<BehaviorConfig>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            max_force: 10.0,
            max_turn_rate: std::f32::consts::PI,
            min_speed: 0.0,
            max_speed: 10.0,
            deceleration: Deceleration::Normal,
            deceleration_tweak: 0.3,
            panic_distance: 10.0,
            smooth_rotation: true,
            banking: false,
            banking_up_bias: 1.0,
            banking_acceleration_scale: 0.05,
            banking_smoothing: 3.0,
            strategy: CombinationStrategy::default(),
            behaviors: Vec::new(),
        }
    }
}

impl AgentConfig {
    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> SteeringResult<Self> {
        ron::from_str(text).map_err(|e| SteeringError::Deserialize(e.to_string()))
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> SteeringResult<()> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SteeringError::Serialize(e.to_string()))?;
        fs::write(path, ron_string)?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> SteeringResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> SteeringResult<()> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SteeringError::Serialize(e.to_string()))?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> SteeringResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| SteeringError::Deserialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = AgentConfig::from_ron_str(
            "(max_speed: 4.0, strategy: PrioritizedDithering, behaviors: [(kind: Wander, weight: 2.0)])",
        )
        .unwrap();

        assert!((config.max_speed - 4.0).abs() < 1e-6);
        assert!((config.mass - 1.0).abs() < 1e-6);
        assert_eq!(config.strategy, CombinationStrategy::PrioritizedDithering);
        assert_eq!(config.behaviors.len(), 1);
        assert_eq!(config.behaviors[0].kind, BehaviorKind::Wander);
        assert!((config.behaviors[0].probability - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ron_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.ron");

        let config = AgentConfig {
            banking: true,
            behaviors: vec![
                BehaviorConfig::new(BehaviorKind::Separation).with_weight(3.0),
                BehaviorConfig::new(BehaviorKind::Seek),
            ],
            ..Default::default()
        };
        config.save_ron(&path).unwrap();

        let loaded = AgentConfig::load_ron(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.json");

        let config = AgentConfig {
            deceleration: Deceleration::Slow,
            ..Default::default()
        };
        config.save_json(&path).unwrap();
        assert_eq!(AgentConfig::load_json(&path).unwrap().deceleration, Deceleration::Slow);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AgentConfig::load_ron("/definitely/not/here.ron"),
            Err(SteeringError::Io(_))
        ));
    }

    #[test]
    fn test_bad_ron() {
        assert!(matches!(
            AgentConfig::from_ron_str("(mass: \"heavy\")"),
            Err(SteeringError::Deserialize(_))
        ));
    }
}
