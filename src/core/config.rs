//! Core configuration with documented defaults
//!
//! Every field is optional in the TOML file; anything left out keeps the
//! default below. The config is passed explicitly to the systems that need it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::calendar::DayNightCycle;
use crate::core::error::{GloomError, Result};

/// Sight and lighting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Sight radius with no carried light (dungeon and town at night)
    ///
    /// The effective dungeon radius is `max(light_radius, night_base_radius)`.
    pub night_base_radius: i32,

    /// Fraction of a light's radius that counts as bright (the rest is dim)
    pub bright_fraction: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            night_base_radius: 2,
            bright_fraction: 0.6,
        }
    }
}

/// Day/night cycle lengths, in turns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Length of one full day/night cycle (0 = permanent day)
    pub cycle_length: u64,
    /// Turns of daylight at the start of each cycle
    pub day_duration: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            cycle_length: 1000,
            day_duration: 500,
        }
    }
}

impl TimeConfig {
    pub fn cycle(&self) -> DayNightCycle {
        DayNightCycle::new(self.cycle_length, self.day_duration)
    }
}

/// Actor controller parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seed for the controller's ChaCha RNG
    pub seed: u64,

    /// Actors act once every `move_interval` controller ticks
    ///
    /// At 2, monsters move at half the player's pace.
    pub move_interval: u32,

    /// Unaware actors farther than this (euclidean tiles) only get
    /// status and sleep updates
    pub ai_update_distance: f32,

    /// A* node budget for approach paths
    ///
    /// Bounds the worst case on wide open caverns; exhausting it falls back
    /// to a greedy step.
    pub approach_node_budget: usize,

    /// Ticks a dead actor lingers (death animation) before removal
    pub death_animation_ticks: u32,

    /// Distance at or below which an actor counts as adjacent (covers diagonals)
    pub melee_range: f32,

    /// Maximum distance for spells that need a target
    pub spell_target_range: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            move_interval: 2,
            ai_update_distance: 20.0,
            approach_node_budget: 500,
            death_animation_ticks: 12,
            melee_range: 1.5,
            spell_target_range: 10.0,
        }
    }
}

/// Opposed stealth roll parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Base difficulty; the DC is `base_dc + player stealth`
    pub base_dc: i32,
    /// Bonus to the perception roll when the player stands in dim light
    pub dim_modifier: i32,
    /// Bonus to the perception roll when the player stands in bright light
    pub bright_modifier: i32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            base_dc: 10,
            dim_modifier: 2,
            bright_modifier: 5,
        }
    }
}

/// Complete configuration for the decision core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub vision: VisionConfig,
    pub time: TimeConfig,
    pub ai: AiConfig,
    pub detection: DetectionConfig,
}

impl CoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.vision.night_base_radius < 0 {
            return Err(GloomError::InvalidConfig(
                "night_base_radius must be non-negative".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.vision.bright_fraction) {
            return Err(GloomError::InvalidConfig(format!(
                "bright_fraction ({}) must be within 0.0..=1.0",
                self.vision.bright_fraction
            )));
        }

        if self.time.day_duration > self.time.cycle_length && self.time.cycle_length > 0 {
            return Err(GloomError::InvalidConfig(format!(
                "day_duration ({}) should be <= cycle_length ({})",
                self.time.day_duration, self.time.cycle_length
            )));
        }

        if self.ai.move_interval == 0 {
            return Err(GloomError::InvalidConfig("move_interval must be at least 1".into()));
        }

        if self.ai.approach_node_budget == 0 {
            return Err(GloomError::InvalidConfig(
                "approach_node_budget must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            [ai]
            seed = 7
            move_interval = 3

            [vision]
            night_base_radius = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.ai.seed, 7);
        assert_eq!(config.ai.move_interval, 3);
        assert_eq!(config.ai.approach_node_budget, 500);
        assert_eq!(config.vision.night_base_radius, 4);
        assert_eq!(config.detection.base_dc, 10);
    }

    #[test]
    fn test_rejects_zero_move_interval() {
        let result = CoreConfig::from_toml_str("[ai]\nmove_interval = 0\n");
        assert!(matches!(result, Err(GloomError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let result = CoreConfig::from_toml_str("[ai\nseed = ");
        assert!(matches!(result, Err(GloomError::TomlError(_))));
    }

    #[test]
    fn test_time_config_builds_cycle() {
        let cycle = TimeConfig { cycle_length: 10, day_duration: 4 }.cycle();
        assert!(cycle.is_daytime(3));
        assert!(!cycle.is_daytime(4));
    }
}
