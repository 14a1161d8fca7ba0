//! Dynamic light sources and light levels

use serde::{Deserialize, Serialize};

use crate::core::config::DetectionConfig;
use crate::core::types::{Coord, Tick};

/// Tint codes handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum LightColor {
    #[default]
    None = 0,
    Daylight = 1,
    Torch = 2,
    Magical = 3,
    Cold = 4,
}

impl LightColor {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Where a light came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightSource {
    /// Equipped by the player; re-registered on every recompute
    Carried,
    /// Torches set into the level
    Placed,
    /// Spell effects
    Spell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicLight {
    pub position: Coord,
    pub radius: i32,
    pub color: LightColor,
    /// Last turn on which the light still shines
    pub expires_at: Tick,
    pub source: LightSource,
}

impl DynamicLight {
    pub fn covers(&self, coord: Coord) -> bool {
        coord.distance_squared(&self.position) <= self.radius * self.radius
    }
}

/// Qualitative light level, used by the stealth roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LightLevel {
    Dark,
    Dim,
    Bright,
}

impl LightLevel {
    /// Bonus to an observer's perception roll against someone standing here
    pub fn detection_modifier(self, config: &DetectionConfig) -> i32 {
        match self {
            LightLevel::Dark => 0,
            LightLevel::Dim => config.dim_modifier,
            LightLevel::Bright => config.bright_modifier,
        }
    }
}

/// Ordered set of active lights
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightRegistry {
    lights: Vec<DynamicLight>,
}

impl LightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a light for `duration` turns starting at `turn`.
    /// Lights with a non-positive radius are ignored.
    pub fn add(
        &mut self,
        position: Coord,
        radius: i32,
        color: LightColor,
        source: LightSource,
        turn: Tick,
        duration: Tick,
    ) -> bool {
        if radius <= 0 {
            return false;
        }
        self.lights.push(DynamicLight {
            position,
            radius,
            color,
            expires_at: turn + duration,
            source,
        });
        true
    }

    /// Drop lights whose last turn has passed
    pub fn purge_expired(&mut self, turn: Tick) {
        self.lights.retain(|light| turn <= light.expires_at);
    }

    pub fn remove_source(&mut self, source: LightSource) {
        self.lights.retain(|light| light.source != source);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicLight> {
        self.lights.iter()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Light level at `coord`; the brightest covering light wins
    pub fn level_at(&self, coord: Coord, bright_fraction: f32) -> LightLevel {
        self.lights
            .iter()
            .map(|light| {
                let dist = coord.distance(&light.position);
                if dist <= light.radius as f32 * bright_fraction {
                    LightLevel::Bright
                } else if dist <= light.radius as f32 {
                    LightLevel::Dim
                } else {
                    LightLevel::Dark
                }
            })
            .max()
            .unwrap_or(LightLevel::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_radius_ignored() {
        let mut lights = LightRegistry::new();
        assert!(!lights.add(Coord::new(1, 1), 0, LightColor::Torch, LightSource::Placed, 0, 5));
        assert!(lights.is_empty());
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let mut lights = LightRegistry::new();
        lights.add(Coord::new(1, 1), 3, LightColor::Magical, LightSource::Spell, 10, 2);
        lights.purge_expired(12);
        assert_eq!(lights.len(), 1);
        lights.purge_expired(13);
        assert!(lights.is_empty());
    }

    #[test]
    fn test_remove_carried_only() {
        let mut lights = LightRegistry::new();
        lights.add(Coord::new(1, 1), 2, LightColor::Torch, LightSource::Carried, 0, 1);
        lights.add(Coord::new(4, 4), 2, LightColor::Torch, LightSource::Placed, 0, 100);
        lights.remove_source(LightSource::Carried);
        assert_eq!(lights.len(), 1);
        assert_eq!(lights.iter().next().map(|l| l.source), Some(LightSource::Placed));
    }

    #[test]
    fn test_light_levels() {
        let mut lights = LightRegistry::new();
        lights.add(Coord::new(0, 0), 5, LightColor::Torch, LightSource::Placed, 0, 10);
        assert_eq!(lights.level_at(Coord::new(3, 0), 0.6), LightLevel::Bright);
        assert_eq!(lights.level_at(Coord::new(4, 0), 0.6), LightLevel::Dim);
        assert_eq!(lights.level_at(Coord::new(5, 1), 0.6), LightLevel::Dark);
        assert_eq!(LightLevel::Dim.detection_modifier(&DetectionConfig::default()), 2);
        assert_eq!(LightColor::Cold.code(), 4);
    }

    #[test]
    fn test_brightest_overlapping_light_wins() {
        let mut lights = LightRegistry::new();
        lights.add(Coord::new(0, 0), 5, LightColor::Torch, LightSource::Placed, 0, 10);
        lights.add(Coord::new(4, 0), 1, LightColor::Magical, LightSource::Spell, 0, 10);
        assert_eq!(lights.level_at(Coord::new(4, 0), 0.6), LightLevel::Bright);
        assert_eq!(lights.level_at(Coord::new(2, 0), 0.6), LightLevel::Bright);
        assert_eq!(lights.level_at(Coord::new(5, 0), 0.6), LightLevel::Dim);
    }
}
