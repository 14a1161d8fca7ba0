//! Collaborator seams: noise and spell data

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Coord;

/// Receives noises made by actors (wakes sleepers elsewhere in the game)
pub trait NoiseSink {
    fn create_noise(&mut self, position: Coord, radius: i32, intensity: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Noise {
    pub position: Coord,
    pub radius: i32,
    pub intensity: i32,
}

/// Noise sink that just records what it hears
#[derive(Debug, Clone, Default)]
pub struct NoiseLog {
    pub noises: Vec<Noise>,
}

impl NoiseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<Noise> {
        std::mem::take(&mut self.noises)
    }
}

impl NoiseSink for NoiseLog {
    fn create_noise(&mut self, position: Coord, radius: i32, intensity: i32) {
        self.noises.push(Noise {
            position,
            radius,
            intensity,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellEffect {
    Attack,
    Debuff,
    Buff,
    Heal,
    Teleport,
    #[default]
    #[serde(other)]
    Utility,
}

impl SpellEffect {
    /// Aimed at the player; needs line of sight
    pub fn is_offensive(self) -> bool {
        matches!(self, SpellEffect::Attack | SpellEffect::Debuff)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effect_type: SpellEffect,
    #[serde(default)]
    pub mana_cost: i32,
    #[serde(default)]
    pub requires_target: bool,
    #[serde(default)]
    pub damage: Option<String>,
    /// Status applied by buffs and debuffs
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub heal_amount: Option<i32>,
    /// Teleport distance
    #[serde(default)]
    pub range: Option<i32>,
}

impl SpellDef {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Spell data lookup
pub trait SpellBook {
    fn spell(&self, id: &str) -> Option<&SpellDef>;
}

#[derive(Debug, Clone, Default)]
pub struct SpellCatalog {
    spells: AHashMap<String, SpellDef>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let list: Vec<SpellDef> = serde_json::from_str(content)?;
        let mut catalog = Self::new();
        for spell in list {
            catalog.insert(spell);
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn insert(&mut self, spell: SpellDef) {
        self.spells.insert(spell.id.clone(), spell);
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellBook for SpellCatalog {
    fn spell(&self, id: &str) -> Option<&SpellDef> {
        self.spells.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_log_records() {
        let mut log = NoiseLog::new();
        log.create_noise(Coord::new(1, 2), 2, 2);
        assert_eq!(log.drain().len(), 1);
        assert!(log.noises.is_empty());
    }

    #[test]
    fn test_spell_catalog_parse() {
        let catalog = SpellCatalog::from_json_str(
            r#"[
                {"id": "MAGIC_MISSILE", "name": "Magic Missile", "effect_type": "attack",
                 "mana_cost": 2, "requires_target": true, "damage": "2d4"},
                {"id": "GLOW", "effect_type": "light"}
            ]"#,
        )
        .unwrap();
        let missile = catalog.spell("MAGIC_MISSILE").unwrap();
        assert!(missile.effect_type.is_offensive());
        assert_eq!(missile.mana_cost, 2);
        assert_eq!(catalog.spell("GLOW").map(|s| s.effect_type), Some(SpellEffect::Utility));
        assert!(catalog.spell("NOPE").is_none());
    }
}
