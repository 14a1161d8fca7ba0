//! Data-driven actor templates
//!
//! Templates are loaded from a JSON array. Every field except `id` is
//! optional and falls back to the defaults below.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{GloomError, Result};

/// Fallback population cap for cloning templates that don't name one
pub const DEFAULT_CLONE_CAP: u32 = 24;

/// Behavior archetype dispatched by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiArchetype {
    #[default]
    Passive,
    Wander,
    Aggressive,
    Pack,
    Thief,
    /// Unrecognised archetype: approaches the player once aware
    #[serde(other)]
    Other,
}

impl AiArchetype {
    /// Archetypes that turn hostile on spotting the player
    pub fn turns_hostile(self) -> bool {
        matches!(self, AiArchetype::Aggressive | AiArchetype::Pack | AiArchetype::Thief)
    }

    /// Archetypes with purposeful movement (door heuristic)
    pub fn is_goal_directed(self) -> bool {
        matches!(
            self,
            AiArchetype::Aggressive | AiArchetype::Pack | AiArchetype::Thief | AiArchetype::Wander
        )
    }
}

/// Town NPC roles with their own flavor behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TownRole {
    Beggar,
    Drunk,
    Idiot,
}

impl TownRole {
    pub fn from_behavior(behavior: &str) -> Option<Self> {
        match behavior.trim().to_ascii_lowercase().as_str() {
            "beggar" => Some(TownRole::Beggar),
            "drunk" => Some(TownRole::Drunk),
            "idiot" => Some(TownRole::Idiot),
            _ => None,
        }
    }
}

/// Ranged attack as written in template data: a bare name or a full record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangedAttackSpec {
    Named(String),
    Full {
        name: String,
        #[serde(default)]
        damage: Option<String>,
    },
}

fn default_name() -> String {
    "Unknown".to_string()
}

fn default_hp_base() -> i32 {
    1
}

fn default_detection_range() -> i32 {
    5
}

fn default_flee_chance() -> i32 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_hp_base")]
    pub hp_base: i32,
    #[serde(default)]
    pub hp_per_level: i32,
    #[serde(default)]
    pub attack_base: i32,
    #[serde(default)]
    pub attack_per_level: i32,
    #[serde(default)]
    pub defense_base: i32,
    #[serde(default)]
    pub defense_per_level: i32,

    #[serde(default)]
    pub ai_type: AiArchetype,
    #[serde(default)]
    pub hostile: bool,
    /// Free-form behavior string; `beggar`, `drunk` and `idiot` select a town role
    #[serde(default)]
    pub behavior: String,
    #[serde(default = "default_detection_range")]
    pub detection_range: i32,
    #[serde(default)]
    pub perception_bonus: i32,
    /// Percent chance to flee when badly hurt; 0 never flees
    #[serde(default = "default_flee_chance")]
    pub flee_chance: i32,

    #[serde(default)]
    pub ranged_attack: Option<RangedAttackSpec>,
    #[serde(default)]
    pub ranged_damage: Option<String>,
    #[serde(default)]
    pub ranged_range: i32,

    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub mana: i32,
    #[serde(default)]
    pub max_mana: Option<i32>,

    #[serde(default)]
    pub clone_rate: f32,
    #[serde(default, alias = "clone_cap")]
    pub clone_max_population: Option<u32>,

    #[serde(default)]
    pub sleeps_during_day: bool,
    #[serde(default)]
    pub sleeps_during_night: bool,

    #[serde(default)]
    pub resistances: AHashMap<String, i32>,
    #[serde(default)]
    pub immunities: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub can_open_doors: Option<bool>,
}

impl ActorTemplate {
    /// A template with every field at its default
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: default_name(),
            hp_base: default_hp_base(),
            hp_per_level: 0,
            attack_base: 0,
            attack_per_level: 0,
            defense_base: 0,
            defense_per_level: 0,
            ai_type: AiArchetype::default(),
            hostile: false,
            behavior: String::new(),
            detection_range: default_detection_range(),
            perception_bonus: 0,
            flee_chance: default_flee_chance(),
            ranged_attack: None,
            ranged_damage: None,
            ranged_range: 0,
            spells: Vec::new(),
            mana: 0,
            max_mana: None,
            clone_rate: 0.0,
            clone_max_population: None,
            sleeps_during_day: false,
            sleeps_during_night: false,
            resistances: AHashMap::new(),
            immunities: Vec::new(),
            tags: Vec::new(),
            can_open_doors: None,
        }
    }

    pub fn town_role(&self) -> Option<TownRole> {
        TownRole::from_behavior(&self.behavior)
    }

    /// Actor level at a dungeon depth (depth 0 is the town)
    pub fn level_for_depth(depth: i32) -> i32 {
        (depth / 25).max(1)
    }

    /// Clone cap, with the default applied to cloning templates
    pub fn clone_cap(&self) -> Option<u32> {
        match self.clone_max_population {
            Some(cap) => Some(cap),
            None if self.clone_rate > 0.0 => Some(DEFAULT_CLONE_CAP),
            None => None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// All templates known to a level, by id
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: AHashMap<String, ActorTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let list: Vec<ActorTemplate> = serde_json::from_str(content)?;
        let mut catalog = Self::new();
        for template in list {
            if catalog.templates.contains_key(&template.id) {
                tracing::warn!(id = %template.id, "duplicate actor template, keeping the last one");
            }
            catalog.insert(template);
        }
        tracing::debug!(count = catalog.len(), "loaded actor templates");
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn insert(&mut self, template: ActorTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &str) -> Result<&ActorTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| GloomError::TemplateNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let template = ActorTemplate::new("RAT");
        assert_eq!(template.name, "Unknown");
        assert_eq!(template.hp_base, 1);
        assert_eq!(template.detection_range, 5);
        assert_eq!(template.flee_chance, 50);
        assert_eq!(template.ai_type, AiArchetype::Passive);
        assert_eq!(template.clone_cap(), None);
    }

    #[test]
    fn test_parse_catalog() {
        let json = r#"[
            {"id": "GOBLIN_ARCHER", "name": "Goblin Archer", "ai_type": "aggressive",
             "ranged_attack": "shortbow", "ranged_damage": "1d6", "ranged_range": 6},
            {"id": "GREEN_MOLD", "ai_type": "wander", "clone_rate": 0.1},
            {"id": "STRANGE", "ai_type": "strategist"},
            {"id": "TOWN_BEGGAR", "behavior": "beggar", "clone_cap": 3}
        ]"#;
        let catalog = TemplateCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 4);

        let archer = catalog.get("GOBLIN_ARCHER").unwrap();
        assert_eq!(archer.ai_type, AiArchetype::Aggressive);
        assert_eq!(archer.ranged_attack, Some(RangedAttackSpec::Named("shortbow".into())));

        assert_eq!(catalog.get("GREEN_MOLD").unwrap().clone_cap(), Some(DEFAULT_CLONE_CAP));
        assert_eq!(catalog.get("STRANGE").unwrap().ai_type, AiArchetype::Other);

        let beggar = catalog.get("TOWN_BEGGAR").unwrap();
        assert_eq!(beggar.town_role(), Some(TownRole::Beggar));
        assert_eq!(beggar.clone_cap(), Some(3));
    }

    #[test]
    fn test_missing_template() {
        let catalog = TemplateCatalog::new();
        assert!(matches!(catalog.get("NOPE"), Err(GloomError::TemplateNotFound(_))));
    }

    #[test]
    fn test_level_for_depth() {
        assert_eq!(ActorTemplate::level_for_depth(0), 1);
        assert_eq!(ActorTemplate::level_for_depth(24), 1);
        assert_eq!(ActorTemplate::level_for_depth(75), 3);
    }
}
