//! Capabilities resolved once from a template at spawn

use serde::{Deserialize, Serialize};

use crate::actors::template::{ActorTemplate, RangedAttackSpec};

/// Tags that rule out working a door handle
const NO_HANDS_TAGS: [&str; 8] = [
    "undead",
    "construct",
    "ooze",
    "elemental",
    "plant",
    "insect",
    "snake",
    "ghost",
];

/// Template id fragments that mark a humanoid
const HUMANOID_KEYWORDS: [&str; 22] = [
    "HUMAN", "CITIZEN", "GUARD", "BRIGAND", "MERCHANT", "PRIEST", "PALADIN", "KNIGHT", "WARRIOR",
    "VETERAN", "ROGUE", "ORC", "GOBLIN", "ELF", "DWARF", "HALFLING", "GNOME", "SOLDIER",
    "MERCENARY", "BANDIT", "THIEF", "TOWN",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedAttack {
    pub name: String,
    /// Dice expression, resolved by the combat collaborator
    pub damage: String,
    pub range: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorCapabilities {
    pub can_open_doors: bool,
    pub ranged: Option<RangedAttack>,
    pub spells: Vec<String>,
    pub immunities: Vec<String>,
    /// Percent reduction of fire damage (negative = vulnerable)
    pub fire_resistance: i32,
    pub poison_immune: bool,
}

impl ActorCapabilities {
    pub fn resolve(template: &ActorTemplate) -> Self {
        let ranged = template.ranged_attack.as_ref().map(|spec| {
            let (name, damage) = match spec {
                RangedAttackSpec::Named(name) => (name.clone(), template.ranged_damage.clone()),
                RangedAttackSpec::Full { name, damage } => {
                    (name.clone(), damage.clone().or_else(|| template.ranged_damage.clone()))
                }
            };
            RangedAttack {
                name,
                damage: damage.unwrap_or_else(|| "1d4".to_string()),
                range: template.ranged_range,
            }
        });

        let poison_immune = template.has_tag("undead")
            || template.immunities.iter().any(|i| i.eq_ignore_ascii_case("poisoned"));

        Self {
            can_open_doors: can_open_doors(template),
            ranged,
            spells: template.spells.clone(),
            immunities: template.immunities.clone(),
            fire_resistance: template.resistances.get("fire").copied().unwrap_or(0),
            poison_immune,
        }
    }

    pub fn is_immune_to(&self, effect: &str) -> bool {
        self.immunities.iter().any(|i| i.eq_ignore_ascii_case(effect))
    }
}

/// Door heuristic: explicit flag, then disqualifying tags, then humanoid
/// id plus some sign of intelligence
fn can_open_doors(template: &ActorTemplate) -> bool {
    if let Some(flag) = template.can_open_doors {
        return flag;
    }

    if NO_HANDS_TAGS.iter().any(|tag| template.has_tag(tag)) {
        return false;
    }

    let id = template.id.to_ascii_uppercase();
    if !HUMANOID_KEYWORDS.iter().any(|k| id.contains(k)) {
        return false;
    }

    !template.spells.is_empty() || template.ranged_attack.is_some() || template.ai_type.is_goal_directed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::template::AiArchetype;

    #[test]
    fn test_explicit_flag_wins() {
        let mut template = ActorTemplate::new("GIANT_SPIDER");
        template.can_open_doors = Some(true);
        assert!(ActorCapabilities::resolve(&template).can_open_doors);
    }

    #[test]
    fn test_humanoid_needs_intelligence() {
        let mut template = ActorTemplate::new("ORC_GRUNT");
        assert!(!ActorCapabilities::resolve(&template).can_open_doors);
        template.ai_type = AiArchetype::Aggressive;
        assert!(ActorCapabilities::resolve(&template).can_open_doors);
    }

    #[test]
    fn test_undead_cannot_open() {
        let mut template = ActorTemplate::new("SKELETON_WARRIOR");
        template.ai_type = AiArchetype::Aggressive;
        template.tags = vec!["Undead".into()];
        let caps = ActorCapabilities::resolve(&template);
        assert!(!caps.can_open_doors);
        assert!(caps.poison_immune);
    }

    #[test]
    fn test_non_humanoid() {
        let mut template = ActorTemplate::new("GIANT_RAT");
        template.ai_type = AiArchetype::Pack;
        assert!(!ActorCapabilities::resolve(&template).can_open_doors);
    }

    #[test]
    fn test_ranged_resolution() {
        let mut template = ActorTemplate::new("KOBOLD");
        template.ranged_attack = Some(RangedAttackSpec::Named("sling".into()));
        template.ranged_range = 5;
        let ranged = ActorCapabilities::resolve(&template).ranged.unwrap();
        assert_eq!(ranged.damage, "1d4");
        assert_eq!(ranged.range, 5);
    }
}
