//! Timed status effects with magnitude and stacking

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Fleeing,
    Immobilized,
    Poisoned,
    Burning,
    Named(String),
}

impl StatusKind {
    pub fn name(&self) -> &str {
        match self {
            StatusKind::Fleeing => "Fleeing",
            StatusKind::Immobilized => "Immobilized",
            StatusKind::Poisoned => "Poisoned",
            StatusKind::Burning => "Burning",
            StatusKind::Named(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "Fleeing" => StatusKind::Fleeing,
            "Immobilized" => StatusKind::Immobilized,
            "Poisoned" => StatusKind::Poisoned,
            "Burning" => StatusKind::Burning,
            other => StatusKind::Named(other.to_string()),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration: u32,
    pub magnitude: i32,
    pub stacks: u32,
    pub max_stacks: u32,
    pub source: String,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: u32) -> Self {
        Self {
            kind,
            duration: duration.max(1),
            magnitude: 1,
            stacks: 1,
            max_stacks: 1,
            source: String::new(),
        }
    }

    pub fn with_magnitude(mut self, magnitude: i32) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn with_stacks(mut self, stacks: u32, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks.max(1);
        self.stacks = stacks.clamp(1, self.max_stacks);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Damage per tick for damage-over-time effects
    pub fn tick_damage(&self) -> i32 {
        (self.magnitude * self.stacks as i32).max(1)
    }
}

/// Active effects on one actor, in application order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect for `duration` turns
    pub fn add(&mut self, kind: StatusKind, duration: u32) -> bool {
        self.apply(StatusEffect::new(kind, duration))
    }

    /// Apply an effect. Re-applying extends the duration, keeps the higher
    /// magnitude and adds stacks up to the cap. Returns false only when the
    /// cap was already reached.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) else {
            self.effects.push(effect);
            return true;
        };

        existing.duration = existing.duration.max(effect.duration);
        existing.magnitude = existing.magnitude.max(effect.magnitude);
        if existing.max_stacks <= 1 {
            return true;
        }
        let added = existing.stacks < existing.max_stacks;
        existing.stacks = (existing.stacks + effect.stacks).min(existing.max_stacks);
        added
    }

    pub fn remove(&mut self, kind: &StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| &e.kind != kind);
        self.effects.len() != before
    }

    pub fn has(&self, kind: &StatusKind) -> bool {
        self.effects.iter().any(|e| &e.kind == kind)
    }

    pub fn get(&self, kind: &StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| &e.kind == kind)
    }

    pub fn is_fleeing(&self) -> bool {
        self.has(&StatusKind::Fleeing)
    }

    pub fn is_immobilized(&self) -> bool {
        self.has(&StatusKind::Immobilized)
    }

    /// Advance one turn; returns the kinds that expired
    pub fn tick(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.duration = effect.duration.saturating_sub(1);
            if effect.duration == 0 {
                expired.push(effect.kind.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_expires() {
        let mut effects = StatusEffects::new();
        effects.add(StatusKind::Fleeing, 2);
        assert!(effects.tick().is_empty());
        assert!(effects.is_fleeing());
        assert_eq!(effects.tick(), vec![StatusKind::Fleeing]);
        assert!(!effects.is_fleeing());
    }

    #[test]
    fn test_refresh_keeps_longer_duration() {
        let mut effects = StatusEffects::new();
        effects.add(StatusKind::Fleeing, 10);
        effects.add(StatusKind::Fleeing, 4);
        assert_eq!(effects.get(&StatusKind::Fleeing).map(|e| e.duration), Some(10));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_stacking_caps() {
        let mut effects = StatusEffects::new();
        let poison = StatusEffect::new(StatusKind::Poisoned, 5)
            .with_magnitude(2)
            .with_stacks(1, 3);
        assert!(effects.apply(poison.clone()));
        assert!(effects.apply(poison.clone()));
        assert!(effects.apply(poison.clone()));
        assert!(!effects.apply(poison));

        let active = effects.get(&StatusKind::Poisoned).unwrap();
        assert_eq!(active.stacks, 3);
        assert_eq!(active.tick_damage(), 6);
    }

    #[test]
    fn test_zero_duration_clamped() {
        let effect = StatusEffect::new(StatusKind::Named("Blessed".into()), 0);
        assert_eq!(effect.duration, 1);
        assert_eq!(effect.kind.to_string(), "Blessed");
        assert_eq!(StatusKind::from_name("Burning"), StatusKind::Burning);
    }
}
