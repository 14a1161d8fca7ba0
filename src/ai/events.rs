//! Decisions reported to the combat and message collaborators

use serde::{Deserialize, Serialize};

use crate::actors::status::StatusKind;
use crate::core::types::{ActorId, Coord, Tick};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiEventKind {
    /// Opposed roll succeeded
    Spotted,
    /// Started fleeing for this many turns
    Fled { turns: u32 },
    Moved { from: Coord, to: Coord },
    OpenedDoor { at: Coord },
    /// Melee attack to resolve against the player
    MeleeAttack,
    RangedAttack { name: String, damage: String },
    CastSpell { spell_id: String },
    StoleGold { amount: i64 },
    /// Pack member alerted the others
    Howled,
    /// Flavor message with no mechanical effect
    Flavor,
    StatusDamage { effect: StatusKind, amount: i32 },
    Died,
    Removed,
    Cloned { clone: ActorId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEvent {
    pub turn: Tick,
    pub actor: ActorId,
    pub kind: AiEventKind,
    pub description: String,
}

/// Everything the controller decided during one tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: Tick,
    pub events: Vec<AiEvent>,
    /// Actors that got a full AI update
    pub processed: usize,
    /// Actors culled for distance
    pub culled: usize,
}

impl TurnReport {
    pub fn new(turn: Tick) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }

    pub fn push(&mut self, actor: ActorId, kind: AiEventKind, description: String) {
        self.events.push(AiEvent {
            turn: self.turn,
            actor,
            kind,
            description,
        });
    }

    pub fn events_for(&self, actor: ActorId) -> impl Iterator<Item = &AiEvent> {
        self.events.iter().filter(move |e| e.actor == actor)
    }

    pub fn attacks(&self) -> impl Iterator<Item = &AiEvent> {
        self.events.iter().filter(|e| {
            matches!(
                e.kind,
                AiEventKind::MeleeAttack | AiEventKind::RangedAttack { .. } | AiEventKind::CastSpell { .. }
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
