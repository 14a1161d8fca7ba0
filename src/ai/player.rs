use serde::{Deserialize, Serialize};

use crate::core::types::Coord;

/// What the actor controller reads from, and writes to, the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTarget {
    pub position: Coord,
    /// Taken by thieves and beggars
    pub gold: i64,
    /// Added to the stealth DC
    pub stealth: i32,
    pub light_radius: i32,
}

impl PlayerTarget {
    pub fn new(position: Coord) -> Self {
        Self {
            position,
            gold: 0,
            stealth: 0,
            light_radius: 0,
        }
    }

    pub fn with_gold(mut self, gold: i64) -> Self {
        self.gold = gold.max(0);
        self
    }

    pub fn with_stealth(mut self, stealth: i32) -> Self {
        self.stealth = stealth;
        self
    }

    pub fn with_light(mut self, light_radius: i32) -> Self {
        self.light_radius = light_radius.max(0);
        self
    }

    /// Remove up to `amount` gold; returns what was actually taken
    pub fn take_gold(&mut self, amount: i64) -> i64 {
        let taken = amount.clamp(0, self.gold);
        self.gold -= taken;
        taken
    }
}
