//! Flee odds and pack morale
//!
//! All chances are whole percents rolled against a d100. A `flee_chance`
//! of 0 marks a fearless actor that never flees.

use rand::Rng;

use crate::ai::constants::*;

/// Roll `1..=100 <= chance`
pub fn roll_percent<R: Rng>(rng: &mut R, chance: i32) -> bool {
    chance > 0 && rng.gen_range(1..=100) <= chance
}

/// Aggressive actors below 20% HP: tougher (higher level) ones hold longer
pub fn aggressive_flee_chance(flee_chance: i32, level: i32) -> i32 {
    if flee_chance <= 0 {
        return 0;
    }
    let level_mod = (20 - 2 * level).max(0);
    (flee_chance - level_mod).max(AGGRESSIVE_MIN_FLEE_PERCENT)
}

/// Flee trigger for everything that isn't aggressive, pack or thief
pub fn default_flee_chance(flee_chance: i32) -> i32 {
    flee_chance.max(0)
}

/// HP ratio below which a pack member considers retreat
pub fn pack_morale_threshold(allies: usize) -> f32 {
    (PACK_BASE_MORALE + allies as f32 * PACK_MORALE_PER_ALLY).min(PACK_MAX_MORALE)
}

/// Retreat chance for a pack member; allies steady it
pub fn pack_flee_chance(hp_ratio: f32, allies: usize, flee_chance: i32) -> i32 {
    if flee_chance <= 0 {
        return 0;
    }
    let base = ((1.0 - hp_ratio.clamp(0.0, 1.0)) * 100.0) as i32;
    (base - allies as i32 * PACK_FLEE_REDUCTION_PER_ALLY).max(PACK_MIN_FLEE_PERCENT)
}

pub fn pack_flee_turns(allies: usize) -> u32 {
    PACK_FLEE_TURNS + allies as u32 * PACK_FLEE_TURNS_PER_ALLY
}

/// 8 to 13 turns
pub fn aggressive_flee_turns<R: Rng>(rng: &mut R) -> u32 {
    8 + rng.gen_range(0..=5)
}
