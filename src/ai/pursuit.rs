//! Pursuit gates for beggars and thieves
//!
//! Chances rise with the player's gold, closeness and darkness.

use rand::Rng;

use crate::ai::constants::*;

pub fn beggar_pursuit_chance(gold: i64, distance: f32, is_night: bool) -> f64 {
    if gold <= 0 {
        return 0.0;
    }
    let mut chance = BEGGAR_PURSUIT_BASE;
    if distance < BEGGAR_NEAR_DISTANCE {
        chance += BEGGAR_PURSUIT_NEAR;
    }
    if is_night {
        chance += BEGGAR_PURSUIT_NIGHT;
    }
    chance.min(BEGGAR_PURSUIT_MAX)
}

pub fn thief_pursuit_chance(gold: i64, distance: f32, is_night: bool) -> f64 {
    let mut chance = THIEF_PURSUIT_BASE;
    if gold > THIEF_RICH_GOLD {
        chance += THIEF_PURSUIT_RICH;
    } else if gold > 0 {
        chance += THIEF_PURSUIT_SOME_GOLD;
    }
    if is_night {
        chance += THIEF_PURSUIT_NIGHT;
    }
    if distance < THIEF_NEAR_DISTANCE {
        chance += THIEF_PURSUIT_NEAR;
    }
    chance.min(THIEF_PURSUIT_MAX)
}

pub fn should_pursue<R: Rng>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beggar_needs_gold() {
        assert_eq!(beggar_pursuit_chance(0, 1.0, true), 0.0);
        assert!((beggar_pursuit_chance(10, 10.0, false) - 0.45).abs() < 1e-9);
        assert!((beggar_pursuit_chance(10, 2.0, true) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_thief_gate() {
        assert!((thief_pursuit_chance(0, 10.0, false) - 0.25).abs() < 1e-9);
        assert!((thief_pursuit_chance(20, 10.0, false) - 0.40).abs() < 1e-9);
        // 0.25 + 0.25 + 0.15 + 0.10 = 0.75
        assert!((thief_pursuit_chance(100, 3.0, true) - 0.75).abs() < 1e-9);
    }
}
