//! Actor behavior constants - all tunable odds in one place
//!
//! Probabilities are in 0.0..=1.0 unless the name says PERCENT.

// Stealth roll
pub const STEALTH_DIE: i32 = 20;

// Noise (radius, intensity)
pub const MELEE_NOISE: (i32, i32) = (5, 5);
pub const OFFENSIVE_SPELL_NOISE: (i32, i32) = (6, 6);
pub const HEAL_SPELL_NOISE: (i32, i32) = (4, 3);
pub const BUFF_SPELL_NOISE: (i32, i32) = (5, 4);
pub const TELEPORT_SPELL_NOISE: (i32, i32) = (5, 5);
pub const OTHER_SPELL_NOISE: (i32, i32) = (5, 4);
pub const DOOR_NOISE: (i32, i32) = (2, 2);

// Wandering
pub const WANDER_TRIES: usize = 4;

// Spellcasting
pub const DEFAULT_HEAL_AMOUNT: i32 = 10;
pub const DEFAULT_BUFF_DURATION: u32 = 25;
pub const DEFAULT_TELEPORT_RANGE: i32 = 6;
pub const TELEPORT_ATTEMPTS: usize = 20;

// Generic flee checks
pub const AGGRESSIVE_FLEE_HP: f32 = 0.20;
pub const DEFAULT_FLEE_HP: f32 = 0.30;
pub const AGGRESSIVE_MIN_FLEE_PERCENT: i32 = 10;
pub const DEFAULT_FLEE_TURNS: u32 = 10;

// Aggressive archetype
pub const WOUNDED_HP: f32 = 0.5;
pub const AGGRESSIVE_RANGED_CHANCE: f64 = 0.55;
pub const AGGRESSIVE_RANGED_CHANCE_WOUNDED: f64 = 0.70;
pub const AGGRESSIVE_SPELL_CHANCE: f64 = 0.35;
pub const AGGRESSIVE_SPELL_CHANCE_WOUNDED: f64 = 0.50;

// Pack archetype
pub const PACK_BASE_MORALE: f32 = 0.25;
pub const PACK_MORALE_PER_ALLY: f32 = 0.10;
pub const PACK_MAX_MORALE: f32 = 0.45;
pub const PACK_FLEE_REDUCTION_PER_ALLY: i32 = 15;
pub const PACK_MIN_FLEE_PERCENT: i32 = 10;
pub const PACK_FLEE_TURNS: u32 = 10;
pub const PACK_FLEE_TURNS_PER_ALLY: u32 = 2;
pub const PACK_BREAK_HP: f32 = 0.4;
pub const PACK_BREAK_CHANCE: f64 = 0.3;
pub const PACK_BREAK_TURNS: u32 = 8;
pub const PACK_ALERT_CHANCE: f64 = 0.7;
pub const PACK_HOWL_CHANCE: f64 = 0.4;
pub const PACK_RANGED_CHANCE: f64 = 0.50;
pub const PACK_SPELL_CHANCE: f64 = 0.30;
pub const PACK_FLANK_MIN_ALLIES: usize = 2;
pub const PACK_FLANK_DISTANCE: f32 = 4.0;

// Thief archetype
pub const THIEF_SHADOW_MODIFIER: f64 = 0.5;
pub const THIEF_STALK_RANGE_FACTOR: f32 = 1.5;
pub const THIEF_FLANK_OFFSETS: [(i32, i32); 8] =
    [(2, 0), (-2, 0), (0, 2), (0, -2), (2, 1), (2, -1), (-2, 1), (-2, -1)];
pub const THIEF_AMBUSH_CHANCE: f64 = 0.70;
pub const THIEF_TAUNT_CHANCE: f64 = 0.4;
pub const THIEF_STEAL_CHANCE: f64 = 0.60;
pub const THIEF_ATTACK_CHANCE: f64 = 0.3;
pub const THIEF_ATTACK_FLEE_CHANCE: f64 = 0.5;
pub const THIEF_ATTACK_FLEE_TURNS: u32 = 10;
pub const THIEF_FAILED_THEFT_FLEE_TURNS: u32 = 12;
pub const THIEF_STEAL_FLEE_TURNS: u32 = 15;
pub const THIEF_SHADOW_BONUS: i32 = 3;
pub const THIEF_CIRCLE_DISTANCE: f32 = 4.0;

// Town NPCs
pub const BEGGAR_SNATCH_CHANCE: f64 = 0.6;
pub const BEGGAR_SNATCH_MAX: i64 = 5;
pub const DRUNK_PARTY_CHANCE: f64 = 0.4;
pub const DRUNK_ALE_CHANCE: f64 = 0.8;

// Pursuit gates
pub const BEGGAR_PURSUIT_BASE: f64 = 0.45;
pub const BEGGAR_PURSUIT_NEAR: f64 = 0.20;
pub const BEGGAR_PURSUIT_NIGHT: f64 = 0.10;
pub const BEGGAR_PURSUIT_MAX: f64 = 0.85;
pub const BEGGAR_NEAR_DISTANCE: f32 = 5.0;
pub const THIEF_PURSUIT_BASE: f64 = 0.25;
pub const THIEF_PURSUIT_RICH: f64 = 0.25;
pub const THIEF_PURSUIT_SOME_GOLD: f64 = 0.15;
pub const THIEF_PURSUIT_NIGHT: f64 = 0.15;
pub const THIEF_PURSUIT_NEAR: f64 = 0.10;
pub const THIEF_PURSUIT_MAX: f64 = 0.9;
pub const THIEF_RICH_GOLD: i64 = 50;
pub const THIEF_NEAR_DISTANCE: f32 = 6.0;
