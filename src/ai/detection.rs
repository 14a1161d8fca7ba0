//! Opposed stealth roll gating Unaware -> Aware
//!
//! `d20 + perception + light modifier` against `base DC + player stealth`.
//! The light modifier comes from the light level of the player's tile.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actors::actor::ActorState;
use crate::ai::constants::STEALTH_DIE;
use crate::ai::player::PlayerTarget;
use crate::core::config::DetectionConfig;
use crate::core::types::Coord;
use crate::map::MapView;
use crate::vision::{line_of_sight, LightLevel, VisibilityState};

/// One resolved perception-vs-stealth attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthCheck {
    pub roll: i32,
    pub perception: i32,
    pub light_modifier: i32,
    pub stealth_dc: i32,
}

impl StealthCheck {
    pub fn total(&self) -> i32 {
        self.roll + self.perception + self.light_modifier
    }

    pub fn succeeded(&self) -> bool {
        self.total() >= self.stealth_dc
    }
}

/// Pure roll arithmetic
pub fn resolve_stealth_check(
    roll: i32,
    perception: i32,
    light: LightLevel,
    stealth: i32,
    config: &DetectionConfig,
) -> StealthCheck {
    StealthCheck {
        roll,
        perception,
        light_modifier: light.detection_modifier(config),
        stealth_dc: config.base_dc + stealth,
    }
}

/// Draw the d20 and resolve
pub fn roll_stealth_check<R: Rng>(
    rng: &mut R,
    perception: i32,
    light: LightLevel,
    stealth: i32,
    config: &DetectionConfig,
) -> StealthCheck {
    let roll = rng.gen_range(1..=STEALTH_DIE);
    resolve_stealth_check(roll, perception, light, stealth, config)
}

/// Can `actor` currently see the player at all (range and line of sight)?
pub fn in_sight<M: MapView + ?Sized>(actor: &ActorState, player_pos: Coord, map: &M) -> bool {
    actor.position.distance(&player_pos) <= actor.detection_range as f32
        && line_of_sight(map, actor.position, player_pos)
}

/// Try to spot the player. Only unaware actors that have never spotted the
/// player, are within range and have line of sight get to roll.
pub fn attempt_spot<M: MapView + ?Sized, R: Rng>(
    actor: &mut ActorState,
    player: &PlayerTarget,
    map: &M,
    visibility: &VisibilityState,
    config: &DetectionConfig,
    rng: &mut R,
) -> bool {
    if actor.has_spotted_player || actor.aware_of_player {
        return false;
    }
    if !in_sight(actor, player.position, map) {
        return false;
    }

    let light = visibility.light_level_at(player.position);
    let check = roll_stealth_check(rng, actor.perception_value(), light, player.stealth, config);

    if check.succeeded() {
        actor.has_spotted_player = true;
        actor.aware_of_player = true;
        if actor.archetype.turns_hostile() {
            actor.hostile = true;
        }
        tracing::info!(
            actor = %actor.name,
            total = check.total(),
            dc = check.stealth_dc,
            ?light,
            "actor spotted the player"
        );
        true
    } else {
        tracing::debug!(
            actor = %actor.name,
            total = check.total(),
            dc = check.stealth_dc,
            ?light,
            "stealth check failed"
        );
        false
    }
}

/// Keep awareness in step with sight for actors that have spotted the player.
/// The sticky spotted flag is never cleared.
pub fn refresh_awareness<M: MapView + ?Sized>(actor: &mut ActorState, player_pos: Coord, map: &M) {
    if !actor.has_spotted_player {
        return;
    }
    let sees = in_sight(actor, player_pos, map);
    if actor.aware_of_player && !sees {
        tracing::debug!(actor = %actor.name, "lost sight of the player");
    }
    actor.aware_of_player = sees;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::template::{ActorTemplate, AiArchetype};
    use crate::core::config::VisionConfig;
    use crate::map::{TileGrid, TileKind};
    use crate::vision::{SightMode, Viewer};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn actor(x: i32, y: i32) -> ActorState {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut template = ActorTemplate::new("ORC");
        template.ai_type = AiArchetype::Aggressive;
        template.detection_range = 6;
        ActorState::spawn(&template, 1, Coord::new(x, y), 2, &mut rng)
    }

    #[test]
    fn test_resolve_arithmetic() {
        let config = DetectionConfig::default();
        let check = resolve_stealth_check(10, 0, LightLevel::Dark, 0, &config);
        assert!(check.succeeded());
        let check = resolve_stealth_check(9, 0, LightLevel::Dark, 0, &config);
        assert!(!check.succeeded());
        let check = resolve_stealth_check(5, 1, LightLevel::Bright, 1, &config);
        assert_eq!(check.total(), 11);
        assert_eq!(check.stealth_dc, 11);
        assert!(check.succeeded());

        let tuned = DetectionConfig { dim_modifier: 4, ..DetectionConfig::default() };
        assert_eq!(resolve_stealth_check(1, 0, LightLevel::Dim, 0, &tuned).light_modifier, 4);
    }

    #[test]
    fn test_all_faces_give_expected_rate() {
        let config = DetectionConfig::default();
        let successes = (1..=20)
            .filter(|roll| resolve_stealth_check(*roll, 0, LightLevel::Dark, 0, &config).succeeded())
            .count();
        assert_eq!(successes, 11);
    }

    #[test]
    fn test_bright_light_helps_spotting() {
        let config = DetectionConfig::default();
        let dark = (1..=20)
            .filter(|r| resolve_stealth_check(*r, 0, LightLevel::Dark, 3, &config).succeeded())
            .count();
        let bright = (1..=20)
            .filter(|r| resolve_stealth_check(*r, 0, LightLevel::Bright, 3, &config).succeeded())
            .count();
        assert_eq!(bright - dark, 5);
    }

    #[test]
    fn test_no_roll_without_los() {
        let map = TileGrid::from_rows(&["..#.."]).unwrap();
        let vis = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orc = actor(0, 0);
        let player = PlayerTarget::new(Coord::new(4, 0)).with_stealth(-100);
        assert!(!attempt_spot(&mut orc, &player, &map, &vis, &DetectionConfig::default(), &mut rng));
        assert!(!orc.has_spotted_player);
    }

    #[test]
    fn test_spot_sets_flags() {
        let map = TileGrid::filled(8, 3, TileKind::Floor);
        let mut vis = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        let viewer = Viewer::new(Coord::new(5, 1), 0, &VisionConfig::default());
        vis.recompute(&map, &viewer, SightMode::Shadowcast, 1);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orc = actor(1, 1);
        // DC far below any roll
        let player = PlayerTarget::new(Coord::new(5, 1)).with_stealth(-100);
        assert!(attempt_spot(&mut orc, &player, &map, &vis, &DetectionConfig::default(), &mut rng));
        assert!(orc.has_spotted_player && orc.aware_of_player && orc.hostile);

        // Already spotted: no further rolls
        assert!(!attempt_spot(&mut orc, &player, &map, &vis, &DetectionConfig::default(), &mut rng));
    }

    #[test]
    fn test_refresh_keeps_sticky_flag() {
        let map = TileGrid::filled(20, 1, TileKind::Floor);
        let mut orc = actor(0, 0);
        orc.has_spotted_player = true;
        orc.aware_of_player = true;

        refresh_awareness(&mut orc, Coord::new(15, 0), &map);
        assert!(!orc.aware_of_player);
        assert!(orc.has_spotted_player);

        refresh_awareness(&mut orc, Coord::new(3, 0), &map);
        assert!(orc.aware_of_player);
    }
}
