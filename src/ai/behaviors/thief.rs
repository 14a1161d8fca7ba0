use rand::seq::SliceRandom;
use rand::Rng;

use crate::actors::status::StatusKind;
use crate::ai::constants::*;
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::events::{AiEventKind, TurnReport};
use crate::ai::pursuit::{should_pursue, thief_pursuit_chance};
use crate::ai::services::{NoiseSink, SpellBook};
use crate::core::types::{ActorId, Coord};
use crate::vision::line_of_sight;

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    /// Lurk out of the light, ambush from range, steal and run
    pub(crate) fn thief(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actor(id) else {
            return;
        };
        let player = world.player.position;
        let pos = actor.position;
        let in_shadow = !world.visibility.is_visible(pos);

        if actor.status.is_fleeing() {
            let escape = pos
                .neighbors8()
                .into_iter()
                .filter(|tile| world.walkable(*tile))
                .max_by_key(|tile| {
                    let shadow = if world.visibility.is_visible(*tile) { 0 } else { THIEF_SHADOW_BONUS };
                    tile.manhattan(&player) + shadow
                });
            match escape {
                Some(to) => self.try_move(id, to, world, report),
                None => self.step_away(id, player, world, report),
            };
            return;
        }

        // Harder to notice the player from the dark
        let shadow_modifier = if in_shadow { THIEF_SHADOW_MODIFIER } else { 1.0 };
        let distance = pos.distance(&player);
        let effective_range = actor.detection_range as f32 * shadow_modifier as f32;
        let detection_range = actor.detection_range as f32;
        let mut aware = actor.aware_of_player;

        if !aware
            && distance <= effective_range
            && line_of_sight(&*world.map, pos, player)
            && self.rng.gen::<f64>() < shadow_modifier
        {
            if let Some(actor) = world.actors.get_mut(id) {
                actor.aware_of_player = true;
                aware = true;
            }
        }

        if !aware {
            if distance <= detection_range * THIEF_STALK_RANGE_FACTOR {
                let flank = THIEF_FLANK_OFFSETS
                    .iter()
                    .map(|&(dx, dy)| player.offset(dx, dy))
                    .filter(|tile| world.walkable(*tile))
                    .min_by_key(|tile| tile.manhattan(&pos));
                if let Some(flank) = flank {
                    self.approach(id, flank, world, report);
                }
            }
            return;
        }

        if in_shadow && distance > self.config.melee_range && self.try_ranged(id, THIEF_AMBUSH_CHANCE, world, report) {
            if self.rng.gen::<f64>() < THIEF_TAUNT_CHANCE {
                if let Some(actor) = world.actor(id) {
                    report.push(
                        id,
                        AiEventKind::Flavor,
                        format!("{} strikes from the shadows!", actor.name),
                    );
                }
            }
            return;
        }

        if distance <= self.config.melee_range {
            self.thief_close_quarters(id, world, report);
            return;
        }

        if in_shadow && distance <= THIEF_CIRCLE_DISTANCE {
            let circle: Vec<Coord> = [(1, 1), (1, -1), (-1, 1), (-1, -1)]
                .iter()
                .map(|&(dx, dy)| player.offset(dx, dy))
                .filter(|tile| world.walkable(*tile) && tile.manhattan(&pos) <= 2)
                .collect();
            if let Some(&target) = circle.choose(&mut self.rng) {
                self.approach(id, target, world, report);
                return;
            }
        }

        let chance = thief_pursuit_chance(world.player.gold, distance, world.is_night());
        if should_pursue(&mut self.rng, chance) {
            tracing::debug!(distance, chance, "thief pursues");
            self.approach(id, player, world, report);
            return;
        }

        // Hang back: darker and farther is better
        let hideout = pos
            .neighbors8()
            .into_iter()
            .filter(|tile| world.walkable(*tile))
            .max_by_key(|tile| {
                let darkness = 2 - world.visibility.visibility_at(*tile).code() as i32;
                tile.manhattan(&player) + darkness
            });
        if let Some(to) = hideout {
            self.try_move(id, to, world, report);
        }
    }

    /// Adjacent to the player: steal, stab, or fumble, then usually run
    fn thief_close_quarters(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(level) = world.actor(id).map(|a| a.level.max(1)) else {
            return;
        };

        if world.player.gold > 0 && self.rng.gen::<f64>() < THIEF_STEAL_CHANCE {
            let wanted = self.rng.gen_range(level..=level * 3) as i64;
            let stolen = world.player.take_gold(wanted);
            if let Some(actor) = world.actor(id) {
                tracing::info!(actor = %actor.name, stolen, "thief stole gold");
                report.push(
                    id,
                    AiEventKind::StoleGold { amount: stolen },
                    format!("{} steals {} gold!", actor.name, stolen),
                );
            }
            self.start_fleeing(id, THIEF_STEAL_FLEE_TURNS + level as u32, world, report);
        } else if self.rng.gen::<f64>() < THIEF_ATTACK_CHANCE {
            self.melee(id, world, report);
            if self.rng.gen::<f64>() < THIEF_ATTACK_FLEE_CHANCE {
                self.start_fleeing(id, THIEF_ATTACK_FLEE_TURNS, world, report);
            }
        } else {
            if let Some(actor) = world.actor(id) {
                report.push(
                    id,
                    AiEventKind::Flavor,
                    format!("{} fails to steal from you!", actor.name),
                );
            }
            self.start_fleeing(id, THIEF_FAILED_THEFT_FLEE_TURNS, world, report);
        }
    }

    pub(crate) fn start_fleeing(&mut self, id: ActorId, turns: u32, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        if let Some(actor) = world.actors.get_mut(id) {
            actor.status.add(StatusKind::Fleeing, turns);
            tracing::debug!(actor = %actor.name, turns, "fleeing");
            report.push(id, AiEventKind::Fled { turns }, format!("{} flees.", actor.name));
        }
    }
}
