use ordered_float::OrderedFloat;
use rand::Rng;

use crate::actors::arena::ActorArena;
use crate::actors::status::StatusKind;
use crate::ai::constants::*;
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::detection::in_sight;
use crate::ai::events::{AiEventKind, TurnReport};
use crate::ai::morale::{pack_flee_chance, pack_flee_turns, pack_morale_threshold, roll_percent};
use crate::ai::services::{NoiseSink, SpellBook};
use crate::core::types::ActorId;

/// Living actors of the same template within `id`'s detection range
pub(crate) fn pack_allies(actors: &ActorArena, id: ActorId) -> Vec<ActorId> {
    let Some(me) = actors.get(id) else {
        return Vec::new();
    };
    actors
        .iter()
        .filter(|(other, ally)| {
            *other != id
                && !ally.is_dead()
                && ally.template_id == me.template_id
                && ally.position.distance(&me.position) <= me.detection_range as f32
        })
        .map(|(other, _)| other)
        .collect()
}

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    /// Morale, alerting and flanking for actors that hunt in groups
    pub(crate) fn pack(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let allies = pack_allies(&*world.actors, id);
        self.pack_morale(id, &allies, world, report);

        let Some(actor) = world.actor(id) else {
            return;
        };
        let player = world.player.position;
        let pos = actor.position;

        if actor.status.is_fleeing() {
            let nearest = allies
                .iter()
                .filter_map(|ally| world.actor(*ally))
                .min_by_key(|ally| OrderedFloat(ally.position.distance(&pos)))
                .map(|ally| ally.position);
            match nearest {
                Some(regroup) => self.step_toward(id, regroup, world, report),
                None => self.step_away(id, player, world, report),
            };
            return;
        }

        if !actor.aware_of_player && in_sight(actor, player, &*world.map) {
            self.pack_alert(id, &allies, world, report);
        }

        let Some(actor) = world.actor(id) else {
            return;
        };
        if !actor.aware_of_player {
            return;
        }

        let distance = pos.distance(&player);
        if distance > self.config.melee_range {
            if self.try_ranged(id, PACK_RANGED_CHANCE, world, report)
                || self.try_cast(id, PACK_SPELL_CHANCE, world, report)
            {
                return;
            }
        } else {
            self.melee(id, world, report);
            return;
        }

        if allies.len() >= PACK_FLANK_MIN_ALLIES && distance <= PACK_FLANK_DISTANCE {
            let flank = player
                .neighbors8()
                .into_iter()
                .filter(|tile| world.walkable(*tile))
                .min_by_key(|tile| tile.manhattan(&pos));
            if let Some(flank) = flank {
                tracing::debug!(?flank, "pack member flanking");
                self.approach(id, flank, world, report);
                return;
            }
        }
        self.approach(id, player, world, report);
    }

    /// Badly hurt members may retreat, and can take weak allies with them
    fn pack_morale(&mut self, id: ActorId, allies: &[ActorId], world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actors.get_mut(id) else {
            return;
        };
        let hp = actor.hp_ratio();
        if actor.status.is_fleeing() || hp >= pack_morale_threshold(allies.len()) {
            return;
        }

        let chance = pack_flee_chance(hp, allies.len(), actor.flee_chance);
        if !roll_percent(&mut self.rng, chance) {
            return;
        }

        let turns = pack_flee_turns(allies.len());
        actor.status.add(StatusKind::Fleeing, turns);
        tracing::info!(actor = %actor.name, turns, allies = allies.len(), "pack member retreats");
        report.push(id, AiEventKind::Fled { turns }, format!("{} retreats!", actor.name));

        for &ally_id in allies {
            let Some(ally) = world.actors.get_mut(ally_id) else {
                continue;
            };
            if ally.flee_chance > 0 && ally.hp_ratio() < PACK_BREAK_HP && self.rng.gen::<f64>() < PACK_BREAK_CHANCE {
                ally.status.add(StatusKind::Fleeing, PACK_BREAK_TURNS);
                report.push(
                    ally_id,
                    AiEventKind::Fled {
                        turns: PACK_BREAK_TURNS,
                    },
                    format!("{} falls back with the pack.", ally.name),
                );
            }
        }
    }

    /// First sight of the player: wake and alert the pack
    fn pack_alert(&mut self, id: ActorId, allies: &[ActorId], world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actors.get_mut(id) else {
            return;
        };
        actor.aware_of_player = true;
        let name = actor.name.clone();
        if allies.is_empty() {
            return;
        }

        for &ally_id in allies {
            let Some(ally) = world.actors.get_mut(ally_id) else {
                continue;
            };
            if !ally.aware_of_player && self.rng.gen::<f64>() < PACK_ALERT_CHANCE {
                ally.wake();
            }
        }
        if self.rng.gen::<f64>() < PACK_HOWL_CHANCE {
            tracing::info!(actor = %name, "pack howl");
            report.push(id, AiEventKind::Howled, format!("{name} howls for the pack!"));
        }
    }
}
