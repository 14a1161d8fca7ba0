//! Archetype handlers and the movement and attack primitives they share

mod aggressive;
mod pack;
mod thief;
mod town;
mod wander;

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::actors::status::{StatusEffect, StatusKind};
use crate::ai::constants::*;
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::events::{AiEventKind, TurnReport};
use crate::ai::services::{NoiseSink, SpellBook, SpellDef, SpellEffect};
use crate::core::types::{ActorId, Coord};
use crate::map::MapView;
use crate::nav::{find_path, AiWalkability};
use crate::vision::line_of_sight;

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    /// Step onto `to`. A permitted door is opened instead, which spends the
    /// move. Returns true if the actor used its action.
    pub(crate) fn try_move(&mut self, id: ActorId, to: Coord, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(actor) = world.actors.get(id) else {
            return false;
        };
        if actor.status.is_immobilized() {
            report.push(
                id,
                AiEventKind::Flavor,
                format!("{} is immobilized and cannot move!", actor.name),
            );
            return false;
        }
        let Some(tile) = world.map.tile_at(to) else {
            return false;
        };

        if tile.is_openable() {
            if !actor.capabilities.can_open_doors {
                tracing::debug!(actor = %actor.name, ?to, "door blocks actor");
                return false;
            }
            let name = actor.name.clone();
            world.map.open_door(to);
            self.noise.create_noise(to, DOOR_NOISE.0, DOOR_NOISE.1);
            tracing::info!(actor = %name, ?to, "actor opened a door");
            report.push(id, AiEventKind::OpenedDoor { at: to }, format!("{name} opens a door."));
            return true;
        }

        if !world.walkable(to) {
            return false;
        }
        let from = actor.position;
        let name = actor.name.clone();
        if world.actors.move_actor(id, to) {
            report.push(id, AiEventKind::Moved { from, to }, format!("{name} moves."));
            true
        } else {
            false
        }
    }

    /// Head for `target` along a bounded A* path. Attacks when the next step
    /// is the player; falls back to a greedy step when no path is found.
    pub(crate) fn approach(&mut self, id: ActorId, target: Coord, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(actor) = world.actors.get(id) else {
            return false;
        };
        let start = actor.position;
        let opens_doors = actor.capabilities.can_open_doors;
        let player = world.player.position;

        let path = {
            let walk = AiWalkability::new(&*world.map, &*world.actors, player).opening_doors(opens_doors);
            find_path(
                world.map.width(),
                world.map.height(),
                start,
                target,
                &walk,
                self.config.approach_node_budget,
            )
        };

        match path.first() {
            Some(&next) if next == player => {
                self.melee(id, world, report);
                true
            }
            Some(&next) => self.try_move(id, next, world, report),
            None => {
                let step = start.step_toward(&target);
                if step != start && world.enterable(step, opens_doors) {
                    tracing::debug!(?start, ?target, "no path, greedy step");
                    self.try_move(id, step, world, report)
                } else {
                    false
                }
            }
        }
    }

    /// One signum step toward `target` if that tile is free
    pub(crate) fn step_toward(&mut self, id: ActorId, target: Coord, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(pos) = world.actor(id).map(|a| a.position) else {
            return false;
        };
        let step = pos.step_toward(&target);
        step != pos && world.walkable(step) && self.try_move(id, step, world, report)
    }

    /// One signum step directly away from `threat` if that tile is free
    pub(crate) fn step_away(&mut self, id: ActorId, threat: Coord, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(pos) = world.actor(id).map(|a| a.position) else {
            return false;
        };
        let step = pos.step_away(&threat);
        step != pos && world.walkable(step) && self.try_move(id, step, world, report)
    }

    /// Move to the free neighbour farthest from `threat`, else straight away
    pub(crate) fn flee_from(&mut self, id: ActorId, threat: Coord, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(pos) = world.actor(id).map(|a| a.position) else {
            return false;
        };
        let best = pos
            .neighbors8()
            .into_iter()
            .filter(|c| world.walkable(*c))
            .max_by_key(|c| OrderedFloat(c.distance(&threat)));

        match best {
            Some(to) => self.try_move(id, to, world, report),
            None => self.step_away(id, threat, world, report),
        }
    }

    pub(crate) fn melee(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actor(id) else {
            return;
        };
        self.noise.create_noise(actor.position, MELEE_NOISE.0, MELEE_NOISE.1);
        tracing::debug!(actor = %actor.name, "melee attack");
        report.push(id, AiEventKind::MeleeAttack, format!("{} attacks you.", actor.name));
    }

    /// Fire the ranged attack with probability `chance`. Needs the player in
    /// range and in line of sight.
    pub(crate) fn try_ranged(&mut self, id: ActorId, chance: f64, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(actor) = world.actor(id) else {
            return false;
        };
        let Some(ranged) = &actor.capabilities.ranged else {
            return false;
        };
        let player = world.player.position;
        if actor.position.distance(&player) > ranged.range as f32 || !line_of_sight(&*world.map, actor.position, player) {
            return false;
        }
        if self.rng.gen::<f64>() >= chance {
            return false;
        }

        tracing::debug!(actor = %actor.name, attack = %ranged.name, "ranged attack");
        report.push(
            id,
            AiEventKind::RangedAttack {
                name: ranged.name.clone(),
                damage: ranged.damage.clone(),
            },
            format!("{} fires {}.", actor.name, ranged.name),
        );
        true
    }

    /// Cast a random viable spell with probability `chance`. Needs known
    /// spells and some mana.
    pub(crate) fn try_cast(&mut self, id: ActorId, chance: f64, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(actor) = world.actor(id) else {
            return false;
        };
        if actor.capabilities.spells.is_empty() || actor.mana <= 0 {
            return false;
        }
        if self.rng.gen::<f64>() >= chance {
            return false;
        }
        self.cast_spell(id, world, report)
    }

    /// Pick and cast one affordable spell. Offensive spells need line of
    /// sight, targeted ones need the player within targeting range.
    pub(crate) fn cast_spell(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(actor) = world.actor(id) else {
            return false;
        };
        let player = world.player.position;
        let distance = actor.position.distance(&player);
        let sees = line_of_sight(&*world.map, actor.position, player);

        let viable: Vec<&SpellDef> = actor
            .capabilities
            .spells
            .iter()
            .filter_map(|spell_id| {
                let spell = self.spells.spell(spell_id);
                if spell.is_none() {
                    tracing::warn!(actor = %actor.name, spell = %spell_id, "unknown spell skipped");
                }
                spell
            })
            .filter(|spell| spell.mana_cost <= actor.mana)
            .filter(|spell| sees || !spell.effect_type.is_offensive())
            .filter(|spell| !spell.requires_target || distance <= self.config.spell_target_range)
            .collect();

        let Some(spell) = viable.choose(&mut self.rng).map(|spell| (*spell).clone()) else {
            return false;
        };

        let Some(actor) = world.actors.get_mut(id) else {
            return false;
        };
        actor.mana -= spell.mana_cost;
        let caster = actor.name.clone();
        let spell_name = spell.display_name();

        let (description, noise) = match spell.effect_type {
            SpellEffect::Attack => (format!("{caster} casts {spell_name} at you!"), OFFENSIVE_SPELL_NOISE),
            SpellEffect::Debuff => {
                let status = spell.status.as_deref().unwrap_or("Debuffed");
                (
                    format!("{caster} casts {spell_name}; you are afflicted with {status}!"),
                    OFFENSIVE_SPELL_NOISE,
                )
            }
            SpellEffect::Heal => {
                let before = actor.hp;
                let amount = spell.heal_amount.unwrap_or(DEFAULT_HEAL_AMOUNT);
                actor.hp = (actor.hp + amount).min(actor.max_hp);
                (
                    format!("{caster} casts {spell_name} and heals {} HP.", actor.hp - before),
                    HEAL_SPELL_NOISE,
                )
            }
            SpellEffect::Buff => {
                let status = spell.status.as_deref().unwrap_or("Buffed");
                if !actor.capabilities.is_immune_to(status) {
                    let duration = spell.duration.unwrap_or(DEFAULT_BUFF_DURATION);
                    let effect =
                        StatusEffect::new(StatusKind::from_name(status), duration).with_source(&spell.id);
                    actor.status.apply(effect);
                }
                (format!("{caster} casts {spell_name} and becomes {status}."), BUFF_SPELL_NOISE)
            }
            SpellEffect::Teleport => {
                let range = spell.range.unwrap_or(DEFAULT_TELEPORT_RANGE);
                self.teleport(id, range, world);
                (format!("{caster} blinks away with {spell_name}!"), TELEPORT_SPELL_NOISE)
            }
            SpellEffect::Utility => (format!("{caster} casts {spell_name}."), OTHER_SPELL_NOISE),
        };

        let at = world.actor(id).map_or(player, |a| a.position);
        self.noise.create_noise(at, noise.0, noise.1);
        tracing::debug!(actor = %caster, spell = %spell.id, "spell cast");
        report.push(
            id,
            AiEventKind::CastSpell {
                spell_id: spell.id.clone(),
            },
            description,
        );
        true
    }

    /// Jump to a random free tile within `range`
    fn teleport(&mut self, id: ActorId, range: i32, world: &mut TickWorld<'_>) -> bool {
        let Some(origin) = world.actor(id).map(|a| a.position) else {
            return false;
        };
        let range = range.max(1);
        for _ in 0..TELEPORT_ATTEMPTS {
            let to = origin.offset(
                self.rng.gen_range(-range..=range),
                self.rng.gen_range(-range..=range),
            );
            if to != origin && world.walkable(to) {
                return world.actors.move_actor(id, to);
            }
        }
        false
    }
}
