use crate::ai::constants::*;
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::events::TurnReport;
use crate::ai::services::{NoiseSink, SpellBook};
use crate::core::types::ActorId;

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    /// Close in and fight. Wounded actors lean on ranged attacks and spells.
    pub(crate) fn aggressive(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actor(id) else {
            return;
        };
        let player = world.player.position;

        if actor.status.is_fleeing() {
            self.flee_from(id, player, world, report);
            return;
        }
        if !actor.aware_of_player {
            return;
        }

        let distance = actor.position.distance(&player);
        let wounded = actor.hp_ratio() < WOUNDED_HP;

        if distance > self.config.melee_range {
            let (ranged_chance, spell_chance) = if wounded {
                (AGGRESSIVE_RANGED_CHANCE_WOUNDED, AGGRESSIVE_SPELL_CHANCE_WOUNDED)
            } else {
                (AGGRESSIVE_RANGED_CHANCE, AGGRESSIVE_SPELL_CHANCE)
            };
            if self.try_ranged(id, ranged_chance, world, report) || self.try_cast(id, spell_chance, world, report) {
                return;
            }
            self.approach(id, player, world, report);
        } else {
            self.melee(id, world, report);
        }
    }
}
