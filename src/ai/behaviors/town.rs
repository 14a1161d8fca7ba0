use rand::Rng;

use crate::actors::template::TownRole;
use crate::ai::constants::*;
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::events::{AiEventKind, TurnReport};
use crate::ai::pursuit::{beggar_pursuit_chance, should_pursue};
use crate::ai::services::{NoiseSink, SpellBook};
use crate::core::types::ActorId;
use crate::vision::line_of_sight;

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    /// Surface townsfolk: pester the player up close, drift toward them otherwise
    pub(crate) fn town_npc(&mut self, id: ActorId, role: TownRole, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actor(id) else {
            return;
        };
        let name = actor.name.clone();
        let pos = actor.position;
        let player = world.player.position;
        let distance = pos.distance(&player);

        if distance <= self.config.melee_range {
            let gold = world.player.gold;
            let (kind, line) = match role {
                TownRole::Beggar if gold > 0 && self.rng.gen::<f64>() < BEGGAR_SNATCH_CHANCE => {
                    let wanted = self.rng.gen_range(1..=BEGGAR_SNATCH_MAX);
                    let amount = world.player.take_gold(wanted);
                    tracing::info!(actor = %name, amount, "beggar snatched gold");
                    (AiEventKind::StoleGold { amount }, format!("{name} snatches {amount} gold!"))
                }
                TownRole::Beggar if gold > 0 => (AiEventKind::Flavor, format!("{name} pleads.")),
                TownRole::Beggar => (AiEventKind::Flavor, format!("{name} sighs.")),
                TownRole::Drunk => {
                    let roll = self.rng.gen::<f64>();
                    let line = if roll < DRUNK_PARTY_CHANCE {
                        format!("{name} urges you to party.")
                    } else if roll < DRUNK_ALE_CHANCE && gold > 0 {
                        format!("{name} asks for ale money.")
                    } else {
                        format!("{name} sings.")
                    };
                    (AiEventKind::Flavor, line)
                }
                TownRole::Idiot => (AiEventKind::Flavor, format!("{name} babbles.")),
            };
            report.push(id, kind, line);
            return;
        }

        if role == TownRole::Beggar {
            let chance = beggar_pursuit_chance(world.player.gold, distance, world.is_night());
            if !should_pursue(&mut self.rng, chance) {
                tracing::debug!(actor = %name, chance, "beggar stays put");
                return;
            }
        }

        if line_of_sight(&*world.map, pos, player) {
            self.step_toward(id, player, world, report);
        }
    }
}
