use rand::Rng;

use crate::ai::constants::WANDER_TRIES;
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::events::TurnReport;
use crate::ai::services::{NoiseSink, SpellBook};
use crate::core::types::{ActorId, CARDINALS};

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    /// Random cardinal step; gives up after a few blocked picks
    pub(crate) fn wander(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(pos) = world.actor(id).map(|a| a.position) else {
            return;
        };
        for _ in 0..WANDER_TRIES {
            let (dx, dy) = CARDINALS[self.rng.gen_range(0..CARDINALS.len())];
            let to = pos.offset(dx, dy);
            if world.walkable(to) {
                self.try_move(id, to, world, report);
                return;
            }
        }
    }
}
