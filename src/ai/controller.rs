//! Per-turn actor update
//!
//! One call to [`ActorBehaviorController::tick`] walks a snapshot of the arena
//! ids in order. Each actor goes through death handling, distance culling,
//! sleep, the stealth roll, status effects, flee checks, pacing, awareness
//! refresh and finally its archetype handler. Decisions the combat layer must
//! resolve come back in the [`TurnReport`].

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actors::actor::ActorState;
use crate::actors::arena::ActorArena;
use crate::actors::status::StatusKind;
use crate::actors::template::AiArchetype;
use crate::ai::constants::*;
use crate::ai::detection::{attempt_spot, refresh_awareness};
use crate::ai::events::{AiEventKind, TurnReport};
use crate::ai::morale::{aggressive_flee_chance, aggressive_flee_turns, default_flee_chance, roll_percent};
use crate::ai::player::PlayerTarget;
use crate::ai::services::{NoiseLog, NoiseSink, SpellBook, SpellCatalog};
use crate::core::calendar::TimeOfDay;
use crate::core::config::{AiConfig, DetectionConfig};
use crate::core::types::{ActorId, Coord, Tick};
use crate::map::TileGrid;
use crate::nav::{AiWalkability, Walkability};
use crate::vision::VisibilityState;

/// Everything an actor update reads or writes besides the controller itself
pub struct TickWorld<'a> {
    pub map: &'a mut TileGrid,
    pub actors: &'a mut ActorArena,
    pub visibility: &'a VisibilityState,
    pub player: &'a mut PlayerTarget,
    pub time: TimeOfDay,
    /// Town NPC roles only apply on the surface
    pub in_town: bool,
}

impl TickWorld<'_> {
    pub fn is_night(&self) -> bool {
        self.time == TimeOfDay::Night
    }

    /// AI-walkable, unoccupied and not the player's tile
    pub fn walkable(&self, coord: Coord) -> bool {
        self.enterable(coord, false)
    }

    /// Like [`walkable`](Self::walkable), but an openable door counts when
    /// the mover can open it
    pub fn enterable(&self, coord: Coord, opens_doors: bool) -> bool {
        AiWalkability::new(&*self.map, &*self.actors, self.player.position)
            .opening_doors(opens_doors)
            .is_walkable(coord)
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(id)
    }
}

/// Runs every actor's turn. Owns its RNG and the noise/spell collaborators.
pub struct ActorBehaviorController<N: NoiseSink = NoiseLog, S: SpellBook = SpellCatalog> {
    pub(crate) config: AiConfig,
    pub(crate) detection: DetectionConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) noise: N,
    pub(crate) spells: S,
}

impl<N: NoiseSink, S: SpellBook> ActorBehaviorController<N, S> {
    pub fn new(config: AiConfig, detection: DetectionConfig, noise: N, spells: S) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            detection,
            rng,
            noise,
            spells,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn noise_mut(&mut self) -> &mut N {
        &mut self.noise
    }

    pub fn spells(&self) -> &S {
        &self.spells
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Random initial pacing phase for a newly spawned actor
    pub fn pacing_phase(&mut self) -> u32 {
        self.rng.gen_range(0..self.config.move_interval.max(1))
    }

    /// Give every actor its turn
    pub fn tick(&mut self, world: &mut TickWorld<'_>, turn: Tick) -> TurnReport {
        let mut report = TurnReport::new(turn);

        // Actors spawned during the tick (clones) wait for the next one
        for id in world.actors.ids() {
            self.tick_actor(id, world, &mut report);
        }

        tracing::debug!(
            turn,
            processed = report.processed,
            culled = report.culled,
            events = report.events.len(),
            "actor tick complete"
        );
        report
    }

    fn tick_actor(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        // Removed earlier this tick
        let Some(actor) = world.actors.get_mut(id) else {
            return;
        };

        if actor.is_dead() {
            actor.status.tick();
            if actor.advance_death(self.config.death_animation_ticks) {
                if let Some(corpse) = world.actors.remove(id) {
                    tracing::debug!(actor = %corpse.name, "corpse removed");
                    report.push(id, AiEventKind::Removed, format!("{} is gone.", corpse.name));
                }
            }
            return;
        }

        let player_pos = world.player.position;
        let distance = actor.position.distance(&player_pos);
        if distance > self.config.ai_update_distance && !actor.aware_of_player {
            actor.status.tick();
            actor.update_sleep(world.time);
            report.culled += 1;
            return;
        }
        report.processed += 1;

        actor.update_sleep(world.time);
        if actor.sleeping {
            tracing::debug!(actor = %actor.name, time = ?world.time, "asleep");
            return;
        }

        if attempt_spot(
            actor,
            &*world.player,
            &*world.map,
            world.visibility,
            &self.detection,
            &mut self.rng,
        ) {
            report.push(id, AiEventKind::Spotted, format!("{} spots you!", actor.name));
        }

        actor.status.tick();
        if self.apply_damage_over_time(id, world, report) {
            return;
        }

        self.check_flee(id, world, report);

        let Some(actor) = world.actors.get_mut(id) else {
            return;
        };
        if !actor.pace(self.config.move_interval) {
            return;
        }
        refresh_awareness(actor, player_pos, &*world.map);

        let archetype = actor.archetype;
        let aware = actor.aware_of_player;
        tracing::debug!(actor = %actor.name, ?archetype, distance, aware, "acting");

        if let Some(role) = actor.town_role.filter(|_| world.in_town) {
            self.town_npc(id, role, world, report);
            return;
        }

        match archetype {
            AiArchetype::Passive => return,
            AiArchetype::Wander => self.wander(id, world, report),
            AiArchetype::Aggressive => self.aggressive(id, world, report),
            AiArchetype::Pack => self.pack(id, world, report),
            AiArchetype::Thief => self.thief(id, world, report),
            AiArchetype::Other => {
                if aware {
                    self.approach(id, player_pos, world, report);
                }
            }
        }

        self.attempt_clone(id, world, report);
    }

    /// Poison and burning damage. Returns true if it killed the actor.
    fn apply_damage_over_time(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) -> bool {
        let Some(actor) = world.actors.get_mut(id) else {
            return false;
        };

        for kind in [StatusKind::Poisoned, StatusKind::Burning] {
            let Some(base) = actor
                .status
                .get(&kind)
                .filter(|effect| effect.magnitude > 0)
                .map(|effect| effect.tick_damage())
            else {
                continue;
            };

            let immune = actor.capabilities.is_immune_to(kind.name())
                || (kind == StatusKind::Poisoned && actor.capabilities.poison_immune);
            if immune {
                actor.status.remove(&kind);
                continue;
            }

            let damage = if kind == StatusKind::Burning {
                let multiplier = 1.0 - actor.capabilities.fire_resistance as f32 / 100.0;
                ((base as f32 * multiplier) as i32).max(1)
            } else {
                base
            };

            let died = actor.take_damage(damage);
            report.push(
                id,
                AiEventKind::StatusDamage {
                    effect: kind.clone(),
                    amount: damage,
                },
                format!("{} takes {} {} damage.", actor.name, damage, kind),
            );

            if died {
                let line = if kind == StatusKind::Poisoned {
                    format!("{} succumbs to poison!", actor.name)
                } else {
                    format!("{} is consumed by flames!", actor.name)
                };
                tracing::info!(actor = %actor.name, effect = %kind, "actor died from status damage");
                report.push(id, AiEventKind::Died, line);
                return true;
            }
        }
        false
    }

    /// HP-based panic for hostile actors; pack and thief handle their own
    fn check_flee(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actors.get_mut(id) else {
            return;
        };
        if !actor.hostile || actor.status.is_fleeing() {
            return;
        }

        let (threshold, chance) = match actor.archetype {
            AiArchetype::Pack | AiArchetype::Thief => return,
            AiArchetype::Aggressive => (
                AGGRESSIVE_FLEE_HP,
                aggressive_flee_chance(actor.flee_chance, actor.level),
            ),
            _ => (DEFAULT_FLEE_HP, default_flee_chance(actor.flee_chance)),
        };

        if actor.hp_ratio() >= threshold || !roll_percent(&mut self.rng, chance) {
            return;
        }

        let turns = if actor.archetype == AiArchetype::Aggressive {
            aggressive_flee_turns(&mut self.rng)
        } else {
            DEFAULT_FLEE_TURNS
        };
        actor.status.add(StatusKind::Fleeing, turns);
        tracing::info!(actor = %actor.name, turns, hp = actor.hp, "actor panics");
        report.push(id, AiEventKind::Fled { turns }, format!("{} panics!", actor.name));
    }

    /// Divide onto a random free orthogonal neighbour
    fn attempt_clone(&mut self, id: ActorId, world: &mut TickWorld<'_>, report: &mut TurnReport) {
        let Some(actor) = world.actor(id) else {
            return;
        };
        let Some(spec) = actor.cloning else {
            return;
        };
        if actor.is_dead() || world.actors.count_living(&actor.template_id) >= spec.max_population as usize {
            return;
        }
        if self.rng.gen::<f32>() >= spec.rate {
            return;
        }

        let mut candidates = actor.position.neighbors4();
        candidates.shuffle(&mut self.rng);
        let Some(spot) = candidates.into_iter().find(|c| world.walkable(*c)) else {
            return;
        };

        let phase = self.pacing_phase();
        let offspring = actor.offspring(spot, phase);
        let name = actor.name.clone();
        let clone = world.actors.spawn(offspring);
        tracing::debug!(actor = %name, ?spot, "actor divided");
        report.push(id, AiEventKind::Cloned { clone }, format!("{name} divides!"));
    }
}

impl Default for ActorBehaviorController<NoiseLog, SpellCatalog> {
    fn default() -> Self {
        Self::new(
            AiConfig::default(),
            DetectionConfig::default(),
            NoiseLog::new(),
            SpellCatalog::new(),
        )
    }
}
