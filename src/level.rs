//! One dungeon level (or the town) and its turn sequence
//!
//! A player action advances the level by one turn: visibility is recomputed
//! from the player's new position, then every actor gets its update.

use ahash::AHashMap;
use rand::Rng;

use crate::actors::actor::ActorState;
use crate::actors::arena::ActorArena;
use crate::actors::template::{ActorTemplate, TemplateCatalog};
use crate::ai::controller::{ActorBehaviorController, TickWorld};
use crate::ai::events::TurnReport;
use crate::ai::player::PlayerTarget;
use crate::ai::services::{NoiseSink, SpellBook};
use crate::core::calendar::DayNightCycle;
use crate::core::config::{CoreConfig, VisionConfig};
use crate::core::error::{GloomError, Result};
use crate::core::types::{ActorId, Coord, Tick};
use crate::map::{MapView, TileGrid, TileKind};
use crate::vision::{SightMode, Viewer, VisibilityState};

/// ASCII marker for the player in level layouts
pub const PLAYER_SYMBOL: char = '@';

pub struct Level {
    pub map: TileGrid,
    pub actors: ActorArena,
    pub visibility: VisibilityState,
    /// 0 is the town
    pub depth: i32,
    pub cycle: DayNightCycle,
    vision: VisionConfig,
    move_interval: u32,
}

impl Level {
    pub fn new(map: TileGrid, depth: i32, config: &CoreConfig) -> Self {
        let visibility = VisibilityState::new(map.width(), map.height(), &config.vision);
        Self {
            map,
            actors: ActorArena::new(),
            visibility,
            depth,
            cycle: config.time.cycle(),
            vision: config.vision.clone(),
            move_interval: config.ai.move_interval,
        }
    }

    /// Parse a layout where `@` marks the player and `legend` maps other
    /// symbols to actor template ids. Actors stand on floor.
    pub fn from_ascii<S: AsRef<str>, R: Rng>(
        rows: &[S],
        depth: i32,
        config: &CoreConfig,
        catalog: &TemplateCatalog,
        legend: &AHashMap<char, String>,
        rng: &mut R,
    ) -> Result<(Self, Coord)> {
        let mut player = None;
        let mut placements = Vec::new();
        let mut tiles = Vec::with_capacity(rows.len());

        for (y, row) in rows.iter().enumerate() {
            let mut line = String::with_capacity(row.as_ref().len());
            for (x, symbol) in row.as_ref().chars().enumerate() {
                let at = Coord::new(x as i32, y as i32);
                if symbol == PLAYER_SYMBOL {
                    if player.replace(at).is_some() {
                        return Err(GloomError::MalformedMap(format!("second player marker at {at}")));
                    }
                    line.push(TileKind::Floor.symbol());
                } else if let Some(template_id) = legend.get(&symbol) {
                    placements.push((at, catalog.get(template_id)?));
                    line.push(TileKind::Floor.symbol());
                } else {
                    line.push(symbol);
                }
            }
            tiles.push(line);
        }

        let player = player.ok_or_else(|| GloomError::MalformedMap("no player marker".into()))?;
        let mut level = Self::new(TileGrid::from_rows(&tiles)?, depth, config);
        for (at, template) in placements {
            level.spawn(template, at, rng);
        }
        tracing::info!(
            width = level.map.width(),
            height = level.map.height(),
            actors = level.actors.len(),
            depth,
            "level loaded"
        );
        Ok((level, player))
    }

    pub fn is_town(&self) -> bool {
        self.depth == 0
    }

    /// Spawn an actor from a template. Refuses tiles that aren't AI-walkable
    /// or are already occupied.
    pub fn spawn<R: Rng>(&mut self, template: &ActorTemplate, at: Coord, rng: &mut R) -> Option<ActorId> {
        let free = self.map.tile_at(at).is_some_and(|t| t.is_ai_walkable()) && self.actors.occupant_at(at).is_none();
        if !free {
            tracing::warn!(template = %template.id, %at, "spawn tile blocked");
            return None;
        }
        let actor = ActorState::spawn(template, self.depth, at, self.move_interval, rng);
        Some(self.actors.spawn(actor))
    }

    pub fn sight_mode(&self, turn: Tick) -> SightMode {
        SightMode::select(self.is_town(), self.cycle.is_daytime(turn))
    }

    /// Recompute the player's view for this turn
    pub fn update_visibility(&mut self, player: &PlayerTarget, turn: Tick) -> SightMode {
        let mode = self.sight_mode(turn);
        let viewer = Viewer::new(player.position, player.light_radius, &self.vision);
        self.visibility.recompute(&self.map, &viewer, mode, turn);
        mode
    }

    /// Run one full turn: visibility first, then every actor
    pub fn advance_turn<N: NoiseSink, S: SpellBook>(
        &mut self,
        controller: &mut ActorBehaviorController<N, S>,
        player: &mut PlayerTarget,
        turn: Tick,
    ) -> TurnReport {
        self.update_visibility(player, turn);

        let time = self.cycle.time_of_day(turn);
        let in_town = self.is_town();
        let mut world = TickWorld {
            map: &mut self.map,
            actors: &mut self.actors,
            visibility: &self.visibility,
            player,
            time,
            in_town,
        };
        controller.tick(&mut world, turn)
    }
}
