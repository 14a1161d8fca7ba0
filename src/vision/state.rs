//! Per-level visibility memory and lighting
//!
//! Each recompute demotes what was visible to explored, marks the viewer's
//! sight set visible, then lets every dynamic light reveal and tint the tiles
//! it reaches. Explored tiles never return to unseen.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::config::VisionConfig;
use crate::core::types::{Coord, Tick};
use crate::map::MapView;
use crate::vision::light::{DynamicLight, LightColor, LightLevel, LightRegistry, LightSource};
use crate::vision::los::line_of_sight;
use crate::vision::shadowcast::{circular_scan, visible_area};

/// Fog-of-war state of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileVisibility {
    #[default]
    Unseen,
    Explored,
    Visible,
}

impl TileVisibility {
    pub fn code(self) -> u8 {
        match self {
            TileVisibility::Unseen => 0,
            TileVisibility::Explored => 1,
            TileVisibility::Visible => 2,
        }
    }
}

/// How the viewer's own sight set is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SightMode {
    /// Town by day: everything in line of sight, no radius cap
    DaylightFull,
    /// Dungeon: shadowcast out to the sight radius
    Shadowcast,
    /// Town by night: line-of-sight circle of the sight radius
    NightCircle,
}

impl SightMode {
    pub fn select(in_town: bool, is_day: bool) -> Self {
        match (in_town, is_day) {
            (true, true) => SightMode::DaylightFull,
            (true, false) => SightMode::NightCircle,
            (false, _) => SightMode::Shadowcast,
        }
    }
}

/// The player, as far as sight is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub position: Coord,
    pub sight_radius: i32,
    /// Radius of the carried light (0 = none)
    pub light_radius: i32,
}

impl Viewer {
    /// Sight radius is the carried light's radius, but never below the night base radius
    pub fn new(position: Coord, light_radius: i32, config: &VisionConfig) -> Self {
        let light_radius = light_radius.max(0);
        Self {
            position,
            sight_radius: light_radius.max(config.night_base_radius),
            light_radius,
        }
    }
}

/// Serializable copy of the grids for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySnapshot {
    pub width: i32,
    pub height: i32,
    pub visibility: Vec<TileVisibility>,
    pub light_colors: Vec<LightColor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityState {
    width: i32,
    height: i32,
    cells: Vec<TileVisibility>,
    colors: Vec<LightColor>,
    lights: LightRegistry,
    mode: SightMode,
    bright_fraction: f32,
    #[serde(skip)]
    dirty: AHashSet<Coord>,
}

impl VisibilityState {
    pub fn new(width: i32, height: i32, config: &VisionConfig) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let len = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![TileVisibility::Unseen; len],
            colors: vec![LightColor::None; len],
            lights: LightRegistry::new(),
            mode: SightMode::Shadowcast,
            bright_fraction: config.bright_fraction,
            dirty: AHashSet::new(),
        }
    }

    /// Start over for a new level
    pub fn reset(&mut self, width: i32, height: i32) {
        let width = width.max(0);
        let height = height.max(0);
        let len = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.cells = vec![TileVisibility::Unseen; len];
        self.colors = vec![LightColor::None; len];
        self.lights.clear();
        self.dirty.clear();
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    fn set_visibility(&mut self, coord: Coord, value: TileVisibility) {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = value;
        }
    }

    fn set_color(&mut self, coord: Coord, color: LightColor) {
        if let Some(idx) = self.index(coord) {
            self.colors[idx] = color;
        }
    }

    fn all_coords(&self) -> impl Iterator<Item = Coord> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }

    /// Recompute what the viewer sees at `turn`
    pub fn recompute<M: MapView + ?Sized>(&mut self, map: &M, viewer: &Viewer, mode: SightMode, turn: Tick) {
        self.mode = mode;
        let before = self.cells.clone();
        let before_colors = self.colors.clone();

        // Demote: whole map explored by day in town, otherwise only what was visible
        for cell in self.cells.iter_mut() {
            if mode == SightMode::DaylightFull || *cell == TileVisibility::Visible {
                *cell = TileVisibility::Explored;
            }
        }
        self.colors.iter_mut().for_each(|c| *c = LightColor::None);

        let origin = viewer.position;
        let sight: Vec<Coord> = match mode {
            SightMode::DaylightFull => self
                .all_coords()
                .filter(|tile| line_of_sight(map, origin, *tile))
                .collect(),
            SightMode::NightCircle => circular_scan(map, origin, viewer.sight_radius).into_iter().collect(),
            SightMode::Shadowcast => visible_area(map, origin, viewer.sight_radius).into_iter().collect(),
        };
        for &tile in &sight {
            self.set_visibility(tile, TileVisibility::Visible);
        }

        // Base tint
        match mode {
            SightMode::DaylightFull => {
                for &tile in &sight {
                    self.set_color(tile, LightColor::Daylight);
                }
            }
            SightMode::NightCircle => {
                let r_sq = viewer.light_radius * viewer.light_radius;
                for &tile in &sight {
                    if tile.distance_squared(&origin) <= r_sq {
                        self.set_color(tile, LightColor::Torch);
                    }
                }
            }
            SightMode::Shadowcast => {}
        }

        self.lights.purge_expired(turn);
        self.lights.remove_source(LightSource::Carried);
        self.lights.add(
            origin,
            viewer.light_radius,
            LightColor::Torch,
            LightSource::Carried,
            turn,
            1,
        );

        let lights: Vec<DynamicLight> = self.lights.iter().cloned().collect();
        for light in &lights {
            self.overlay_light(map, light);
        }

        let width = self.width.max(1);
        for (idx, (old, new)) in before.iter().zip(&self.cells).enumerate() {
            if old != new || before_colors[idx] != self.colors[idx] {
                self.dirty.insert(Coord::new(idx as i32 % width, idx as i32 / width));
            }
        }

        tracing::debug!(
            viewer = %origin,
            ?mode,
            visible = sight.len(),
            lights = lights.len(),
            "visibility recomputed"
        );
    }

    /// Reveal and tint what a single light reaches
    fn overlay_light<M: MapView + ?Sized>(&mut self, map: &M, light: &DynamicLight) {
        let r = light.radius;
        for y in (light.position.y - r)..=(light.position.y + r) {
            for x in (light.position.x - r)..=(light.position.x + r) {
                let tile = Coord::new(x, y);
                if !light.covers(tile) || self.index(tile).is_none() {
                    continue;
                }

                if !self.is_visible(tile) && line_of_sight(map, light.position, tile) {
                    self.set_visibility(tile, TileVisibility::Visible);
                }
                if !self.is_visible(tile) {
                    continue;
                }
                self.set_color(tile, light.color);

                // Wall faces next to a lit tile
                for neighbor in tile.neighbors8() {
                    let backlit = map.tile_at(neighbor).is_some_and(|t| t.is_backlit_wall());
                    if backlit
                        && !self.is_visible(neighbor)
                        && line_of_sight(map, light.position, neighbor)
                    {
                        self.set_visibility(neighbor, TileVisibility::Visible);
                        self.set_color(neighbor, light.color);
                    }
                }
            }
        }
    }

    /// Register a light for `duration` turns. Non-positive radii are ignored.
    pub fn add_light(
        &mut self,
        position: Coord,
        radius: i32,
        color: LightColor,
        source: LightSource,
        turn: Tick,
        duration: Tick,
    ) -> bool {
        self.lights.add(position, radius, color, source, turn, duration)
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    pub fn lights(&self) -> &LightRegistry {
        &self.lights
    }

    pub fn visibility_at(&self, coord: Coord) -> TileVisibility {
        self.index(coord)
            .map(|idx| self.cells[idx])
            .unwrap_or(TileVisibility::Unseen)
    }

    pub fn is_visible(&self, coord: Coord) -> bool {
        self.visibility_at(coord) == TileVisibility::Visible
    }

    pub fn color_at(&self, coord: Coord) -> LightColor {
        self.index(coord)
            .map(|idx| self.colors[idx])
            .unwrap_or(LightColor::None)
    }

    /// Light level at `coord` for the stealth roll
    pub fn light_level_at(&self, coord: Coord) -> LightLevel {
        if self.mode == SightMode::DaylightFull {
            return LightLevel::Bright;
        }
        self.lights.level_at(coord, self.bright_fraction)
    }

    /// Tiles seen at least once (explored or visible)
    pub fn explored_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| **c != TileVisibility::Unseen)
            .count()
    }

    pub fn visible_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == TileVisibility::Visible)
            .count()
    }

    /// Tiles whose visibility or tint changed since the last call, sorted
    pub fn take_dirty_tiles(&mut self) -> Vec<Coord> {
        let mut tiles: Vec<Coord> = self.dirty.drain().collect();
        tiles.sort();
        tiles
    }

    pub fn snapshot(&self) -> VisibilitySnapshot {
        VisibilitySnapshot {
            width: self.width,
            height: self.height,
            visibility: self.cells.clone(),
            light_colors: self.colors.clone(),
        }
    }

    pub fn mode(&self) -> SightMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TileGrid, TileKind};

    fn room() -> TileGrid {
        TileGrid::from_rows(&[
            "###########",
            "#.........#",
            "#.........#",
            "#.........#",
            "###########",
        ])
        .unwrap()
    }

    fn viewer(x: i32, y: i32, light: i32) -> Viewer {
        Viewer::new(Coord::new(x, y), light, &VisionConfig::default())
    }

    #[test]
    fn test_sight_radius_floor() {
        let v = viewer(0, 0, 0);
        assert_eq!(v.sight_radius, 2);
        let v = viewer(0, 0, 4);
        assert_eq!(v.sight_radius, 4);
    }

    #[test]
    fn test_visible_demoted_to_explored() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());

        state.recompute(&map, &viewer(1, 2, 0), SightMode::Shadowcast, 1);
        assert!(state.is_visible(Coord::new(2, 2)));

        state.recompute(&map, &viewer(9, 2, 0), SightMode::Shadowcast, 2);
        assert_eq!(state.visibility_at(Coord::new(2, 2)), TileVisibility::Explored);
        assert!(state.is_visible(Coord::new(8, 2)));
    }

    #[test]
    fn test_carried_light_not_stale() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());

        state.recompute(&map, &viewer(2, 2, 3), SightMode::Shadowcast, 1);
        state.recompute(&map, &viewer(8, 2, 3), SightMode::Shadowcast, 1);
        let carried: Vec<_> = state
            .lights()
            .iter()
            .filter(|l| l.source == LightSource::Carried)
            .collect();
        assert_eq!(carried.len(), 1);
        assert_eq!(carried[0].position, Coord::new(8, 2));

        state.recompute(&map, &viewer(8, 2, 0), SightMode::Shadowcast, 2);
        assert!(state.lights().is_empty());
    }

    #[test]
    fn test_placed_light_reveals_walls() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.add_light(Coord::new(8, 2), 2, LightColor::Magical, LightSource::Placed, 0, 10);

        state.recompute(&map, &viewer(1, 1, 0), SightMode::Shadowcast, 1);
        assert!(state.is_visible(Coord::new(8, 2)));
        assert!(state.is_visible(Coord::new(10, 2)), "wall face next to lit floor");
        assert_eq!(state.color_at(Coord::new(8, 2)), LightColor::Magical);
        assert_eq!(state.light_level_at(Coord::new(8, 2)), LightLevel::Bright);
        assert_eq!(state.light_level_at(Coord::new(1, 1)), LightLevel::Dark);

        state.recompute(&map, &viewer(1, 1, 0), SightMode::Shadowcast, 11);
        assert_eq!(state.lights().len(), 0);
    }

    #[test]
    fn test_daylight_marks_whole_map_explored() {
        let map = TileGrid::from_rows(&[
            "..........",
            "....#.....",
            "..........",
        ])
        .unwrap();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.recompute(&map, &viewer(0, 1, 0), SightMode::DaylightFull, 1);

        assert_eq!(state.explored_count(), 30);
        assert!(state.is_visible(Coord::new(3, 0)));
        assert_eq!(state.visibility_at(Coord::new(7, 1)), TileVisibility::Explored);
        assert_eq!(state.light_level_at(Coord::new(7, 1)), LightLevel::Bright);
        assert_eq!(state.color_at(Coord::new(3, 0)), LightColor::Daylight);
    }

    #[test]
    fn test_dirty_tiles_drain() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.recompute(&map, &viewer(5, 2, 0), SightMode::Shadowcast, 1);
        let dirty = state.take_dirty_tiles();
        assert!(dirty.contains(&Coord::new(5, 2)));
        assert!(state.take_dirty_tiles().is_empty());

        state.recompute(&map, &viewer(5, 2, 0), SightMode::Shadowcast, 2);
        assert!(state.take_dirty_tiles().is_empty());
    }

    #[test]
    fn test_own_torch_outshines_placed_fringe() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.add_light(Coord::new(5, 2), 5, LightColor::Torch, LightSource::Placed, 0, 100);

        state.recompute(&map, &viewer(1, 2, 3), SightMode::Shadowcast, 1);
        assert_eq!(state.light_level_at(Coord::new(1, 2)), LightLevel::Bright);
        // Only the placed fringe reaches here
        assert_eq!(state.light_level_at(Coord::new(9, 2)), LightLevel::Dim);
    }

    #[test]
    fn test_expired_light_marks_retinted_tiles_dirty() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.add_light(Coord::new(8, 2), 2, LightColor::Magical, LightSource::Spell, 0, 3);

        state.recompute(&map, &viewer(1, 2, 0), SightMode::DaylightFull, 1);
        assert_eq!(state.color_at(Coord::new(8, 2)), LightColor::Magical);
        state.take_dirty_tiles();

        state.recompute(&map, &viewer(1, 2, 0), SightMode::DaylightFull, 10);
        assert!(state.is_visible(Coord::new(8, 2)));
        assert_eq!(state.color_at(Coord::new(8, 2)), LightColor::Daylight);
        let dirty = state.take_dirty_tiles();
        assert!(dirty.contains(&Coord::new(8, 2)));
        assert!(!dirty.contains(&Coord::new(3, 2)));
    }

    #[test]
    fn test_placed_light_stops_at_wall() {
        let map = TileGrid::from_rows(&[
            "###########",
            "#...#.....#",
            "#...#.....#",
            "#...#.....#",
            "###########",
        ])
        .unwrap();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.add_light(Coord::new(6, 2), 4, LightColor::Cold, LightSource::Placed, 0, 100);

        state.recompute(&map, &viewer(8, 2, 0), SightMode::Shadowcast, 1);
        assert!(state.is_visible(Coord::new(5, 2)));
        assert_eq!(state.color_at(Coord::new(5, 2)), LightColor::Cold);
        assert!(state.is_visible(Coord::new(4, 2)), "wall itself is lit");
        assert!(!state.is_visible(Coord::new(3, 2)));
        assert_eq!(state.visibility_at(Coord::new(3, 2)), TileVisibility::Unseen);
        assert_eq!(state.color_at(Coord::new(3, 2)), LightColor::None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let map = room();
        let mut state = VisibilityState::new(map.width(), map.height(), &VisionConfig::default());
        state.recompute(&map, &viewer(5, 2, 2), SightMode::Shadowcast, 1);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let back: VisibilitySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state.snapshot());
    }
}
