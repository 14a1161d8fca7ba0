//! Walkability predicates for the pathfinder

use crate::actors::arena::ActorArena;
use crate::core::types::Coord;
use crate::map::MapView;

/// Can a mover enter this tile?
pub trait Walkability {
    fn is_walkable(&self, coord: Coord) -> bool;
}

impl<F> Walkability for F
where
    F: Fn(Coord) -> bool,
{
    fn is_walkable(&self, coord: Coord) -> bool {
        self(coord)
    }
}

/// Walkability as the actor controller sees it: an AI-walkable tile with no
/// live occupant that isn't the player's tile
pub struct AiWalkability<'a, M: MapView + ?Sized> {
    pub map: &'a M,
    pub actors: &'a ActorArena,
    pub player: Coord,
    /// Treat openable doors as passable (the mover opens them on arrival)
    pub opens_doors: bool,
}

impl<'a, M: MapView + ?Sized> AiWalkability<'a, M> {
    pub fn new(map: &'a M, actors: &'a ActorArena, player: Coord) -> Self {
        Self {
            map,
            actors,
            player,
            opens_doors: false,
        }
    }

    pub fn opening_doors(mut self, opens_doors: bool) -> Self {
        self.opens_doors = opens_doors;
        self
    }
}

impl<M: MapView + ?Sized> Walkability for AiWalkability<'_, M> {
    fn is_walkable(&self, coord: Coord) -> bool {
        if coord == self.player || self.actors.occupant_at(coord).is_some() {
            return false;
        }
        self.map
            .tile_at(coord)
            .is_some_and(|t| t.is_ai_walkable() || (self.opens_doors && t.is_openable()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::actor::ActorState;
    use crate::actors::template::ActorTemplate;
    use crate::map::TileGrid;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ai_walkability_rules() {
        let map = TileGrid::from_rows(&[".+#.."]).unwrap();
        let mut actors = ActorArena::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        actors.spawn(ActorState::spawn(&ActorTemplate::new("RAT"), 1, Coord::new(3, 0), 2, &mut rng));

        let walk = AiWalkability::new(&map, &actors, Coord::new(4, 0));
        assert!(walk.is_walkable(Coord::new(0, 0)));
        assert!(!walk.is_walkable(Coord::new(1, 0)));
        assert!(!walk.is_walkable(Coord::new(2, 0)));
        assert!(!walk.is_walkable(Coord::new(3, 0)));
        assert!(!walk.is_walkable(Coord::new(4, 0)));
        assert!(!walk.is_walkable(Coord::new(-1, 0)));

        let walk = walk.opening_doors(true);
        assert!(walk.is_walkable(Coord::new(1, 0)));
    }

    #[test]
    fn test_closure_walkability() {
        let only_even = |c: Coord| c.x % 2 == 0;
        assert!(only_even.is_walkable(Coord::new(2, 5)));
        assert!(!only_even.is_walkable(Coord::new(1, 5)));
    }
}
