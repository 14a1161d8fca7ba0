//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game turn counter (one player action = one turn)
pub type Tick = u64;

/// Stable handle to an actor slot in the level's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid coordinate on the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// Cardinal offsets, in the order the pathfinder expands them
pub const CARDINALS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// All eight neighbour offsets
pub const COMPASS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance, used for range checks and the 1.5 melee threshold
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn neighbors4(&self) -> [Coord; 4] {
        CARDINALS.map(|(dx, dy)| self.offset(dx, dy))
    }

    pub fn neighbors8(&self) -> [Coord; 8] {
        COMPASS.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// One greedy step toward `target` (diagonals allowed)
    pub fn step_toward(&self, target: &Self) -> Self {
        self.offset((target.x - self.x).signum(), (target.y - self.y).signum())
    }

    /// One greedy step directly away from `target`
    pub fn step_away(&self, target: &Self) -> Self {
        self.offset(-(target.x - self.x).signum(), -(target.y - self.y).signum())
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 4);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance_squared(&b), 25);
        assert_eq!(a.manhattan(&b), 7);
    }

    #[test]
    fn test_steps() {
        let a = Coord::new(5, 5);
        assert_eq!(a.step_toward(&Coord::new(9, 5)), Coord::new(6, 5));
        assert_eq!(a.step_toward(&Coord::new(1, 1)), Coord::new(4, 4));
        assert_eq!(a.step_away(&Coord::new(9, 5)), Coord::new(4, 5));
        assert_eq!(a.step_toward(&a), a);
    }

    #[test]
    fn test_neighbors() {
        let c = Coord::new(2, 2);
        assert!(c.neighbors4().iter().all(|n| n.manhattan(&c) == 1));
        assert!(c.neighbors8().iter().all(|n| n.distance(&c) <= 1.5));
    }
}
