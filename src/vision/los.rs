//! Bresenham line of sight

use crate::core::types::Coord;
use crate::map::MapView;

/// Tiles on the Bresenham line from `from` to `to`, both endpoints included
pub fn bresenham_line(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    let mut line = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let (mut x, mut y) = (from.x, from.y);
    loop {
        line.push(Coord::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    line
}

/// True when no opaque tile lies strictly between `a` and `b`
///
/// The line is always traced from the lexicographically smaller endpoint, so
/// the answer doesn't depend on argument order.
pub fn line_of_sight<M: MapView + ?Sized>(map: &M, a: Coord, b: Coord) -> bool {
    if !map.in_bounds(a) || !map.in_bounds(b) {
        return false;
    }
    if a == b {
        return true;
    }

    let (from, to) = if a <= b { (a, b) } else { (b, a) };
    let line = bresenham_line(from, to);

    // Check all tiles except start and end
    line.iter()
        .skip(1)
        .take(line.len().saturating_sub(2))
        .all(|coord| !map.is_opaque(*coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TileGrid, TileKind};

    #[test]
    fn test_line_endpoints() {
        let line = bresenham_line(Coord::new(0, 0), Coord::new(4, 2));
        assert_eq!(line.first(), Some(&Coord::new(0, 0)));
        assert_eq!(line.last(), Some(&Coord::new(4, 2)));
        assert_eq!(line.len(), 5);
    }

    #[test]
    fn test_open_room_has_los() {
        let map = TileGrid::filled(10, 10, TileKind::Floor);
        assert!(line_of_sight(&map, Coord::new(0, 0), Coord::new(9, 7)));
    }

    #[test]
    fn test_wall_blocks_los() {
        let mut map = TileGrid::filled(10, 10, TileKind::Floor);
        map.set_tile(Coord::new(5, 5), TileKind::Wall);
        assert!(!line_of_sight(&map, Coord::new(2, 5), Coord::new(8, 5)));
        assert!(!line_of_sight(&map, Coord::new(8, 5), Coord::new(2, 5)));
    }

    #[test]
    fn test_endpoints_may_be_opaque() {
        let mut map = TileGrid::filled(5, 5, TileKind::Floor);
        map.set_tile(Coord::new(4, 2), TileKind::Wall);
        assert!(line_of_sight(&map, Coord::new(0, 2), Coord::new(4, 2)));
    }

    #[test]
    fn test_out_of_bounds_endpoint() {
        let map = TileGrid::filled(5, 5, TileKind::Floor);
        assert!(!line_of_sight(&map, Coord::new(0, 0), Coord::new(5, 0)));
        assert!(line_of_sight(&map, Coord::new(2, 2), Coord::new(2, 2)));
    }
}
