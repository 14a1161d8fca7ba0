//! Recursive shadowcasting field of view
//!
//! Eight octant transforms share one scanner. Each row is scanned from the
//! diagonal toward the axis; opaque tiles are lit themselves but narrow the
//! wedge for the rows behind them.

use ahash::AHashSet;

use crate::core::types::Coord;
use crate::map::MapView;
use crate::vision::los::line_of_sight;

/// Smallest radius the circular fallback scans with
pub const FALLBACK_MIN_RADIUS: i32 = 1;

/// Octant transforms as (xx, xy, yx, yy)
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Tiles visible from `origin` within `radius` (euclidean). The origin is always included.
pub fn compute_visible<M: MapView + ?Sized>(map: &M, origin: Coord, radius: i32) -> AHashSet<Coord> {
    let mut visible = AHashSet::new();
    visible.insert(origin);

    if radius <= 0 || !map.in_bounds(origin) {
        return visible;
    }

    for &octant in &OCTANTS {
        cast_light(map, origin, radius, 1, 1.0, 0.0, octant, &mut visible);
    }

    visible
}

#[allow(clippy::too_many_arguments)]
fn cast_light<M: MapView + ?Sized>(
    map: &M,
    origin: Coord,
    radius: i32,
    first_row: i32,
    mut start: f32,
    end: f32,
    (xx, xy, yx, yy): (i32, i32, i32, i32),
    visible: &mut AHashSet<Coord>,
) {
    if start < end {
        return;
    }

    let radius_sq = radius * radius;
    let mut next_start = start;

    for row in first_row..=radius {
        let dy = -row;
        let mut blocked = false;

        for dx in -row..=0 {
            let tile = Coord::new(
                origin.x + dx * xx + dy * xy,
                origin.y + dx * yx + dy * yy,
            );
            let left_slope = (dx as f32 - 0.5) / (dy as f32 + 0.5);
            let right_slope = (dx as f32 + 0.5) / (dy as f32 - 0.5);

            if start < right_slope {
                continue;
            }
            if end > left_slope {
                break;
            }

            let in_bounds = map.in_bounds(tile);
            if in_bounds && dx * dx + dy * dy <= radius_sq {
                visible.insert(tile);
            }

            // Out-of-bounds tiles shadow like walls
            let opaque = !in_bounds || map.is_opaque(tile);
            if blocked {
                if opaque {
                    next_start = right_slope;
                } else {
                    blocked = false;
                    start = next_start;
                }
            } else if opaque && row < radius {
                blocked = true;
                cast_light(map, origin, radius, row + 1, start, left_slope, (xx, xy, yx, yy), visible);
                next_start = right_slope;
            }
        }

        if blocked {
            break;
        }
    }
}

/// Every tile within `radius` that has line of sight to `origin`
pub fn circular_scan<M: MapView + ?Sized>(map: &M, origin: Coord, radius: i32) -> AHashSet<Coord> {
    let mut visible = AHashSet::new();
    if map.in_bounds(origin) {
        visible.insert(origin);
    }
    let radius = radius.max(0);
    let radius_sq = radius * radius;

    for y in (origin.y - radius)..=(origin.y + radius) {
        for x in (origin.x - radius)..=(origin.x + radius) {
            let tile = Coord::new(x, y);
            if tile.distance_squared(&origin) <= radius_sq && line_of_sight(map, origin, tile) {
                visible.insert(tile);
            }
        }
    }

    visible
}

/// Shadowcast, falling back to a circular scan when only the origin came back
///
/// Guarantees a viewer standing in a tight spot still sees its neighbours.
pub fn visible_area<M: MapView + ?Sized>(map: &M, origin: Coord, radius: i32) -> AHashSet<Coord> {
    let visible = compute_visible(map, origin, radius);
    if visible.len() > 1 {
        return visible;
    }
    tracing::debug!(%origin, radius, "shadowcast returned only the origin, using circular scan");
    circular_scan(map, origin, radius.max(FALLBACK_MIN_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TileGrid, TileKind};

    #[test]
    fn test_open_room_radius() {
        let map = TileGrid::filled(21, 21, TileKind::Floor);
        let origin = Coord::new(10, 10);
        let visible = compute_visible(&map, origin, 5);

        assert!(visible.contains(&origin));
        assert!(visible.contains(&Coord::new(15, 10)));
        assert!(visible.contains(&Coord::new(10, 5)));
        assert!(visible.contains(&Coord::new(13, 14)));
        assert!(!visible.contains(&Coord::new(16, 10)));
        assert!(!visible.contains(&Coord::new(14, 14)));
        assert!(visible.iter().all(|c| c.distance_squared(&origin) <= 25));
    }

    #[test]
    fn test_diagonals_visible() {
        let map = TileGrid::filled(11, 11, TileKind::Floor);
        let visible = compute_visible(&map, Coord::new(5, 5), 4);
        for (dx, dy) in [(1, 1), (2, 2), (-2, 2), (2, -2), (-2, -2)] {
            assert!(visible.contains(&Coord::new(5 + dx, 5 + dy)), "({dx},{dy})");
        }
    }

    #[test]
    fn test_wall_casts_shadow() {
        let map = TileGrid::from_rows(&[
            "...........",
            "...........",
            ".....#.....",
            "...........",
            "...........",
        ])
        .unwrap();
        let origin = Coord::new(5, 4);
        let visible = compute_visible(&map, origin, 8);

        assert!(visible.contains(&Coord::new(5, 2)), "wall itself is lit");
        assert!(!visible.contains(&Coord::new(5, 1)));
        assert!(!visible.contains(&Coord::new(5, 0)));
        assert!(visible.contains(&Coord::new(2, 1)));
    }

    #[test]
    fn test_corridor() {
        let map = TileGrid::from_rows(&[
            "#########",
            "#.......#",
            "#########",
        ])
        .unwrap();
        let visible = compute_visible(&map, Coord::new(1, 1), 10);
        for x in 1..8 {
            assert!(visible.contains(&Coord::new(x, 1)));
        }
        assert!(visible.contains(&Coord::new(4, 0)));
        assert!(visible.iter().all(|c| c.y >= 0 && c.y <= 2));
    }

    #[test]
    fn test_zero_radius_is_origin_only() {
        let map = TileGrid::filled(5, 5, TileKind::Floor);
        let visible = compute_visible(&map, Coord::new(2, 2), 0);
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn test_fallback_sees_neighbours() {
        let map = TileGrid::filled(5, 5, TileKind::Floor);
        let visible = visible_area(&map, Coord::new(2, 2), 0);
        assert_eq!(visible.len(), 5);
        assert!(visible.contains(&Coord::new(2, 1)));
    }

    #[test]
    fn test_circular_scan_respects_walls() {
        let map = TileGrid::from_rows(&[".....", "..#..", "....."]).unwrap();
        let visible = circular_scan(&map, Coord::new(2, 2), 3);
        assert!(visible.contains(&Coord::new(2, 1)));
        assert!(!visible.contains(&Coord::new(2, 0)));
        assert!(visible.contains(&Coord::new(0, 2)));
    }
}
