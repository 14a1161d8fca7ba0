//! Rectangular tile grid and the map-provider seam

use serde::{Deserialize, Serialize};

use crate::core::error::{GloomError, Result};
use crate::core::types::Coord;
use crate::map::tile::TileKind;

/// Read access to a level's tiles
pub trait MapView {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn tile_at(&self, coord: Coord) -> Option<TileKind>;

    fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width() && coord.y < self.height()
    }

    /// Out-of-bounds coordinates count as opaque
    fn is_opaque(&self, coord: Coord) -> bool {
        self.tile_at(coord).map_or(true, TileKind::is_opaque)
    }
}

/// Row-major tile storage for one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![kind; (width * height) as usize],
        }
    }

    /// Build from ASCII rows (`#` wall, `.` floor, `+` door ...)
    ///
    /// Actor and player markers are the caller's business; any symbol that
    /// isn't a tile is an error here.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(GloomError::MalformedMap(format!(
                    "row {} has width {}, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, symbol) in row.chars().enumerate() {
                let kind = TileKind::from_symbol(symbol).ok_or_else(|| {
                    GloomError::MalformedMap(format!("unknown tile '{}' at ({},{})", symbol, x, y))
                })?;
                tiles.push(kind);
            }
        }

        Ok(Self {
            width: width as i32,
            height: height as i32,
            tiles,
        })
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    pub fn set_tile(&mut self, coord: Coord, kind: TileKind) {
        if let Some(idx) = self.index(coord) {
            self.tiles[idx] = kind;
        }
    }

    /// Open a closed or discovered secret door. Returns true if a door was opened.
    pub fn open_door(&mut self, coord: Coord) -> bool {
        match self.tile_at(coord) {
            Some(kind) if kind.is_openable() => {
                self.set_tile(coord, TileKind::DoorOpen);
                true
            }
            _ => false,
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }
}

impl MapView for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn tile_at(&self, coord: Coord) -> Option<TileKind> {
        self.index(coord).map(|idx| self.tiles[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let grid = TileGrid::from_rows(&["#####", "#.+.#", "#####"]).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tile_at(Coord::new(2, 1)), Some(TileKind::DoorClosed));
        assert_eq!(grid.rows()[1], "#.+.#");
    }

    #[test]
    fn test_uneven_rows_rejected() {
        let result = TileGrid::from_rows(&["###", "##"]);
        assert!(matches!(result, Err(GloomError::MalformedMap(_))));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let result = TileGrid::from_rows(&["#@#"]);
        assert!(matches!(result, Err(GloomError::MalformedMap(_))));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = TileGrid::filled(4, 4, TileKind::Floor);
        assert_eq!(grid.tile_at(Coord::new(-1, 0)), None);
        assert_eq!(grid.tile_at(Coord::new(4, 0)), None);
        assert!(grid.is_opaque(Coord::new(0, 10)));
        grid.set_tile(Coord::new(9, 9), TileKind::Wall);
        assert!(grid.rows().iter().all(|r| r == "...."));
    }

    #[test]
    fn test_open_door() {
        let mut grid = TileGrid::from_rows(&["+Hs#"]).unwrap();
        assert!(grid.open_door(Coord::new(0, 0)));
        assert!(!grid.open_door(Coord::new(1, 0)));
        assert!(grid.open_door(Coord::new(2, 0)));
        assert!(!grid.open_door(Coord::new(3, 0)));
        assert_eq!(grid.rows()[0], "/H/#");
    }
}
