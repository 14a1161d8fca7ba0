pub mod grid;
pub mod tile;

pub use grid::{MapView, TileGrid};
pub use tile::TileKind;
