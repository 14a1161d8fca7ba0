//! Tile kinds and their classifications

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    DoorClosed,
    DoorOpen,
    SecretDoor,
    SecretDoorFound,
    QuartzVein,
    MagmaVein,
    StairsDown,
    StairsUp,
}

impl TileKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let kind = match symbol {
            '.' => Self::Floor,
            '#' => Self::Wall,
            '+' => Self::DoorClosed,
            '/' => Self::DoorOpen,
            'H' => Self::SecretDoor,
            's' => Self::SecretDoorFound,
            '%' => Self::QuartzVein,
            '~' => Self::MagmaVein,
            '>' => Self::StairsDown,
            '<' => Self::StairsUp,
            _ => return None,
        };
        Some(kind)
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::DoorClosed => '+',
            Self::DoorOpen => '/',
            Self::SecretDoor => 'H',
            Self::SecretDoorFound => 's',
            Self::QuartzVein => '%',
            Self::MagmaVein => '~',
            Self::StairsDown => '>',
            Self::StairsUp => '<',
        }
    }

    /// Blocks sight and light
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            Self::Wall
                | Self::DoorClosed
                | Self::SecretDoor
                | Self::SecretDoorFound
                | Self::QuartzVein
                | Self::MagmaVein
        )
    }

    /// Tiles an actor may step onto without opening anything
    pub fn is_ai_walkable(self) -> bool {
        matches!(
            self,
            Self::Floor | Self::StairsDown | Self::StairsUp | Self::DoorOpen
        )
    }

    /// Doors an actor may open. An undiscovered secret door is never one of them.
    pub fn is_openable(self) -> bool {
        matches!(self, Self::DoorClosed | Self::SecretDoorFound)
    }

    /// Wall faces that show up when an adjacent floor tile is lit
    pub fn is_backlit_wall(self) -> bool {
        matches!(self, Self::Wall | Self::SecretDoor | Self::SecretDoorFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TileKind; 10] = [
        TileKind::Floor,
        TileKind::Wall,
        TileKind::DoorClosed,
        TileKind::DoorOpen,
        TileKind::SecretDoor,
        TileKind::SecretDoorFound,
        TileKind::QuartzVein,
        TileKind::MagmaVein,
        TileKind::StairsDown,
        TileKind::StairsUp,
    ];

    #[test]
    fn test_symbols_are_consistent() {
        for kind in ALL {
            assert_eq!(TileKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(TileKind::from_symbol('?'), None);
    }

    #[test]
    fn test_walkable_tiles_are_transparent() {
        for kind in ALL {
            if kind.is_ai_walkable() {
                assert!(!kind.is_opaque(), "{kind:?}");
            }
        }
    }

    #[test]
    fn test_secret_door_is_not_openable() {
        assert!(!TileKind::SecretDoor.is_openable());
        assert!(TileKind::SecretDoorFound.is_openable());
        assert!(TileKind::DoorClosed.is_openable());
        assert!(!TileKind::Wall.is_openable());
    }
}
