//! Gloomdelve - visibility, pathfinding and actor behavior for a turn-based roguelike

pub mod actors;
pub mod ai;
pub mod core;
pub mod level;
pub mod map;
pub mod nav;
pub mod vision;

pub use crate::actors::{ActorArena, ActorState, ActorTemplate, TemplateCatalog};
pub use crate::ai::{ActorBehaviorController, PlayerTarget, TurnReport};
pub use crate::core::{ActorId, CoreConfig, Coord, GloomError, Result};
pub use crate::level::Level;
pub use crate::map::{MapView, TileGrid, TileKind};
pub use crate::vision::{SightMode, VisibilityState};
