pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{DayNightCycle, TimeOfDay};
pub use config::CoreConfig;
pub use error::{GloomError, Result};
pub use types::{ActorId, Coord, Tick};
