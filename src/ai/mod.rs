//! Actor behavior: stealth detection, archetype handlers and the per-turn
//! controller that drives them

mod behaviors;
pub mod constants;
pub mod controller;
pub mod detection;
pub mod events;
pub mod morale;
pub mod player;
pub mod pursuit;
pub mod services;

pub use controller::{ActorBehaviorController, TickWorld};
pub use detection::{attempt_spot, refresh_awareness, resolve_stealth_check, roll_stealth_check, StealthCheck};
pub use events::{AiEvent, AiEventKind, TurnReport};
pub use player::PlayerTarget;
pub use services::{Noise, NoiseLog, NoiseSink, SpellBook, SpellCatalog, SpellDef, SpellEffect};
