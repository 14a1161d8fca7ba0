//! Actor data model: templates, capabilities, status effects and storage

pub mod actor;
pub mod arena;
pub mod capability;
pub mod status;
pub mod template;

pub use actor::{ActorState, CloneSpec, SleepSchedule};
pub use arena::ActorArena;
pub use capability::{ActorCapabilities, RangedAttack};
pub use status::{StatusEffect, StatusEffects, StatusKind};
pub use template::{ActorTemplate, AiArchetype, TemplateCatalog, TownRole};
