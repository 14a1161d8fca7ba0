pub mod pathfinding;
pub mod walkability;

pub use pathfinding::{find_path, PathQuery, DEFAULT_NODE_BUDGET};
pub use walkability::{AiWalkability, Walkability};
