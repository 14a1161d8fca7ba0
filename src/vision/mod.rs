//! Visibility engine: line of sight, field of view, lights and fog-of-war memory

pub mod light;
pub mod los;
pub mod shadowcast;
pub mod state;

pub use light::{DynamicLight, LightColor, LightLevel, LightRegistry, LightSource};
pub use los::line_of_sight;
pub use shadowcast::{circular_scan, compute_visible, visible_area};
pub use state::{SightMode, TileVisibility, Viewer, VisibilitySnapshot, VisibilityState};
