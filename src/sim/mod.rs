//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod backdrop;
pub mod collision;
pub mod entities;
pub mod geometry;
pub mod state;
pub mod tick;
pub mod vessel;

pub use backdrop::Backdrop;
pub use collision::{PICKUP_REACH, collect_pickup, hull_obstacle_collision};
pub use entities::{Obstacle, ObstacleKind, Pickup, Spawner};
pub use geometry::Rect;
pub use state::{GameEvent, River, RunStats, World};
pub use tick::{TickInput, tick, tick_sinking};
pub use vessel::{HULL_TEMPLATE, TurnCommand, Vessel};
