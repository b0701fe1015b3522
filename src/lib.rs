//! River Runner - an endless river avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vessel kinematics, spawner, collisions)
//! - `session`: Title / playing / sinking lifecycle and score bookkeeping
//! - `driver`: Fixed-tick frame driver and presentation interface
//! - `persistence`: User record storage (highest score, coins)
//! - `settings`: Data-driven game tuning

pub mod driver;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use session::{Screen, Session, SessionEffect};
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (steps per second)
    pub const TICK_RATE: u32 = 120;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 900.0;
    pub const SCREEN_HEIGHT: f32 = 900.0;

    /// Entities spawn this far above the top edge
    pub const SPAWN_Y: f32 = -100.0;
    /// Entities are culled once they pass this far below the bottom edge
    pub const CULL_MARGIN: f32 = 50.0;

    /// Heading limits in degrees (0 = straight up the river)
    pub const MAX_HEADING: f32 = 90.0;
    /// Heading change per tick while a turn is held
    pub const TURN_STEP: f32 = 1.0;
    /// Extra lean per tick once the vessel is already leaning
    pub const LEAN_DRIFT: f32 = 0.3;
    /// Fraction of the horizontal velocity applied to position each tick
    pub const LATERAL_FACTOR: f32 = 0.25;
    /// Closest the vessel center may get to a river edge
    pub const BANK_OFFSET: f32 = 35.0;

    /// Fully visible vessel
    pub const OPAQUE_ALPHA: u8 = 255;

    /// Background tile height used by the backdrop scroller
    pub const BACKDROP_HEIGHT: f32 = 900.0;
}
