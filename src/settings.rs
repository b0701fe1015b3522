//! Game tuning
//!
//! Loaded from a JSON file; any missing field takes its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::PICKUP_REACH;
use crate::sim::entities::{LANE_COUNT, Spawner};

/// Configuration failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// All tunable values of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Simulation steps per second
    pub tick_rate: u32,

    /// x of the left and right river banks
    pub river_left: f32,
    pub river_right: f32,
    /// Center x of each spawn lane
    pub lanes: [f32; LANE_COUNT],

    pub vessel_start: Vec2,
    pub vessel_speed: f32,
    /// Alpha lost per tick while sinking
    pub sink_rate: u8,

    /// Minimum y the newest obstacle must reach before the next may spawn
    pub obstacle_spacing: f32,
    /// Minimum y the newest pickup must reach before the next may spawn
    pub pickup_spacing: f32,
    /// Per-tick obstacle spawn chance once spacing allows (0-1)
    pub spawn_chance: f64,
    /// Vertical distance within which a pickup may not share the newest obstacle's lane
    pub pickup_clearance: f32,
    /// Half-size of the pickup collection box
    pub pickup_reach: f32,

    /// RNG seed; `None` lets the caller pick one
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_rate: TICK_RATE,

            river_left: 300.0,
            river_right: 600.0,
            lanes: [350.0, 450.0, 550.0],

            vessel_start: Vec2::new(450.0, 700.0),
            vessel_speed: 5.0,
            sink_rate: 2,

            obstacle_spacing: 450.0, // larger -> easier
            pickup_spacing: 200.0,   // larger -> fewer coins
            spawn_chance: 0.8,
            pickup_clearance: 300.0,
            pickup_reach: PICKUP_REACH,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but falls back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }
        if self.river_right - self.river_left < 2.0 * BANK_OFFSET {
            return Err(ConfigError::Invalid(format!(
                "river [{}, {}] is narrower than {}",
                self.river_left,
                self.river_right,
                2.0 * BANK_OFFSET
            )));
        }
        if self.river_left < 0.0 || self.river_right > self.screen_width {
            return Err(ConfigError::Invalid(format!(
                "river [{}, {}] does not fit a {} wide screen",
                self.river_left, self.river_right, self.screen_width
            )));
        }
        if let Some(lane) = self
            .lanes
            .iter()
            .find(|&&x| x <= self.river_left || x >= self.river_right)
        {
            return Err(ConfigError::Invalid(format!(
                "lane {lane} lies outside the river"
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(ConfigError::Invalid(format!(
                "spawn_chance {} not in [0, 1]",
                self.spawn_chance
            )));
        }
        if self.sink_rate == 0 {
            return Err(ConfigError::Invalid("sink_rate must be positive".into()));
        }
        if self.vessel_speed <= 0.0 {
            return Err(ConfigError::Invalid("vessel_speed must be positive".into()));
        }
        Ok(())
    }

    /// Spawn rules derived from this config
    pub fn spawner(&self) -> Spawner {
        Spawner {
            lanes: self.lanes,
            obstacle_spacing: self.obstacle_spacing,
            pickup_spacing: self.pickup_spacing,
            spawn_chance: self.spawn_chance,
            pickup_clearance: self.pickup_clearance,
        }
    }
}
