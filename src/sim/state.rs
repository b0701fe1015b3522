//! Run state and core simulation types
//!
//! A `World` is one run: the vessel, everything floating toward it, the score
//! and the seeded RNG that decides spawns. It is rebuilt from scratch for
//! every run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::backdrop::Backdrop;
use super::entities::{Obstacle, ObstacleKind, Pickup, Spawner};
use super::vessel::Vessel;
use crate::consts::*;
use crate::settings::GameConfig;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObstacleSpawned { id: u32, kind: ObstacleKind, lane: usize },
    PickupSpawned { id: u32, lane: usize },
    PickupCollected { id: u32 },
    /// The hull crossed an obstacle's box
    Collision { obstacle_id: u32 },
    /// The vessel finished fading out
    Sunk,
}

/// Counters for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub ticks: u64,
    pub obstacles_spawned: u32,
    pub pickups_spawned: u32,
    pub pickups_collected: u32,
}

/// River banks the vessel must stay between
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub left: f32,
    pub right: f32,
}

/// Complete state of one run (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub vessel: Vessel,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live pickups in spawn order
    pub pickups: Vec<Pickup>,
    pub backdrop: Backdrop,
    pub river: River,
    pub spawner: Spawner,
    /// Accumulated forward progress
    pub score: f64,
    pub stats: RunStats,
    pub screen_height: f32,
    pub pickup_reach: f32,
    pub sink_rate: u8,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Fresh run: vessel at the start position, empty river, zero score
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            vessel: Vessel::new(config.vessel_start, config.vessel_speed),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            backdrop: Backdrop::new(BACKDROP_HEIGHT),
            river: River {
                left: config.river_left,
                right: config.river_right,
            },
            spawner: config.spawner(),
            score: 0.0,
            stats: RunStats::default(),
            screen_height: config.screen_height,
            pickup_reach: config.pickup_reach,
            sink_rate: config.sink_rate,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Roll for a new obstacle at the spawn line
    pub fn spawn_obstacle(&mut self) -> Option<GameEvent> {
        let (kind, lane) = self
            .spawner
            .roll_obstacle(self.obstacles.last(), &mut self.rng)?;
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle {
            id,
            kind,
            lane,
            pos: Vec2::new(self.spawner.lane_x(lane), SPAWN_Y),
        });
        self.stats.obstacles_spawned += 1;
        Some(GameEvent::ObstacleSpawned { id, kind, lane })
    }

    /// Roll for a new pickup at the spawn line
    pub fn spawn_pickup(&mut self) -> Option<GameEvent> {
        let lane = self.spawner.roll_pickup(
            self.pickups.last(),
            self.obstacles.last(),
            &mut self.rng,
        )?;
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            lane,
            pos: Vec2::new(self.spawner.lane_x(lane), SPAWN_Y),
            collected: false,
        });
        self.stats.pickups_spawned += 1;
        Some(GameEvent::PickupSpawned { id, lane })
    }
}
