//! Scrolling world entities: obstacles and pickups
//!
//! Entities live in spawn order. They enter above the screen at a random
//! lane, move down by the vessel's vertical velocity every tick, and are
//! culled once they fall past the bottom edge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Number of spawn lanes across the river
pub const LANE_COUNT: usize = 3;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Log,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 2] = [ObstacleKind::Rock, ObstacleKind::Log];

    /// Sprite extents, which double as the hit box
    pub fn extents(&self) -> Vec2 {
        match self {
            ObstacleKind::Rock => Vec2::new(64.0, 56.0),
            ObstacleKind::Log => Vec2::new(112.0, 36.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Rock => "rock",
            ObstacleKind::Log => "log",
        }
    }
}

/// Something in the river the vessel must avoid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: usize,
    pub pos: Vec2,
}

impl Obstacle {
    /// Axis-aligned hit box centered on the obstacle
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.kind.extents())
    }
}

/// A coin floating down the river
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub lane: usize,
    pub pos: Vec2,
    pub collected: bool,
}

/// Anything moved by the scroll
pub trait Scrolling {
    fn pos(&self) -> Vec2;
    fn pos_mut(&mut self) -> &mut Vec2;
}

impl Scrolling for Obstacle {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
}

impl Scrolling for Pickup {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
}

/// Move every entity down by `dy`. Only the vertical velocity scrolls the world.
pub fn advance<T: Scrolling>(entities: &mut [T], dy: f32) {
    for entity in entities.iter_mut() {
        entity.pos_mut().y += dy;
    }
}

/// Drop entities that fell past the bottom of the screen, keeping spawn order.
/// Returns how many were removed.
pub fn cull<T: Scrolling>(entities: &mut Vec<T>, screen_height: f32) -> usize {
    let before = entities.len();
    entities.retain(|e| e.pos().y <= screen_height + CULL_MARGIN);
    before - entities.len()
}

/// Whether the newest entity of a category has moved far enough from the spawn line
pub fn spacing_clear<T: Scrolling>(newest: Option<&T>, min_spacing: f32) -> bool {
    newest.is_none_or(|e| e.pos().y >= min_spacing)
}

/// Spawn decisions for both entity categories
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Center x of each lane
    pub lanes: [f32; LANE_COUNT],
    pub obstacle_spacing: f32,
    pub pickup_spacing: f32,
    /// Per-tick chance of an obstacle once spacing allows one
    pub spawn_chance: f64,
    /// A pickup may not share a lane with the newest obstacle within this vertical distance
    pub pickup_clearance: f32,
}

impl Spawner {
    /// Decide whether an obstacle spawns this tick, and where
    pub fn roll_obstacle<R: Rng + ?Sized>(
        &self,
        newest: Option<&Obstacle>,
        rng: &mut R,
    ) -> Option<(ObstacleKind, usize)> {
        if !spacing_clear(newest, self.obstacle_spacing) {
            return None;
        }
        if rng.random::<f64>() >= self.spawn_chance {
            return None;
        }
        let lane = rng.random_range(0..LANE_COUNT);
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        Some((kind, lane))
    }

    /// Decide whether a pickup spawns this tick, and in which lane
    pub fn roll_pickup<R: Rng + ?Sized>(
        &self,
        newest: Option<&Pickup>,
        newest_obstacle: Option<&Obstacle>,
        rng: &mut R,
    ) -> Option<usize> {
        if !spacing_clear(newest, self.pickup_spacing) {
            return None;
        }
        let lane = rng.random_range(0..LANE_COUNT);
        let spawn = Vec2::new(self.lanes[lane], SPAWN_Y);
        if self.conflicts(spawn, newest_obstacle) {
            return None;
        }
        Some(lane)
    }

    /// A spawn point conflicts when it shares a lane with the obstacle and is vertically close
    fn conflicts(&self, spawn: Vec2, obstacle: Option<&Obstacle>) -> bool {
        match obstacle {
            Some(obs) => {
                (spawn.y - obs.pos.y).abs() <= self.pickup_clearance && spawn.x == obs.pos.x
            }
            None => false,
        }
    }

    pub fn lane_x(&self, lane: usize) -> f32 {
        self.lanes[lane]
    }
}
