//! Session lifecycle: title -> playing -> sinking -> title
//!
//! The run world only exists while a run is live, so it travels inside the
//! `Playing` and `Sinking` variants. Transitions never touch storage
//! directly; they return `SessionEffect`s for the driver to carry out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence::UserRecord;
use crate::settings::GameConfig;
use crate::sim::{GameEvent, Obstacle, Pickup, RunStats, TickInput, World, tick, tick_sinking};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Menus, handled by the title collaborator
    Title,
    /// Active run
    Playing,
    /// Vessel hit something and is going down
    Sinking,
}

/// Screen state with the live run, when there is one
#[derive(Debug, Clone)]
enum Phase {
    Title,
    Playing(Box<World>),
    Sinking(Box<World>),
}

/// Requests for the outside world produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Write the player's totals back to storage
    FlushUserRecord(UserRecord),
    /// Return the title collaborator to its main menu
    ResetTitle,
}

/// How a finished run went
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: f64,
    pub highest_score: f64,
    pub coin_count: u64,
    pub stats: RunStats,
}

/// Everything the presentation layer draws for one frame
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub screen: Screen,
    /// The live run, for bots that steer from full state
    pub world: Option<&'a World>,
    pub vessel_pos: Option<Vec2>,
    pub vessel_heading: Option<f32>,
    pub vessel_hull: Option<&'a [Vec2; 7]>,
    pub vessel_alpha: Option<u8>,
    pub obstacles: &'a [Obstacle],
    pub pickups: &'a [Pickup],
    pub score: f64,
    pub highest_score: f64,
    pub coin_count: u64,
}

/// One player's session across many runs
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    phase: Phase,
    username: String,
    /// Best score ever, raised live while playing
    highest_score: f64,
    coin_count: u64,
    /// Seed of the first run; each later run adds its run index
    base_seed: u64,
    runs_started: u64,
    last_run: Option<RunSummary>,
}

impl Session {
    /// Start on the title screen with the player's stored totals
    pub fn new(config: GameConfig, profile: UserRecord, base_seed: u64) -> Self {
        log::info!(
            "Session for {} (highest score {}, coins {})",
            profile.username,
            profile.highest_score,
            profile.coin_count
        );
        Self {
            config,
            phase: Phase::Title,
            username: profile.username,
            highest_score: profile.highest_score as f64,
            coin_count: profile.coin_count,
            base_seed,
            runs_started: 0,
            last_run: None,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.phase {
            Phase::Title => Screen::Title,
            Phase::Playing(_) => Screen::Playing,
            Phase::Sinking(_) => Screen::Sinking,
        }
    }

    /// The live run, if any
    pub fn world(&self) -> Option<&World> {
        match &self.phase {
            Phase::Title => None,
            Phase::Playing(world) | Phase::Sinking(world) => Some(world.as_ref()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Running score of the live run (0 on the title screen)
    pub fn score(&self) -> f64 {
        self.world().map_or(0.0, |w| w.score)
    }

    pub fn highest_score(&self) -> f64 {
        self.highest_score
    }

    pub fn coin_count(&self) -> u64 {
        self.coin_count
    }

    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    /// Totals as they would be stored right now
    pub fn user_record(&self) -> UserRecord {
        UserRecord {
            username: self.username.clone(),
            highest_score: self.highest_score.max(0.0).floor() as u64,
            coin_count: self.coin_count,
        }
    }

    /// Fold in totals that were stored before this session opened.
    /// Only for sessions started without the stored profile: coins earned
    /// since then are added on top, the best score is kept.
    pub fn merge_stored(&mut self, stored: &UserRecord) {
        self.coin_count += stored.coin_count;
        self.highest_score = self.highest_score.max(stored.highest_score as f64);
        log::info!(
            "Merged stored totals for {}: highest score {:.0}, coins {}",
            self.username,
            self.highest_score,
            self.coin_count
        );
    }

    /// Title -> Playing with a fresh world. Ignored on any other screen.
    pub fn enter_game(&mut self) -> Vec<SessionEffect> {
        if !matches!(self.phase, Phase::Title) {
            return Vec::new();
        }
        let seed = self.base_seed.wrapping_add(self.runs_started);
        self.runs_started += 1;
        log::info!("Run {} started (seed {seed})", self.runs_started);
        self.phase = Phase::Playing(Box::new(World::new(&self.config, seed)));
        Vec::new()
    }

    /// Advance one tick on whatever screen is showing
    pub fn step(&mut self, input: &TickInput) -> Vec<SessionEffect> {
        match std::mem::replace(&mut self.phase, Phase::Title) {
            Phase::Title => Vec::new(),
            Phase::Playing(world) => self.step_playing(world, input),
            Phase::Sinking(world) => self.step_sinking(world),
        }
    }

    fn step_playing(&mut self, mut world: Box<World>, input: &TickInput) -> Vec<SessionEffect> {
        let events = tick(&mut world, input);
        let mut crashed = false;

        for event in &events {
            match event {
                GameEvent::PickupCollected { .. } => self.coin_count += 1,
                GameEvent::Collision { obstacle_id } => {
                    let kind = world
                        .obstacles
                        .iter()
                        .find(|o| o.id == *obstacle_id)
                        .map_or("obstacle", |o| o.kind.as_str());
                    log::info!(
                        "Hit {kind} {obstacle_id} at score {:.0}; sinking",
                        world.score
                    );
                    crashed = true;
                }
                _ => {}
            }
        }

        self.highest_score = self.highest_score.max(world.score);
        self.phase = if crashed {
            Phase::Sinking(world)
        } else {
            Phase::Playing(world)
        };
        Vec::new()
    }

    fn step_sinking(&mut self, mut world: Box<World>) -> Vec<SessionEffect> {
        let events = tick_sinking(&mut world);
        if events.contains(&GameEvent::Sunk) {
            self.finish_run(&world)
        } else {
            self.phase = Phase::Sinking(world);
            Vec::new()
        }
    }

    /// Sinking -> Title: settle the highest score and ask for a flush.
    /// The world is dropped, so the running score reads 0 again.
    fn finish_run(&mut self, world: &World) -> Vec<SessionEffect> {
        self.highest_score = self.highest_score.max(world.score);
        let summary = RunSummary {
            seed: world.seed,
            score: world.score,
            highest_score: self.highest_score,
            coin_count: self.coin_count,
            stats: world.stats,
        };
        log::info!(
            "Run over: score {:.0}, highest {:.0}, coins {}, ticks {}, obstacles {}, pickups {}/{}",
            summary.score,
            summary.highest_score,
            summary.coin_count,
            summary.stats.ticks,
            summary.stats.obstacles_spawned,
            summary.stats.pickups_collected,
            summary.stats.pickups_spawned
        );
        self.last_run = Some(summary);
        self.phase = Phase::Title;

        vec![
            SessionEffect::FlushUserRecord(self.user_record()),
            SessionEffect::ResetTitle,
        ]
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> Option<&mut World> {
        match &mut self.phase {
            Phase::Title => None,
            Phase::Playing(world) | Phase::Sinking(world) => Some(world.as_mut()),
        }
    }

    /// Snapshot for drawing
    pub fn view(&self) -> SessionView<'_> {
        let world = self.world();
        SessionView {
            screen: self.screen(),
            world,
            vessel_pos: world.map(|w| w.vessel.pos),
            vessel_heading: world.map(|w| w.vessel.heading()),
            vessel_hull: world.map(|w| w.vessel.hull()),
            vessel_alpha: world.map(|w| w.vessel.alpha),
            obstacles: world.map(|w| w.obstacles.as_slice()).unwrap_or_default(),
            pickups: world.map(|w| w.pickups.as_slice()).unwrap_or_default(),
            score: self.score(),
            highest_score: self.highest_score,
            coin_count: self.coin_count,
        }
    }
}
