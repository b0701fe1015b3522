//! Frame driver
//!
//! Owns the session and the store. Converts wall-clock frame time into fixed
//! ticks, samples input before every tick, and carries out the storage work
//! a transition asks for. Storage is only touched at transitions, sign-in,
//! leaderboard requests and shutdown.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::Leaderboard;
use crate::persistence::{PersistenceError, UserRecord, UserStore};
use crate::session::{Screen, Session, SessionEffect, SessionView};
use crate::settings::GameConfig;
use crate::sim::{TickInput, TurnCommand};

/// Flush attempts made at a transition before deferring
pub const FLUSH_ATTEMPTS: u32 = 3;

/// Largest frame time fed to the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Abstract commands sampled from the presentation layer each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub turn: TurnCommand,
    /// "Play" pressed on the title screen
    pub enter_game: bool,
    /// Title screen wants the leaderboard
    pub show_leaderboard: bool,
    pub quit: bool,
}

/// Screen, keyboard and menus live behind this
pub trait Presentation {
    /// Commands for the next tick
    fn poll_input(&mut self, view: &SessionView<'_>) -> FrameInput;

    /// Draw the current state
    fn present(&mut self, view: &SessionView<'_>);

    /// Return the title menus to their main sub-screen
    fn reset_title(&mut self) {}

    fn show_leaderboard(&mut self, _board: &Leaderboard) {}
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
        }
    }

    /// Add frame time; returns how many ticks to run (at most `MAX_SUBSTEPS`)
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            steps += 1;
        }
        // Drop time we could not catch up on
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.dt);
        }
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Runs a session tick by tick against a store
pub struct FrameDriver<S: UserStore> {
    session: Session,
    store: S,
    timestep: FixedTimestep,
    /// Latest record whose flush has not succeeded yet
    pending_flush: Option<UserRecord>,
    /// Session totals include the stored ones; until then flushing would overwrite them
    profile_loaded: bool,
    quit: bool,
}

impl<S: UserStore> FrameDriver<S> {
    /// Load (or create) the player's record and open a session on the title screen.
    ///
    /// Storage failures are not fatal: the session starts from zeroed totals
    /// and the stored ones are merged in before the first flush.
    pub fn sign_in(config: GameConfig, mut store: S, username: &str, seed: u64) -> Self {
        let (profile, profile_loaded) = match load_profile(&mut store, username) {
            Ok(record) => (record, true),
            Err(e) => {
                log::warn!("Could not load record for {username}: {e}");
                (UserRecord::new(username), false)
            }
        };
        let timestep = FixedTimestep::new(config.tick_rate);
        Self {
            session: Session::new(config, profile, seed),
            store,
            timestep,
            pending_flush: None,
            profile_loaded,
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn pending_flush(&self) -> Option<&UserRecord> {
        self.pending_flush.as_ref()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Sample input and run exactly one tick. Returns false once quit is requested.
    pub fn step<P: Presentation>(&mut self, presentation: &mut P) -> bool {
        if self.quit {
            return false;
        }

        let input = presentation.poll_input(&self.session.view());
        if input.quit {
            log::info!("Quit requested");
            self.quit = true;
            return false;
        }

        if self.session.screen() == Screen::Title {
            if input.show_leaderboard {
                self.show_leaderboard(presentation);
            }
            if input.enter_game {
                let effects = self.session.enter_game();
                self.apply(effects, presentation);
            }
        }

        let effects = self.session.step(&TickInput { turn: input.turn });
        self.apply(effects, presentation);
        true
    }

    /// Run the ticks owed for `frame_dt` seconds, then draw once
    pub fn frame<P: Presentation>(&mut self, presentation: &mut P, frame_dt: f32) -> bool {
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            if !self.step(presentation) {
                return false;
            }
        }
        presentation.present(&self.session.view());
        true
    }

    /// Run `ticks` ticks back to back without pacing, drawing after each
    pub fn run_ticks<P: Presentation>(&mut self, presentation: &mut P, ticks: u64) {
        for _ in 0..ticks {
            if !self.step(presentation) {
                break;
            }
            presentation.present(&self.session.view());
        }
        self.shutdown();
    }

    /// Real-time loop at the configured tick rate until quit
    pub fn run<P: Presentation>(&mut self, presentation: &mut P) {
        let frame_time = Duration::from_secs_f32(self.timestep.dt());
        let mut last = Instant::now();
        loop {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            if !self.frame(presentation, dt) {
                break;
            }

            let spent = now.elapsed();
            if spent < frame_time {
                std::thread::sleep(frame_time - spent);
            }
        }
        self.shutdown();
    }

    /// Final flush of anything still pending
    pub fn shutdown(&mut self) {
        if let Some(record) = self.pending_flush.take() {
            log::info!("Retrying deferred flush for {}", record.username);
            self.flush(record);
        }
    }

    fn apply<P: Presentation>(&mut self, effects: Vec<SessionEffect>, presentation: &mut P) {
        for effect in effects {
            match effect {
                SessionEffect::FlushUserRecord(record) => self.flush(record),
                SessionEffect::ResetTitle => presentation.reset_title(),
            }
        }
    }

    /// Try a few times; on failure keep the record for the next transition or shutdown.
    /// A newer record supersedes a pending one since totals only accumulate.
    fn flush(&mut self, mut record: UserRecord) {
        self.pending_flush = None;
        if !self.profile_loaded {
            match load_profile(&mut self.store, &record.username) {
                Ok(stored) => {
                    self.session.merge_stored(&stored);
                    self.profile_loaded = true;
                    record = self.session.user_record();
                }
                Err(e) => {
                    log::error!("Stored totals for {} still unavailable: {e}", record.username);
                    self.pending_flush = Some(record);
                    return;
                }
            }
        }
        for attempt in 1..=FLUSH_ATTEMPTS {
            match self.store.flush_user_record(&record) {
                Ok(()) => {
                    log::info!(
                        "Saved {}: highest score {}, coins {}",
                        record.username,
                        record.highest_score,
                        record.coin_count
                    );
                    return;
                }
                Err(e) => {
                    log::warn!("Flush attempt {attempt}/{FLUSH_ATTEMPTS} failed: {e}");
                }
            }
        }
        log::error!("Could not save {}; will retry later", record.username);
        self.pending_flush = Some(record);
    }

    fn show_leaderboard<P: Presentation>(&mut self, presentation: &mut P) {
        match self.store.fetch_leaderboard() {
            Ok(board) => presentation.show_leaderboard(&board),
            Err(e) => log::warn!("Could not load leaderboard: {e}"),
        }
    }
}

/// Fetch a player's record, registering them on first sight
fn load_profile<S: UserStore>(store: &mut S, username: &str) -> Result<UserRecord, PersistenceError> {
    match store.fetch_user_record(username) {
        Err(PersistenceError::UnknownUser(_)) => store.register_user(username),
        other => other,
    }
}
