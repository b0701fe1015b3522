//! River Runner entry point
//!
//! Headless runner: the autopilot plays against a JSON user store, which is
//! enough to exercise the whole session lifecycle without a window.
//!
//! Usage: river-runner [--config PATH] [--store PATH] [--user NAME]
//!                     [--ticks N] [--runs N] [--seed N]

use std::path::PathBuf;

use river_runner::driver::{FrameDriver, FrameInput, Presentation};
use river_runner::highscores::LEADERBOARD_ROWS;
use river_runner::persistence::JsonFileStore;
use river_runner::session::SessionView;
use river_runner::sim::autopilot;
use river_runner::{GameConfig, Leaderboard, Screen};

/// Command line options
#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    store: PathBuf,
    user: String,
    /// Unpaced tick budget; real time until `runs` finish when absent
    ticks: Option<u64>,
    runs: u32,
    seed: Option<u64>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            store: PathBuf::from("river_runner_users.json"),
            user: "player".to_string(),
            ticks: None,
            runs: 1,
            seed: None,
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--store" => args.store = PathBuf::from(value()?),
            "--user" => args.user = value()?,
            "--ticks" => args.ticks = Some(parse_number(&value()?)?),
            "--runs" => args.runs = parse_number(&value()?)?,
            "--seed" => args.seed = Some(parse_number(&value()?)?),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.parse().map_err(|_| format!("not a number: {s}"))
}

/// Plays on its own and quits after enough runs
struct AutopilotPlayer {
    runs_wanted: u32,
    runs_finished: u32,
    leaderboard: Option<Leaderboard>,
}

impl Presentation for AutopilotPlayer {
    fn poll_input(&mut self, view: &SessionView<'_>) -> FrameInput {
        match view.screen {
            Screen::Title if self.runs_finished >= self.runs_wanted => FrameInput {
                show_leaderboard: self.leaderboard.is_none(),
                quit: self.leaderboard.is_some(),
                ..Default::default()
            },
            Screen::Title => FrameInput {
                enter_game: true,
                ..Default::default()
            },
            Screen::Playing => FrameInput {
                turn: view.world.map(autopilot::steer).unwrap_or_default(),
                ..Default::default()
            },
            Screen::Sinking => FrameInput::default(),
        }
    }

    fn present(&mut self, view: &SessionView<'_>) {
        log::trace!(
            "{:?} score {:.0} pos {:?}",
            view.screen,
            view.score,
            view.vessel_pos
        );
    }

    fn reset_title(&mut self) {
        self.runs_finished += 1;
    }

    fn show_leaderboard(&mut self, board: &Leaderboard) {
        self.leaderboard = Some(board.clone());
    }
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!(
                "usage: river-runner [--config PATH] [--store PATH] [--user NAME] [--ticks N] [--runs N] [--seed N]"
            );
            std::process::exit(2);
        }
    };
    log::info!("River Runner starting...");

    let config = args
        .config
        .as_deref()
        .map(GameConfig::load_or_default)
        .unwrap_or_default();
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    log::info!("Base seed: {seed}");

    let store = JsonFileStore::new(&args.store);
    let mut driver = FrameDriver::sign_in(config, store, &args.user, seed);
    let mut player = AutopilotPlayer {
        runs_wanted: args.runs,
        runs_finished: 0,
        leaderboard: None,
    };

    match args.ticks {
        Some(ticks) => driver.run_ticks(&mut player, ticks),
        None => driver.run(&mut player),
    }

    let session = driver.session();
    if let Some(run) = session.last_run() {
        println!(
            "Last run: score {:.0} over {} ticks, {} obstacles spawned",
            run.score, run.stats.ticks, run.stats.obstacles_spawned
        );
    }
    println!(
        "{}: highest score {:.0}, coins {}",
        session.username(),
        session.highest_score(),
        session.coin_count()
    );
    if let Some(board) = &player.leaderboard {
        for (rank, entry) in board.top(LEADERBOARD_ROWS).iter().enumerate() {
            println!("{:>2}. {:<16} {}", rank + 1, entry.username, entry.highest_score);
        }
    }
}
