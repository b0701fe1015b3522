//! User record persistence
//!
//! The game only ever needs three operations from storage: read one player's
//! record when they sign in, read the leaderboard, and write the record back
//! when a run ends. Calls are synchronous and happen only at screen
//! transitions, never inside a tick.

pub mod store;

use serde::{Deserialize, Serialize};

use crate::highscores::Leaderboard;

pub use store::{JsonFileStore, MemoryStore};

/// Persistence failures
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// What is kept per player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub highest_score: u64,
    pub coin_count: u64,
}

impl UserRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            highest_score: 0,
            coin_count: 0,
        }
    }
}

/// The persistence collaborator
pub trait UserStore {
    /// Read one player's highest score and coin count
    fn fetch_user_record(&self, username: &str) -> Result<UserRecord, PersistenceError>;

    /// All players ordered by highest score
    fn fetch_leaderboard(&self) -> Result<Leaderboard, PersistenceError>;

    /// Write a player's totals back. A stored highest score never decreases.
    fn flush_user_record(&mut self, record: &UserRecord) -> Result<(), PersistenceError>;

    /// Create a zeroed record for a new player
    fn register_user(&mut self, username: &str) -> Result<UserRecord, PersistenceError>;
}
