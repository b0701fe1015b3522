//! Reference `UserStore` implementations
//!
//! `MemoryStore` keeps records in process (tests, demos). `JsonFileStore`
//! keeps them in one JSON document on disk, replaced atomically on write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PersistenceError, UserRecord, UserStore};
use crate::highscores::Leaderboard;

/// Stored totals for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Totals {
    highest_score: u64,
    coin_count: u64,
}

/// On-disk document: username -> totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserTable {
    version: u32,
    users: BTreeMap<String, Totals>,
}

impl UserTable {
    const VERSION: u32 = 1;

    fn record(&self, username: &str) -> Result<UserRecord, PersistenceError> {
        let totals = self
            .users
            .get(username)
            .ok_or_else(|| PersistenceError::UnknownUser(username.to_string()))?;
        Ok(UserRecord {
            username: username.to_string(),
            highest_score: totals.highest_score,
            coin_count: totals.coin_count,
        })
    }

    fn leaderboard(&self) -> Leaderboard {
        Leaderboard::from_scores(
            self.users
                .iter()
                .map(|(name, totals)| (name.clone(), totals.highest_score)),
        )
    }

    fn update(&mut self, record: &UserRecord) -> Result<(), PersistenceError> {
        let totals = self
            .users
            .get_mut(&record.username)
            .ok_or_else(|| PersistenceError::UnknownUser(record.username.clone()))?;
        totals.highest_score = totals.highest_score.max(record.highest_score);
        totals.coin_count = record.coin_count;
        Ok(())
    }

    fn insert(&mut self, username: &str) -> Result<UserRecord, PersistenceError> {
        if self.users.contains_key(username) {
            return Err(PersistenceError::UserExists(username.to_string()));
        }
        self.users.insert(username.to_string(), Totals::default());
        Ok(UserRecord::new(username))
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: UserTable,
    offline: bool,
    /// Successful flushes so far
    pub flushes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate unreachable storage: every call fails while set
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), PersistenceError> {
        if self.offline {
            Err(PersistenceError::Unavailable("memory store offline".into()))
        } else {
            Ok(())
        }
    }
}

impl UserStore for MemoryStore {
    fn fetch_user_record(&self, username: &str) -> Result<UserRecord, PersistenceError> {
        self.check_online()?;
        self.table.record(username)
    }

    fn fetch_leaderboard(&self) -> Result<Leaderboard, PersistenceError> {
        self.check_online()?;
        Ok(self.table.leaderboard())
    }

    fn flush_user_record(&mut self, record: &UserRecord) -> Result<(), PersistenceError> {
        self.check_online()?;
        self.table.update(record)?;
        self.flushes += 1;
        Ok(())
    }

    fn register_user(&mut self, username: &str) -> Result<UserRecord, PersistenceError> {
        self.check_online()?;
        self.table.insert(username)
    }
}

/// Store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty table
    fn read(&self) -> Result<UserTable, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserTable {
                version: UserTable::VERSION,
                users: BTreeMap::new(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the original
    fn write(&self, table: &UserTable) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl UserStore for JsonFileStore {
    fn fetch_user_record(&self, username: &str) -> Result<UserRecord, PersistenceError> {
        self.read()?.record(username)
    }

    fn fetch_leaderboard(&self) -> Result<Leaderboard, PersistenceError> {
        Ok(self.read()?.leaderboard())
    }

    fn flush_user_record(&mut self, record: &UserRecord) -> Result<(), PersistenceError> {
        let mut table = self.read()?;
        table.update(record)?;
        self.write(&table)?;
        log::debug!("Flushed record for {} to {}", record.username, self.path.display());
        Ok(())
    }

    fn register_user(&mut self, username: &str) -> Result<UserRecord, PersistenceError> {
        let mut table = self.read()?;
        let record = table.insert(username)?;
        self.write(&table)?;
        log::info!("Registered user {username}");
        Ok(record)
    }
}
