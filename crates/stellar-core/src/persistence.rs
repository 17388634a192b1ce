//! Save/Load functionality for persisting the economy
//!
//! A [`Snapshot`] is the complete economy field set plus the save stamp.
//! Entities are not saved: asteroids and effects are transient and drones
//! and trucks are rebuilt from the counts on load. Every snapshot field has a
//! default so older or partial saves still load.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use stellar_logic::logistics::TruckKind;
use stellar_logic::sectors::Sector;

use crate::economy::EconomyState;
use crate::session::UserId;

/// Version number for the snapshot format (increment when the format changes)
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub version: u32,
    pub ore: f64,
    pub current_sector: Sector,
    pub unlocked_sectors: Vec<Sector>,
    pub click_power: u32,
    pub click_level: u32,
    pub drone_count: u32,
    pub drone_damage: u32,
    pub drone_damage_level: u32,
    pub drone_fire_rate_ms: u32,
    pub drone_fire_rate_level: u32,
    pub spawn_rate_level: u32,
    pub truck_counts: BTreeMap<TruckKind, u32>,
    pub truck_gather_level: u32,
    pub truck_unload_level: u32,
    pub truck_travel_level: u32,
    /// Unix milliseconds of the save. `None` for saves that never carried a
    /// stamp; those are treated as saved at load time.
    pub last_save_ms: Option<i64>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            last_save_ms: None,
            ..Self::from(&EconomyState::default())
        }
    }
}

impl From<&EconomyState> for Snapshot {
    fn from(state: &EconomyState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            ore: state.ore,
            current_sector: state.current_sector,
            unlocked_sectors: state.unlocked_sectors.iter().copied().collect(),
            click_power: state.click_power,
            click_level: state.click_level,
            drone_count: state.drone_count,
            drone_damage: state.drone_damage,
            drone_damage_level: state.drone_damage_level,
            drone_fire_rate_ms: state.drone_fire_rate_ms,
            drone_fire_rate_level: state.drone_fire_rate_level,
            spawn_rate_level: state.spawn_rate_level,
            truck_counts: state.truck_counts.clone(),
            truck_gather_level: state.truck_gather_level,
            truck_unload_level: state.truck_unload_level,
            truck_travel_level: state.truck_travel_level,
            last_save_ms: Some(state.last_save.timestamp_millis()),
        }
    }
}

impl Snapshot {
    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        self.last_save_ms
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Convert back into a ledger, stamping it `now` when the save carries no
    /// usable stamp. Call [`EconomyState::sanitize`] afterwards.
    pub fn to_state(&self, now: DateTime<Utc>) -> EconomyState {
        EconomyState {
            ore: self.ore,
            current_sector: self.current_sector,
            unlocked_sectors: self.unlocked_sectors.iter().copied().collect(),
            click_power: self.click_power,
            click_level: self.click_level,
            drone_count: self.drone_count,
            drone_damage: self.drone_damage,
            drone_damage_level: self.drone_damage_level,
            drone_fire_rate_ms: self.drone_fire_rate_ms,
            drone_fire_rate_level: self.drone_fire_rate_level,
            spawn_rate_level: self.spawn_rate_level,
            truck_counts: self.truck_counts.clone(),
            truck_gather_level: self.truck_gather_level,
            truck_unload_level: self.truck_unload_level,
            truck_travel_level: self.truck_travel_level,
            last_save: self.last_save().unwrap_or(now),
        }
    }
}

/// Errors that can occur during save/load
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { supported: u32, found: u32 },
}

/// Key-value snapshot storage keyed by user.
pub trait SnapshotStore {
    /// `Ok(None)` when the user has never saved.
    fn load(&self, user: &UserId) -> Result<Option<Snapshot>, StoreError>;
    fn save(&mut self, user: &UserId, snapshot: &Snapshot) -> Result<(), StoreError>;
}

fn check_version(snapshot: Snapshot) -> Result<Snapshot, StoreError> {
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            supported: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

/// In-process store. Can be told to fail saves to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: HashMap<UserId, Snapshot>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, user: UserId, snapshot: Snapshot) -> Self {
        self.snapshots.insert(user, snapshot);
        self
    }

    pub fn get(&self, user: &UserId) -> Option<&Snapshot> {
        self.snapshots.get(user)
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.fail_saves = failing;
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, user: &UserId) -> Result<Option<Snapshot>, StoreError> {
        self.snapshots.get(user).cloned().map(check_version).transpose()
    }

    fn save(&mut self, user: &UserId, snapshot: &Snapshot) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io(std::io::Error::new(
                ErrorKind::Other,
                "store unavailable",
            )));
        }
        self.snapshots.insert(user.clone(), snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapshotFormat {
    #[default]
    Json,
    Bincode,
}

impl SnapshotFormat {
    fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Bincode => "bin",
        }
    }
}

/// One file per user under a directory. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    format: SnapshotFormat,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, user: &UserId) -> PathBuf {
        let stem: String = user
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stem = if stem.is_empty() { "_".to_string() } else { stem };
        self.dir.join(format!("{stem}.{}", self.format.extension()))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, user: &UserId) -> Result<Option<Snapshot>, StoreError> {
        let bytes = match fs::read(self.path_for(user)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot = match self.format {
            SnapshotFormat::Json => serde_json::from_slice(&bytes)?,
            SnapshotFormat::Bincode => bincode::deserialize(&bytes)?,
        };
        check_version(snapshot).map(Some)
    }

    fn save(&mut self, user: &UserId, snapshot: &Snapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let bytes = match self.format {
            SnapshotFormat::Json => serde_json::to_vec_pretty(snapshot)?,
            SnapshotFormat::Bincode => bincode::serialize(snapshot)?,
        };
        let path = self.path_for(user);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Single in-flight save guard.
///
/// Requests made while a save is outstanding collapse into one pending
/// follow-up, taken once the outstanding save finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveQueue {
    pending: bool,
    in_flight: bool,
}

impl SaveQueue {
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Start a save if one is pending and none is in flight.
    pub fn begin(&mut self) -> bool {
        if self.pending && !self.in_flight {
            self.pending = false;
            self.in_flight = true;
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
