use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::timer::Timer;

/// Persisted shape of a single timer. Only the configuration round-trips;
/// transient countdown state (remaining time, dates, flags) is always reset
/// before saving, so a freshly loaded timer is never running.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoredTimer {
    pub title: String,
    pub message: String,
    pub duration: u32,
    #[serde(default)]
    pub rings: u32,
    #[serde(default)]
    pub interval: u32,
}

impl From<&Timer> for StoredTimer {
    fn from(timer: &Timer) -> Self {
        Self {
            title: timer.title().to_string(),
            message: timer.message().to_string(),
            duration: timer.duration_secs(),
            rings: timer.rings(),
            interval: timer.interval_secs(),
        }
    }
}

impl StoredTimer {
    fn into_timer(self) -> Result<Timer> {
        Timer::new(
            self.title,
            self.message,
            self.duration,
            self.rings,
            self.interval,
        )
        .context("Stored timer failed validation")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TimerFile {
    version: String,
    timers: Vec<StoredTimer>,
}

/// Handle on the timer collection persisted under the data directory.
///
/// Constructed explicitly and passed to whoever needs it; there is no
/// process-wide store. The store never retains timers between calls, it
/// only snapshots them at save time and produces fresh instances at load
/// time.
pub struct TimerStore {
    data_path: PathBuf,
    lock_path: PathBuf,
}

impl TimerStore {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            data_path: data_dir.join("timers.json"),
            lock_path: data_dir.join("timers.lock"),
        }
    }

    /// Load the saved collection. A missing or empty file yields the three
    /// example timers so a first run has something to show.
    pub fn load(&self) -> Result<Vec<Timer>> {
        if !self.data_path.exists() {
            debug!(path = %self.data_path.display(), "no timer file, using defaults");
            return default_timers();
        }
        let content =
            fs::read_to_string(&self.data_path).context("Failed to read timer file")?;
        if content.trim().is_empty() {
            return default_timers();
        }

        let file: TimerFile =
            serde_json::from_str(&content).context("Failed to parse timer JSON")?;
        if file.timers.is_empty() {
            return default_timers();
        }

        file.timers
            .into_iter()
            .map(StoredTimer::into_timer)
            .collect()
    }

    /// Overwrite the whole collection with a snapshot of the given timers,
    /// resetting each one first so no dangling running state is persisted.
    pub fn save(&self, timers: &mut [Timer]) -> Result<()> {
        for timer in timers.iter_mut() {
            timer.reset();
        }

        let file = TimerFile {
            version: "1.0.0".to_string(),
            timers: timers.iter().map(StoredTimer::from).collect(),
        };
        let content =
            serde_json::to_string_pretty(&file).context("Failed to serialize timers")?;

        if let Some(parent) = self.data_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file then rename, so a crash never leaves a
        // half-written collection behind.
        let temp_path = self.data_path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.data_path)?;

        debug!(path = %self.data_path.display(), count = timers.len(), "saved timers");
        Ok(())
    }

    fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

/// Load-modify-save critical section used by the mutating commands, guarded
/// by an exclusive file lock so concurrent invocations cannot clobber each
/// other's edits. The collection is saved only when the closure succeeds.
pub fn with_store_lock<F, R>(store: &TimerStore, f: F) -> Result<R>
where
    F: FnOnce(&mut Vec<Timer>) -> Result<R>,
{
    if let Some(parent) = store.lock_path().parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(store.lock_path())
        .context("Failed to open lock file")?;

    file.lock_exclusive().context("Failed to acquire lock")?;

    let mut timers = store.load()?;
    let result = f(&mut timers);

    if result.is_ok() {
        store.save(&mut timers)?;
    }

    file.unlock().context("Failed to unlock")?;

    result
}

/// The example timers shown when nothing has been saved yet: one of each
/// ring configuration (many rings, a single extra ring, none).
fn default_timers() -> Result<Vec<Timer>> {
    Ok(vec![
        Timer::new("Cooking", "The food is ready!", 10 * 60, 8, 15)?,
        Timer::new("Playing time", "The game's over!", 30 * 60, 1, 60)?,
        Timer::new("Working hours", "The break is over.", 45 * 60, 0, 0)?,
    ])
}
