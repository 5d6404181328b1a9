use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key/value persistence seam.
///
/// Gameplay code only sees [`SaveStore`]; this trait exists so tests can swap
/// the file-backed store for an in-memory fake.
pub trait Storage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// In-memory fake for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON document per key, under a single data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the data directory: `RETROCADE_DATA_DIR` wins, then the XDG
    /// data dir, then `~/.local/share`, then the working directory.
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("RETROCADE_DATA_DIR") {
            return Self::new(PathBuf::from(explicit));
        }

        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".local");
                    p.push("share");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut dir = base;
        dir.push("retrocade");
        Self::new(dir)
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        match fs::rename(&tmp, &path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Some filesystems refuse cross-entry renames; fall back to a
                // plain copy and drop the temp file.
                fs::copy(&tmp, &path)?;
                let _ = fs::remove_file(&tmp);
                Ok(())
            }
        }
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn high_score_key(game: &str) -> String {
    format!("{game}-high-score")
}

fn saved_state_key(game: &str) -> String {
    format!("{game}-saved-state")
}

/// Per-game persistence: high scores plus one optional saved state each.
///
/// Absent or malformed data always degrades to defaults (zero score, no
/// save); a broken file must never take down a game.
#[derive(Debug, Clone)]
pub struct SaveStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SaveStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn high_score(&self, game: &str) -> u32 {
        self.storage
            .read(&high_score_key(game))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(0)
    }

    /// Fold `score` into the stored high score, keeping the max. Returns the
    /// resulting high score; write failures are logged, not surfaced.
    pub fn record_score(&mut self, game: &str, score: u32) -> u32 {
        let best = self.high_score(game).max(score);
        if let Err(e) = self.storage.write(&high_score_key(game), &best.to_string()) {
            warn!("failed to persist high score for {game}: {e}");
        }
        best
    }

    pub fn save_state<T: Serialize>(&mut self, game: &str, state: &T) -> io::Result<()> {
        let json = serde_json::to_string(state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.storage.write(&saved_state_key(game), &json)
    }

    pub fn load_state<T: DeserializeOwned>(&self, game: &str) -> Option<T> {
        let raw = self.storage.read(&saved_state_key(game))?;
        serde_json::from_str(&raw).ok()
    }

    pub fn clear_state(&mut self, game: &str) {
        if let Err(e) = self.storage.remove(&saved_state_key(game)) {
            warn!("failed to clear saved state for {game}: {e}");
        }
    }
}
