//! Snapshot persistence
//!
//! The entire application state is serialized as one JSON document under a
//! single file in the app data directory. Writes go through a temp file
//! and rename so a crash mid-write never corrupts the previous snapshot.

use crate::error::Result;
use crate::store::AppState;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Whole-state snapshot store
#[derive(Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store writing to the given snapshot file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create the parent directory if needed
    pub async fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        tracing::info!("State store initialized at: {:?}", self.path);
        Ok(())
    }

    /// Load the persisted state.
    ///
    /// A missing snapshot yields the empty default state. An unreadable or
    /// corrupt snapshot also yields the default state with a warning:
    /// startup must never fail on bad data, the user just starts fresh.
    pub async fn load(&self) -> AppState {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No snapshot at {:?}, starting empty", self.path);
                return AppState::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot {:?}: {}", self.path, e);
                return AppState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => {
                tracing::info!("Loaded snapshot from {:?}", self.path);
                state
            }
            Err(e) => {
                tracing::warn!(
                    "Corrupt snapshot {:?} ({}), starting empty",
                    self.path,
                    e
                );
                AppState::default()
            }
        }
    }

    /// Persist the full state, atomically replacing the previous snapshot
    pub async fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;

        // Write to temp file first (atomic write)
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;

        // Rename to final location
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Saved snapshot ({} bytes)", json.len());
        Ok(())
    }

    /// Snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
