//! Application state and initialization
//!
//! All services are initialized here and share one repository over the
//! persisted state tree.

use crate::config;
use crate::error::{AppError, Result};
use crate::services::{ChecklistsService, ItemsService, NotificationSink, RemindersService};
use crate::storage::StateStore;
use crate::store::Repository;
use std::path::PathBuf;
use std::sync::Arc;

/// Central application handle holding all services
#[derive(Clone)]
pub struct App {
    pub repo: Repository,
    pub items: ItemsService,
    pub checklists: ChecklistsService,
    pub reminders: RemindersService,
}

/// Platform data directory for the tracker
pub fn default_data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "lifetrack")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| AppError::Persistence("Failed to resolve app data dir".to_string()))
}

/// Application setup - called once on startup
pub async fn setup(data_dir: PathBuf, sink: Arc<dyn NotificationSink>) -> Result<App> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", data_dir);

    std::fs::create_dir_all(&data_dir)?;

    let store = StateStore::new(data_dir.join(config::STATE_FILE_NAME));
    let repo = Repository::open(store).await?;

    if sink.is_available() {
        tracing::info!("Notification channel available");
    } else {
        tracing::warn!("Notification channel unavailable; reminders will advance silently");
    }

    let app = App {
        items: ItemsService::new(repo.clone()),
        checklists: ChecklistsService::new(repo.clone()),
        reminders: RemindersService::new(repo.clone(), sink),
        repo,
    };

    tracing::info!("Application initialized successfully");
    Ok(app)
}

impl App {
    /// Start the background reminder scheduler
    pub fn start_scheduler(&self) {
        self.reminders.clone().start_scheduler();
    }
}
