//! Reminders service
//!
//! Owns the reminder collection and its scheduling. A background task
//! checks for due reminders every minute; reminders created or edited
//! with a near-term target also get an exact-instant one-shot timer.
//!
//! Firing is decoupled from delivery: the repeat rollover always runs,
//! even when the notification channel is unavailable, so a daily
//! reminder cannot fire twice on the day the channel comes back.

use crate::config;
use crate::error::{AppError, Result};
use crate::services::notifications::{NotificationRequest, NotificationSink};
use crate::store::{CreateReminderRequest, Reminder, Repository, UpdateReminderRequest};
use chrono::{Duration, Local, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Reminders service with background scheduler
#[derive(Clone)]
pub struct RemindersService {
    repo: Repository,
    sink: Arc<dyn NotificationSink>,
    /// One-shot timers by reminder id; edits and removals abort the
    /// stale timer here before touching the reminder
    armed: Arc<Mutex<HashMap<i64, JoinHandle<()>>>>,
}

impl RemindersService {
    pub fn new(repo: Repository, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            repo,
            sink,
            armed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a new reminder and arm a near-term timer if it is due soon
    pub async fn create_reminder(&self, mut req: CreateReminderRequest) -> Result<Reminder> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        req.title = title;
        req.details = req.details.trim().to_string();

        tracing::info!("Creating reminder '{}' at {}", req.title, req.trigger_time);
        let reminder = self.repo.add_reminder(req).await?;
        self.arm_near_term(&reminder, Local::now().naive_local()).await;
        Ok(reminder)
    }

    /// Edit a reminder; any armed timer for it is cancelled first and
    /// re-armed from the updated target.
    pub async fn update_reminder(
        &self,
        id: i64,
        mut req: UpdateReminderRequest,
    ) -> Result<Reminder> {
        if let Some(title) = req.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::Validation("title is required".to_string()));
            }
            req.title = Some(title);
        }

        self.cancel_armed(id).await;
        let updated = self.repo.update_reminder(id, req).await?;
        if updated.active {
            self.arm_near_term(&updated, Local::now().naive_local()).await;
        }
        Ok(updated)
    }

    pub async fn toggle_reminder(&self, id: i64) -> Result<Reminder> {
        self.repo.toggle_reminder(id).await
    }

    pub async fn remove_reminder(&self, id: i64) -> Result<()> {
        self.cancel_armed(id).await;
        self.repo.remove_reminder(id).await
    }

    pub async fn list_reminders(&self) -> Vec<Reminder> {
        self.repo.list_reminders().await
    }

    /// Start the background scheduler
    pub fn start_scheduler(self) {
        tokio::spawn(async move {
            tracing::info!("Starting reminder scheduler");

            let mut interval = tokio::time::interval(std::time::Duration::from_secs(
                config::REMINDER_POLL_INTERVAL_SECS,
            ));

            loop {
                interval.tick().await;

                let now = Local::now().naive_local();
                if let Err(e) = self.poll(now).await {
                    tracing::error!("Error checking reminders: {}", e);
                }
            }
        });
    }

    /// Check every active reminder against `now`.
    ///
    /// A reminder fires only when its target fell within the last poll
    /// interval; the window both prevents re-firing a target that an
    /// earlier poll already handled and keeps long-stale targets (the
    /// process was not running) from alerting hours late. Stale targets
    /// are recovered instead: one-shot reminders deactivate, repeating
    /// ones advance silently to their next future occurrence.
    pub async fn poll(&self, now: NaiveDateTime) -> Result<()> {
        let window = Duration::seconds(config::REMINDER_POLL_INTERVAL_SECS as i64);

        for reminder in self.repo.active_reminders().await {
            if reminder.trigger_time > now {
                continue;
            }

            if reminder.trigger_time > now - window {
                tracing::info!("Reminder due: '{}' ({})", reminder.title, reminder.id);
                self.deliver(&reminder);
                self.repo.roll_reminder_forward(reminder.id).await?;
            } else {
                tracing::warn!(
                    "Reminder {} missed its window (was due {}), recovering without alert",
                    reminder.id,
                    reminder.trigger_time
                );
                self.repo.catch_up_reminder(reminder.id, now).await?;
            }
        }

        Ok(())
    }

    /// Send the due notification, best-effort
    fn deliver(&self, reminder: &Reminder) {
        if !self.sink.is_available() {
            tracing::warn!(
                "Notification channel unavailable, skipping alert for reminder {}",
                reminder.id
            );
            return;
        }
        self.sink.notify(Self::request_for(reminder));
    }

    fn request_for(reminder: &Reminder) -> NotificationRequest {
        let body = if reminder.details.is_empty() {
            "Reminder!".to_string()
        } else {
            reminder.details.clone()
        };
        NotificationRequest {
            title: reminder.title.clone(),
            body,
            icon: None,
            require_interaction: true,
            tag: format!("reminder-{}", reminder.id),
        }
    }

    /// Arm an exact-instant one-shot timer when the target is in the
    /// future and within the arming horizon. Best-effort: if the process
    /// exits before the instant, the periodic poll is the fallback.
    async fn arm_near_term(&self, reminder: &Reminder, now: NaiveDateTime) {
        let until = reminder.trigger_time - now;
        if until <= Duration::zero()
            || until >= Duration::seconds(config::NEAR_TERM_ARM_HORIZON_SECS)
        {
            return;
        }

        let delay = until.to_std().unwrap_or_default();
        let sink = Arc::clone(&self.sink);
        let armed = Arc::clone(&self.armed);
        let request = Self::request_for(reminder);
        let id = reminder.id;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sink.is_available() {
                sink.notify(request);
            }
            armed.lock().await.remove(&id);
        });

        if let Some(stale) = self.armed.lock().await.insert(id, handle) {
            stale.abort();
        }
        tracing::debug!("Armed near-term timer for reminder {}", id);
    }

    async fn cancel_armed(&self, id: i64) {
        if let Some(handle) = self.armed.lock().await.remove(&id) {
            handle.abort();
            tracing::debug!("Cancelled armed timer for reminder {}", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StateStore;
    use crate::store::RepeatPolicy;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    /// Sink that records every request it accepts
    #[derive(Default)]
    struct RecordingSink {
        available: std::sync::atomic::AtomicBool,
        delivered: std::sync::Mutex<Vec<NotificationRequest>>,
    }

    impl RecordingSink {
        fn available() -> Self {
            let sink = Self::default();
            sink.available.store(true, std::sync::atomic::Ordering::SeqCst);
            sink
        }

        fn unavailable() -> Self {
            Self::default()
        }

        fn delivered(&self) -> Vec<NotificationRequest> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn is_available(&self) -> bool {
            self.available.load(std::sync::atomic::Ordering::SeqCst)
        }

        fn notify(&self, request: NotificationRequest) {
            self.delivered.lock().unwrap().push(request);
        }
    }

    async fn create_test_service(
        sink: RecordingSink,
    ) -> (RemindersService, Arc<RecordingSink>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path().join("lifetracker.json"));
        let repo = Repository::open(store).await.unwrap();
        let sink = Arc::new(sink);
        let service = RemindersService::new(repo, Arc::clone(&sink) as Arc<dyn NotificationSink>);
        (service, sink, temp_dir)
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn request(repeat: RepeatPolicy, trigger_time: NaiveDateTime) -> CreateReminderRequest {
        CreateReminderRequest {
            title: "Grade 9 Class".to_string(),
            details: "Room 204, Topic: Algebra".to_string(),
            trigger_time,
            repeat,
        }
    }

    #[tokio::test]
    async fn test_create_reminder_requires_title() {
        let (service, _sink, _temp) = create_test_service(RecordingSink::available()).await;

        let result = service
            .create_reminder(CreateReminderRequest {
                title: " ".to_string(),
                details: String::new(),
                trigger_time: at(2026, 2, 8, 7, 0),
                repeat: RepeatPolicy::Once,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list_reminders().await.is_empty());
    }

    #[tokio::test]
    async fn test_poll_fires_daily_and_advances_one_day() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        let reminder = service
            .create_reminder(request(RepeatPolicy::Daily, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        service.poll(at(2026, 2, 8, 7, 0)).await.unwrap();

        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Grade 9 Class");
        assert_eq!(delivered[0].tag, format!("reminder-{}", reminder.id));

        let after = &service.list_reminders().await[0];
        assert!(after.active);
        assert_eq!(after.trigger_time, at(2026, 2, 9, 7, 0));
    }

    #[tokio::test]
    async fn test_poll_fires_weekly_and_advances_seven_days() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        service
            .create_reminder(request(RepeatPolicy::Weekly, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        service.poll(at(2026, 2, 8, 7, 0)).await.unwrap();

        assert_eq!(sink.delivered().len(), 1);
        let after = &service.list_reminders().await[0];
        assert!(after.active);
        assert_eq!(after.trigger_time, at(2026, 2, 15, 7, 0));
    }

    #[tokio::test]
    async fn test_poll_deactivates_once_reminder() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        service
            .create_reminder(request(RepeatPolicy::Once, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        service.poll(at(2026, 2, 8, 7, 0)).await.unwrap();

        assert_eq!(sink.delivered().len(), 1);
        let after = &service.list_reminders().await[0];
        assert!(!after.active);
        assert_eq!(after.trigger_time, at(2026, 2, 8, 7, 0));
    }

    #[tokio::test]
    async fn test_fired_reminder_is_not_refired_by_next_poll() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        service
            .create_reminder(request(RepeatPolicy::Daily, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        service.poll(at(2026, 2, 8, 7, 0)).await.unwrap();
        service.poll(at(2026, 2, 8, 7, 1)).await.unwrap();

        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_outside_window_never_alerts_late() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        service
            .create_reminder(request(RepeatPolicy::Daily, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        // Two minutes late with a 60 second window: missed
        service.poll(at(2026, 2, 8, 7, 2)).await.unwrap();

        assert!(sink.delivered().is_empty());
        // The repeating schedule recovers at the next future occurrence
        let after = &service.list_reminders().await[0];
        assert!(after.active);
        assert_eq!(after.trigger_time, at(2026, 2, 9, 7, 0));
    }

    #[tokio::test]
    async fn test_missed_once_reminder_is_skipped_permanently() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        service
            .create_reminder(request(RepeatPolicy::Once, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        service.poll(at(2026, 2, 9, 12, 0)).await.unwrap();

        assert!(sink.delivered().is_empty());
        let after = &service.list_reminders().await[0];
        assert!(!after.active);
        assert_eq!(after.trigger_time, at(2026, 2, 8, 7, 0));
    }

    #[tokio::test]
    async fn test_poll_ignores_inactive_reminders() {
        let (service, sink, _temp) = create_test_service(RecordingSink::available()).await;
        let reminder = service
            .create_reminder(request(RepeatPolicy::Daily, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();
        service
            .update_reminder(
                reminder.id,
                UpdateReminderRequest {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        service.poll(at(2026, 2, 8, 7, 0)).await.unwrap();

        assert!(sink.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_rollover_runs_when_channel_unavailable() {
        let (service, sink, _temp) = create_test_service(RecordingSink::unavailable()).await;
        service
            .create_reminder(request(RepeatPolicy::Daily, at(2026, 2, 8, 7, 0)))
            .await
            .unwrap();

        service.poll(at(2026, 2, 8, 7, 0)).await.unwrap();

        // No alert went out, but the schedule still advanced
        assert!(sink.delivered().is_empty());
        let after = &service.list_reminders().await[0];
        assert_eq!(after.trigger_time, at(2026, 2, 9, 7, 0));
    }

    #[tokio::test]
    async fn test_near_term_timer_armed_and_cancelled_on_remove() {
        let (service, _sink, _temp) = create_test_service(RecordingSink::available()).await;

        let soon = Local::now().naive_local() + Duration::minutes(30);
        let reminder = service
            .create_reminder(request(RepeatPolicy::Once, soon))
            .await
            .unwrap();

        assert!(service.armed.lock().await.contains_key(&reminder.id));

        service.remove_reminder(reminder.id).await.unwrap();

        assert!(service.armed.lock().await.is_empty());
        assert!(service.list_reminders().await.is_empty());
    }

    #[tokio::test]
    async fn test_far_future_target_is_not_armed() {
        let (service, _sink, _temp) = create_test_service(RecordingSink::available()).await;

        let far = Local::now().naive_local() + Duration::hours(48);
        let reminder = service
            .create_reminder(request(RepeatPolicy::Weekly, far))
            .await
            .unwrap();

        assert!(!service.armed.lock().await.contains_key(&reminder.id));
    }

    #[tokio::test]
    async fn test_update_rearms_from_new_target() {
        let (service, _sink, _temp) = create_test_service(RecordingSink::available()).await;

        let soon = Local::now().naive_local() + Duration::minutes(30);
        let reminder = service
            .create_reminder(request(RepeatPolicy::Once, soon))
            .await
            .unwrap();

        // Pushing the target outside the horizon drops the armed timer
        service
            .update_reminder(
                reminder.id,
                UpdateReminderRequest {
                    trigger_time: Some(Local::now().naive_local() + Duration::hours(48)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!service.armed.lock().await.contains_key(&reminder.id));
    }
}
