//! Repository layer for state mutations
//!
//! All reads and writes to the application state go through here. The
//! state lives behind one RwLock shared by user-driven calls and the
//! scheduler task, and every mutation persists the full snapshot before
//! releasing the write guard.

use super::models::*;
use super::state::AppState;
use crate::config;
use crate::error::{AppError, Result};
use crate::storage::StateStore;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

fn find_mut<T>(items: &mut [T], id: i64, id_of: fn(&T) -> i64) -> Result<&mut T> {
    items
        .iter_mut()
        .find(|item| id_of(item) == id)
        .ok_or(AppError::NotFound(id))
}

/// Repository owning the state tree and its persistence
#[derive(Clone)]
pub struct Repository {
    state: Arc<RwLock<AppState>>,
    store: StateStore,
    last_id: Arc<AtomicI64>,
}

impl Repository {
    /// Load the persisted snapshot (or start empty) and seed the id
    /// generator from the highest identifier already in use.
    pub async fn open(store: StateStore) -> Result<Self> {
        store.initialize().await?;
        let state = store.load().await;
        let last_id = state.max_id();

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            store,
            last_id: Arc::new(AtomicI64::new(last_id)),
        })
    }

    /// Allocate a process-unique identifier: creation timestamp in
    /// milliseconds, bumped past the previous id on collision so ids stay
    /// strictly monotonic.
    fn alloc_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(last.max(now - 1) + 1)
            })
            .map(|last| last.max(now - 1) + 1)
            .unwrap_or(now)
    }

    /// Current state snapshot, for whole-tree inspection in tests and
    /// export-style callers.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    // ===== To-do style items =====

    pub async fn add_task(
        &self,
        category: TaskCategory,
        req: CreateTaskRequest,
    ) -> Result<TaskItem> {
        let item = TaskItem {
            id: self.alloc_id(),
            title: req.title,
            details: req.details,
            deadline: req.deadline,
            completed: false,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.tasks_mut(category).push(item.clone());
        self.store.save(&state).await?;

        tracing::debug!("Created {} item: {}", category, item.id);
        Ok(item)
    }

    pub async fn update_task(
        &self,
        category: TaskCategory,
        id: i64,
        req: UpdateTaskRequest,
    ) -> Result<TaskItem> {
        let mut state = self.state.write().await;
        let item = find_mut(state.tasks_mut(category), id, |t| t.id)?;

        if let Some(title) = req.title {
            item.title = title;
        }
        if let Some(details) = req.details {
            item.details = details;
        }
        if let Some(deadline) = req.deadline {
            item.deadline = Some(deadline);
        }
        let updated = item.clone();
        self.store.save(&state).await?;

        tracing::debug!("Updated {} item: {}", category, id);
        Ok(updated)
    }

    pub async fn toggle_task(&self, category: TaskCategory, id: i64) -> Result<TaskItem> {
        let mut state = self.state.write().await;
        let item = find_mut(state.tasks_mut(category), id, |t| t.id)?;
        item.completed = !item.completed;
        let updated = item.clone();
        self.store.save(&state).await?;
        Ok(updated)
    }

    /// Remove by id; absent ids are a no-op (idempotent delete)
    pub async fn remove_task(&self, category: TaskCategory, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let items = state.tasks_mut(category);
        let before = items.len();
        items.retain(|t| t.id != id);

        if items.len() == before {
            return Ok(());
        }
        self.store.save(&state).await?;

        tracing::debug!("Removed {} item: {}", category, id);
        Ok(())
    }

    pub async fn list_tasks(&self, category: TaskCategory) -> Vec<TaskItem> {
        self.state.read().await.tasks(category).clone()
    }

    // ===== Lesson plans =====

    pub async fn add_lesson(&self, req: CreateLessonRequest) -> Result<LessonPlan> {
        let lesson = LessonPlan {
            id: self.alloc_id(),
            day: req.day,
            period: req.period,
            title: req.title,
            details: req.details,
            date: req.date.unwrap_or_else(|| DayKey::today().date()),
            completed: false,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.professional.lessons.push(lesson.clone());
        self.store.save(&state).await?;

        tracing::debug!("Created lesson plan: {}", lesson.id);
        Ok(lesson)
    }

    pub async fn update_lesson(&self, id: i64, req: UpdateLessonRequest) -> Result<LessonPlan> {
        let mut state = self.state.write().await;
        let lesson = find_mut(&mut state.professional.lessons, id, |l| l.id)?;

        if let Some(day) = req.day {
            lesson.day = day;
        }
        if let Some(period) = req.period {
            lesson.period = period;
        }
        if let Some(title) = req.title {
            lesson.title = title;
        }
        if let Some(details) = req.details {
            lesson.details = details;
        }
        if let Some(date) = req.date {
            lesson.date = date;
        }
        let updated = lesson.clone();
        self.store.save(&state).await?;

        tracing::debug!("Updated lesson plan: {}", id);
        Ok(updated)
    }

    pub async fn toggle_lesson(&self, id: i64) -> Result<LessonPlan> {
        let mut state = self.state.write().await;
        let lesson = find_mut(&mut state.professional.lessons, id, |l| l.id)?;
        lesson.completed = !lesson.completed;
        let updated = lesson.clone();
        self.store.save(&state).await?;
        Ok(updated)
    }

    pub async fn remove_lesson(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.professional.lessons.len();
        state.professional.lessons.retain(|l| l.id != id);

        if state.professional.lessons.len() == before {
            return Ok(());
        }
        self.store.save(&state).await?;
        Ok(())
    }

    pub async fn list_lessons(&self) -> Vec<LessonPlan> {
        self.state.read().await.professional.lessons.clone()
    }

    // ===== Health notes =====

    pub async fn add_health_note(&self, req: CreateHealthNoteRequest) -> Result<HealthNote> {
        let note = HealthNote {
            id: self.alloc_id(),
            note: req.note,
            date: req.date.unwrap_or_else(|| DayKey::today().date()),
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.health.notes.push(note.clone());
        self.store.save(&state).await?;

        tracing::debug!("Created health note: {}", note.id);
        Ok(note)
    }

    pub async fn remove_health_note(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.health.notes.len();
        state.health.notes.retain(|n| n.id != id);

        if state.health.notes.len() == before {
            return Ok(());
        }
        self.store.save(&state).await?;
        Ok(())
    }

    pub async fn list_health_notes(&self) -> Vec<HealthNote> {
        self.state.read().await.health.notes.clone()
    }

    // ===== Weight log =====

    pub async fn add_weight(&self, req: CreateWeightRequest) -> Result<WeightEntry> {
        let entry = WeightEntry {
            id: self.alloc_id(),
            weight: req.weight,
            date: req.date,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.health.weight.push(entry.clone());
        self.store.save(&state).await?;

        tracing::debug!("Created weight entry: {}", entry.id);
        Ok(entry)
    }

    pub async fn remove_weight(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.health.weight.len();
        state.health.weight.retain(|w| w.id != id);

        if state.health.weight.len() == before {
            return Ok(());
        }
        self.store.save(&state).await?;
        Ok(())
    }

    /// Insertion-ordered weight log
    pub async fn list_weights(&self) -> Vec<WeightEntry> {
        self.state.read().await.health.weight.clone()
    }

    /// Most-recent-first weight view, capped for display
    pub async fn list_weights_recent_first(&self) -> Vec<WeightEntry> {
        let mut entries = self.state.read().await.health.weight.clone();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(config::WEIGHT_HISTORY_DISPLAY_LIMIT);
        entries
    }

    // ===== Quran tracking =====

    pub async fn add_surah(&self, req: CreateSurahRequest) -> Result<SurahRecord> {
        let record = SurahRecord {
            id: self.alloc_id(),
            surah: req.surah,
            details: req.details,
            completed: false,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.religious.quran.push(record.clone());
        self.store.save(&state).await?;

        tracing::debug!("Created surah record: {}", record.id);
        Ok(record)
    }

    pub async fn update_surah(&self, id: i64, req: UpdateSurahRequest) -> Result<SurahRecord> {
        let mut state = self.state.write().await;
        let record = find_mut(&mut state.religious.quran, id, |s| s.id)?;

        if let Some(surah) = req.surah {
            record.surah = surah;
        }
        if let Some(details) = req.details {
            record.details = details;
        }
        let updated = record.clone();
        self.store.save(&state).await?;

        tracing::debug!("Updated surah record: {}", id);
        Ok(updated)
    }

    pub async fn remove_surah(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.religious.quran.len();
        state.religious.quran.retain(|s| s.id != id);

        if state.religious.quran.len() == before {
            return Ok(());
        }
        self.store.save(&state).await?;
        Ok(())
    }

    pub async fn list_surahs(&self) -> Vec<SurahRecord> {
        self.state.read().await.religious.quran.clone()
    }

    // ===== Daily checklists =====

    pub async fn set_habit(&self, day: DayKey, field: HabitField, value: bool) -> Result<()> {
        let mut state = self.state.write().await;
        state.health.habits.entry(day).or_default().insert(field, value);
        self.store.save(&state).await?;
        Ok(())
    }

    /// Habit checklist for the given day; absent day reads as empty
    pub async fn habits_on(&self, day: DayKey) -> BTreeMap<HabitField, bool> {
        self.state
            .read()
            .await
            .health
            .habits
            .get(&day)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_prayer(&self, day: DayKey, field: PrayerField, value: bool) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .religious
            .prayers
            .entry(day)
            .or_default()
            .insert(field, value);
        self.store.save(&state).await?;
        Ok(())
    }

    pub async fn prayers_on(&self, day: DayKey) -> BTreeMap<PrayerField, bool> {
        self.state
            .read()
            .await
            .religious
            .prayers
            .get(&day)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_ramadan(&self, day: DayKey, field: RamadanField, value: bool) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .religious
            .ramadan
            .entry(day)
            .or_default()
            .insert(field, value);
        self.store.save(&state).await?;
        Ok(())
    }

    pub async fn ramadan_on(&self, day: DayKey) -> BTreeMap<RamadanField, bool> {
        self.state
            .read()
            .await
            .religious
            .ramadan
            .get(&day)
            .cloned()
            .unwrap_or_default()
    }

    // ===== Reminders =====

    pub async fn add_reminder(&self, req: CreateReminderRequest) -> Result<Reminder> {
        let reminder = Reminder {
            id: self.alloc_id(),
            title: req.title,
            details: req.details,
            trigger_time: req.trigger_time,
            repeat: req.repeat,
            active: true,
            completed: false,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.professional.reminders.push(reminder.clone());
        self.store.save(&state).await?;

        tracing::debug!("Created reminder: {}", reminder.id);
        Ok(reminder)
    }

    pub async fn update_reminder(&self, id: i64, req: UpdateReminderRequest) -> Result<Reminder> {
        let mut state = self.state.write().await;
        let reminder = find_mut(&mut state.professional.reminders, id, |r| r.id)?;

        if let Some(title) = req.title {
            reminder.title = title;
        }
        if let Some(details) = req.details {
            reminder.details = details;
        }
        if let Some(trigger_time) = req.trigger_time {
            reminder.trigger_time = trigger_time;
        }
        if let Some(repeat) = req.repeat {
            reminder.repeat = repeat;
        }
        if let Some(active) = req.active {
            reminder.active = active;
        }
        let updated = reminder.clone();
        self.store.save(&state).await?;

        tracing::debug!("Updated reminder: {}", id);
        Ok(updated)
    }

    pub async fn toggle_reminder(&self, id: i64) -> Result<Reminder> {
        let mut state = self.state.write().await;
        let reminder = find_mut(&mut state.professional.reminders, id, |r| r.id)?;
        reminder.completed = !reminder.completed;
        let updated = reminder.clone();
        self.store.save(&state).await?;
        Ok(updated)
    }

    pub async fn remove_reminder(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.professional.reminders.len();
        state.professional.reminders.retain(|r| r.id != id);

        if state.professional.reminders.len() == before {
            return Ok(());
        }
        self.store.save(&state).await?;

        tracing::debug!("Removed reminder: {}", id);
        Ok(())
    }

    pub async fn list_reminders(&self) -> Vec<Reminder> {
        self.state.read().await.professional.reminders.clone()
    }

    pub async fn active_reminders(&self) -> Vec<Reminder> {
        self.state
            .read()
            .await
            .professional
            .reminders
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect()
    }

    /// Apply the repeat policy after an on-time firing and persist
    pub async fn roll_reminder_forward(&self, id: i64) -> Result<Reminder> {
        let mut state = self.state.write().await;
        let reminder = find_mut(&mut state.professional.reminders, id, |r| r.id)?;
        reminder.roll_forward();
        let updated = reminder.clone();
        self.store.save(&state).await?;
        Ok(updated)
    }

    /// Recover a reminder whose target fell outside the due window
    pub async fn catch_up_reminder(
        &self,
        id: i64,
        now: chrono::NaiveDateTime,
    ) -> Result<Reminder> {
        let mut state = self.state.write().await;
        let reminder = find_mut(&mut state.professional.reminders, id, |r| r.id)?;
        reminder.catch_up(now);
        let updated = reminder.clone();
        self.store.save(&state).await?;
        Ok(updated)
    }
}
