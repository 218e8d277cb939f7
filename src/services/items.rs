//! Item collections service
//!
//! High-level CRUD for every non-reminder collection. Validates form
//! input (required fields, bounds) before any mutation reaches the
//! repository, so a rejected request leaves no partial state behind.

use crate::config;
use crate::error::{AppError, Result};
use crate::store::{
    CreateHealthNoteRequest, CreateLessonRequest, CreateSurahRequest, CreateTaskRequest,
    CreateWeightRequest, HealthNote, LessonPlan, Repository, SurahRecord, TaskCategory, TaskItem,
    UpdateLessonRequest, UpdateSurahRequest, UpdateTaskRequest, WeightEntry,
};

fn required(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", what)));
    }
    Ok(trimmed.to_string())
}

fn check_period(period: u8) -> Result<()> {
    if !(config::LESSON_PERIOD_MIN..=config::LESSON_PERIOD_MAX).contains(&period) {
        return Err(AppError::Validation(format!(
            "period must be between {} and {}",
            config::LESSON_PERIOD_MIN,
            config::LESSON_PERIOD_MAX
        )));
    }
    Ok(())
}

/// Service for managing tracked items
#[derive(Clone)]
pub struct ItemsService {
    repo: Repository,
}

impl ItemsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    // ===== To-do style items =====

    pub async fn add_task(
        &self,
        category: TaskCategory,
        mut req: CreateTaskRequest,
    ) -> Result<TaskItem> {
        req.title = required(&req.title, "title")?;
        req.details = req.details.trim().to_string();

        tracing::info!("Adding {} item: {}", category, req.title);
        self.repo.add_task(category, req).await
    }

    pub async fn update_task(
        &self,
        category: TaskCategory,
        id: i64,
        mut req: UpdateTaskRequest,
    ) -> Result<TaskItem> {
        if let Some(title) = req.title.take() {
            req.title = Some(required(&title, "title")?);
        }
        self.repo.update_task(category, id, req).await
    }

    pub async fn toggle_task(&self, category: TaskCategory, id: i64) -> Result<TaskItem> {
        self.repo.toggle_task(category, id).await
    }

    pub async fn remove_task(&self, category: TaskCategory, id: i64) -> Result<()> {
        self.repo.remove_task(category, id).await
    }

    pub async fn list_tasks(&self, category: TaskCategory) -> Vec<TaskItem> {
        self.repo.list_tasks(category).await
    }

    // ===== Lesson plans =====

    pub async fn add_lesson(&self, mut req: CreateLessonRequest) -> Result<LessonPlan> {
        req.title = required(&req.title, "title")?;
        req.details = req.details.trim().to_string();
        check_period(req.period)?;

        tracing::info!("Adding lesson plan: {}", req.title);
        self.repo.add_lesson(req).await
    }

    pub async fn update_lesson(&self, id: i64, mut req: UpdateLessonRequest) -> Result<LessonPlan> {
        if let Some(title) = req.title.take() {
            req.title = Some(required(&title, "title")?);
        }
        if let Some(period) = req.period {
            check_period(period)?;
        }
        self.repo.update_lesson(id, req).await
    }

    pub async fn toggle_lesson(&self, id: i64) -> Result<LessonPlan> {
        self.repo.toggle_lesson(id).await
    }

    pub async fn remove_lesson(&self, id: i64) -> Result<()> {
        self.repo.remove_lesson(id).await
    }

    pub async fn list_lessons(&self) -> Vec<LessonPlan> {
        self.repo.list_lessons().await
    }

    // ===== Health notes =====

    pub async fn add_health_note(&self, mut req: CreateHealthNoteRequest) -> Result<HealthNote> {
        req.note = required(&req.note, "note")?;

        tracing::info!("Adding health note");
        self.repo.add_health_note(req).await
    }

    pub async fn remove_health_note(&self, id: i64) -> Result<()> {
        self.repo.remove_health_note(id).await
    }

    pub async fn list_health_notes(&self) -> Vec<HealthNote> {
        self.repo.list_health_notes().await
    }

    // ===== Weight log =====

    pub async fn add_weight(&self, req: CreateWeightRequest) -> Result<WeightEntry> {
        if !req.weight.is_finite() || req.weight <= 0.0 {
            return Err(AppError::Validation(
                "weight must be a positive number".to_string(),
            ));
        }

        tracing::info!("Adding weight entry: {} kg on {}", req.weight, req.date);
        self.repo.add_weight(req).await
    }

    pub async fn remove_weight(&self, id: i64) -> Result<()> {
        self.repo.remove_weight(id).await
    }

    pub async fn list_weights(&self) -> Vec<WeightEntry> {
        self.repo.list_weights().await
    }

    pub async fn list_weights_recent_first(&self) -> Vec<WeightEntry> {
        self.repo.list_weights_recent_first().await
    }

    // ===== Quran tracking =====

    pub async fn add_surah(&self, mut req: CreateSurahRequest) -> Result<SurahRecord> {
        req.surah = required(&req.surah, "surah name")?;
        req.details = req.details.trim().to_string();

        tracing::info!("Adding surah record: {}", req.surah);
        self.repo.add_surah(req).await
    }

    pub async fn update_surah(&self, id: i64, mut req: UpdateSurahRequest) -> Result<SurahRecord> {
        if let Some(surah) = req.surah.take() {
            req.surah = Some(required(&surah, "surah name")?);
        }
        self.repo.update_surah(id, req).await
    }

    pub async fn remove_surah(&self, id: i64) -> Result<()> {
        self.repo.remove_surah(id).await
    }

    pub async fn list_surahs(&self) -> Vec<SurahRecord> {
        self.repo.list_surahs().await
    }
}
