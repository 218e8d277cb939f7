//! Root application state
//!
//! The whole tracked world lives in one aggregate, grouped into four
//! domains and serialized wholesale into the snapshot file. Every field
//! carries a serde default so snapshots written by older builds still load.

use super::models::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-calendar-day boolean checklist, keyed by [`DayKey`].
///
/// A day with no entry reads as all fields unchecked, which is also the
/// daily reset: no entry is ever deleted, yesterday's keys are simply
/// never consulted for today.
pub type DailyChecklist<F> = BTreeMap<DayKey, BTreeMap<F, bool>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalDomain {
    #[serde(default)]
    pub education: Vec<TaskItem>,
    #[serde(default)]
    pub visa: Vec<TaskItem>,
    #[serde(default)]
    pub license: Vec<TaskItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthDomain {
    #[serde(default)]
    pub habits: DailyChecklist<HabitField>,
    #[serde(default)]
    pub notes: Vec<HealthNote>,
    #[serde(default)]
    pub weight: Vec<WeightEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReligiousDomain {
    #[serde(default)]
    pub prayers: DailyChecklist<PrayerField>,
    #[serde(default)]
    pub quran: Vec<SurahRecord>,
    #[serde(default)]
    pub ramadan: DailyChecklist<RamadanField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalDomain {
    #[serde(default)]
    pub school: Vec<TaskItem>,
    #[serde(default)]
    pub video: Vec<TaskItem>,
    #[serde(default)]
    pub lessons: Vec<LessonPlan>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

/// Root aggregate owning every collection and daily store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub personal: PersonalDomain,
    #[serde(default)]
    pub health: HealthDomain,
    #[serde(default)]
    pub religious: ReligiousDomain,
    #[serde(default)]
    pub professional: ProfessionalDomain,
}

impl AppState {
    /// Collection backing a to-do style category
    pub fn tasks(&self, category: TaskCategory) -> &Vec<TaskItem> {
        match category {
            TaskCategory::Education => &self.personal.education,
            TaskCategory::Visa => &self.personal.visa,
            TaskCategory::License => &self.personal.license,
            TaskCategory::School => &self.professional.school,
            TaskCategory::Video => &self.professional.video,
        }
    }

    pub fn tasks_mut(&mut self, category: TaskCategory) -> &mut Vec<TaskItem> {
        match category {
            TaskCategory::Education => &mut self.personal.education,
            TaskCategory::Visa => &mut self.personal.visa,
            TaskCategory::License => &mut self.personal.license,
            TaskCategory::School => &mut self.professional.school,
            TaskCategory::Video => &mut self.professional.video,
        }
    }

    /// Highest identifier present in any collection; seeds the id
    /// generator so a reloaded snapshot never reissues an id.
    pub fn max_id(&self) -> i64 {
        let task_ids = [
            TaskCategory::Education,
            TaskCategory::Visa,
            TaskCategory::License,
            TaskCategory::School,
            TaskCategory::Video,
        ]
        .into_iter()
        .flat_map(|c| self.tasks(c).iter().map(|t| t.id));

        task_ids
            .chain(self.professional.lessons.iter().map(|l| l.id))
            .chain(self.professional.reminders.iter().map(|r| r.id))
            .chain(self.health.notes.iter().map(|n| n.id))
            .chain(self.health.weight.iter().map(|w| w.id))
            .chain(self.religious.quran.iter().map(|s| s.id))
            .max()
            .unwrap_or(0)
    }
}
