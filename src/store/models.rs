//! Store models
//!
//! Rust structs representing every tracked entity. All models use serde
//! so the whole state tree serializes into the snapshot file.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar-day key for the daily checklist stores.
///
/// Wraps the wall-clock date so every call site derives the key the same
/// way. Compute it once per logical operation and pass it down: computing
/// it twice across a midnight boundary could split one user action over
/// two day entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Today according to the local wall clock
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Daily habit checklist fields
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HabitField {
    Wakeup,
    Water,
    Veg,
    Exercise,
}

impl HabitField {
    pub const ALL: [HabitField; 4] = [
        HabitField::Wakeup,
        HabitField::Water,
        HabitField::Veg,
        HabitField::Exercise,
    ];
}

/// Daily prayer checklist fields
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PrayerField {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Tahajjud,
}

impl PrayerField {
    pub const ALL: [PrayerField; 6] = [
        PrayerField::Fajr,
        PrayerField::Dhuhr,
        PrayerField::Asr,
        PrayerField::Maghrib,
        PrayerField::Isha,
        PrayerField::Tahajjud,
    ];
}

/// Daily Ramadan checklist fields
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RamadanField {
    Fasting,
    Suhoor,
    Iftar,
}

impl RamadanField {
    pub const ALL: [RamadanField; 3] = [
        RamadanField::Fasting,
        RamadanField::Suhoor,
        RamadanField::Iftar,
    ];
}

/// Categories backed by the shared to-do item schema
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Education,
    Visa,
    License,
    School,
    Video,
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskCategory::Education => "education",
            TaskCategory::Visa => "visa",
            TaskCategory::License => "license",
            TaskCategory::School => "school",
            TaskCategory::Video => "video",
        };
        write!(f, "{}", name)
    }
}

/// A to-do style item (education, visa, license, school, video)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// School days available for lesson planning
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LessonDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

/// A planned lesson with a weekday and teaching period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub id: i64,
    pub day: LessonDay,
    pub period: u8,
    pub title: String,
    #[serde(default)]
    pub details: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A free-form dated health note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthNote {
    pub id: i64,
    pub note: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A single weight measurement in kilograms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub weight: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Memorization/reading progress for one surah
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurahRecord {
    pub id: i64,
    pub surah: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// How a reminder's target advances after it fires
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPolicy {
    Once,
    Daily,
    Weekly,
}

impl RepeatPolicy {
    /// Interval between occurrences, or None for one-shot reminders
    pub fn interval(self) -> Option<Duration> {
        match self {
            RepeatPolicy::Once => None,
            RepeatPolicy::Daily => Some(Duration::days(1)),
            RepeatPolicy::Weekly => Some(Duration::days(7)),
        }
    }
}

/// A scheduled reminder with a repeat policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub details: String,
    /// Wall-clock target; time of day is preserved across rollovers
    pub trigger_time: NaiveDateTime,
    pub repeat: RepeatPolicy,
    pub active: bool,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Apply the repeat policy after an on-time firing: one-shot reminders
    /// deactivate, repeating reminders advance by exactly one interval.
    pub fn roll_forward(&mut self) {
        match self.repeat.interval() {
            None => self.active = false,
            Some(interval) => self.trigger_time = self.trigger_time + interval,
        }
    }

    /// Recover from a target that fell outside the due window. One-shot
    /// reminders deactivate without firing; repeating reminders advance to
    /// the first occurrence after `now` so the schedule stays on time.
    pub fn catch_up(&mut self, now: NaiveDateTime) {
        match self.repeat.interval() {
            None => self.active = false,
            Some(interval) => {
                while self.trigger_time <= now {
                    self.trigger_time = self.trigger_time + interval;
                }
            }
        }
    }
}

// ===== Request types =====

/// Create request for to-do style items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Update request for to-do style items; None fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLessonRequest {
    pub day: LessonDay,
    pub period: u8,
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLessonRequest {
    pub day: Option<LessonDay>,
    pub period: Option<u8>,
    pub title: Option<String>,
    pub details: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateHealthNoteRequest {
    pub note: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWeightRequest {
    pub weight: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSurahRequest {
    pub surah: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSurahRequest {
    pub surah: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReminderRequest {
    pub title: String,
    #[serde(default)]
    pub details: String,
    pub trigger_time: NaiveDateTime,
    pub repeat: RepeatPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReminderRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    pub trigger_time: Option<NaiveDateTime>,
    pub repeat: Option<RepeatPolicy>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn reminder(repeat: RepeatPolicy, trigger_time: NaiveDateTime) -> Reminder {
        Reminder {
            id: 1,
            title: "Grade 9 Class".to_string(),
            details: "Room 204".to_string(),
            trigger_time,
            repeat,
            active: true,
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_day_key_format() {
        let key = DayKey::from_date(NaiveDate::from_ymd_opt(2026, 2, 8).unwrap());
        assert_eq!(key.to_string(), "2026-02-08");
    }

    #[test]
    fn test_roll_forward_daily_preserves_time_of_day() {
        let mut r = reminder(RepeatPolicy::Daily, at(2026, 2, 8, 7, 0));
        r.roll_forward();
        assert!(r.active);
        assert_eq!(r.trigger_time, at(2026, 2, 9, 7, 0));
    }

    #[test]
    fn test_roll_forward_weekly() {
        let mut r = reminder(RepeatPolicy::Weekly, at(2026, 2, 8, 7, 0));
        r.roll_forward();
        assert!(r.active);
        assert_eq!(r.trigger_time, at(2026, 2, 15, 7, 0));
    }

    #[test]
    fn test_roll_forward_once_deactivates() {
        let mut r = reminder(RepeatPolicy::Once, at(2026, 2, 8, 7, 0));
        r.roll_forward();
        assert!(!r.active);
        assert_eq!(r.trigger_time, at(2026, 2, 8, 7, 0));
    }

    #[test]
    fn test_catch_up_advances_past_now() {
        let mut r = reminder(RepeatPolicy::Daily, at(2026, 2, 1, 7, 0));
        r.catch_up(at(2026, 2, 8, 12, 0));
        assert!(r.active);
        assert_eq!(r.trigger_time, at(2026, 2, 9, 7, 0));
    }

    #[test]
    fn test_catch_up_once_deactivates() {
        let mut r = reminder(RepeatPolicy::Once, at(2026, 2, 1, 7, 0));
        r.catch_up(at(2026, 2, 8, 12, 0));
        assert!(!r.active);
        assert_eq!(r.trigger_time, at(2026, 2, 1, 7, 0));
    }

    #[test]
    fn test_repeat_policy_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RepeatPolicy::Weekly).unwrap(), "\"weekly\"");
        let parsed: RepeatPolicy = serde_json::from_str("\"once\"").unwrap();
        assert_eq!(parsed, RepeatPolicy::Once);
    }

    #[test]
    fn test_lesson_day_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LessonDay::Wed).unwrap(), "\"WED\"");
    }
}
