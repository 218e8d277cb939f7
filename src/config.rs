//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the application.

// ===== Persistence =====

/// File name of the whole-state snapshot inside the app data directory
pub const STATE_FILE_NAME: &str = "lifetracker.json";

// ===== Reminder Scheduler =====

/// How often the scheduler polls for due reminders, in seconds.
/// The due window must never be narrower than this interval, otherwise
/// a reminder can fall between two polls and never fire.
pub const REMINDER_POLL_INTERVAL_SECS: u64 = 60;

/// Horizon within which a freshly created or edited reminder gets an
/// exact-instant one-shot timer in addition to the periodic poll (24 hours)
pub const NEAR_TERM_ARM_HORIZON_SECS: i64 = 24 * 60 * 60;

// ===== Weight Log =====

/// Maximum number of entries returned by the most-recent-first weight view
pub const WEIGHT_HISTORY_DISPLAY_LIMIT: usize = 15;

// ===== Lesson Plans =====

/// First teaching period of the school day
pub const LESSON_PERIOD_MIN: u8 = 1;

/// Last teaching period of the school day
pub const LESSON_PERIOD_MAX: u8 = 7;
