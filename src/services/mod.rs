//! Services module
//!
//! Business logic services that coordinate between callers and the
//! repository: input validation, daily checklists, reminder scheduling
//! and notification dispatch.

pub mod checklists;
pub mod items;
pub mod notifications;
pub mod reminders;

pub use checklists::ChecklistsService;
pub use items::ItemsService;
pub use notifications::{LogSink, NotificationRequest, NotificationSink};
pub use reminders::RemindersService;
