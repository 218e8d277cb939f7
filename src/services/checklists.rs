//! Daily checklist service
//!
//! Habits, prayers and Ramadan tracking all share the same shape: a
//! per-calendar-day set of boolean fields. There is no reset operation;
//! the day key changes at midnight and the new day simply reads empty.
//!
//! Each operation computes its [`DayKey`] exactly once and passes it
//! down, so a write landing just after midnight cannot split across two
//! day entries.

use crate::error::Result;
use crate::store::{DayKey, HabitField, PrayerField, RamadanField, Repository};
use std::collections::BTreeMap;

/// Service for the per-day boolean checklists
#[derive(Clone)]
pub struct ChecklistsService {
    repo: Repository,
}

impl ChecklistsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn set_habit(&self, field: HabitField, value: bool) -> Result<()> {
        let today = DayKey::today();
        tracing::debug!("Habit {:?} = {} on {}", field, value, today);
        self.repo.set_habit(today, field, value).await
    }

    /// Today's habit checklist; fields never touched today are absent
    /// and read as unchecked.
    pub async fn today_habits(&self) -> BTreeMap<HabitField, bool> {
        self.repo.habits_on(DayKey::today()).await
    }

    pub async fn set_prayer(&self, field: PrayerField, value: bool) -> Result<()> {
        let today = DayKey::today();
        tracing::debug!("Prayer {:?} = {} on {}", field, value, today);
        self.repo.set_prayer(today, field, value).await
    }

    pub async fn today_prayers(&self) -> BTreeMap<PrayerField, bool> {
        self.repo.prayers_on(DayKey::today()).await
    }

    pub async fn set_ramadan(&self, field: RamadanField, value: bool) -> Result<()> {
        let today = DayKey::today();
        tracing::debug!("Ramadan {:?} = {} on {}", field, value, today);
        self.repo.set_ramadan(today, field, value).await
    }

    pub async fn today_ramadan(&self) -> BTreeMap<RamadanField, bool> {
        self.repo.ramadan_on(DayKey::today()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StateStore;
    use tempfile::TempDir;

    async fn create_test_service() -> (ChecklistsService, Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path().join("lifetracker.json"));
        let repo = Repository::open(store).await.unwrap();
        (ChecklistsService::new(repo.clone()), repo, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_read_today() {
        let (service, _repo, _temp) = create_test_service().await;

        service.set_prayer(PrayerField::Fajr, true).await.unwrap();

        let prayers = service.today_prayers().await;
        assert_eq!(prayers.get(&PrayerField::Fajr), Some(&true));
        assert_eq!(prayers.get(&PrayerField::Isha), None);
    }

    #[tokio::test]
    async fn test_unchecking_keeps_entry() {
        let (service, _repo, _temp) = create_test_service().await;

        service.set_habit(HabitField::Exercise, true).await.unwrap();
        service.set_habit(HabitField::Exercise, false).await.unwrap();

        let habits = service.today_habits().await;
        assert_eq!(habits.get(&HabitField::Exercise), Some(&false));
    }

    #[tokio::test]
    async fn test_full_day_of_prayers() {
        let (service, _repo, _temp) = create_test_service().await;

        for field in PrayerField::ALL {
            service.set_prayer(field, true).await.unwrap();
        }

        let prayers = service.today_prayers().await;
        assert_eq!(prayers.len(), PrayerField::ALL.len());
        assert!(prayers.values().all(|checked| *checked));
    }

    #[tokio::test]
    async fn test_all_stores_are_independent() {
        let (service, _repo, _temp) = create_test_service().await;

        service.set_habit(HabitField::Water, true).await.unwrap();
        service.set_ramadan(RamadanField::Suhoor, true).await.unwrap();

        assert!(service.today_prayers().await.is_empty());
        assert_eq!(service.today_habits().await.len(), 1);
        assert_eq!(service.today_ramadan().await.len(), 1);
    }
}
