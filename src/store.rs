// src/store.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::errors::EngineError;
use crate::ledger_data::{
    EntryId, Holiday, HourEntry, Period, PeriodId, ProjectId, UserId, UserProfile,
};

/// Data-access collaborator the engine reads through. The engine owns no
/// persistence; a surrounding application supplies an implementation backed
/// by whatever storage it uses.
pub trait LedgerStore {
    /// Sum of hours over all of the user's entries on `date`, excluding the
    /// entry being edited when an id is supplied. Exact decimal arithmetic.
    fn total_hours_for_day(
        &self,
        user: &UserId,
        date: NaiveDate,
        excluding: Option<&EntryId>,
    ) -> Decimal;

    fn is_holiday(&self, user: &UserId, date: NaiveDate) -> bool;

    /// Whether an entry with the same user, date, project and description
    /// already exists (the bulk-creation de-duplication signal).
    fn entry_exists(
        &self,
        user: &UserId,
        date: NaiveDate,
        project: &ProjectId,
        description: &str,
    ) -> bool;

    fn periods_for(&self, user: &UserId) -> Vec<Period>;

    fn period(&self, id: &PeriodId) -> Option<Period>;

    fn profile(&self, user: &UserId) -> Option<UserProfile>;

    /// Activates `period_id` and deactivates every other period of the same
    /// user as one atomic unit, so that two concurrent activations can never
    /// leave two periods active. Fails with `PeriodNotOwned` when the period
    /// belongs to someone else and `UnknownPeriod` when it does not exist.
    fn activate_period(&self, user: &UserId, period_id: &PeriodId) -> Result<(), EngineError>;
}

/// In-memory implementation used by the tests and as the reference for the
/// invariants a real backend must uphold. A single mutex over the period map
/// makes the activation swap atomic by construction.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<(UserId, NaiveDate), Vec<HourEntry>>>>,
    holidays: Arc<Mutex<HashMap<(UserId, NaiveDate), Holiday>>>,
    periods: Arc<Mutex<HashMap<PeriodId, Period>>>,
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_entry(&self, entry: HourEntry) {
        debug!(user = %entry.user_id, date = %entry.date, hours = %entry.hours, "storing hour entry");
        self.entries
            .lock()
            .unwrap()
            .entry((entry.user_id.clone(), entry.date))
            .or_default()
            .push(entry);
    }

    pub fn remove_entry(&self, user: &UserId, id: &EntryId) {
        let mut entries = self.entries.lock().unwrap();
        for ((owner, _), day_entries) in entries.iter_mut() {
            if owner == user {
                day_entries.retain(|e| &e.id != id);
            }
        }
        entries.retain(|_, day_entries| !day_entries.is_empty());
    }

    pub fn entries_for(&self, user: &UserId) -> Vec<HourEntry> {
        let entries = self.entries.lock().unwrap();
        let mut result: Vec<HourEntry> = entries
            .iter()
            .filter(|((owner, _), _)| owner == user)
            .flat_map(|(_, day_entries)| day_entries.iter().cloned())
            .collect();
        result.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        result
    }

    /// At most one holiday per (user, date).
    pub fn insert_holiday(&self, holiday: Holiday) -> Result<(), EngineError> {
        let key = (holiday.user_id.clone(), holiday.date);
        let mut holidays = self.holidays.lock().unwrap();
        if holidays.contains_key(&key) {
            return Err(EngineError::DuplicateHoliday {
                user_id: holiday.user_id,
                date: holiday.date,
            });
        }
        holidays.insert(key, holiday);
        Ok(())
    }

    /// Inserts or replaces a period. Creating a period directly with
    /// `active = true` cascades deactivation of the user's other periods,
    /// same as an explicit activation.
    pub fn upsert_period(&self, period: Period) {
        let mut periods = self.periods.lock().unwrap();
        if period.active {
            for other in periods.values_mut() {
                if other.user_id == period.user_id && other.id != period.id {
                    other.active = false;
                }
            }
        }
        periods.insert(period.id.clone(), period);
    }

    /// Removes the period and every hour entry that references it.
    pub fn delete_period(&self, id: &PeriodId) {
        let removed = self.periods.lock().unwrap().remove(id);
        if removed.is_some() {
            info!(period = %id, "deleting period and cascading entry removal");
            let mut entries = self.entries.lock().unwrap();
            for day_entries in entries.values_mut() {
                day_entries.retain(|e| e.period_id.as_ref() != Some(id));
            }
            entries.retain(|_, day_entries| !day_entries.is_empty());
        }
    }

    pub fn set_profile(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
    }
}

impl LedgerStore for MemoryStore {
    fn total_hours_for_day(
        &self,
        user: &UserId,
        date: NaiveDate,
        excluding: Option<&EntryId>,
    ) -> Decimal {
        let entries = self.entries.lock().unwrap();
        entries
            .get(&(user.clone(), date))
            .map(|day_entries| {
                day_entries
                    .iter()
                    .filter(|e| excluding != Some(&e.id))
                    .map(|e| e.hours)
                    .sum()
            })
            .unwrap_or(Decimal::ZERO)
    }

    fn is_holiday(&self, user: &UserId, date: NaiveDate) -> bool {
        self.holidays
            .lock()
            .unwrap()
            .contains_key(&(user.clone(), date))
    }

    fn entry_exists(
        &self,
        user: &UserId,
        date: NaiveDate,
        project: &ProjectId,
        description: &str,
    ) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .get(&(user.clone(), date))
            .map(|day_entries| {
                day_entries
                    .iter()
                    .any(|e| &e.project_id == project && e.description == description)
            })
            .unwrap_or(false)
    }

    fn periods_for(&self, user: &UserId) -> Vec<Period> {
        let periods = self.periods.lock().unwrap();
        let mut result: Vec<Period> = periods
            .values()
            .filter(|p| &p.user_id == user)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        result
    }

    fn period(&self, id: &PeriodId) -> Option<Period> {
        self.periods.lock().unwrap().get(id).cloned()
    }

    fn profile(&self, user: &UserId) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(user).cloned()
    }

    fn activate_period(&self, user: &UserId, period_id: &PeriodId) -> Result<(), EngineError> {
        // Single lock over the whole read-modify-write keeps the
        // at-most-one-active invariant under concurrent activations.
        let mut periods = self.periods.lock().unwrap();
        let target = periods
            .get(period_id)
            .ok_or_else(|| EngineError::UnknownPeriod {
                period_id: period_id.clone(),
            })?;
        if &target.user_id != user {
            return Err(EngineError::PeriodNotOwned {
                period_id: period_id.clone(),
                user_id: user.clone(),
            });
        }
        for period in periods.values_mut() {
            if &period.user_id == user {
                period.active = period.id == *period_id;
            }
        }
        info!(user = %user, period = %period_id, "activated period");
        Ok(())
    }
}
