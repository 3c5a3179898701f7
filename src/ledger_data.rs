// src/ledger_data.rs
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;
use crate::errors::EngineError;

pub type UserId = String;
pub type ProjectId = String;
pub type PeriodId = String;
pub type EntryId = String;

/// A user-scoped accounting window with a target hour count and a daily cap.
/// At most one period per user is active at any time; the store enforces the
/// swap atomically (see `LedgerStore::activate_period`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub user_id: UserId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total hours the user aims to log over the whole period.
    pub target_hours: u32,
    /// Daily cap while this period is the resolved one.
    pub max_hours_per_day: Decimal,
    pub active: bool,
}

impl Period {
    pub fn new(
        id: impl Into<PeriodId>,
        user_id: impl Into<UserId>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        target_hours: u32,
        max_hours_per_day: Decimal,
    ) -> Result<Self, EngineError> {
        if start_date >= end_date {
            return Err(EngineError::InvalidPeriod {
                reason: format!("start date {start_date} must precede end date {end_date}"),
            });
        }
        if target_hours == 0 {
            return Err(EngineError::InvalidPeriod {
                reason: "target hours must be at least 1".to_string(),
            });
        }
        if max_hours_per_day < dec!(0.5) {
            return Err(EngineError::InvalidPeriod {
                reason: format!("daily cap {max_hours_per_day} must be at least 0.5"),
            });
        }
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            start_date,
            end_date,
            target_hours,
            max_hours_per_day,
            active: false,
        })
    }

    /// Year the period is accounted under (its start date's year).
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// Inclusive length in days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Both bounds inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// How far through the period the given day is, 0-100.
    pub fn elapsed_percent(&self, today: NaiveDate) -> u32 {
        if today < self.start_date {
            return 0;
        }
        if today > self.end_date {
            return 100;
        }
        let total = (self.end_date - self.start_date).num_days().max(1);
        let elapsed = (today - self.start_date).num_days();
        ((elapsed * 100 / total) as u32).min(100)
    }
}

/// A user-registered exclusion day. Read-only from the engine's point of
/// view; at most one per (user, date), enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub name: String,
    pub description: Option<String>,
}

/// Minimal project view: the engine only needs ownership and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub user_id: UserId,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Task,
    Meeting,
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Task => "Task",
            TaskKind::Meeting => "Meeting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub project_id: ProjectId,
    /// Resolved at creation time: the explicit period if one was supplied,
    /// else the user's active period, else none (ad-hoc entry).
    pub period_id: Option<PeriodId>,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub description: String,
    pub task_kind: TaskKind,
}

/// The validated output of `HourEntryValidator::validate_and_prepare`,
/// carrying the resolved period and ready for the caller's data-access
/// collaborator to persist. The engine itself never persists anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedEntry {
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub period_id: Option<PeriodId>,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub description: String,
    pub task_kind: TaskKind,
    /// Set when the validation was for an edit of an existing entry.
    pub editing_entry_id: Option<EntryId>,
}

impl PreparedEntry {
    /// Materializes the persisted form under the id chosen by the caller.
    pub fn into_entry(self, id: impl Into<EntryId>) -> HourEntry {
        HourEntry {
            id: id.into(),
            user_id: self.user_id,
            project_id: self.project_id,
            period_id: self.period_id,
            date: self.date,
            hours: self.hours,
            description: self.description,
            task_kind: self.task_kind,
        }
    }
}

/// Per-user validation settings. Provisioned explicitly when the caller
/// creates a user; there is no implicit creation on the side of any other
/// persistence operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    /// Overrides the system default daily cap; an active period's cap still
    /// takes precedence over this.
    pub daily_cap: Option<Decimal>,
    pub min_hours: Decimal,
    pub max_hours: Decimal,
    pub hours_increment: Decimal,
}

impl UserProfile {
    /// Factory for a freshly created user, seeded from the system defaults.
    pub fn provision(user_id: impl Into<UserId>, config: &SystemConfig) -> Self {
        Self {
            user_id: user_id.into(),
            daily_cap: None,
            min_hours: config.min_hours,
            max_hours: config.max_hours,
            hours_increment: config.hours_increment,
        }
    }
}
