// src/errors.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::ledger_data::{PeriodId, UserId};

/// Every failure the engine can report. All variants are recoverable and are
/// returned to the caller as values; the engine never logs instead of
/// returning, never retries, never panics the host process.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum EngineError {
    #[error("hours must be a multiple of {increment} between {min} and {max} (got {hours})")]
    InvalidHours {
        hours: Decimal,
        min: Decimal,
        max: Decimal,
        increment: Decimal,
    },

    #[error("cannot register hours on a weekend ({date})")]
    WeekendNotAllowed { date: NaiveDate },

    #[error("cannot register hours on a holiday ({date})")]
    HolidayNotAllowed { date: NaiveDate },

    #[error("no active period configured for user {user_id}")]
    NoActivePeriod { user_id: UserId },

    #[error("daily cap of {cap}h exceeded on {date}: {current_total}h already registered")]
    DailyCapExceeded {
        date: NaiveDate,
        current_total: Decimal,
        cap: Decimal,
    },

    /// An entry referenced a project or period owned by a different user.
    /// Always a programming or security error upstream; surfaced, never
    /// silently corrected.
    #[error("{entity} belongs to user {owner}, not to requesting user {user}")]
    CrossUserReference {
        entity: &'static str,
        owner: UserId,
        user: UserId,
    },

    #[error("period {period_id} is not owned by user {user_id}")]
    PeriodNotOwned {
        period_id: PeriodId,
        user_id: UserId,
    },

    #[error("unknown period {period_id}")]
    UnknownPeriod { period_id: PeriodId },

    #[error("invalid period: {reason}")]
    InvalidPeriod { reason: String },

    #[error("cannot register hours on a future date ({date})")]
    FutureDate { date: NaiveDate },

    #[error("date {date} is more than {max_age_days} days in the past")]
    StaleDate { date: NaiveDate, max_age_days: u32 },

    #[error("a holiday already exists for user {user_id} on {date}")]
    DuplicateHoliday { user_id: UserId, date: NaiveDate },

    /// Informational outcome of the bulk generator: no candidate date
    /// survived filtering. The caller decides whether this is an error or a
    /// no-op.
    #[error("no candidate dates survived filtering")]
    EmptyResult,
}
