// src/daily_capacity.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::errors::EngineError;
use crate::ledger_data::{EntryId, UserId};
use crate::store::LedgerStore;

/// Checks the new or edited amount against the applicable daily cap. The
/// prior total excludes the entry being edited when an id is supplied.
/// Returns the prior total on success so callers can report remaining
/// capacity. All arithmetic stays in `Decimal`; no binary floating point
/// touches the sum or the comparison.
pub fn check_daily_capacity<S: LedgerStore>(
    store: &S,
    user: &UserId,
    date: NaiveDate,
    hours: Decimal,
    cap: Decimal,
    excluding: Option<&EntryId>,
) -> Result<Decimal, EngineError> {
    let current_total = store.total_hours_for_day(user, date, excluding);
    if current_total + hours > cap {
        warn!(
            user = %user, %date, %current_total, %hours, %cap,
            "daily cap exceeded"
        );
        return Err(EngineError::DailyCapExceeded {
            date,
            current_total,
            cap,
        });
    }
    Ok(current_total)
}
