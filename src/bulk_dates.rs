// src/bulk_dates.rs
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar;
use crate::entry_validation::{EntryRequest, HourEntryValidator};
use crate::errors::EngineError;
use crate::ledger_data::{Period, PreparedEntry, Project, TaskKind, UserId};
use crate::store::LedgerStore;

/// Fixed-day-count cadence inherited from the source system: "biweekly"
/// steps 15 days, not every second occurrence of a weekday.
const BIWEEKLY_STEP_DAYS: u64 = 15;

const MANUAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum RepeatPattern {
    /// Explicit date tokens, `YYYY-MM-DD`. Unparseable tokens are dropped
    /// silently; duplicates collapse in the final output.
    Manual { tokens: Vec<String> },
    /// First occurrence of `weekday` on or after `start`, then every 7 days
    /// up to `end`.
    Weekly {
        start: NaiveDate,
        end: NaiveDate,
        weekday: Weekday,
    },
    /// `start`, then every 15 days up to `end`.
    Biweekly { start: NaiveDate, end: NaiveDate },
    /// The requested day-of-month in each month between `start`'s and
    /// `end`'s, skipping months where that day does not exist (day 31 in
    /// February is skipped, never clamped).
    Monthly {
        start: NaiveDate,
        end: NaiveDate,
        day_of_month: u32,
    },
}

/// A transient repetition request for batch entry creation. Holds no
/// persistent invariants beyond producing each candidate date at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkSpecification {
    pub pattern: RepeatPattern,
    pub skip_weekends: bool,
    /// Present for form symmetry; holidays are excluded unconditionally
    /// regardless of this flag.
    pub skip_holidays: bool,
}

/// Parses manual tokens, separating the dates from the tokens that did not
/// parse so a caller can surface a partial-failure report. `generate` itself
/// keeps the historical drop-silently behavior.
pub fn parse_manual_tokens(tokens: &[String]) -> (Vec<NaiveDate>, Vec<String>) {
    let mut dates = Vec::new();
    let mut dropped = Vec::new();
    for token in tokens {
        match NaiveDate::parse_from_str(token.trim(), MANUAL_DATE_FORMAT) {
            Ok(date) => dates.push(date),
            Err(_) => {
                debug!(token = %token, "dropping unparseable manual date token");
                dropped.push(token.clone());
            }
        }
    }
    (dates, dropped)
}

/// Expands the specification into a finite, ascending, deduplicated list of
/// candidate dates, post-filtered uniformly: dates outside the active
/// period are dropped, weekends are dropped when `skip_weekends` is set,
/// and the user's holidays are always dropped.
///
/// Fails with `NoActivePeriod` when no period is supplied and with
/// `EmptyResult` (informational) when nothing survives the filter. Each
/// surviving date is still subject to single-entry validation at creation
/// time; this function only proposes candidates.
pub fn generate<S: LedgerStore>(
    spec: &BulkSpecification,
    user: &UserId,
    active_period: Option<&Period>,
    store: &S,
) -> Result<Vec<NaiveDate>, EngineError> {
    let period = active_period.ok_or_else(|| EngineError::NoActivePeriod {
        user_id: user.clone(),
    })?;

    let candidates = expand_pattern(&spec.pattern);
    debug!(user = %user, count = candidates.len(), "expanded bulk date pattern");

    let mut dates: Vec<NaiveDate> = candidates
        .into_iter()
        .filter(|date| period.contains(*date))
        .filter(|date| !(spec.skip_weekends && calendar::is_weekend(*date)))
        .filter(|date| !store.is_holiday(user, *date))
        .collect();
    dates.sort_unstable();
    dates.dedup();

    if dates.is_empty() {
        return Err(EngineError::EmptyResult);
    }
    Ok(dates)
}

fn expand_pattern(pattern: &RepeatPattern) -> Vec<NaiveDate> {
    match pattern {
        RepeatPattern::Manual { tokens } => parse_manual_tokens(tokens).0,
        RepeatPattern::Weekly {
            start,
            end,
            weekday,
        } => {
            let mut dates = Vec::new();
            let mut day = *start;
            while day.weekday() != *weekday {
                match day.checked_add_days(Days::new(1)) {
                    Some(next) => day = next,
                    None => return dates,
                }
            }
            while day <= *end {
                dates.push(day);
                match day.checked_add_days(Days::new(7)) {
                    Some(next) => day = next,
                    None => break,
                }
            }
            dates
        }
        RepeatPattern::Biweekly { start, end } => {
            let mut dates = Vec::new();
            let mut day = *start;
            while day <= *end {
                dates.push(day);
                match day.checked_add_days(Days::new(BIWEEKLY_STEP_DAYS)) {
                    Some(next) => day = next,
                    None => break,
                }
            }
            dates
        }
        RepeatPattern::Monthly {
            start,
            end,
            day_of_month,
        } => {
            let mut dates = Vec::new();
            if start > end {
                return dates;
            }
            let mut year = start.year();
            let mut month = start.month();
            loop {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, *day_of_month) {
                    if date <= *end {
                        dates.push(date);
                    }
                }
                if year == end.year() && month == end.month() {
                    break;
                }
                if month == 12 {
                    month = 1;
                    year += 1;
                } else {
                    month += 1;
                }
            }
            dates
        }
    }
}

/// The entry fields shared by every date of a bulk registration.
#[derive(Debug, Clone)]
pub struct BulkTemplate {
    pub user_id: UserId,
    pub project: Project,
    pub hours: Decimal,
    pub description: String,
    pub task_kind: TaskKind,
}

/// Outcome of offering every generated date to the single-entry validator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkPlan {
    /// Validated entries ready to persist.
    pub accepted: Vec<PreparedEntry>,
    /// Dates where an entry with the same project and description already
    /// exists; skipped rather than duplicated.
    pub skipped_existing: Vec<NaiveDate>,
    /// Dates the single-entry validator rejected, with the reason.
    pub rejected: Vec<(NaiveDate, EngineError)>,
}

/// Expands the specification and runs each candidate date through the same
/// validation contract a single entry goes through, so the bulk path and the
/// single-entry path converge on one set of rules.
pub fn plan_bulk<S: LedgerStore>(
    spec: &BulkSpecification,
    template: &BulkTemplate,
    validator: &HourEntryValidator<S>,
    active_period: Option<&Period>,
) -> Result<BulkPlan, EngineError> {
    let store = validator.store().as_ref();
    let dates = generate(spec, &template.user_id, active_period, store)?;

    let mut plan = BulkPlan::default();
    for date in dates {
        if store.entry_exists(
            &template.user_id,
            date,
            &template.project.id,
            &template.description,
        ) {
            plan.skipped_existing.push(date);
            continue;
        }
        let request = EntryRequest {
            user_id: template.user_id.clone(),
            project: template.project.clone(),
            date,
            hours: template.hours,
            description: template.description.clone(),
            task_kind: template.task_kind,
            explicit_period: None,
            editing_entry_id: None,
            reference_date: None,
        };
        match validator.validate_and_prepare(&request) {
            Ok(prepared) => plan.accepted.push(prepared),
            Err(err) => {
                warn!(%date, error = %err, "bulk candidate rejected by entry validation");
                plan.rejected.push((date, err));
            }
        }
    }
    Ok(plan)
}
