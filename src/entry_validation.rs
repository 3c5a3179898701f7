// src/entry_validation.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::calendar;
use crate::config::SystemConfig;
use crate::daily_capacity::check_daily_capacity;
use crate::errors::EngineError;
use crate::ledger_data::{EntryId, PeriodId, PreparedEntry, Project, TaskKind, UserId};
use crate::period_registry::{PeriodRegistry, PeriodRequirement};
use crate::store::LedgerStore;

/// One hour entry to validate, covering both creation and edit. For an edit
/// the caller supplies `editing_entry_id` so the capacity check excludes the
/// row being replaced.
///
/// `reference_date` is the caller's "today". When supplied, entries dated in
/// the future or older than the configured age window are rejected; when
/// `None` the recency rules are skipped, keeping the engine date-agnostic.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub user_id: UserId,
    pub project: Project,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub description: String,
    pub task_kind: TaskKind,
    pub explicit_period: Option<PeriodId>,
    pub editing_entry_id: Option<EntryId>,
    pub reference_date: Option<NaiveDate>,
}

/// Orchestrates the calendar oracle, the period registry and the daily
/// capacity check into the single-entry validation contract. A pure
/// decision function over the state the store exposes: it persists nothing
/// and always returns the failure as a typed value.
pub struct HourEntryValidator<S: LedgerStore> {
    store: Arc<S>,
    registry: PeriodRegistry<S>,
    config: SystemConfig,
}

impl<S: LedgerStore> HourEntryValidator<S> {
    pub fn new(store: Arc<S>, config: SystemConfig) -> Self {
        let registry = PeriodRegistry::new(store.clone());
        Self {
            store,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &PeriodRegistry<S> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Runs the validation rules in a fixed order, short-circuiting on the
    /// first failure:
    ///
    /// 1. hours shape (range and increment multiple),
    /// 2. weekend exclusion (unless `allow_weekends` relaxes it),
    /// 3. holiday exclusion,
    /// 4. period resolution (explicit period validated for ownership, else
    ///    the active period, else none for an ad-hoc entry),
    /// 5. effective daily cap (period > profile > system default),
    /// 6. daily capacity,
    /// 7. cross-user ownership of project and resolved period,
    /// 8. a `PreparedEntry` for the caller to persist.
    pub fn validate_and_prepare(
        &self,
        request: &EntryRequest,
    ) -> Result<PreparedEntry, EngineError> {
        debug!(
            user = %request.user_id, date = %request.date, hours = %request.hours,
            "validating hour entry"
        );

        let (min, max, increment) = self.hour_bounds(&request.user_id);
        let off_grid = increment > Decimal::ZERO && request.hours % increment != Decimal::ZERO;
        if request.hours < min || request.hours > max || off_grid {
            return Err(EngineError::InvalidHours {
                hours: request.hours,
                min,
                max,
                increment,
            });
        }

        if let Some(today) = request.reference_date {
            if request.date > today {
                return Err(EngineError::FutureDate { date: request.date });
            }
            let horizon = today - Duration::days(i64::from(self.config.max_entry_age_days));
            if request.date < horizon {
                return Err(EngineError::StaleDate {
                    date: request.date,
                    max_age_days: self.config.max_entry_age_days,
                });
            }
        }

        if !self.config.allow_weekends && calendar::is_weekend(request.date) {
            return Err(EngineError::WeekendNotAllowed { date: request.date });
        }

        if calendar::is_holiday(self.store.as_ref(), &request.user_id, request.date) {
            return Err(EngineError::HolidayNotAllowed { date: request.date });
        }

        let period = self.registry.resolve_for_entry(
            &request.user_id,
            request.explicit_period.as_ref(),
            PeriodRequirement::Optional,
        )?;

        let cap = self
            .registry
            .effective_daily_cap(&request.user_id, period.as_ref(), &self.config);

        check_daily_capacity(
            self.store.as_ref(),
            &request.user_id,
            request.date,
            request.hours,
            cap,
            request.editing_entry_id.as_ref(),
        )?;

        if request.project.user_id != request.user_id {
            return Err(EngineError::CrossUserReference {
                entity: "project",
                owner: request.project.user_id.clone(),
                user: request.user_id.clone(),
            });
        }
        if let Some(period) = &period {
            if period.user_id != request.user_id {
                return Err(EngineError::CrossUserReference {
                    entity: "period",
                    owner: period.user_id.clone(),
                    user: request.user_id.clone(),
                });
            }
        }

        Ok(PreparedEntry {
            user_id: request.user_id.clone(),
            project_id: request.project.id.clone(),
            period_id: period.map(|p| p.id),
            date: request.date,
            hours: request.hours,
            description: request.description.clone(),
            task_kind: request.task_kind,
            editing_entry_id: request.editing_entry_id.clone(),
        })
    }

    /// Hour bounds come from the user's profile when one is provisioned,
    /// else from the system configuration.
    fn hour_bounds(&self, user: &UserId) -> (Decimal, Decimal, Decimal) {
        match self.store.profile(user) {
            Some(profile) => (profile.min_hours, profile.max_hours, profile.hours_increment),
            None => (
                self.config.min_hours,
                self.config.max_hours,
                self.config.hours_increment,
            ),
        }
    }
}
