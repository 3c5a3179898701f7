// src/period_registry.rs
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::SystemConfig;
use crate::errors::EngineError;
use crate::ledger_data::{Period, PeriodId, UserId};
use crate::store::LedgerStore;

/// Whether the calling operation can proceed without a resolved period.
/// Bulk generation requires one; ad-hoc single-entry creation may not,
/// which is surfaced to the caller as an explicit choice rather than a
/// hidden default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRequirement {
    Required,
    Optional,
}

/// Owns period resolution and the single-active-period invariant for the
/// engine. All state lives behind the store; the registry itself is a pure
/// coordinator.
pub struct PeriodRegistry<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> PeriodRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The user's single active period, or none if they never activated one.
    pub fn get_active(&self, user: &UserId) -> Option<Period> {
        self.store.periods_for(user).into_iter().find(|p| p.active)
    }

    /// Activates the period and, as one atomic step at the storage layer,
    /// deactivates every other period of the same user.
    pub fn activate(&self, user: &UserId, period_id: &PeriodId) -> Result<(), EngineError> {
        debug!(user = %user, period = %period_id, "activating period");
        self.store.activate_period(user, period_id)
    }

    /// Resolves the period an entry should be booked against: the explicit
    /// one when supplied (ownership checked), else the active period, else
    /// none or `NoActivePeriod` depending on `requirement`.
    pub fn resolve_for_entry(
        &self,
        user: &UserId,
        explicit: Option<&PeriodId>,
        requirement: PeriodRequirement,
    ) -> Result<Option<Period>, EngineError> {
        if let Some(period_id) = explicit {
            let period = self
                .store
                .period(period_id)
                .ok_or_else(|| EngineError::UnknownPeriod {
                    period_id: period_id.clone(),
                })?;
            if &period.user_id != user {
                return Err(EngineError::PeriodNotOwned {
                    period_id: period_id.clone(),
                    user_id: user.clone(),
                });
            }
            return Ok(Some(period));
        }
        match self.get_active(user) {
            Some(period) => Ok(Some(period)),
            None => match requirement {
                PeriodRequirement::Required => Err(EngineError::NoActivePeriod {
                    user_id: user.clone(),
                }),
                PeriodRequirement::Optional => Ok(None),
            },
        }
    }

    /// Daily cap precedence, fixed: period cap, else the user's profile cap,
    /// else the system-wide default.
    pub fn effective_daily_cap(
        &self,
        user: &UserId,
        period: Option<&Period>,
        config: &SystemConfig,
    ) -> Decimal {
        if let Some(period) = period {
            return period.max_hours_per_day;
        }
        if let Some(cap) = self.store.profile(user).and_then(|p| p.daily_cap) {
            return cap;
        }
        config.default_daily_cap
    }
}
