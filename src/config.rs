// src/config.rs
use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "HOURLEDGER_";

fn default_daily_cap() -> Decimal {
    dec!(8.0)
}

fn default_min_hours() -> Decimal {
    dec!(0.5)
}

fn default_max_hours() -> Decimal {
    dec!(12.0)
}

fn default_hours_increment() -> Decimal {
    dec!(0.5)
}

fn default_max_entry_age_days() -> u32 {
    365
}

fn default_period_days() -> u32 {
    30
}

/// System-wide defaults and validation hooks. Per-user profiles may override
/// the hour bounds; an active period's daily cap overrides everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Fallback daily cap when neither the resolved period nor the user's
    /// profile supplies one.
    #[serde(default = "default_daily_cap")]
    pub default_daily_cap: Decimal,

    #[serde(default = "default_min_hours")]
    pub min_hours: Decimal,

    #[serde(default = "default_max_hours")]
    pub max_hours: Decimal,

    /// Hours must be an exact multiple of this step.
    #[serde(default = "default_hours_increment")]
    pub hours_increment: Decimal,

    /// When true, the weekend exclusion rule is relaxed and Saturday/Sunday
    /// entries pass validation. Off by default.
    #[serde(default)]
    pub allow_weekends: bool,

    /// Oldest entry date accepted relative to the caller-supplied reference
    /// date, when one is given.
    #[serde(default = "default_max_entry_age_days")]
    pub max_entry_age_days: u32,

    /// Suggested length of a newly created period, in days.
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            default_daily_cap: default_daily_cap(),
            min_hours: default_min_hours(),
            max_hours: default_max_hours(),
            hours_increment: default_hours_increment(),
            allow_weekends: false,
            max_entry_age_days: default_max_entry_age_days(),
            default_period_days: default_period_days(),
        }
    }
}

impl SystemConfig {
    /// Reads the configuration from `HOURLEDGER_`-prefixed environment
    /// variables (e.g. `HOURLEDGER_DEFAULT_DAILY_CAP=7.5`). Unset variables
    /// fall back to the defaults above.
    pub fn from_env() -> anyhow::Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<SystemConfig>()
            .context("failed to read hourledger configuration from environment")
    }
}
