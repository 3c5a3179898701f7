// src/lib.rs
//! Hour-ledger consistency engine: keeps hour entries, active accounting
//! periods and calendar exclusions (weekends/holidays) mutually consistent,
//! and expands repetition patterns into candidate dates for batch entry
//! creation. Computation-only; all persistence goes through the caller's
//! [`LedgerStore`] implementation.

pub mod bulk_dates;
pub mod calendar;
pub mod config;
pub mod daily_capacity;
pub mod entry_validation;
pub mod errors;
pub mod ledger_data;
pub mod period_registry;
pub mod store;
pub mod summary;

mod entry_validation_tests;

pub use bulk_dates::{
    generate, parse_manual_tokens, plan_bulk, BulkPlan, BulkSpecification, BulkTemplate,
    RepeatPattern,
};
pub use config::SystemConfig;
pub use daily_capacity::check_daily_capacity;
pub use entry_validation::{EntryRequest, HourEntryValidator};
pub use errors::EngineError;
pub use ledger_data::{
    EntryId, Holiday, HourEntry, Period, PeriodId, PreparedEntry, Project, ProjectId, TaskKind,
    UserId, UserProfile,
};
pub use period_registry::{PeriodRegistry, PeriodRequirement};
pub use store::{LedgerStore, MemoryStore};
pub use summary::{
    hours_by_project, hours_by_task_kind, in_scope, total_hours_for_day, ProjectTotal,
    TaskKindTotal,
};
