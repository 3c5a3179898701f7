// src/summary.rs
//
// Pure aggregation over hour entries for the reporting screens the shell
// renders. Exact decimal sums throughout.
use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger_data::{HourEntry, PeriodId, ProjectId, TaskKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTotal {
    pub project_id: ProjectId,
    pub total_hours: Decimal,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskKindTotal {
    pub task_kind: TaskKind,
    pub total_hours: Decimal,
    pub entry_count: usize,
}

/// Totals grouped by project, highest hours first (ties broken by project
/// id for a stable order).
pub fn hours_by_project(entries: &[HourEntry]) -> Vec<ProjectTotal> {
    let mut grouped: HashMap<&ProjectId, (Decimal, usize)> = HashMap::new();
    for entry in entries {
        let slot = grouped.entry(&entry.project_id).or_insert((Decimal::ZERO, 0));
        slot.0 += entry.hours;
        slot.1 += 1;
    }
    let mut totals: Vec<ProjectTotal> = grouped
        .into_iter()
        .map(|(project_id, (total_hours, entry_count))| ProjectTotal {
            project_id: project_id.clone(),
            total_hours,
            entry_count,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total_hours
            .cmp(&a.total_hours)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    totals
}

/// Totals grouped by task kind, in the declaration order of the kinds.
pub fn hours_by_task_kind(entries: &[HourEntry]) -> Vec<TaskKindTotal> {
    let mut grouped: HashMap<TaskKind, (Decimal, usize)> = HashMap::new();
    for entry in entries {
        let slot = grouped.entry(entry.task_kind).or_insert((Decimal::ZERO, 0));
        slot.0 += entry.hours;
        slot.1 += 1;
    }
    [TaskKind::Task, TaskKind::Meeting]
        .into_iter()
        .filter_map(|kind| {
            grouped.get(&kind).map(|(total_hours, entry_count)| TaskKindTotal {
                task_kind: kind,
                total_hours: *total_hours,
                entry_count: *entry_count,
            })
        })
        .collect()
}

/// Total hours logged on one date.
pub fn total_hours_for_day(entries: &[HourEntry], date: NaiveDate) -> Decimal {
    entries
        .iter()
        .filter(|e| e.date == date)
        .map(|e| e.hours)
        .sum()
}

/// Filters entries to an optional inclusive date range and period before
/// aggregation.
pub fn in_scope(
    entries: &[HourEntry],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    period: Option<&PeriodId>,
) -> Vec<HourEntry> {
    entries
        .iter()
        .filter(|e| start.map_or(true, |s| e.date >= s))
        .filter(|e| end.map_or(true, |s| e.date <= s))
        .filter(|e| period.map_or(true, |p| e.period_id.as_ref() == Some(p)))
        .cloned()
        .collect()
}
