//! Control indicators: overdue, urgent, over-limit and flagged work.
//!
//! Each indicator carries a count, a detail list and a trend. The trend is
//! the difference against a baseline (usually the previous reporting window)
//! and is zero when no baseline is supplied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::{Brand, Task, TaskStatus};
use crate::plan::PlanResolver;

use super::brand_limits::active_tasks_for_brand;

pub const UNKNOWN_BRAND: &str = "Unknown brand";
pub const OUT_OF_LIMIT_MARKER: &str = "Out of plan limit";
pub const NEEDS_ATTENTION_REASON: &str = "Requires attention";

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Indicator<T> {
    pub count: usize,
    pub trend: i64,
    pub items: Vec<T>,
}

impl<T> Indicator<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            trend: 0,
            items,
        }
    }

    fn with_baseline(mut self, baseline_count: usize) -> Self {
        self.trend = self.count as i64 - baseline_count as i64;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueItem {
    pub task_id: String,
    pub title: String,
    pub brand: String,
    pub days_overdue: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgentItem {
    pub task_id: String,
    pub title: String,
    pub brand: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverLimitItem {
    pub task_id: String,
    pub title: String,
    pub brand: String,
    pub marker: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionItem {
    pub task_id: String,
    pub title: String,
    pub brand: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlIndicators {
    pub overdue: Indicator<OverdueItem>,
    pub urgent: Indicator<UrgentItem>,
    pub over_limit: Indicator<OverLimitItem>,
    pub needs_attention: Indicator<AttentionItem>,
}

impl ControlIndicators {
    pub fn total_flags(&self) -> usize {
        self.overdue.count + self.urgent.count + self.over_limit.count + self.needs_attention.count
    }
}

/// Derive the four control sets. Trends are zero.
pub fn calculate_control_indicators(
    tasks: &[Task],
    brands: &[Brand],
    plans: &dyn PlanResolver,
    now: DateTime<Utc>,
) -> ControlIndicators {
    let names = BrandNames::new(brands);

    ControlIndicators {
        overdue: Indicator::new(overdue_items(tasks, &names, now)),
        urgent: Indicator::new(urgent_items(tasks, &names)),
        over_limit: Indicator::new(over_limit_items(tasks, brands, plans, &names)),
        needs_attention: Indicator::new(attention_items(tasks, &names)),
    }
}

/// Like [`calculate_control_indicators`], with each trend set to the change
/// in count relative to the same computation over `prior_tasks`, evaluated
/// at `baseline_at` (the end of the prior window).
pub fn calculate_control_indicators_with_baseline(
    tasks: &[Task],
    prior_tasks: &[Task],
    brands: &[Brand],
    plans: &dyn PlanResolver,
    now: DateTime<Utc>,
    baseline_at: DateTime<Utc>,
) -> ControlIndicators {
    let current = calculate_control_indicators(tasks, brands, plans, now);
    let baseline = calculate_control_indicators(prior_tasks, brands, plans, baseline_at);

    ControlIndicators {
        overdue: current.overdue.with_baseline(baseline.overdue.count),
        urgent: current.urgent.with_baseline(baseline.urgent.count),
        over_limit: current.over_limit.with_baseline(baseline.over_limit.count),
        needs_attention: current
            .needs_attention
            .with_baseline(baseline.needs_attention.count),
    }
}

/// Whole days past due, rounded up.
pub fn days_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - due).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

fn overdue_items(tasks: &[Task], names: &BrandNames, now: DateTime<Utc>) -> Vec<OverdueItem> {
    tasks
        .iter()
        .filter(|task| task.is_overdue(now))
        .filter_map(|task| {
            task.due_date.map(|due| OverdueItem {
                task_id: task.id.clone(),
                title: task.title.clone(),
                brand: names.for_task(task),
                days_overdue: days_overdue(due, now),
            })
        })
        .collect()
}

fn urgent_items(tasks: &[Task], names: &BrandNames) -> Vec<UrgentItem> {
    tasks
        .iter()
        .filter(|task| task.priority.is_urgent())
        .filter_map(|task| {
            task.due_date.map(|due_date| UrgentItem {
                task_id: task.id.clone(),
                title: task.title.clone(),
                brand: names.for_task(task),
                due_date,
            })
        })
        .collect()
}

fn over_limit_items(
    tasks: &[Task],
    brands: &[Brand],
    plans: &dyn PlanResolver,
    names: &BrandNames,
) -> Vec<OverLimitItem> {
    brands
        .iter()
        .flat_map(|brand| {
            let ceiling = plans.resolve(brand).max_active_tasks;
            active_tasks_for_brand(&brand.id, tasks)
                .skip(ceiling)
                .map(|task| OverLimitItem {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    brand: names.for_task(task),
                    marker: OUT_OF_LIMIT_MARKER.to_string(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn attention_items(tasks: &[Task], names: &BrandNames) -> Vec<AttentionItem> {
    tasks
        .iter()
        .filter(|task| task.status == TaskStatus::NeedsAttention)
        .map(|task| AttentionItem {
            task_id: task.id.clone(),
            title: task.title.clone(),
            brand: names.for_task(task),
            reason: NEEDS_ATTENTION_REASON.to_string(),
        })
        .collect()
}

struct BrandNames<'a> {
    by_id: HashMap<&'a str, &'a str>,
}

impl<'a> BrandNames<'a> {
    fn new(brands: &'a [Brand]) -> Self {
        let mut by_id = HashMap::with_capacity(brands.len());
        for brand in brands {
            // first brand wins on duplicate ids
            by_id.entry(brand.id.as_str()).or_insert(brand.name.as_str());
        }
        Self { by_id }
    }

    fn for_task(&self, task: &Task) -> String {
        task.brand_id
            .as_deref()
            .and_then(|id| self.by_id.get(id))
            .map(|name| name.to_string())
            .unwrap_or_else(|| UNKNOWN_BRAND.to_string())
    }
}
