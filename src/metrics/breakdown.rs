use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::Task;

use super::percentage;

pub const UNSPECIFIED_CONTENT_TYPE: &str = "unspecified";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Task share per content type. Untagged tasks count as `unspecified`.
pub fn calculate_content_type_breakdown(tasks: &[Task]) -> Vec<BreakdownEntry> {
    breakdown_by(tasks, |task| {
        task.content_type
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| UNSPECIFIED_CONTENT_TYPE.to_string())
    })
}

pub fn calculate_priority_breakdown(tasks: &[Task]) -> Vec<BreakdownEntry> {
    breakdown_by(tasks, |task| task.priority.as_str().to_string())
}

/// Group, count and sort by count descending, then label.
fn breakdown_by<F>(tasks: &[Task], key: F) -> Vec<BreakdownEntry>
where
    F: Fn(&Task) -> String,
{
    let counts = tasks.iter().fold(HashMap::new(), |mut acc, task| {
        *acc.entry(key(task)).or_insert(0usize) += 1;
        acc
    });

    let mut entries: Vec<BreakdownEntry> = counts
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            label,
            count,
            percentage: percentage(count, tasks.len()),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}
