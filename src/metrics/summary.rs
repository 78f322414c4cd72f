use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Task;

use super::{percentage, round_to_usize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    pub completion_rate: usize,
}

pub fn calculate_summary(tasks: &[Task], now: DateTime<Utc>) -> Summary {
    let (completed, active, overdue) =
        tasks
            .iter()
            .fold((0, 0, 0), |(completed, active, overdue), task| {
                (
                    completed + usize::from(task.is_delivered()),
                    active + usize::from(task.is_active()),
                    overdue + usize::from(task.is_overdue(now)),
                )
            });

    Summary {
        total: tasks.len(),
        completed,
        active,
        overdue,
        completion_rate: round_to_usize(percentage(completed, tasks.len())),
    }
}
