use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{CollaboratorJoin, CollaboratorsConfig};
use crate::core::{Collaborator, Task, TaskStatus};

use super::{percentage, round_to_usize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentTask {
    pub title: String,
    pub status: TaskStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorReport {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub total_tasks: usize,
    pub active_tasks: usize,
    pub completed_tasks: usize,
    /// Mean recorded response time of delivered work, in whole days.
    pub avg_response_time: usize,
    pub on_time_percentage: usize,
    pub efficiency: usize,
    pub overdue_tasks: usize,
    pub recent_tasks: Vec<RecentTask>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollaboratorOptions {
    pub join: CollaboratorJoin,
    pub recent_tasks: usize,
}

impl Default for CollaboratorOptions {
    fn default() -> Self {
        Self::from(&CollaboratorsConfig::default())
    }
}

impl From<&CollaboratorsConfig> for CollaboratorOptions {
    fn from(config: &CollaboratorsConfig) -> Self {
        Self {
            join: config.join,
            recent_tasks: config.recent_tasks,
        }
    }
}

/// Whether `task` is attributed to `collaborator` under the given join.
pub fn is_assigned_to(task: &Task, collaborator: &Collaborator, join: CollaboratorJoin) -> bool {
    let by_name = || task.assigned_to.as_deref() == Some(collaborator.name.as_str());
    match join {
        CollaboratorJoin::Name => by_name(),
        CollaboratorJoin::Id => match task.collaborator_id.as_deref() {
            Some(id) => id == collaborator.id,
            None => by_name(),
        },
    }
}

/// Workload and delivery quality per collaborator. Collaborators with no
/// assigned tasks are omitted; the rest keep their input order.
pub fn calculate_collaborator_metrics(
    tasks: &[Task],
    collaborators: &[Collaborator],
    options: CollaboratorOptions,
    now: DateTime<Utc>,
) -> Vec<CollaboratorReport> {
    collaborators
        .iter()
        .filter_map(|collaborator| {
            let assigned: Vec<&Task> = tasks
                .iter()
                .filter(|task| is_assigned_to(task, collaborator, options.join))
                .collect();

            (!assigned.is_empty())
                .then(|| build_report(collaborator, &assigned, options.recent_tasks, now))
        })
        .collect()
}

fn build_report(
    collaborator: &Collaborator,
    assigned: &[&Task],
    recent_count: usize,
    now: DateTime<Utc>,
) -> CollaboratorReport {
    let active: Vec<&Task> = assigned.iter().copied().filter(|t| t.is_active()).collect();
    let delivered: Vec<&Task> = assigned.iter().copied().filter(|t| t.is_delivered()).collect();

    let on_time = delivered.iter().filter(|t| t.delivered_on_time()).count();
    let completion_rate = percentage(delivered.len(), assigned.len());
    let on_time_rate = percentage(on_time, delivered.len());

    CollaboratorReport {
        id: collaborator.id.clone(),
        name: collaborator.name.clone(),
        specialty: collaborator.specialty.clone(),
        total_tasks: assigned.len(),
        active_tasks: active.len(),
        completed_tasks: delivered.len(),
        avg_response_time: average_response_time(&delivered),
        on_time_percentage: round_to_usize(on_time_rate),
        efficiency: round_to_usize((completion_rate + on_time_rate) / 2.0),
        overdue_tasks: active.iter().filter(|t| t.is_past_due(now)).count(),
        recent_tasks: recent_tasks(assigned, recent_count),
    }
}

fn average_response_time(delivered: &[&Task]) -> usize {
    let times: Vec<f64> = delivered
        .iter()
        .filter_map(|task| task.response_time_days)
        .collect();

    if times.is_empty() {
        return 0;
    }
    round_to_usize(times.iter().sum::<f64>() / times.len() as f64)
}

fn recent_tasks(assigned: &[&Task], count: usize) -> Vec<RecentTask> {
    let skip = assigned.len().saturating_sub(count);
    assigned
        .iter()
        .skip(skip)
        .map(|task| RecentTask {
            title: task.title.clone(),
            status: task.status.clone(),
        })
        .collect()
}
