use serde::{Deserialize, Serialize};

use crate::core::{Brand, Client, Task, TaskStatus};
use crate::plan::PlanResolver;

pub const UNKNOWN_CLIENT: &str = "Unknown client";

/// Active task counts per active status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActiveStatusBreakdown {
    pub queued: usize,
    pub in_progress: usize,
    pub in_review: usize,
}

impl ActiveStatusBreakdown {
    fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks
            .into_iter()
            .fold(Self::default(), |mut acc, task| {
                match task.status {
                    TaskStatus::Queued => acc.queued += 1,
                    TaskStatus::InProgress => acc.in_progress += 1,
                    TaskStatus::InReview => acc.in_review += 1,
                    _ => {}
                }
                acc
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandLimitReport {
    pub brand_id: String,
    pub brand_name: String,
    pub client_name: String,
    pub active_tasks: usize,
    pub limit: usize,
    pub plan: String,
    pub status_breakdown: ActiveStatusBreakdown,
    /// Free slots left under the ceiling.
    pub remaining: usize,
    pub over_limit: bool,
}

/// Whether a brand can take on another active task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCapacity {
    pub brand_id: String,
    pub active_tasks: usize,
    pub limit: usize,
    pub remaining: usize,
    pub can_accept_task: bool,
}

/// Active tasks of one brand, in input order.
pub fn active_tasks_for_brand<'a>(brand_id: &'a str, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> + 'a {
    tasks
        .iter()
        .filter(move |task| task.belongs_to_brand(brand_id) && task.is_active())
}

/// One row per brand, in input order, comparing active work to the plan.
pub fn calculate_brand_limits(
    brands: &[Brand],
    clients: &[Client],
    all_tasks: &[Task],
    plans: &dyn PlanResolver,
) -> Vec<BrandLimitReport> {
    brands
        .iter()
        .map(|brand| {
            let active: Vec<&Task> = active_tasks_for_brand(&brand.id, all_tasks).collect();
            let plan = plans.resolve(brand);
            let active_tasks = active.len();

            BrandLimitReport {
                brand_id: brand.id.clone(),
                brand_name: brand.name.clone(),
                client_name: client_name(brand, clients),
                active_tasks,
                limit: plan.max_active_tasks,
                plan: plan.label,
                status_breakdown: ActiveStatusBreakdown::from_tasks(active),
                remaining: plan.max_active_tasks.saturating_sub(active_tasks),
                over_limit: active_tasks > plan.max_active_tasks,
            }
        })
        .collect()
}

pub fn brand_capacity(brand: &Brand, tasks: &[Task], plans: &dyn PlanResolver) -> BrandCapacity {
    let active_tasks = active_tasks_for_brand(&brand.id, tasks).count();
    let limit = plans.resolve(brand).max_active_tasks;

    BrandCapacity {
        brand_id: brand.id.clone(),
        active_tasks,
        limit,
        remaining: limit.saturating_sub(active_tasks),
        can_accept_task: active_tasks < limit,
    }
}

fn client_name(brand: &Brand, clients: &[Client]) -> String {
    brand
        .client_id
        .as_deref()
        .and_then(|id| clients.iter().find(|client| client.id == id))
        .map(|client| client.name.clone())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
