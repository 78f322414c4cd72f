//! Dashboard metrics over task, brand and collaborator snapshots.
//!
//! Every stage is a pure function over borrowed slices; the reference
//! instant `now` is always passed in. [`MetricsCalculator`] wires the stages
//! together the way the dashboard consumes them.

pub mod brand_limits;
pub mod breakdown;
pub mod collaborators;
pub mod control;
pub mod filters;
pub mod status;
pub mod summary;

pub use brand_limits::{
    brand_capacity, calculate_brand_limits, ActiveStatusBreakdown, BrandCapacity,
    BrandLimitReport,
};
pub use breakdown::{calculate_content_type_breakdown, calculate_priority_breakdown, BreakdownEntry};
pub use collaborators::{
    calculate_collaborator_metrics, CollaboratorOptions, CollaboratorReport, RecentTask,
};
pub use control::{
    calculate_control_indicators, calculate_control_indicators_with_baseline, ControlIndicators,
    Indicator,
};
pub use filters::{apply_filters, apply_filters_in_window, apply_prior_window_filters, FilterSpec};
pub use status::{calculate_task_stats, TaskStats};
pub use summary::{calculate_summary, Summary};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Snapshot;
use crate::plan::{FixedPlanResolver, PlanResolver};

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

pub(crate) fn round_to_usize(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.round() as usize
    } else {
        0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub filters: FilterSpec,
    pub summary: Summary,
    pub task_stats: TaskStats,
    pub brand_limits: Vec<BrandLimitReport>,
    pub control: ControlIndicators,
    pub collaborators: Vec<CollaboratorReport>,
    pub content_types: Vec<BreakdownEntry>,
    pub priorities: Vec<BreakdownEntry>,
}

pub struct MetricsCalculator<'a> {
    plans: &'a dyn PlanResolver,
    collaborator_options: CollaboratorOptions,
    now: DateTime<Utc>,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(plans: &'a dyn PlanResolver, collaborator_options: CollaboratorOptions) -> Self {
        Self {
            plans,
            collaborator_options,
            now: Utc::now(),
        }
    }

    /// Pin the reference instant used for windows and due-date checks.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Run the whole pipeline. Brand limits look at every task in the
    /// snapshot; everything else sees only the filtered window.
    pub fn calculate(&self, snapshot: &Snapshot, filters: &FilterSpec) -> DashboardReport {
        let _span = tracing::debug_span!("calculate_dashboard", period_days = filters.period_days)
            .entered();

        let current = apply_filters(&snapshot.tasks, filters, self.now);
        let prior = apply_prior_window_filters(&snapshot.tasks, filters, self.now);
        tracing::debug!(
            total = snapshot.tasks.len(),
            current = current.len(),
            prior = prior.len(),
            "filtered tasks"
        );

        let report = DashboardReport {
            generated_at: self.now,
            filters: filters.clone(),
            summary: calculate_summary(&current, self.now),
            task_stats: calculate_task_stats(&current),
            brand_limits: calculate_brand_limits(
                &snapshot.brands,
                &snapshot.clients,
                &snapshot.tasks,
                self.plans,
            ),
            control: calculate_control_indicators_with_baseline(
                &current,
                &prior,
                &snapshot.brands,
                self.plans,
                self.now,
                filters.cutoff(self.now),
            ),
            collaborators: calculate_collaborator_metrics(
                &current,
                &snapshot.collaborators,
                self.collaborator_options,
                self.now,
            ),
            content_types: calculate_content_type_breakdown(&current),
            priorities: calculate_priority_breakdown(&current),
        };

        let unrecognized = current.len() - report.task_stats.total();
        if unrecognized > 0 {
            tracing::debug!(unrecognized, "tasks with unrecognized status left out of buckets");
        }
        tracing::info!(
            tasks = report.summary.total,
            flags = report.control.total_flags(),
            "dashboard calculated"
        );
        report
    }
}

impl Default for MetricsCalculator<'static> {
    fn default() -> Self {
        static BASIC: std::sync::OnceLock<FixedPlanResolver> = std::sync::OnceLock::new();
        Self::new(
            BASIC.get_or_init(FixedPlanResolver::basic),
            CollaboratorOptions::default(),
        )
    }
}
