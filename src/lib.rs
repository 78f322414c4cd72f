//! Resource-planning metrics for content studios.
//!
//! Turns snapshots of tasks, brands, clients and collaborators into the
//! dashboard figures: status buckets, per-brand plan usage, control
//! indicators, collaborator performance and a top-level summary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod plan;
pub mod repository;

// Re-export commonly used types
pub use crate::core::{Brand, Client, Collaborator, Snapshot, Task, TaskPriority, TaskStatus};
pub use crate::errors::{Error, Result};
pub use crate::metrics::{
    apply_filters, calculate_brand_limits, calculate_collaborator_metrics,
    calculate_control_indicators, calculate_summary, calculate_task_stats, DashboardReport,
    FilterSpec, MetricsCalculator,
};
pub use crate::plan::{BrandPlan, ConfiguredPlanResolver, FixedPlanResolver, PlanResolver};
pub use crate::repository::{InMemoryRepository, JsonRepository, RecordRepository};
