//! Property-based tests for the aggregation stages
//!
//! These tests verify invariants that should hold for all boards:
//! - Status buckets never count more tasks than were given
//! - Filtering is idempotent
//! - A task is overdue exactly when it is past due and not delivered
//! - Brand usage always adds up to the active tasks of that brand

mod common;

use chrono::Duration;
use common::reference_time;
use proptest::prelude::*;
use studioplan::core::{Brand, Task, TaskPriority, TaskStatus};
use studioplan::metrics::{
    apply_filters, calculate_brand_limits, calculate_control_indicators, calculate_summary,
    calculate_task_stats, FilterSpec,
};
use studioplan::plan::FixedPlanResolver;

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Queued),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::InReview),
        Just(TaskStatus::Delivered),
        Just(TaskStatus::NeedsAttention),
        "[a-z]{3,8}".prop_map(|raw| TaskStatus::Unrecognized(raw)),
    ]
}

prop_compose! {
    fn task_strategy()(
        id in 0u32..10_000,
        status in status_strategy(),
        urgent in any::<bool>(),
        brand in prop::option::of(0u8..4),
        created_offset in prop::option::of(-5i64..120),
        due_offset in prop::option::of(-30i64..30),
    ) -> Task {
        let now = reference_time();
        let mut task = Task::new(id.to_string(), format!("Task {id}"));
        task.status = status;
        task.priority = if urgent { TaskPriority::Urgent } else { TaskPriority::Normal };
        task.brand_id = brand.map(|b| format!("b{b}"));
        task.created_at = created_offset.map(|days| now - Duration::days(days));
        task.due_date = due_offset.map(|days| now + Duration::hours(days * 7));
        task
    }
}

fn brands() -> Vec<Brand> {
    (0..4).map(|i| Brand::new(format!("b{i}"), format!("Brand {i}"))).collect()
}

proptest! {
    #[test]
    fn prop_status_buckets_never_exceed_input(tasks in prop::collection::vec(task_strategy(), 0..60)) {
        let stats = calculate_task_stats(&tasks);
        let unrecognized = tasks.iter().filter(|t| !t.status.is_recognized()).count();
        prop_assert_eq!(stats.total() + unrecognized, tasks.len());
        prop_assert!(stats.total() <= tasks.len());
    }

    #[test]
    fn prop_filtering_is_idempotent(
        tasks in prop::collection::vec(task_strategy(), 0..60),
        period in 1u32..90,
    ) {
        let now = reference_time();
        let filters = FilterSpec::new(period).with_brand("b1");
        let once = apply_filters(&tasks, &filters, now);
        let twice = apply_filters(&once, &filters, now);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_overdue_iff_past_due_and_undelivered(tasks in prop::collection::vec(task_strategy(), 0..60)) {
        let now = reference_time();
        let control = calculate_control_indicators(&tasks, &brands(), &FixedPlanResolver::basic(), now);
        let expected: Vec<&str> = tasks
            .iter()
            .filter(|t| t.due_date.is_some_and(|due| due < now) && t.status != TaskStatus::Delivered)
            .map(|t| t.id.as_str())
            .collect();
        let actual: Vec<&str> = control.overdue.items.iter().map(|i| i.task_id.as_str()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(calculate_summary(&tasks, now).overdue, control.overdue.count);
        prop_assert!(control.overdue.items.iter().all(|i| i.days_overdue >= 1));
    }

    #[test]
    fn prop_brand_usage_matches_active_tasks(tasks in prop::collection::vec(task_strategy(), 0..60)) {
        let limits = calculate_brand_limits(&brands(), &[], &tasks, &FixedPlanResolver::basic());
        for row in &limits {
            let active = tasks
                .iter()
                .filter(|t| t.brand_id.as_deref() == Some(row.brand_id.as_str()) && t.status.is_active())
                .count();
            let breakdown = &row.status_breakdown;
            prop_assert_eq!(row.active_tasks, active);
            prop_assert_eq!(breakdown.queued + breakdown.in_progress + breakdown.in_review, active);
            prop_assert_eq!(row.over_limit, active > row.limit);
        }
    }
}
