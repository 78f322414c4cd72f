use serde::{Deserialize, Serialize};

use crate::core::{Task, TaskStatus};

/// Task counts per recognized status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TaskStats {
    pub queued: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub needs_attention: usize,
    pub delivered: usize,
}

impl TaskStats {
    pub fn get(&self, status: &TaskStatus) -> usize {
        match status {
            TaskStatus::Queued => self.queued,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::InReview => self.in_review,
            TaskStatus::NeedsAttention => self.needs_attention,
            TaskStatus::Delivered => self.delivered,
            TaskStatus::Unrecognized(_) => 0,
        }
    }

    /// Buckets in fixed order: queued, in-progress, in-review,
    /// needs-attention, delivered.
    pub fn buckets(&self) -> [(TaskStatus, usize); 5] {
        TaskStatus::KNOWN.map(|status| {
            let count = self.get(&status);
            (status, count)
        })
    }

    pub fn total(&self) -> usize {
        self.queued + self.in_progress + self.in_review + self.needs_attention + self.delivered
    }

    fn record(mut self, status: &TaskStatus) -> Self {
        match status {
            TaskStatus::Queued => self.queued += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::InReview => self.in_review += 1,
            TaskStatus::NeedsAttention => self.needs_attention += 1,
            TaskStatus::Delivered => self.delivered += 1,
            TaskStatus::Unrecognized(_) => {}
        }
        self
    }
}

/// Count tasks per status bucket. Unrecognized statuses are not counted.
pub fn calculate_task_stats(tasks: &[Task]) -> TaskStats {
    tasks
        .iter()
        .fold(TaskStats::default(), |stats, task| stats.record(&task.status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: &str) -> Task {
        let mut task = Task::new(status, status);
        task.status = TaskStatus::parse(status);
        task
    }

    #[test]
    fn test_empty_input_has_all_buckets_at_zero() {
        let stats = calculate_task_stats(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.buckets().len(), 5);
    }

    #[test]
    fn test_counts_each_status() {
        let tasks: Vec<Task> = [
            "queued",
            "queued",
            "in-progress",
            "in-review",
            "needs-attention",
            "delivered",
            "delivered",
            "delivered",
        ]
        .into_iter()
        .map(with_status)
        .collect();

        let stats = calculate_task_stats(&tasks);
        assert_eq!(stats.queued, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.in_review, 1);
        assert_eq!(stats.needs_attention, 1);
        assert_eq!(stats.delivered, 3);
        assert_eq!(stats.total(), tasks.len());
    }

    #[test]
    fn test_unrecognized_statuses_are_dropped() {
        let tasks = vec![with_status("queued"), with_status("archived"), with_status("")];
        let stats = calculate_task_stats(&tasks);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_bucket_order_is_fixed() {
        let order: Vec<TaskStatus> = TaskStats::default()
            .buckets()
            .into_iter()
            .map(|(status, _)| status)
            .collect();
        assert_eq!(order, TaskStatus::KNOWN.to_vec());
    }

    #[test]
    fn test_serialized_keys_match_wire_names() {
        let json = serde_json::to_value(TaskStats::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["queued", "in-progress", "in-review", "needs-attention", "delivered"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
