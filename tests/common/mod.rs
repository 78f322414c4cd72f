// Shared builders for studioplan integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use studioplan::core::{Brand, Client, Collaborator, Snapshot, Task, TaskPriority, TaskStatus};

/// Fixed reference instant used across scenarios.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    reference_time() - Duration::days(days)
}

pub fn days_ahead(days: i64) -> DateTime<Utc> {
    reference_time() + Duration::days(days)
}

/// Fluent builder for tasks created one day before the reference time.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        let mut task = Task::new(id, format!("Task {id}"));
        task.created_at = Some(days_ago(1));
        Self { task }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn brand(mut self, brand_id: &str) -> Self {
        self.task.brand_id = Some(brand_id.to_string());
        self
    }

    pub fn client(mut self, client_id: &str) -> Self {
        self.task.client_id = Some(client_id.to_string());
        self
    }

    pub fn assigned_to(mut self, name: &str) -> Self {
        self.task.assigned_to = Some(name.to_string());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.task.created_at = Some(at);
        self
    }

    pub fn due(mut self, at: DateTime<Utc>) -> Self {
        self.task.due_date = Some(at);
        self
    }

    pub fn delivered(mut self, at: DateTime<Utc>) -> Self {
        self.task.status = TaskStatus::Delivered;
        self.task.delivered_at = Some(at);
        self
    }

    pub fn response_days(mut self, days: f64) -> Self {
        self.task.response_time_days = Some(days);
        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.task.content_type = Some(content_type.to_string());
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

pub fn brand(id: &str, name: &str, client_id: &str) -> Brand {
    let mut brand = Brand::new(id, name);
    brand.client_id = Some(client_id.to_string());
    brand
}

pub fn snapshot(
    tasks: Vec<Task>,
    brands: Vec<Brand>,
    clients: Vec<Client>,
    collaborators: Vec<Collaborator>,
) -> Snapshot {
    Snapshot {
        tasks,
        brands,
        clients,
        collaborators,
    }
}
