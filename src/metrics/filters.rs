use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Task, TaskPriority, TaskStatus};

/// Reporting window plus optional equality filters.
///
/// Absent or blank filters match every task on that dimension.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Window size in days, measured backward from now.
    pub period_days: u32,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub brand_id: Option<String>,
    /// Collaborator display name.
    #[serde(default)]
    pub collaborator: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl FilterSpec {
    pub fn new(period_days: u32) -> Self {
        Self {
            period_days,
            ..Self::default()
        }
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = non_blank(client_id.into());
        self
    }

    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = non_blank(brand_id.into());
        self
    }

    pub fn with_collaborator(mut self, name: impl Into<String>) -> Self {
        self.collaborator = non_blank(name.into());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = non_blank(status.to_string()).map(TaskStatus::from);
        self
    }

    pub fn with_priority(mut self, priority: &str) -> Self {
        self.priority = non_blank(priority.to_string()).map(TaskPriority::from);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = non_blank(content_type.into());
        self
    }

    /// Earliest effective date kept by [`apply_filters`].
    /// Saturates at the earliest representable instant, keeping everything.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        days_before(now, self.period_days)
    }

    /// The equally sized window ending where the current one starts.
    pub fn prior_window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.cutoff(now);
        (days_before(end, self.period_days), end)
    }

    pub fn matches_attributes(&self, task: &Task) -> bool {
        matches_all(&self.build_predicates(), task)
    }

    fn build_predicates(&self) -> Vec<TaskPredicate<'_>> {
        let mut predicates: Vec<TaskPredicate<'_>> = Vec::new();

        if let Some(client_id) = self.client_id.as_deref().filter(|s| !s.is_empty()) {
            predicates.push(Box::new(move |t| t.client_id.as_deref() == Some(client_id)));
        }

        if let Some(brand_id) = self.brand_id.as_deref().filter(|s| !s.is_empty()) {
            predicates.push(Box::new(move |t| t.brand_id.as_deref() == Some(brand_id)));
        }

        if let Some(name) = self.collaborator.as_deref().filter(|s| !s.is_empty()) {
            predicates.push(Box::new(move |t| t.assigned_to.as_deref() == Some(name)));
        }

        if let Some(ref status) = self.status {
            predicates.push(Box::new(move |t| &t.status == status));
        }

        if let Some(ref priority) = self.priority {
            predicates.push(Box::new(move |t| &t.priority == priority));
        }

        if let Some(content_type) = self.content_type.as_deref().filter(|s| !s.is_empty()) {
            predicates.push(Box::new(move |t| {
                t.content_type.as_deref() == Some(content_type)
            }));
        }

        predicates
    }
}

type TaskPredicate<'a> = Box<dyn Fn(&Task) -> bool + 'a>;

fn matches_all(predicates: &[TaskPredicate<'_>], task: &Task) -> bool {
    predicates.iter().all(|predicate| predicate(task))
}

fn days_before(instant: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    instant
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Tasks whose effective date is on or after `now - period_days` and that
/// match every supplied filter. Tasks without a usable date are dropped.
pub fn apply_filters(tasks: &[Task], filters: &FilterSpec, now: DateTime<Utc>) -> Vec<Task> {
    apply_filters_in_window(tasks, filters, filters.cutoff(now), None)
}

/// Same as [`apply_filters`] over an explicit `[start, end)` window.
pub fn apply_filters_in_window(
    tasks: &[Task],
    filters: &FilterSpec,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Vec<Task> {
    let predicates = filters.build_predicates();
    tasks
        .iter()
        .filter(|task| in_window(task, start, end))
        .filter(|task| matches_all(&predicates, task))
        .cloned()
        .collect()
}

/// Tasks from the window immediately preceding the current one.
pub fn apply_prior_window_filters(
    tasks: &[Task],
    filters: &FilterSpec,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let (start, end) = filters.prior_window(now);
    apply_filters_in_window(tasks, filters, start, Some(end))
}

fn in_window(task: &Task, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> bool {
    match task.effective_date() {
        Some(date) => date >= start && end.is_none_or(|end| date < end),
        None => false,
    }
}
