//! Canonical record types consumed by the metrics pipeline.
//!
//! Records arrive from the external record store in more than one shape:
//! normalized English field names, camelCase names from the web client, and
//! older localized (Spanish) names. All of that is absorbed here, in the
//! serde layer, so the aggregation code only ever sees one typed structure
//! per entity. See [`boundary`] for the lenient id/date/number decoding.

pub mod boundary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a creative task.
///
/// Unknown raw values are kept as [`TaskStatus::Unrecognized`] instead of
/// failing deserialization; the aggregators drop them from status buckets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Queued,
    InProgress,
    InReview,
    Delivered,
    NeedsAttention,
    Unrecognized(String),
}

impl TaskStatus {
    /// The five recognized statuses, in bucket order.
    pub const KNOWN: [TaskStatus; 5] = [
        TaskStatus::Queued,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::NeedsAttention,
        TaskStatus::Delivered,
    ];

    /// Statuses that occupy a slot in a brand's plan.
    pub const ACTIVE: [TaskStatus; 3] = [
        TaskStatus::Queued,
        TaskStatus::InProgress,
        TaskStatus::InReview,
    ];

    /// Status of a record that carries none. Counts in no bucket.
    pub fn unspecified() -> Self {
        Self::Unrecognized(String::new())
    }

    pub fn parse(raw: &str) -> Self {
        match normalize_token(raw).as_str() {
            "queued" | "en-cola" | "pendiente" => Self::Queued,
            "in-progress" | "en-proceso" => Self::InProgress,
            "in-review" | "en-revision" | "en-revisión" => Self::InReview,
            "delivered" | "entregado" | "entregada" | "completado" => Self::Delivered,
            "needs-attention" | "requiere-atencion" | "requiere-atención" => {
                Self::NeedsAttention
            }
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in-progress",
            Self::InReview => "in-review",
            Self::Delivered => "delivered",
            Self::NeedsAttention => "needs-attention",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Human-facing label used by the terminal and markdown writers.
    pub fn label(&self) -> &str {
        match self {
            Self::Queued => "Queued",
            Self::InProgress => "In progress",
            Self::InReview => "In review",
            Self::Delivered => "Delivered",
            Self::NeedsAttention => "Needs attention",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress | Self::InReview)
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskPriority {
    #[default]
    Normal,
    High,
    Urgent,
    Unrecognized(String),
}

impl TaskPriority {
    pub fn parse(raw: &str) -> Self {
        match normalize_token(raw).as_str() {
            "normal" | "media" | "baja" => Self::Normal,
            "high" | "alta" => Self::High,
            "urgent" | "urgente" => Self::Urgent,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Urgent)
    }
}

impl From<String> for TaskPriority {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TaskPriority> for String {
    fn from(priority: TaskPriority) -> Self {
        priority.as_str().to_string()
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "boundary::deserialize_id")]
    pub id: String,

    #[serde(default, alias = "titulo", deserialize_with = "boundary::deserialize_text")]
    pub title: String,

    #[serde(default, alias = "descripcion", deserialize_with = "boundary::deserialize_text")]
    pub description: String,

    #[serde(
        default,
        alias = "marca_id",
        alias = "brandId",
        deserialize_with = "boundary::deserialize_optional_id"
    )]
    pub brand_id: Option<String>,

    #[serde(
        default,
        alias = "cliente_id",
        alias = "clientId",
        deserialize_with = "boundary::deserialize_optional_id"
    )]
    pub client_id: Option<String>,

    /// Display name of the assigned collaborator.
    #[serde(
        default,
        alias = "responsable",
        alias = "collaborator",
        deserialize_with = "boundary::deserialize_optional_text"
    )]
    pub assigned_to: Option<String>,

    #[serde(
        default,
        alias = "colaborador_id",
        alias = "collaboratorId",
        deserialize_with = "boundary::deserialize_optional_id"
    )]
    pub collaborator_id: Option<String>,

    #[serde(
        default = "TaskStatus::unspecified",
        alias = "estado",
        deserialize_with = "boundary::deserialize_status"
    )]
    pub status: TaskStatus,

    #[serde(default, alias = "prioridad", deserialize_with = "boundary::deserialize_priority")]
    pub priority: TaskPriority,

    #[serde(
        default,
        alias = "fecha_solicitud",
        alias = "requestedDate",
        deserialize_with = "boundary::deserialize_lenient_date"
    )]
    pub requested_date: Option<DateTime<Utc>>,

    #[serde(
        default,
        alias = "fecha_entrega",
        alias = "dueDate",
        deserialize_with = "boundary::deserialize_lenient_date"
    )]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(
        default,
        alias = "fecha_creacion",
        alias = "createdAt",
        deserialize_with = "boundary::deserialize_lenient_date"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        alias = "tipo_contenido",
        alias = "contentType",
        deserialize_with = "boundary::deserialize_optional_text"
    )]
    pub content_type: Option<String>,

    #[serde(
        default,
        alias = "tiempo_respuesta",
        alias = "responseTime",
        deserialize_with = "boundary::deserialize_optional_number"
    )]
    pub response_time_days: Option<f64>,

    #[serde(
        default,
        alias = "fecha_entrega_real",
        alias = "deliveredAt",
        deserialize_with = "boundary::deserialize_lenient_date"
    )]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Date used to place the task inside a reporting window: creation
    /// timestamp, falling back to the requested date.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.requested_date)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_delivered(&self) -> bool {
        self.status.is_delivered()
    }

    /// Due date strictly before `now` and not yet delivered.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_delivered() && self.is_past_due(now)
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }

    /// Delivered no later than the due date. Missing either date counts as late.
    pub fn delivered_on_time(&self) -> bool {
        match (self.delivered_at, self.due_date) {
            (Some(delivered), Some(due)) => delivered <= due,
            _ => false,
        }
    }

    pub fn belongs_to_brand(&self, brand_id: &str) -> bool {
        self.brand_id.as_deref() == Some(brand_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(deserialize_with = "boundary::deserialize_id")]
    pub id: String,

    #[serde(default, alias = "nombre", deserialize_with = "boundary::deserialize_text")]
    pub name: String,

    #[serde(
        default,
        alias = "cliente_id",
        alias = "clientId",
        deserialize_with = "boundary::deserialize_optional_id"
    )]
    pub client_id: Option<String>,

    /// Plan tier key. Only consulted by a configured plan resolver.
    #[serde(default, alias = "plan_id", deserialize_with = "boundary::deserialize_optional_text")]
    pub plan: Option<String>,
}

impl Brand {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "boundary::deserialize_id")]
    pub id: String,

    #[serde(default, alias = "nombre", deserialize_with = "boundary::deserialize_text")]
    pub name: String,
}

impl Client {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(deserialize_with = "boundary::deserialize_id")]
    pub id: String,

    #[serde(default, alias = "nombre", deserialize_with = "boundary::deserialize_text")]
    pub name: String,

    #[serde(default, alias = "especialidad", deserialize_with = "boundary::deserialize_text")]
    pub specialty: String,
}

impl Collaborator {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Everything one calculation pass reads, materialized in memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, alias = "tareas")]
    pub tasks: Vec<Task>,
    #[serde(default, alias = "marcas")]
    pub brands: Vec<Brand>,
    #[serde(default, alias = "clientes")]
    pub clients: Vec<Client>,
    #[serde(default, alias = "colaboradores")]
    pub collaborators: Vec<Collaborator>,
}
