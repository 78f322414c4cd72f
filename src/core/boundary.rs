//! Lenient decoding for fields that arrive in inconsistent shapes.
//!
//! Identifiers show up as strings or numbers, dates as RFC 3339, naive
//! date-times, bare dates or epoch milliseconds, and numeric fields
//! sometimes as strings. Values that cannot be decoded become `None`
//! rather than failing the whole record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use super::{TaskPriority, TaskStatus};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl RawScalar {
    fn into_id(self) -> Option<String> {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some((f as i64).to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(_) => None,
        }
    }
}

pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawScalar::deserialize(deserializer)?;
    raw.into_id()
        .ok_or_else(|| serde::de::Error::custom("record id must be a non-empty string or number"))
}

pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawScalar>::deserialize(deserializer)?.and_then(RawScalar::into_id))
}

pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Free text where `null` or a non-string scalar must not reject the record.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<RawScalar>::deserialize(deserializer)? {
        Some(RawScalar::Text(text)) => text,
        Some(RawScalar::Int(n)) => n.to_string(),
        Some(RawScalar::Float(f)) => f.to_string(),
        Some(RawScalar::Bool(_)) | None => String::new(),
    };
    Ok(text)
}

/// `null` is treated like an absent status: unrecognized, not queued.
pub fn deserialize_status<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?
        .map(|raw| TaskStatus::parse(&raw))
        .unwrap_or_else(TaskStatus::unspecified))
}

pub fn deserialize_priority<'de, D>(deserializer: D) -> Result<TaskPriority, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?
        .map(|raw| TaskPriority::parse(&raw))
        .unwrap_or_default())
}

pub fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<RawScalar>::deserialize(deserializer)? {
        Some(RawScalar::Int(n)) => Some(n as f64),
        Some(RawScalar::Float(f)) => Some(f),
        Some(RawScalar::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(RawScalar::Bool(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

pub fn deserialize_lenient_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<RawScalar>::deserialize(deserializer)? {
        Some(RawScalar::Text(text)) => parse_lenient_date(&text),
        Some(RawScalar::Int(millis)) => Utc.timestamp_millis_opt(millis).single(),
        Some(RawScalar::Float(millis)) => Utc.timestamp_millis_opt(millis as i64).single(),
        Some(RawScalar::Bool(_)) | None => None,
    };
    Ok(parsed)
}

/// Parse the date formats seen in exported records. Naive values are UTC.
pub fn parse_lenient_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }

    tracing::debug!(value = raw, "discarding unparseable date");
    None
}
