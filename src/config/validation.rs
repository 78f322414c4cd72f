//! Configuration validation with error accumulation.
//!
//! Every problem is collected before reporting so a broken config file can be
//! fixed in one pass.

use super::StudioConfig;
use crate::errors::{Error, Result};
use crate::plan::BASIC_TIER;

/// A single validation failure, addressed by its dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &StudioConfig) -> std::result::Result<(), Vec<ConfigValidationError>> {
    let errors: Vec<ConfigValidationError> = [
        validate_period(config),
        validate_recent_tasks(config),
        validate_tier_references(config),
    ]
    .into_iter()
    .flatten()
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `Result` wrapper over [`validate_config`] joining all messages.
pub fn validate_config_result(config: &StudioConfig) -> Result<()> {
    validate_config(config).map_err(|errors| Error::Validation(format_config_errors(&errors)))
}

pub fn format_config_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn validate_period(config: &StudioConfig) -> Vec<ConfigValidationError> {
    if config.filters.default_period_days == 0 {
        vec![ConfigValidationError::new(
            "filters.default_period_days",
            "must be at least 1 day",
        )]
    } else {
        Vec::new()
    }
}

fn validate_recent_tasks(config: &StudioConfig) -> Vec<ConfigValidationError> {
    if config.collaborators.recent_tasks == 0 {
        vec![ConfigValidationError::new(
            "collaborators.recent_tasks",
            "must be at least 1",
        )]
    } else {
        Vec::new()
    }
}

fn validate_tier_references(config: &StudioConfig) -> Vec<ConfigValidationError> {
    let plans = &config.plans;
    let tier_exists = |key: &str| key == BASIC_TIER || plans.tiers.contains_key(key);

    let default_error = (!tier_exists(&plans.default_tier)).then(|| {
        ConfigValidationError::new(
            "plans.default_tier",
            format!("unknown tier '{}'", plans.default_tier),
        )
    });

    let brand_errors = plans
        .brands
        .iter()
        .filter(|(_, tier)| !tier_exists(tier))
        .map(|(brand, tier)| {
            ConfigValidationError::new(
                format!("plans.brands.{brand}"),
                format!("unknown tier '{tier}'"),
            )
        });

    default_error.into_iter().chain(brand_errors).collect()
}
