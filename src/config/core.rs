use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::io::output::OutputFormat;
use crate::plan::{BASIC_MAX_ACTIVE_TASKS, BASIC_TIER};

/// Root configuration structure, read from `.studioplan.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Reporting window defaults
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Plan tiers and brand assignments
    #[serde(default)]
    pub plans: PlansConfig,

    /// Collaborator report options
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Days counted backward from now when `--period` is not given.
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            default_period_days: default_period_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlansConfig {
    #[serde(default = "default_tier")]
    pub default_tier: String,

    /// Tier key -> tier definition. `basic` exists even when omitted.
    #[serde(default = "default_tiers")]
    pub tiers: BTreeMap<String, PlanTierConfig>,

    /// Brand id -> tier key.
    #[serde(default)]
    pub brands: BTreeMap<String, String>,
}

impl Default for PlansConfig {
    fn default() -> Self {
        Self {
            default_tier: default_tier(),
            tiers: default_tiers(),
            brands: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTierConfig {
    #[serde(default)]
    pub label: Option<String>,
    pub max_active_tasks: usize,
}

/// How tasks are attributed to collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorJoin {
    /// Display-name equality against the task's assignee.
    #[default]
    Name,
    /// Collaborator id when the task carries one, display name otherwise.
    #[serde(alias = "id_with_name_fallback")]
    Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorsConfig {
    #[serde(default)]
    pub join: CollaboratorJoin,

    /// Number of trailing tasks listed per collaborator.
    #[serde(default = "default_recent_tasks")]
    pub recent_tasks: usize,
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            join: CollaboratorJoin::default(),
            recent_tasks: default_recent_tasks(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: Option<OutputFormat>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

fn default_period_days() -> u32 {
    30
}

fn default_tier() -> String {
    BASIC_TIER.to_string()
}

fn default_tiers() -> BTreeMap<String, PlanTierConfig> {
    BTreeMap::from([(
        BASIC_TIER.to_string(),
        PlanTierConfig {
            label: Some("Basic".to_string()),
            max_active_tasks: BASIC_MAX_ACTIVE_TASKS,
        },
    )])
}

fn default_recent_tasks() -> usize {
    3
}
