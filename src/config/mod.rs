// Core configuration types
mod core;
mod loader;
pub mod validation;

pub use self::core::{
    CollaboratorJoin, CollaboratorsConfig, FiltersConfig, OutputConfig, PlanTierConfig,
    PlansConfig, StudioConfig,
};

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

pub use validation::{
    format_config_errors, validate_config, validate_config_result, ConfigValidationError,
};

/// Default contents written by `studioplan init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# studioplan configuration

[filters]
# Days counted backward from now when --period is not given
default_period_days = 30

[plans]
default_tier = "basic"

[plans.tiers.basic]
label = "Basic"
max_active_tasks = 3

# Assign brands to tiers by id
[plans.brands]
# "brand-7" = "pro"

[collaborators]
# "name" matches tasks by assignee display name, "id" prefers collaborator ids
join = "name"
recent_tasks = 3

[output]
default_format = "terminal"
"#;
