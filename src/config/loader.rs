use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::StudioConfig;
use super::validation::validate_config_result;
use crate::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".studioplan.toml";

/// Read the raw config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<StudioConfig> {
    let config = toml::from_str::<StudioConfig>(contents).map_err(|e| {
        Error::Configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
    })?;
    validate_config_result(&config)?;
    Ok(config)
}

/// Load an explicitly requested config file. Any failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<StudioConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    let config = parse_and_validate_config(&contents).context(path.display().to_string())?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading a discovered config file; problems are logged and skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<StudioConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{} ({}). Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up the tree
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the nearest config file.
pub fn load_config_from(start: PathBuf) -> StudioConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            StudioConfig::default()
        })
}

pub fn load_config() -> StudioConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            StudioConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollaboratorJoin;
    use crate::io::output::OutputFormat;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn test_full_file_parses() {
        let config = parse_and_validate_config(indoc! {r#"
            [filters]
            default_period_days = 90

            [plans]
            default_tier = "pro"

            [plans.tiers.pro]
            label = "Pro"
            max_active_tasks = 6

            [plans.brands]
            "b-1" = "basic"

            [collaborators]
            join = "id"
            recent_tasks = 5

            [output]
            default_format = "json"
        "#})
        .unwrap();

        assert_eq!(config.filters.default_period_days, 90);
        assert_eq!(config.plans.tiers["pro"].max_active_tasks, 6);
        assert_eq!(config.plans.brands["b-1"], "basic");
        assert_eq!(config.collaborators.join, CollaboratorJoin::Id);
        assert_eq!(config.collaborators.recent_tasks, 5);
        assert_eq!(config.output.default_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = parse_and_validate_config("[filters\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_invalid_values_are_validation_error() {
        let err = parse_and_validate_config("[filters]\ndefault_period_days = 0\n").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_load_config_from_finds_parent_file() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("clients").join("acme");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[filters]\ndefault_period_days = 14\n",
        )
        .unwrap();

        let config = load_config_from(nested);
        assert_eq!(config.filters.default_period_days, 14);
    }

    #[test]
    fn test_broken_discovered_file_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        let config = load_config_from(root.path().to_path_buf());
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let root = TempDir::new().unwrap();
        let err = load_config_from_path(&root.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_explicit_invalid_file_names_path() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("broken.toml");
        fs::write(&path, "[collaborators]
recent_tasks = 0
").unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
