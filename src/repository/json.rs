use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::RecordRepository;
use crate::core::{Brand, Client, Collaborator, Snapshot, Task};
use crate::errors::{Error, Result};

const TASKS: &str = "tasks";
const BRANDS: &str = "brands";
const CLIENTS: &str = "clients";
const COLLABORATORS: &str = "collaborators";

/// Records exported from the backend as JSON.
///
/// Either a single snapshot file holding every collection, or a directory
/// with one array per entity (`tasks.json`, `brands.json`, ...). Missing
/// entity files are empty collections.
#[derive(Debug)]
pub enum JsonRepository {
    Snapshot { path: PathBuf, snapshot: Snapshot },
    Directory(PathBuf),
}

impl JsonRepository {
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            tracing::debug!("Reading entity files from {}", path.display());
            return Ok(Self::Directory(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| Error::file_system("Failed to read snapshot", path, e))?;
        let snapshot = serde_json::from_str::<Snapshot>(&contents).map_err(|e| {
            Error::repository("snapshot", format!("{}: {}", path.display(), e))
        })?;
        tracing::debug!(
            tasks = snapshot.tasks.len(),
            brands = snapshot.brands.len(),
            "Loaded snapshot from {}",
            path.display()
        );

        Ok(Self::Snapshot {
            path: path.to_path_buf(),
            snapshot,
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Snapshot { path, .. } => path,
            Self::Directory(path) => path,
        }
    }

    fn load_collection<T: DeserializeOwned>(dir: &Path, entity: &str) -> Result<Vec<T>> {
        let path = dir.join(format!("{entity}.json"));
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, treating {} as empty", path.display(), entity);
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::file_system(format!("Failed to read {entity}"), path, e)),
        };

        serde_json::from_str::<Vec<T>>(&contents)
            .map_err(|e| Error::repository(entity, format!("{}: {}", path.display(), e)))
    }
}

impl RecordRepository for JsonRepository {
    fn tasks(&self) -> Result<Vec<Task>> {
        match self {
            Self::Snapshot { snapshot, .. } => Ok(snapshot.tasks.clone()),
            Self::Directory(dir) => Self::load_collection(dir, TASKS),
        }
    }

    fn brands(&self) -> Result<Vec<Brand>> {
        match self {
            Self::Snapshot { snapshot, .. } => Ok(snapshot.brands.clone()),
            Self::Directory(dir) => Self::load_collection(dir, BRANDS),
        }
    }

    fn clients(&self) -> Result<Vec<Client>> {
        match self {
            Self::Snapshot { snapshot, .. } => Ok(snapshot.clients.clone()),
            Self::Directory(dir) => Self::load_collection(dir, CLIENTS),
        }
    }

    fn collaborators(&self) -> Result<Vec<Collaborator>> {
        match self {
            Self::Snapshot { snapshot, .. } => Ok(snapshot.collaborators.clone()),
            Self::Directory(dir) => Self::load_collection(dir, COLLABORATORS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskStatus;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(
            &path,
            indoc! {r#"
                {
                  "tasks": [{"id": 1, "title": "Reel", "status": "in-review", "brand_id": 4}],
                  "brands": [{"id": 4, "name": "Acme", "client_id": 2}],
                  "clients": [{"id": 2, "name": "Acme Inc"}]
                }
            "#},
        )
        .unwrap();

        let repo = JsonRepository::open(&path).unwrap();
        let snapshot = repo.snapshot().unwrap();
        assert_eq!(snapshot.tasks[0].status, TaskStatus::InReview);
        assert_eq!(snapshot.tasks[0].brand_id.as_deref(), Some("4"));
        assert_eq!(snapshot.brands[0].client_id.as_deref(), Some("2"));
        assert!(snapshot.collaborators.is_empty());
    }

    #[test]
    fn test_directory_with_missing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("collaborators.json"),
            r#"[{"id": "u1", "nombre": "Ana", "especialidad": "diseño"}]"#,
        )
        .unwrap();

        let repo = JsonRepository::open(dir.path()).unwrap();
        let snapshot = repo.snapshot().unwrap();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.collaborators[0].name, "Ana");
        assert_eq!(snapshot.collaborators[0].specialty, "diseño");
    }

    #[test]
    fn test_malformed_collection_names_entity() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("brands.json"), r#"{"not": "an array"}"#).unwrap();

        let repo = JsonRepository::open(dir.path()).unwrap();
        let err = repo.brands().unwrap_err();
        assert!(matches!(err, Error::Repository { ref entity, .. } if entity == "brands"));
    }

    #[test]
    fn test_missing_snapshot_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = JsonRepository::open(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_nullable_columns_do_not_reject_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        fs::write(
            &path,
            indoc! {r#"
                {
                  "tasks": [
                    {"id": 1, "title": "Reel", "description": null, "status": "queued"},
                    {"id": 2, "title": "Story", "status": null, "priority": null}
                  ],
                  "collaborators": [{"id": "u1", "name": "Ana", "specialty": null}]
                }
            "#},
        )
        .unwrap();

        let snapshot = JsonRepository::open(&path).unwrap().snapshot().unwrap();
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.tasks[0].status, TaskStatus::Queued);
        assert_eq!(snapshot.tasks[1].status, TaskStatus::unspecified());
        assert_eq!(snapshot.collaborators[0].specialty, "");
    }
}
