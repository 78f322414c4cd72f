use super::RecordRepository;
use crate::core::{Brand, Client, Collaborator, Snapshot, Task};
use crate::errors::Result;

/// Repository over records already held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    snapshot: Snapshot,
}

impl InMemoryRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl From<Snapshot> for InMemoryRepository {
    fn from(snapshot: Snapshot) -> Self {
        Self::new(snapshot)
    }
}

impl RecordRepository for InMemoryRepository {
    fn tasks(&self) -> Result<Vec<Task>> {
        Ok(self.snapshot.tasks.clone())
    }

    fn brands(&self) -> Result<Vec<Brand>> {
        Ok(self.snapshot.brands.clone())
    }

    fn clients(&self) -> Result<Vec<Client>> {
        Ok(self.snapshot.clients.clone())
    }

    fn collaborators(&self) -> Result<Vec<Collaborator>> {
        Ok(self.snapshot.collaborators.clone())
    }

    fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.snapshot.clone())
    }
}
