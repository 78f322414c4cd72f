//! Read-only access to the external record store.
//!
//! The metrics pipeline never reaches for ambient state; callers hand it a
//! [`RecordRepository`] (or a [`Snapshot`] already pulled from one).

mod json;
mod memory;

pub use json::JsonRepository;
pub use memory::InMemoryRepository;

use crate::core::{Brand, Client, Collaborator, Snapshot, Task};
use crate::errors::Result;

pub trait RecordRepository {
    fn tasks(&self) -> Result<Vec<Task>>;
    fn brands(&self) -> Result<Vec<Brand>>;
    fn clients(&self) -> Result<Vec<Client>>;
    fn collaborators(&self) -> Result<Vec<Collaborator>>;

    /// Materialize every collection for one calculation pass.
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            tasks: self.tasks()?,
            brands: self.brands()?,
            clients: self.clients()?,
            collaborators: self.collaborators()?,
        })
    }
}
