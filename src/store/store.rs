use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::model::{NewTask, Task, TaskUpdate};

/// Remote persistence for tasks. The hosted database assigns ids and
/// creation timestamps; every mutation round-trips through it so the
/// in-memory state never drifts from a row the service accepted.
#[async_trait]
pub trait TaskStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError>;
    async fn create(&self, new_task: NewTask) -> Result<Task, StoreError>;
    async fn update(&self, id: Uuid, patch: TaskUpdate) -> Result<Task, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
