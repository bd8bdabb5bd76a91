//! Ordered, index-addressed task list stored under `tasks`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone)]
pub struct TaskList {
    store: Arc<dyn KvStore>,
}

impl TaskList {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        kv::load_or_default(&*self.store, keys::TASKS).await
    }

    /// Append a task. Surrounding whitespace is trimmed; blank text is rejected.
    pub async fn add(&self, text: &str) -> Result<Vec<Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText("Task".into()).into());
        }
        let mut tasks = self.list().await?;
        tasks.push(Task {
            text: text.to_string(),
            completed: false,
        });
        self.save(&tasks).await?;
        Ok(tasks)
    }

    /// Flip the completed flag of the task at `index`.
    pub async fn toggle(&self, index: usize) -> Result<Vec<Task>> {
        let mut tasks = self.list().await?;
        let len = tasks.len();
        let task = tasks.get_mut(index).ok_or_else(|| out_of_bounds(index, len))?;
        task.completed = !task.completed;
        self.save(&tasks).await?;
        Ok(tasks)
    }

    pub async fn delete(&self, index: usize) -> Result<Vec<Task>> {
        let mut tasks = self.list().await?;
        if index >= tasks.len() {
            return Err(out_of_bounds(index, tasks.len()).into());
        }
        tasks.remove(index);
        self.save(&tasks).await?;
        Ok(tasks)
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        kv::save(&*self.store, keys::TASKS, tasks).await
    }
}

fn out_of_bounds(index: usize, len: usize) -> ValidationError {
    ValidationError::OutOfBounds {
        collection: "tasks".into(),
        index,
        len,
    }
}
