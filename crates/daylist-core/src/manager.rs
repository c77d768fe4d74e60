use tracing::{debug, info};

use crate::error::CoreError;
use crate::messages::MessageBundle;
use crate::prefs::PrefsStore;
use crate::task::{Task, TaskId, TaskSet};

/// Single writer for task state. Every mutation is persisted before the
/// call returns.
#[derive(Debug)]
pub struct TaskManager {
    store: PrefsStore,
    tasks: TaskSet,
}

impl TaskManager {
    #[tracing::instrument(skip(store, bundle))]
    pub fn load(mut store: PrefsStore, bundle: &MessageBundle) -> Result<Self, CoreError> {
        let tasks = store.get_tasks(bundle)?;
        info!(count = tasks.len(), "loaded task set");
        Ok(Self { store, tasks })
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    pub fn all_done(&self) -> bool {
        self.tasks.all_done()
    }

    /// An unknown id fails and leaves both the set and the store untouched.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn update_task(&mut self, id: TaskId, done: bool) -> Result<Task, CoreError> {
        let task = self.tasks.update_state(id, done)?.clone();
        self.store.set_tasks(&self.tasks)?;
        debug!(id = %task.id(), done = task.is_done(), "updated and persisted task");
        Ok(task)
    }

    #[tracing::instrument(skip(self, task), fields(id = %task.id()))]
    pub fn add_task(&mut self, task: Task) -> Result<(), CoreError> {
        self.tasks.add(task);
        self.store.set_tasks(&self.tasks)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn remove_task(&mut self, id: TaskId) -> Result<(), CoreError> {
        self.tasks.remove(id);
        self.store.set_tasks(&self.tasks)
    }

    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn reset(&mut self, tasks: TaskSet) -> Result<(), CoreError> {
        self.tasks = tasks;
        self.store.set_tasks(&self.tasks)
    }

    pub fn store_mut(&mut self) -> &mut PrefsStore {
        &mut self.store
    }
}
