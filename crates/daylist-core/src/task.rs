use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// Ids are unique per process and never persisted; only label and done
// state round-trip through the store.
static SEQUENCE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        Self(SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for TaskId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    label: String,
    done: bool,
}

impl Task {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_state(label, false)
    }

    pub fn with_state(label: impl Into<String>, done: bool) -> Self {
        Self {
            id: TaskId::next(),
            label: label.into(),
            done,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", if self.done { "X" } else { " " }, self.label)
    }
}

/// Persisted form of a task; ids are assigned fresh on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    pub label: String,
    pub done: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignored when the id or the label is already present.
    pub fn add(&mut self, task: Task) {
        let duplicate = self
            .tasks
            .iter()
            .any(|t| t.id == task.id || t.label == task.label);
        if !duplicate {
            self.tasks.push(task);
        }
    }

    /// Unknown ids are an error, never a no-op. The set is unchanged on
    /// failure.
    pub fn update_state(&mut self, id: TaskId, done: bool) -> Result<&Task, CoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::TaskNotFound { id })?;
        task.done = done;
        Ok(task)
    }

    pub fn remove(&mut self, id: TaskId) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// True for the empty set.
    pub fn all_done(&self) -> bool {
        self.tasks.iter().all(Task::is_done)
    }

    pub fn to_records(&self) -> Vec<TaskRecord> {
        self.tasks
            .iter()
            .map(|t| TaskRecord {
                label: t.label.clone(),
                done: t.done,
            })
            .collect()
    }

    pub fn from_records(records: Vec<TaskRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.add(Task::with_state(record.label, record.done));
        }
        set
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
