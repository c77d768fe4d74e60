use tracing::debug;

use crate::error::CoreError;
use crate::lifecycle::{CloseCoordinator, CloseState};
use crate::manager::TaskManager;
use crate::prefs::UiPreferences;
use crate::task::{Task, TaskId};

/// Entry point for a checkbox toggle in the task list.
pub trait TaskStateChangeListener {
    fn update_task_state(&mut self, id: TaskId, done: bool) -> Result<Task, CoreError>;
}

/// Entry point for the settings surface's save button.
pub trait PreferencesChangeListener {
    fn save_preferences(&mut self, prefs: &UiPreferences) -> Result<(), CoreError>;
}

/// Wires UI events to the manager and close coordinator.
pub struct AppEvents<'a> {
    manager: &'a mut TaskManager,
    coordinator: &'a mut CloseCoordinator,
}

impl<'a> AppEvents<'a> {
    pub fn new(manager: &'a mut TaskManager, coordinator: &'a mut CloseCoordinator) -> Self {
        Self {
            manager,
            coordinator,
        }
    }

    pub fn close_state(&self) -> CloseState {
        self.coordinator.state()
    }
}

impl TaskStateChangeListener for AppEvents<'_> {
    fn update_task_state(&mut self, id: TaskId, done: bool) -> Result<Task, CoreError> {
        let task = self.manager.update_task(id, done)?;
        let state = self.coordinator.task_completed(self.manager.all_done());
        debug!(id = %id, done, ?state, "task state change handled");
        Ok(task)
    }
}

impl PreferencesChangeListener for AppEvents<'_> {
    fn save_preferences(&mut self, prefs: &UiPreferences) -> Result<(), CoreError> {
        self.manager.store_mut().set_ui_preferences(prefs)
    }
}
