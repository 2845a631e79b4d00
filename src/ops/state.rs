use chrono::{DateTime, Local};
use serde_json::Value;

use crate::model::{SyncState, Task, TaskId, normalize_record};

/// A task removed optimistically, with enough context to put it back.
#[derive(Debug, Clone)]
pub struct Removed {
    pub task: Task,
    pub index: usize,
}

/// The canonical in-memory task list.
///
/// Exclusively owned by the controller; rendering code reads it, every
/// mutation goes through a named transition here. None of these methods
/// touch the network.
#[derive(Debug, Default)]
pub struct ListState {
    tasks: Vec<Task>,
    /// Single current error banner. Not accumulated.
    error: Option<String>,
    /// True while the initial fetch is outstanding; gates mutating input.
    loading: bool,
    next_local_id: u64,
    last_refreshed: Option<DateTime<Local>>,
}

impl ListState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Count of rows with a mutation in flight.
    pub fn saving_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.sync.is_saving()).count()
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// A user-initiated operation is starting: the previous banner is stale.
    pub fn begin_op(&mut self) {
        self.error = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Surface a failure as the single current banner.
    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Replace the whole list from raw server records. Records that do not
    /// normalize (no resolvable identifier) are dropped, never shown.
    pub fn replace_all(&mut self, records: &[Value]) {
        self.tasks = records.iter().filter_map(normalize_record).collect();
        self.last_refreshed = Some(Local::now());
    }

    /// Prepend a placeholder row for a just-submitted title and return its
    /// local id.
    pub fn insert_placeholder(&mut self, title: String) -> TaskId {
        let task = Task::placeholder(self.next_local_id, title);
        self.next_local_id += 1;
        let id = task.id.clone();
        self.tasks.insert(0, task);
        id
    }

    /// Swap the placeholder (wherever it sits) for the authoritative task.
    pub fn resolve_placeholder(&mut self, local_id: &TaskId, task: Task) {
        if let Some(slot) = self.find_mut(local_id) {
            *slot = task;
        }
    }

    /// Mark a row as having a mutation in flight. Returns false (and the
    /// caller must not proceed) if the row is missing or already saving:
    /// one mutation per task id at a time, enforced.
    pub fn mark_saving(&mut self, id: &TaskId) -> bool {
        match self.find_mut(id) {
            Some(task) if !task.sync.is_saving() => {
                task.sync = SyncState::Saving;
                true
            }
            _ => false,
        }
    }

    /// In-flight mutation settled; the row is at rest again.
    pub fn clear_saving(&mut self, id: &TaskId) {
        if let Some(task) = self.find_mut(id)
            && task.sync.is_saving()
        {
            task.sync = SyncState::Clean;
        }
    }

    pub fn set_completed(&mut self, id: &TaskId, completed: bool) {
        if let Some(task) = self.find_mut(id) {
            task.completed = completed;
        }
    }

    pub fn set_title(&mut self, id: &TaskId, title: String) {
        if let Some(task) = self.find_mut(id) {
            task.title = title;
        }
    }

    /// Remove a row optimistically, returning it with its index so a failed
    /// delete can roll back.
    pub fn remove(&mut self, id: &TaskId) -> Option<Removed> {
        let index = self.tasks.iter().position(|t| &t.id == id)?;
        Some(Removed {
            task: self.tasks.remove(index),
            index,
        })
    }

    /// Roll a failed delete back: reinsert at the original position.
    pub fn restore(&mut self, removed: Removed) {
        let mut task = removed.task;
        task.sync = SyncState::Reverted;
        let index = removed.index.min(self.tasks.len());
        self.tasks.insert(index, task);
    }
}
