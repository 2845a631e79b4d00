use std::fmt;

use serde_json::Value;

/// Identity of a task row.
///
/// The server assigns every real task an opaque identifier. Tasks created
/// optimistically on the client carry a `Local` identifier until the create
/// call resolves; `Local` ids are never sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// Server-assigned identifier, required for any mutation.
    Remote(String),
    /// Client-generated placeholder identifier.
    Local(u64),
}

impl TaskId {
    /// The server-side identifier, if this task has one.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            TaskId::Remote(id) => Some(id.as_str()),
            TaskId::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, TaskId::Local(_))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Remote(id) => write!(f, "{}", id),
            TaskId::Local(n) => write!(f, "local-{}", n),
        }
    }
}

/// Per-row reconciliation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// At rest; local state agrees with the last server response.
    #[default]
    Clean,
    /// A mutation is in flight; further mutations on this row are rejected.
    Saving,
    /// Restored after a failed operation. Display cue only; cleared by the
    /// next wholesale replace.
    Reverted,
}

impl SyncState {
    pub fn is_saving(self) -> bool {
        self == SyncState::Saving
    }
}

/// A task as held by the controller.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    /// Display title. Non-empty after trimming for anything the client
    /// submits; server records are kept as-is.
    pub title: String,
    pub completed: bool,
    pub sync: SyncState,
    /// Raw server record, opaque to the controller. Placeholders carry
    /// `Value::Null` until the create call resolves.
    pub origin: Value,
}

impl Task {
    /// A provisional row standing in for a not-yet-created server record.
    pub fn placeholder(local_id: u64, title: String) -> Task {
        Task {
            id: TaskId::Local(local_id),
            title,
            completed: false,
            sync: SyncState::Saving,
            origin: Value::Null,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire-record normalization
// ---------------------------------------------------------------------------

/// Normalize a raw server record into a `Task`.
///
/// Services disagree on field names, so lookup is tolerant with a fixed
/// precedence:
///
/// - identifier: `id`, then `todo_id`, then `_id`; string or number
///   (numbers rendered in decimal). No resolvable identifier → `None`,
///   the record is dropped rather than shown in an indeterminate state.
/// - title: `title`, then `text`; missing → empty string.
/// - completion: `completed`, then `is_completed`, then `done`; the first
///   field *present* wins, interpreted truthily (`true`, nonzero number,
///   or `"true"`/`"1"`).
pub fn normalize_record(raw: &Value) -> Option<Task> {
    let id = ["id", "todo_id", "_id"]
        .iter()
        .find_map(|key| id_from(raw.get(*key)?))?;

    let title = ["title", "text"]
        .iter()
        .find_map(|key| raw.get(*key)?.as_str())
        .unwrap_or_default()
        .to_string();

    let completed = ["completed", "is_completed", "done"]
        .iter()
        .find_map(|key| {
            let v = raw.get(*key)?;
            if v.is_null() { None } else { Some(truthy(v)) }
        })
        .unwrap_or(false);

    Some(Task {
        id: TaskId::Remote(id),
        title,
        completed,
        sync: SyncState::Clean,
        origin: raw.clone(),
    })
}

fn id_from(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        _ => false,
    }
}
