use serde::Serialize;
use serde_json::Value;

use crate::model::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

impl From<&Task> for TaskJson {
    fn from(task: &Task) -> TaskJson {
        TaskJson {
            id: task.id.to_string(),
            title: task.title.clone(),
            completed: task.completed,
        }
    }
}

// ---------------------------------------------------------------------------
// Plain output
// ---------------------------------------------------------------------------

/// One task per line: checkbox, id, title.
pub fn print_tasks_plain(tasks: &[Task]) {
    let ids: Vec<String> = tasks.iter().map(|t| t.id.to_string()).collect();
    let id_width = ids.iter().map(|id| id.len()).max().unwrap_or(0);
    for (task, id) in tasks.iter().zip(&ids) {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("[{}] {:<id_width$}  {}", mark, id, task.title);
    }
}

pub fn print_tasks_json(tasks: &[Task]) {
    let out: Vec<TaskJson> = tasks.iter().map(TaskJson::from).collect();
    println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
}

/// A single task, plain or JSON.
pub fn print_task(task: &Task, json: bool) {
    if json {
        let out = TaskJson::from(task);
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    } else {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("[{}] {}  {}", mark, task.id, task.title);
    }
}

/// A raw server record we could not normalize, shown as-is.
pub fn print_raw(record: &Value) {
    println!("{}", serde_json::to_string_pretty(record).unwrap_or_default());
}
