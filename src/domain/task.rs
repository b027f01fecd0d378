use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::deserialize_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskStatus {
    Todo,
    Ongoing,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Ongoing, TaskStatus::Done];

    /// Value sent as `status` in a move request.
    pub fn as_wire(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::Ongoing => "ONGOING",
            TaskStatus::Done => "DONE",
        }
    }

    /// Endpoint listing the tasks currently in this status.
    pub fn fetch_path(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "/tasks/todo",
            TaskStatus::Ongoing => "/tasks/ongoing",
            TaskStatus::Done => "/tasks/complete",
        }
    }

    pub fn column_title(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::Ongoing => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "todo" | "to-do" => Some(TaskStatus::Todo),
            "ongoing" | "in-progress" | "progress" => Some(TaskStatus::Ongoing),
            "done" | "complete" | "completed" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TicketRef {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, rename = "ticket_id")]
    pub ticket: Option<TicketRef>,
    #[serde(default)]
    pub milestone: String,
    #[serde(default, rename = "task_name")]
    pub name: String,
    #[serde(default)]
    pub assign_to: String,
}

impl Task {
    pub fn ticket_title(&self) -> &str {
        self.ticket
            .as_ref()
            .map(|ticket| ticket.title.as_str())
            .unwrap_or("")
    }
}

/// A requested status change for one task. `from` is the bucket the task was
/// last seen in, `None` when the board has not observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub task_id: String,
    pub from: Option<TaskStatus>,
    pub to: TaskStatus,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == Some(self.to)
    }
}

/// Cached copy of the remote task set, one bucket per status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    todo: Vec<Task>,
    ongoing: Vec<Task>,
    done: Vec<Task>,
}

impl TaskBoard {
    pub fn bucket(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::Ongoing => &self.ongoing,
            TaskStatus::Done => &self.done,
        }
    }

    /// Replaces a bucket wholesale with freshly fetched tasks.
    pub fn replace(&mut self, status: TaskStatus, tasks: Vec<Task>) {
        match status {
            TaskStatus::Todo => self.todo = tasks,
            TaskStatus::Ongoing => self.ongoing = tasks,
            TaskStatus::Done => self.done = tasks,
        }
    }

    pub fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| self.bucket(*status).iter().any(|task| task.id == task_id))
    }

    pub fn transition(&self, task_id: &str, to: TaskStatus) -> Transition {
        Transition {
            task_id: task_id.to_string(),
            from: self.status_of(task_id),
            to,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.todo.len() + self.ongoing.len() + self.done.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Task ids that appear in more than one bucket. The buckets are fetched
    /// independently, so nothing prevents the backend from returning overlaps.
    pub fn overlapping_ids(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, Vec<TaskStatus>> = BTreeMap::new();
        for status in TaskStatus::ALL {
            for task in self.bucket(status) {
                let statuses = seen.entry(task.id.as_str()).or_default();
                if !statuses.contains(&status) {
                    statuses.push(status);
                }
            }
        }
        seen.into_iter()
            .filter(|(_, statuses)| statuses.len() > 1)
            .map(|(id, _)| id.to_string())
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn task(id: &str, name: &str) -> Task {
    Task {
        id: id.to_string(),
        ticket: Some(TicketRef {
            title: "Website revamp".to_string(),
        }),
        milestone: "M1".to_string(),
        name: name.to_string(),
        assign_to: "ada@corp.io".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_to_wire_and_paths() {
        assert_eq!(TaskStatus::Ongoing.as_wire(), "ONGOING");
        assert_eq!(TaskStatus::Todo.fetch_path(), "/tasks/todo");
        assert_eq!(TaskStatus::Ongoing.fetch_path(), "/tasks/ongoing");
        assert_eq!(TaskStatus::Done.fetch_path(), "/tasks/complete");
        assert_eq!(
            TaskStatus::from_str("in-progress"),
            Some(TaskStatus::Ongoing)
        );
        assert_eq!(TaskStatus::from_str("blocked"), None);
    }

    #[test]
    fn deserializes_backend_task() {
        let raw = r#"{
            "_id": "T1",
            "ticket_id": {"title": "Website revamp"},
            "milestone": "M1",
            "task_name": "Design header",
            "assign_to": "ada@corp.io"
        }"#;
        let parsed: Task = serde_json::from_str(raw).expect("valid task");
        assert_eq!(parsed.id, "T1");
        assert_eq!(parsed.ticket_title(), "Website revamp");
        assert_eq!(parsed.name, "Design header");
    }

    #[test]
    fn tracks_transitions_from_observed_bucket() {
        let mut board = TaskBoard::default();
        board.replace(TaskStatus::Todo, vec![task("T1", "Design header")]);

        let transition = board.transition("T1", TaskStatus::Ongoing);
        assert_eq!(transition.from, Some(TaskStatus::Todo));
        assert!(!transition.is_noop());

        let unknown = board.transition("T9", TaskStatus::Done);
        assert_eq!(unknown.from, None);

        board.replace(TaskStatus::Todo, Vec::new());
        board.replace(TaskStatus::Ongoing, vec![task("T1", "Design header")]);
        assert_eq!(board.status_of("T1"), Some(TaskStatus::Ongoing));
        assert!(board.transition("T1", TaskStatus::Ongoing).is_noop());
    }

    #[test]
    fn reports_tasks_in_several_buckets() {
        let mut board = TaskBoard::default();
        board.replace(TaskStatus::Todo, vec![task("T1", "a"), task("T2", "b")]);
        board.replace(TaskStatus::Done, vec![task("T2", "b")]);

        assert_eq!(board.len(), 3);
        assert_eq!(board.overlapping_ids(), vec!["T2".to_string()]);
    }
}
