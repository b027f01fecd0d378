use std::fmt::Write as _;

use crate::domain::task::{Task, TaskBoard, TaskStatus};
use crate::form::FormController;
use crate::form::field::{FieldKind, SelectOption};

pub fn render_board(board: &TaskBoard) -> String {
    let mut out = String::new();
    for status in TaskStatus::ALL {
        let bucket = board.bucket(status);
        let _ = writeln!(out, "{} ({})", status.column_title(), bucket.len());
        if bucket.is_empty() {
            let _ = writeln!(out, "  -");
        }
        for task in bucket {
            let _ = writeln!(out, "  {}", render_task(task));
        }
    }
    out
}

fn render_task(task: &Task) -> String {
    let mut line = format!("[{}] {}", task.id, task.name);
    for detail in [
        task.ticket_title(),
        task.milestone.as_str(),
        task.assign_to.as_str(),
    ] {
        if !detail.is_empty() {
            line.push_str(" | ");
            line.push_str(detail);
        }
    }
    line
}

pub fn render_options(options: &[SelectOption]) -> String {
    let width = options
        .iter()
        .map(|option| option.value.len())
        .max()
        .unwrap_or(0);
    options
        .iter()
        .map(|option| format!("  {:<width$}  {}\n", option.value, option.label))
        .collect()
}

pub fn render_form(form: &FormController) -> String {
    let mut out = String::new();
    for field in form.fields() {
        let value = form.value(field.name);
        let shown = match &field.kind {
            FieldKind::Select(options) => options
                .iter()
                .find(|option| option.value == value)
                .map(|option| format!("{} ({})", option.label, option.value))
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        };
        let _ = writeln!(out, "{:<24} {}", field.label, shown);
    }
    out
}
