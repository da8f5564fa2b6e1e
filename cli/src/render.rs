//! Plain-text rendering of the todo list.

use optimist_todos::{LoadStatus, TodoListState};

/// Render the visible todos, footer and error banner
#[must_use]
pub fn render(state: &TodoListState) -> String {
    let mut lines = Vec::new();

    match state.load_status {
        LoadStatus::NotRequested | LoadStatus::Loading => lines.push("  loading...".to_string()),
        LoadStatus::Loaded | LoadStatus::Failed => {
            for todo in state.visible_todos() {
                let mark = if todo.completed { 'x' } else { ' ' };
                let mut line = format!("  [{mark}] {:>4}  {}", todo.id.value(), todo.title);
                if let Some(operation) = state.pending_operation(todo.id) {
                    line.push_str(&format!("  ({})", operation.label()));
                }
                lines.push(line);
            }
        }
    }

    if !state.todos.is_empty() {
        let left = state.active_count();
        let noun = if left == 1 { "item" } else { "items" };
        let mut footer = format!("  {left} {noun} left | filter: {}", state.filter);
        if state.has_completed() {
            footer.push_str(" | clear completed available");
        }
        lines.push(footer);
    }

    if let Some(error) = state.error() {
        lines.push(format!("  ! {error}"));
    }

    lines.join("\n")
}
