//! Pure reducer over the local todo list.
//!
//! # Design
//! `reduce` maps `(state, action)` to the next state and performs no I/O.
//! `TodoStore` dispatches an action only after the matching remote call
//! succeeded, so every transition here describes something the backend has
//! already accepted.
//!
//! Actions also have an untyped `{"type", "payload"}` form
//! (`ActionEnvelope`). Envelopes whose type is not a known action are logged
//! and ignored by `reduce_envelope`.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::{TodoId, TodoItem};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListState {
    pub todos: Vec<TodoItem>,
}

impl TodoListState {
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == *id)
    }

    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|todo| todo.checked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TodoAction {
    SetTodos {
        #[serde(default, deserialize_with = "null_as_empty")]
        todos: Vec<TodoItem>,
    },
    AddTodo(TodoItem),
    RemoveTodo { id: TodoId },
    ClearTodos,
    ClearCompletedTodos,
    SetTodoStatus { id: TodoId, status: bool },
    ToggleTodoStatus { id: TodoId },
}

/// A missing or null `todos` list means "no items".
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TodoItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TodoItem>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TodoAction {
    /// Action types that carry no payload.
    const UNIT_KINDS: [&'static str; 2] = ["clearTodos", "clearCompletedTodos"];

    /// Wire names of every recognized action type.
    pub const KINDS: [&'static str; 7] = [
        "setTodos",
        "addTodo",
        "removeTodo",
        "clearTodos",
        "clearCompletedTodos",
        "setTodoStatus",
        "toggleTodoStatus",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            TodoAction::SetTodos { .. } => "setTodos",
            TodoAction::AddTodo(_) => "addTodo",
            TodoAction::RemoveTodo { .. } => "removeTodo",
            TodoAction::ClearTodos => "clearTodos",
            TodoAction::ClearCompletedTodos => "clearCompletedTodos",
            TodoAction::SetTodoStatus { .. } => "setTodoStatus",
            TodoAction::ToggleTodoStatus { .. } => "toggleTodoStatus",
        }
    }
}

/// Untyped action as it appears on the wire or in a replay log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl From<&TodoAction> for ActionEnvelope {
    fn from(action: &TodoAction) -> Self {
        let payload = serde_json::to_value(action)
            .ok()
            .and_then(|mut value| value.get_mut("payload").map(serde_json::Value::take))
            .unwrap_or_default();
        Self {
            kind: action.kind().to_string(),
            payload,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unrecognized todo action type: {0}")]
    Unrecognized(String),

    #[error("invalid payload for {kind}: {message}")]
    InvalidPayload { kind: String, message: String },
}

impl TryFrom<ActionEnvelope> for TodoAction {
    type Error = ActionError;

    fn try_from(envelope: ActionEnvelope) -> Result<Self, Self::Error> {
        if !TodoAction::KINDS.contains(&envelope.kind.as_str()) {
            return Err(ActionError::Unrecognized(envelope.kind));
        }
        let mut tagged = serde_json::Map::new();
        tagged.insert(
            "type".to_string(),
            serde_json::Value::String(envelope.kind.clone()),
        );
        let empty = match &envelope.payload {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if TodoAction::UNIT_KINDS.contains(&envelope.kind.as_str()) {
            // Unit actions ignore an empty payload.
            if !empty {
                tagged.insert("payload".to_string(), envelope.payload);
            }
        } else if envelope.payload.is_null() {
            tagged.insert("payload".to_string(), serde_json::json!({}));
        } else {
            tagged.insert("payload".to_string(), envelope.payload);
        }
        serde_json::from_value(serde_json::Value::Object(tagged)).map_err(|e| {
            ActionError::InvalidPayload {
                kind: envelope.kind,
                message: e.to_string(),
            }
        })
    }
}

pub fn reduce(mut state: TodoListState, action: TodoAction) -> TodoListState {
    match action {
        TodoAction::SetTodos { todos } => {
            state.todos = todos;
        }
        TodoAction::AddTodo(item) => {
            match state.todos.iter_mut().find(|todo| todo.id == item.id) {
                Some(existing) => {
                    tracing::warn!(id = %item.id, "added todo already present, replacing");
                    *existing = item;
                }
                None => state.todos.push(item),
            }
        }
        TodoAction::RemoveTodo { id } => {
            state.todos.retain(|todo| todo.id != id);
        }
        TodoAction::ClearTodos => {
            state.todos.clear();
        }
        TodoAction::ClearCompletedTodos => {
            state.todos.retain(|todo| !todo.checked);
        }
        TodoAction::SetTodoStatus { id, status } => {
            if let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == id) {
                todo.checked = status;
            }
        }
        TodoAction::ToggleTodoStatus { id } => {
            if let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == id) {
                todo.checked = !todo.checked;
            }
        }
    }
    state
}

/// Apply an untyped action. Anything that does not decode to a `TodoAction`
/// is reported and the state comes back untouched.
pub fn reduce_envelope(state: TodoListState, envelope: ActionEnvelope) -> TodoListState {
    match TodoAction::try_from(envelope) {
        Ok(action) => reduce(state, action),
        Err(err) => {
            tracing::error!(error = %err, "ignoring todo action");
            state
        }
    }
}
