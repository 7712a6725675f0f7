//! Domain DTOs for the todo backend.
//!
//! # Design
//! These types mirror the mock-server's document schema but are defined
//! independently. Integration tests catch any schema drift between the two
//! crates. Field names follow the backend's wire format (`_id`, `owner_id`,
//! `$set`, camelCase result counters) via serde renames so the Rust side keeps
//! snake_case names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default result-count limit used when loading a user's todo list.
pub const DEFAULT_FIND_LIMIT: u32 = 1000;

/// Opaque identifier assigned by the remote store when an item is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Handle for a logged-in user as returned by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHandle {
    pub id: UserId,
}

/// A single todo item stored in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub text: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub checked: bool,
}

/// Document inserted when the user adds a todo. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub checked: bool,
}

impl NewTodo {
    pub fn new(text: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            text: text.into(),
            owner_id,
            checked: false,
        }
    }

    /// Combine with the id the store assigned on insert.
    pub fn into_item(self, id: TodoId) -> TodoItem {
        TodoItem {
            id,
            text: self.text,
            owner_id: self.owner_id,
            checked: self.checked,
        }
    }
}

/// Equality filter over todo documents. Absent fields match anything, so
/// `TodoFilter::default()` selects the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFilter {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl TodoFilter {
    pub fn by_id(id: TodoId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn owned_by(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn matches(&self, item: &TodoItem) -> bool {
        self.id.as_ref().is_none_or(|id| *id == item.id)
            && self.owner_id.as_ref().is_none_or(|owner| *owner == item.owner_id)
            && self.checked.is_none_or(|checked| checked == item.checked)
    }
}

/// Options for `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    pub limit: u32,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FIND_LIMIT,
        }
    }
}

/// Field assignments applied by `update_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFields {
    pub checked: bool,
}

/// Update document. Only the completion flag is ever written; `text` and
/// `owner_id` are immutable once inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoUpdate {
    #[serde(rename = "$set")]
    pub set: SetFields,
}

impl TodoUpdate {
    pub fn set_checked(checked: bool) -> Self {
        Self {
            set: SetFields { checked },
        }
    }
}

/// Options for `update_one`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    #[serde(default)]
    pub return_new_document: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub inserted_id: TodoId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}
