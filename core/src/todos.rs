//! Todo store: local list state kept in step with the remote collection.
//!
//! # Design
//! Every action awaits its remote call first and dispatches the local
//! transition only on success, so local state is never ahead of the backend.
//! A failed call returns the error and leaves the list untouched.
//!
//! The state lock is never held across an `.await`. Overlapping actions are
//! therefore not serialized: whichever remote call resolves last determines
//! the final local state for the item it touched.

use parking_lot::RwLock;

use crate::collection::TodoCollection;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::reducer::{reduce, TodoAction, TodoListState};
use crate::types::{
    FindOptions, NewTodo, TodoFilter, TodoId, TodoItem, TodoUpdate, UpdateOptions, UserHandle,
    UserId,
};

pub struct TodoStore<C> {
    collection: C,
    owner_id: UserId,
    find_options: FindOptions,
    state: RwLock<TodoListState>,
}

impl<C: TodoCollection> TodoStore<C> {
    pub fn new(collection: C, owner_id: UserId) -> Self {
        Self {
            collection,
            owner_id,
            find_options: FindOptions::default(),
            state: RwLock::new(TodoListState::default()),
        }
    }

    pub fn for_user(collection: C, user: &UserHandle) -> Self {
        Self::new(collection, user.id.clone())
    }

    /// Store for `user` whose loads are capped at `config.find_limit`.
    pub fn from_config(collection: C, user: &UserHandle, config: &ClientConfig) -> Self {
        Self::for_user(collection, user).with_find_options(FindOptions {
            limit: config.find_limit,
        })
    }

    pub fn with_find_options(mut self, options: FindOptions) -> Self {
        self.find_options = options;
        self
    }

    /// Replace the local list with the owner's items from the backend.
    pub async fn load(&self) -> Result<usize, ApiError> {
        let filter = TodoFilter::owned_by(self.owner_id.clone());
        let todos = self.collection.find(&filter, &self.find_options).await?;
        let count = todos.len();
        self.dispatch(TodoAction::SetTodos { todos });
        Ok(count)
    }

    /// Insert a new item. Empty text is rejected locally without a remote
    /// call and yields `Ok(None)`.
    pub async fn add(&self, text: &str) -> Result<Option<TodoItem>, ApiError> {
        if text.is_empty() {
            tracing::debug!("ignoring add with empty text");
            return Ok(None);
        }
        let document = NewTodo::new(text, self.owner_id.clone());
        let result = self.collection.insert_one(&document).await?;
        let item = document.into_item(result.inserted_id);
        self.dispatch(TodoAction::AddTodo(item.clone()));
        Ok(Some(item))
    }

    /// Delete an item. The remote delete is issued even when the id is not
    /// in the local list.
    pub async fn remove(&self, id: &TodoId) -> Result<(), ApiError> {
        self.collection
            .delete_one(&TodoFilter::by_id(id.clone()))
            .await?;
        self.dispatch(TodoAction::RemoveTodo { id: id.clone() });
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<u64, ApiError> {
        let result = self
            .collection
            .delete_many(&TodoFilter::owned_by(self.owner_id.clone()))
            .await?;
        self.dispatch(TodoAction::ClearTodos);
        Ok(result.deleted_count)
    }

    pub async fn clear_completed(&self) -> Result<u64, ApiError> {
        let filter = TodoFilter::owned_by(self.owner_id.clone()).with_checked(true);
        let result = self.collection.delete_many(&filter).await?;
        self.dispatch(TodoAction::ClearCompletedTodos);
        Ok(result.deleted_count)
    }

    pub async fn set_status(&self, id: &TodoId, status: bool) -> Result<(), ApiError> {
        self.write_checked(id, status).await?;
        self.dispatch(TodoAction::SetTodoStatus {
            id: id.clone(),
            status,
        });
        Ok(())
    }

    /// Flip an item's completion flag. The new value is computed from the
    /// local item and sent explicitly, and that same value is applied locally.
    /// Unknown ids are a no-op returning `Ok(None)`.
    pub async fn toggle_status(&self, id: &TodoId) -> Result<Option<bool>, ApiError> {
        let current = self.state.read().get(id).map(|todo| todo.checked);
        let Some(current) = current else {
            tracing::warn!(%id, "cannot toggle unknown todo");
            return Ok(None);
        };
        let status = !current;
        self.write_checked(id, status).await?;
        self.dispatch(TodoAction::SetTodoStatus {
            id: id.clone(),
            status,
        });
        Ok(Some(status))
    }

    pub fn todos(&self) -> Vec<TodoItem> {
        self.state.read().todos.clone()
    }

    pub fn state(&self) -> TodoListState {
        self.state.read().clone()
    }

    pub fn get(&self, id: &TodoId) -> Option<TodoItem> {
        self.state.read().get(id).cloned()
    }

    /// Whether any item is checked, i.e. whether clearing completed items
    /// would remove anything.
    pub fn has_completed(&self) -> bool {
        self.state.read().has_completed()
    }

    pub fn len(&self) -> usize {
        self.state.read().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().todos.is_empty()
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    async fn write_checked(&self, id: &TodoId, status: bool) -> Result<(), ApiError> {
        let options = UpdateOptions {
            return_new_document: true,
        };
        self.collection
            .update_one(
                &TodoFilter::by_id(id.clone()),
                &TodoUpdate::set_checked(status),
                &options,
            )
            .await?;
        Ok(())
    }

    fn dispatch(&self, action: TodoAction) {
        tracing::debug!(action = action.kind(), owner_id = %self.owner_id, "dispatch");
        let mut state = self.state.write();
        let current = std::mem::take(&mut *state);
        *state = reduce(current, action);
    }
}
