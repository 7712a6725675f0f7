//! The remote document collection the todo store syncs against.

use async_trait::async_trait;

use crate::client::BackendClient;
use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::types::{
    DeleteResult, FindOptions, InsertOneResult, NewTodo, TodoFilter, TodoItem, TodoUpdate,
    UpdateOptions, UpdateResult,
};

/// CRUD surface of a remote todo collection.
#[async_trait]
pub trait TodoCollection: Send + Sync {
    async fn find(
        &self,
        filter: &TodoFilter,
        options: &FindOptions,
    ) -> Result<Vec<TodoItem>, ApiError>;

    async fn insert_one(&self, document: &NewTodo) -> Result<InsertOneResult, ApiError>;

    async fn delete_one(&self, filter: &TodoFilter) -> Result<DeleteResult, ApiError>;

    async fn delete_many(&self, filter: &TodoFilter) -> Result<DeleteResult, ApiError>;

    async fn update_one(
        &self,
        filter: &TodoFilter,
        update: &TodoUpdate,
        options: &UpdateOptions,
    ) -> Result<UpdateResult, ApiError>;
}

/// `TodoCollection` backed by the HTTP backend: build with `BackendClient`,
/// execute with the host transport, parse with `BackendClient`.
#[derive(Debug, Clone)]
pub struct RemoteCollection<T> {
    client: BackendClient,
    transport: T,
}

impl<T: HttpTransport> RemoteCollection<T> {
    pub fn new(client: BackendClient, transport: T) -> Self {
        Self { client, transport }
    }
}

#[async_trait]
impl<T: HttpTransport> TodoCollection for RemoteCollection<T> {
    async fn find(
        &self,
        filter: &TodoFilter,
        options: &FindOptions,
    ) -> Result<Vec<TodoItem>, ApiError> {
        let request = self.client.build_find(filter, options)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_find(response)
    }

    async fn insert_one(&self, document: &NewTodo) -> Result<InsertOneResult, ApiError> {
        let request = self.client.build_insert_one(document)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_insert_one(response)
    }

    async fn delete_one(&self, filter: &TodoFilter) -> Result<DeleteResult, ApiError> {
        let request = self.client.build_delete_one(filter)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_one(response)
    }

    async fn delete_many(&self, filter: &TodoFilter) -> Result<DeleteResult, ApiError> {
        let request = self.client.build_delete_many(filter)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_many(response)
    }

    async fn update_one(
        &self,
        filter: &TodoFilter,
        update: &TodoUpdate,
        options: &UpdateOptions,
    ) -> Result<UpdateResult, ApiError> {
        let request = self.client.build_update_one(filter, update, options)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_one(response)
    }
}
