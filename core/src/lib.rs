//! Client core for the todo backend.
//!
//! # Overview
//! Keeps a single user's todo list in memory and in step with a remote
//! document collection, and tracks the anonymous login session that owns it.
//!
//! # Design
//! - `TodoStore` applies local transitions through the pure `reducer` only
//!   after the matching remote call succeeded (remote first, never ahead).
//! - `AuthStateHolder` is constructed once and passed explicitly to whoever
//!   needs the session; there is no global lookup.
//! - Remote collaborators sit behind the `TodoCollection` and `AuthProvider`
//!   traits. `RemoteCollection` / `RemoteAuth` implement them on top of the
//!   stateless `BackendClient`, which builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO). The
//!   host plugs in an `HttpTransport`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod http;
pub mod reducer;
pub mod session;
pub mod todos;
pub mod types;

pub use auth::{AuthProvider, RemoteAuth};
pub use client::BackendClient;
pub use collection::{RemoteCollection, TodoCollection};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use reducer::{reduce, reduce_envelope, ActionEnvelope, ActionError, TodoAction, TodoListState};
pub use session::{AuthState, AuthStateHolder};
pub use todos::TodoStore;
pub use types::{
    DeleteResult, FindOptions, InsertOneResult, NewTodo, TodoFilter, TodoId, TodoItem, TodoUpdate,
    UpdateOptions, UpdateResult, UserHandle, UserId,
};
