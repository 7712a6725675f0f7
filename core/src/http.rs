//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `BackendClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without ever touching the network. The host supplies an
//! `HttpTransport` that performs the round-trip, so the core stays
//! deterministic and free of any particular HTTP stack or async runtime.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;

/// HTTP method for a request. Every backend operation is a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `BackendClient::parse_*` methods for deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes requests on behalf of the core.
///
/// Implementations must return non-2xx responses as `Ok(HttpResponse)`; status
/// interpretation belongs to the parse step. `Err` is reserved for requests
/// that produced no response (`ApiError::Transport`).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request).await
    }
}
