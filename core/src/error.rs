//! Error types for the backend client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other unexpected responses land in `HttpError` with the raw
//! status code and body for debugging. `Transport` is produced by
//! `HttpTransport` implementations when no response was received at all.

use thiserror::Error;

/// Errors returned by remote-backed operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 (unknown session or route).
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}
