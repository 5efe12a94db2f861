//! Error types for the front-ends and process wiring.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for tonic::Status {
    fn from(err: ValidationError) -> Self {
        tonic::Status::invalid_argument(err.to_string())
    }
}

/// Fatal errors from configuring, binding or running the servers.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("all servers are disabled; enable HTTP, gRPC or both")]
    NothingToServe,

    #[error("failed to listen on {addr} ({protocol}): {source}")]
    Bind {
        protocol: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Http(#[source] std::io::Error),

    #[error("gRPC server error: {0}")]
    Grpc(#[from] tonic::transport::Error),

    #[error("failed to build gRPC reflection service: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
