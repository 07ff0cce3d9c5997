use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rcrt_store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server is read-only")]
    ReadOnly,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ServerError {
    /// Client faults map to 4xx, store and server faults to 5xx.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(e) => match e {
                StoreError::UnknownKey(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidPath { .. }
                | StoreError::InvalidRecord { .. }
                | StoreError::DanglingReference { .. } => StatusCode::BAD_REQUEST,
                StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
                StoreError::CorruptStore { .. }
                | StoreError::Type(_)
                | StoreError::Io(_)
                | StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::ReadOnly => StatusCode::FORBIDDEN,
            ServerError::Config(_) | ServerError::Io(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Store(e) => match e {
                StoreError::AlreadyExists(_) => "ALREADY_EXISTS",
                StoreError::CorruptStore { .. } => "CORRUPT_STORE",
                StoreError::UnknownKey(_) => "UNKNOWN_KEY",
                StoreError::InvalidRecord { .. } => "INVALID_RECORD",
                StoreError::InvalidPath { .. } => "INVALID_PATH",
                StoreError::DanglingReference { .. } => "DANGLING_REFERENCE",
                StoreError::Type(rcrt_types::TypeError::ExhaustedKeyspace { .. }) => {
                    "EXHAUSTED_KEYSPACE"
                }
                StoreError::Type(_) => "INVALID_ID",
                StoreError::Io(_) => "IO_ERROR",
                StoreError::Internal(_) => "INTERNAL",
            },
            ServerError::NotImplemented(_) => "NOT_IMPLEMENTED",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::ReadOnly => "READ_ONLY",
            ServerError::Config(_) => "CONFIG",
            ServerError::Io(_) => "IO_ERROR",
            ServerError::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
