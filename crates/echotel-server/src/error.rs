//! Error types for the echotel server.
//!
//! Process-scoped failures (`ServerError`) abort or fail the lifecycle and
//! are reflected in the exit code. Request-scoped failures (`RpcError`) are
//! returned to the caller as a structured JSON body and never affect other
//! requests or the process.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("listener drain did not complete within {0:?}")]
    DrainTimeout(Duration),
}

/// Wire-level error codes, mirroring the connect-RPC naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCode {
    InvalidArgument,
    Internal,
}

impl RpcCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RpcCode::InvalidArgument => "invalid_argument",
            RpcCode::Internal => "internal",
        }
    }

    fn http_status(self) -> StatusCode {
        match self {
            RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
            RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
#[error("{}: {}", .code.as_str(), .message)]
pub struct RpcError {
    pub code: RpcCode,
    pub message: String,
}

impl RpcError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: RpcCode::InvalidArgument,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: RpcCode::Internal,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct RpcErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = RpcErrorBody {
            code: self.code.as_str(),
            message: &self.message,
        };
        (self.code.http_status(), Json(body)).into_response()
    }
}
