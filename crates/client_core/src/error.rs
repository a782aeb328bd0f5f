//! Failures of calls against the remote customer API.

use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("remote api rejected the request ({}): {}", code_label(.0), .0.message)]
    Remote(ApiError),
    #[error("request to remote api failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body for {context}: {source}")]
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },
}

impl GatewayError {
    /// Message the service sent, if any; transport and decode failures carry none.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            GatewayError::Remote(api) if !api.message.trim().is_empty() => Some(&api.message),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            GatewayError::Remote(api) => Some(api.code),
            _ => None,
        }
    }

    /// What the operator sees: the service's message verbatim, or `fallback`.
    pub fn operator_message(&self, fallback: &str) -> String {
        self.remote_message().unwrap_or(fallback).to_string()
    }
}

fn code_label(api: &ApiError) -> &'static str {
    match api.code {
        ErrorCode::BadRequest => "bad request",
        ErrorCode::NotFound => "not found",
        ErrorCode::Conflict => "conflict",
        ErrorCode::Validation => "validation",
        ErrorCode::Internal => "internal",
        ErrorCode::Unavailable => "unavailable",
    }
}
