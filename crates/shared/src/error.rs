use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Conflict,
    Validation,
    Internal,
    Unavailable,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorCode::NotFound,
            409 => ErrorCode::Conflict,
            422 => ErrorCode::Validation,
            502..=504 => ErrorCode::Unavailable,
            400..=499 => ErrorCode::BadRequest,
            _ => ErrorCode::Internal,
        }
    }
}

/// Error body the remote API sends with non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// First non-blank message carried by the body.
    pub fn text(&self) -> Option<&str> {
        fn non_blank(text: Option<&str>) -> Option<&str> {
            text.map(str::trim).filter(|text| !text.is_empty())
        }
        non_blank(self.error.as_deref()).or_else(|| non_blank(self.message.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_response(status: u16, body: &ErrorBody) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            message: body.text().unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_statuses() {
        assert_eq!(ErrorCode::from_status(404), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_status(400), ErrorCode::BadRequest);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::Unavailable);
        assert_eq!(ErrorCode::from_status(500), ErrorCode::Internal);
    }

    #[test]
    fn blank_error_text_is_treated_as_missing() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"   "}"#).expect("body");
        assert_eq!(body.text(), None);

        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Phone number already exists"}"#).expect("body");
        assert_eq!(body.text(), Some("Phone number already exists"));
    }

    #[test]
    fn blank_error_falls_through_to_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"","message":" Phone number already exists "}"#)
                .expect("body");
        assert_eq!(body.text(), Some("Phone number already exists"));

        let api = ApiError::from_response(409, &body);
        assert_eq!(api.code, ErrorCode::Conflict);
        assert_eq!(api.message, "Phone number already exists");
    }
}
