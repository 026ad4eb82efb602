//! API error and its JSON body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every HTTP handler
///
/// Serialized as `{code, message, details?}` with the status taken from the
/// code.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Structured context, e.g. the id that was not found
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Body could not be parsed at all
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::MenuItemInvalidPrice, msg)
    }

    pub fn menu_item_not_found(id: impl ToString) -> Self {
        Self::new(ErrorCode::MenuItemNotFound).with_detail("id", id.to_string())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TimeoutError, msg)
    }

    /// Storage has not finished provisioning; callers may retry
    pub fn not_ready() -> Self {
        Self::new(ErrorCode::ServiceNotReady)
    }
}

/// JSON body of an error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Not-ready answers are expected during startup, don't flood the log
        if self.code.category() == ErrorCategory::System && self.code != ErrorCode::ServiceNotReady {
            tracing::error!(code = %self.code, message = %self.message, "Storage error");
        }

        (self.http_status(), axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::MenuItemNotFound);
        assert_eq!(err.message, "Menu item not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn not_found_carries_id() {
        let err = AppError::menu_item_not_found("123");
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
        assert_eq!(err.details.unwrap().get("id").unwrap(), "123");
    }

    #[test]
    fn status_follows_code() {
        assert_eq!(AppError::not_ready().http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(AppError::timeout("slow").http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AppError::menu_item_not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::database("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::invalid_price("cheap").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::invalid_request("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn body_serializes_without_empty_details() {
        let json = serde_json::to_value(ErrorBody::from(&AppError::validation("name must not be empty")))
            .unwrap();
        assert_eq!(json["code"], 2);
        assert_eq!(json["message"], "name must not be empty");
        assert!(json.get("details").is_none());

        let json = serde_json::to_value(ErrorBody::from(&AppError::menu_item_not_found("42"))).unwrap();
        assert_eq!(json["details"]["id"], "42");
    }
}
