//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationFailed | Self::InvalidRequest | Self::MenuItemInvalidPrice => {
                StatusCode::BAD_REQUEST
            }

            Self::MenuItemNotFound => StatusCode::NOT_FOUND,

            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // Transient, the client can retry
            Self::ServiceNotReady | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
