//! Error codes and the API error body
//!
//! - [`ErrorCode`]: numeric code sent to clients
//! - [`ErrorCategory`]: code range, decides what gets logged
//! - [`AppError`]: handler error, turns into an HTTP response
//! - [`ErrorBody`]: the `{code, message, details?}` JSON shape
//!
//! ```
//! use shared::error::{AppError, ErrorBody};
//!
//! let err = AppError::validation("name must not be empty")
//!     .with_detail("field", "name");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
