//! Unified error system for the Mesa order desk
//!
//! - [`ErrorCode`]: wire error codes reported by the backend and raised locally
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with code, message, and details
//! - [`ApiResponse`]: the `/api/v1` response envelope
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::TableNotFound);
//! assert_eq!(err.message, "Table not found");
//!
//! let err = AppError::validation("Missing order ids").with_detail("field", "orderIds");
//! assert_eq!(err.code, ErrorCode::ValidationError);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{ApiErrorBody, ApiResponse, AppError, AppResult};
