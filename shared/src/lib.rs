//! Shared types for the Mesa order desk
//!
//! Models, error codes, money helpers and the order split/merge logic
//! used by both the HTTP client and the operator CLI.

pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{BusMessage, EventType};
pub use order::OrderError;
