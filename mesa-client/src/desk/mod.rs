//! Order desk workflows: split and merge
//!
//! Each workflow validates locally first, then calls the backend once.
//! Failures carry operator-facing text next to the underlying error.

mod merge;
mod split;

pub use merge::{MergeOutcome, MERGE_PATH, MERGE_VALIDATE_PATH};
pub use split::{SplitOptions, SplitOutcome, split_path};

use std::sync::Arc;
use thiserror::Error;

use crate::error::ClientError;
use crate::http::HttpClient;

/// A failed desk action
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DeskFailure {
    /// Text to show the operator
    pub message: String,
    #[source]
    pub source: ClientError,
}

impl DeskFailure {
    pub fn new(message: impl Into<String>, source: ClientError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }
}

/// Split and merge operations against the backend
#[derive(Debug)]
pub struct OrderDesk<C> {
    http: Arc<C>,
}

impl<C> Clone for OrderDesk<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<C: HttpClient> OrderDesk<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}
