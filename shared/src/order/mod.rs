//! Order split and merge logic
//!
//! - `money`: decimal-backed money helpers
//! - `allocator`: split-by-amount item allocation
//! - `split`: split selection validation and wire types
//! - `merge`: merge preconditions and wire types

pub mod allocator;
pub mod error;
pub mod merge;
pub mod money;
pub mod split;

// Re-exports
pub use allocator::{SplitPlan, allocate_by_amount, plan_split_by_amount};
pub use error::OrderError;
pub use merge::{
    MERGE_FAILED_MESSAGE, MergePreview, MergeRequest, MergeResult, MergeStrategy,
    MergeValidateRequest, MergeValidation, check_merge_selection, merge_success_message,
};
pub use split::{
    SplitDetails, SplitItem, SplitOrderRequest, SplitOrderResponse, SplitRequestLine,
    selection_total, split_failure_message, validate_split,
};
