//! Mesa Client - order desk client for the Mesa restaurant backend
//!
//! HTTP access to auth, orders and tables, the split/merge desk workflows,
//! promotion quoting, session refresh and the notification listener.

pub mod api;
pub mod config;
pub mod desk;
pub mod error;
pub mod http;
pub mod notify;
pub mod promotion;
pub mod session;

pub use api::MesaApi;
pub use config::{ClientConfig, ReconnectPolicy, RefreshPolicy};
pub use desk::{DeskFailure, MergeOutcome, OrderDesk, SplitOptions, SplitOutcome};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient, OneshotHttpClient};
pub use notify::{NotificationListener, NotifyError};
pub use promotion::{PromotionQuoter, QuoteOutcome};
pub use session::{Session, SessionData, TokenRefresher};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, UserInfo};
pub use shared::message::DeskEvent;
