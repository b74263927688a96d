//! Miniecom - storefront client core
//!
//! Retrying transport with exponential backoff and jitter, a TTL cache over a
//! pluggable key-value store, and a `miniecom://` deep-link parser, exposed
//! through a small HTTP gateway.

pub mod api;
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod deeplink;
pub mod error;
pub mod models;
pub mod retry;
pub mod session;
pub mod storage;
pub mod transport;

pub use api::AppState;
pub use auth::AuthClient;
pub use cache::TtlCache;
pub use catalog::Catalog;
pub use config::Config;
pub use deeplink::DeepLinkAction;
pub use retry::{retry_with_backoff, RetryExecutor, RetryPolicy};
