//! Subscription tracker client.
//!
//! [`SubscriptionStateHolder`] keeps four observable slots (subscriptions,
//! totals, loading flag, last error) in step with a remote
//! [`SubscriptionApi`]. [`HttpSubscriptionApi`] is the reqwest-backed
//! implementation that talks to the Read/Query Service.

pub mod api;
pub mod error;
pub mod format;
pub mod http;
pub mod observable;
pub mod state;

pub use api::SubscriptionApi;
pub use error::ClientError;
pub use format::format_currency;
pub use http::HttpSubscriptionApi;
pub use observable::{ListenerId, Observable};
pub use state::SubscriptionStateHolder;
