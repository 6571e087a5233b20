//! Admin API endpoints
//!
//! Every call goes through [`ApiClient::send`](crate::ApiClient), which
//! attaches the bearer token and runs the refresh-and-retry cycle. Response
//! envelopes are decoded here, once, into the typed entities of
//! [`crate::model`].

mod admin;
mod pricing;
mod request;

pub use admin::Ack;
pub use pricing::CachedPricing;
pub use pricing::PRICING_PATH;
pub use request::ApiRequest;
