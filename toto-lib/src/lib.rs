//! Local ToTo admin core library
//!
//! A client-side table engine (search, sort, paginate) for admin screens and
//! an async REST client for the Local ToTo admin API with bearer-token
//! injection and one-shot refresh-and-retry on `401 Unauthorized`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod response;
pub mod storage;
pub mod table;

mod client;

pub use client::*;
pub use error::Error;
pub use response::CacheStatus;
pub use response::Response;
