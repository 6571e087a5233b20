//! Response wrapper with freshness status

use chrono::DateTime;
use chrono::Utc;

/// A value returned by the client together with where it came from.
///
/// Reads that may fall back to locally stored data (the pricing settings)
/// return this wrapper so screens can tell a live value from a stale one
/// instead of silently showing diverged state.
///
/// # Example
///
/// ```ignore
/// let pricing = client.pricing_or_cached().await?;
///
/// if let Some(synced_at) = pricing.synced_at() {
///     println!("Offline - showing settings last synced {synced_at}");
/// }
///
/// let config = pricing.into_inner();
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    /// Whether this value is live or a stored fallback.
    pub cache: CacheStatus,
}

impl<T> Response<T> {
    /// Creates a response freshly fetched from the backend.
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            cache: CacheStatus::Fresh,
        }
    }

    /// Creates a response served from local storage.
    pub fn stale(data: T, synced_at: DateTime<Utc>) -> Self {
        Self {
            data,
            cache: CacheStatus::Stale { synced_at },
        }
    }

    /// Returns `true` if this value came from the backend just now.
    pub fn is_fresh(&self) -> bool {
        matches!(self.cache, CacheStatus::Fresh)
    }

    /// Returns `true` if this value is a stored fallback.
    pub fn is_stale(&self) -> bool {
        !self.is_fresh()
    }

    /// Returns when a stale value was last synced with the backend.
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        match self.cache {
            CacheStatus::Fresh => None,
            CacheStatus::Stale { synced_at } => Some(synced_at),
        }
    }

    /// Returns a reference to the inner data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the response and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Maps the inner data using the provided function.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        Response {
            data: f(self.data),
            cache: self.cache,
        }
    }
}

/// Freshness of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fetched from the backend.
    Fresh,
    /// Served from local storage because the backend was unavailable.
    Stale {
        /// When the stored value was last synced with the backend.
        synced_at: DateTime<Utc>,
    },
}
