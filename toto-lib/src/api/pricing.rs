//! Pricing configuration and its local settings blob

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiRequest;
use crate::ApiClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::PricingConfig;
use crate::response::Response;
use crate::storage::SETTINGS_KEY;

pub const PRICING_PATH: &str = "/admin/config/pricing";

/// Last pricing configuration the backend confirmed, as stored locally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPricing {
    pub config: PricingConfig,
    pub synced_at: DateTime<Utc>,
}

/// The backend answers with either `{pricing: {...}}` or the bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PricingBody {
    Wrapped { pricing: PricingConfig },
    Bare(PricingConfig),
}

impl From<PricingBody> for PricingConfig {
    fn from(body: PricingBody) -> Self {
        match body {
            PricingBody::Wrapped { pricing } => pricing,
            PricingBody::Bare(config) => config,
        }
    }
}

fn decode_pricing(body: &str) -> Result<PricingConfig, ApiError> {
    serde_json::from_str::<PricingBody>(body)
        .map(PricingConfig::from)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body))
}

impl ApiClient {
    /// Fetches the pricing configuration.
    pub async fn pricing(&self) -> Result<PricingConfig, Error> {
        let response = self.send(ApiRequest::get(PRICING_PATH)).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        let config = decode_pricing(&body)?;
        self.remember_pricing(config).await;
        Ok(config)
    }

    /// Fetches the pricing configuration, falling back to the last synced
    /// copy when the backend cannot serve it.
    ///
    /// The fallback is only taken for non-auth failures and is tagged
    /// [`CacheStatus::Stale`](crate::CacheStatus::Stale).
    pub async fn pricing_or_cached(&self) -> Result<Response<PricingConfig>, Error> {
        let err = match self.pricing().await {
            Ok(config) => return Ok(Response::fresh(config)),
            Err(err) => err,
        };

        if !matches!(err, Error::Api(_)) || err.is_unauthorized() {
            return Err(err);
        }

        match self.cached_pricing().await {
            Ok(Some(cached)) => {
                log::warn!(
                    "pricing unavailable ({}); using copy synced at {}",
                    err,
                    cached.synced_at
                );
                Ok(Response::stale(cached.config, cached.synced_at))
            }
            Ok(None) => Err(err),
            Err(storage_err) => {
                log::error!("failed to read cached pricing: {}", storage_err);
                Err(err)
            }
        }
    }

    /// Saves a new pricing configuration.
    ///
    /// The local copy is only updated after the backend accepts the change.
    pub async fn update_pricing(&self, config: PricingConfig) -> Result<PricingConfig, Error> {
        let request = ApiRequest::put(PRICING_PATH).json(&config)?;
        let response = self.send(request).await?;
        let body = response.text().await.map_err(ApiError::from)?;

        let saved = if body.trim().is_empty() {
            config
        } else {
            decode_pricing(&body)?
        };

        self.remember_pricing(saved).await;
        Ok(saved)
    }

    /// Returns the locally stored pricing blob, if any.
    pub async fn cached_pricing(&self) -> Result<Option<CachedPricing>, Error> {
        Ok(self.storage().get_json(SETTINGS_KEY).await?)
    }

    async fn remember_pricing(&self, config: PricingConfig) {
        let cached = CachedPricing {
            config,
            synced_at: Utc::now(),
        };
        if let Err(err) = self.storage().set_json(SETTINGS_KEY, &cached).await {
            log::error!("failed to store pricing settings: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_and_bare() {
        let wrapped = decode_pricing(r#"{"pricing": {"baseFare": 30, "perKm": 12}}"#).unwrap();
        let bare = decode_pricing(r#"{"baseFare": 30, "perKm": 12}"#).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.base_fare, 30.0);
        assert_eq!(wrapped.per_minute, 0.0);
    }

    #[test]
    fn test_decode_rejects_unrelated_object() {
        assert!(decode_pricing(r#"{"fares": []}"#).is_err());
    }

    #[test]
    fn test_cached_blob_shape() {
        let cached = CachedPricing {
            config: PricingConfig {
                base_fare: 25.0,
                per_km: 10.0,
                per_minute: 1.5,
                minimum_fare: 40.0,
            },
            synced_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let json = serde_json::to_value(cached).unwrap();
        assert_eq!(json["config"]["baseFare"], 25.0);
        assert!(json.get("syncedAt").is_some());
    }
}
