//! Base address resolution.
//!
//! The API base URL is chosen once at startup by a fixed precedence:
//! an explicitly configured URL, else a development proxy, else a default
//! derived from the network host.

use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// Port of the admin API when the base URL is derived from the host.
pub const DEFAULT_API_PORT: u16 = 4000;

/// Path prefix of the admin API when the base URL is derived from the host.
pub const API_PREFIX: &str = "/api";

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Where the resolved base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    /// Explicitly configured base URL
    Configured,
    /// Development proxy
    DevProxy,
    /// `http://{host}:{DEFAULT_API_PORT}{API_PREFIX}`
    HostDerived,
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configured => "configured",
            Self::DevProxy => "dev proxy",
            Self::HostDerived => "host-derived",
        })
    }
}

/// Inputs to base URL resolution. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct BaseUrlConfig {
    /// Explicit base URL, e.g. `https://api.localtoto.in/api`
    pub configured: Option<String>,
    /// Development proxy URL, e.g. `http://localhost:5173/api`
    pub dev_proxy: Option<String>,
    /// Current network host, e.g. `192.168.1.20`
    pub host: Option<String>,
}

/// A resolved API base URL, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    source: BaseUrlSource,
}

impl BaseUrlConfig {
    /// Sets the explicit base URL.
    pub fn configured(mut self, url: impl Into<String>) -> Self {
        self.configured = Some(url.into());
        self
    }

    /// Sets the development proxy URL.
    pub fn dev_proxy(mut self, url: impl Into<String>) -> Self {
        self.dev_proxy = Some(url.into());
        self
    }

    /// Sets the network host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Resolves the base URL by precedence.
    pub fn resolve(&self) -> Result<BaseUrl, ConfigError> {
        let resolved = if let Some(url) = non_empty(&self.configured) {
            BaseUrl::parse(url, BaseUrlSource::Configured)?
        } else if let Some(url) = non_empty(&self.dev_proxy) {
            BaseUrl::parse(url, BaseUrlSource::DevProxy)?
        } else {
            let host = non_empty(&self.host).unwrap_or(DEFAULT_HOST);
            let url = format!("http://{}:{}{}", host, DEFAULT_API_PORT, API_PREFIX);
            BaseUrl::parse(&url, BaseUrlSource::HostDerived)?
        };
        log::info!("API base URL {} ({})", resolved.as_str(), resolved.source());
        Ok(resolved)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl BaseUrl {
    /// Parses and validates an absolute base URL.
    pub fn parse(value: &str, source: BaseUrlSource) -> Result<Self, ConfigError> {
        let parsed = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: value.to_string(),
                reason: "expected an http(s) URL".to_string(),
            });
        }
        Ok(Self {
            url: value.trim_end_matches('/').to_string(),
            source,
        })
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Returns where the base URL came from.
    pub fn source(&self) -> BaseUrlSource {
        self.source
    }

    /// Joins an API path such as `/admin/rides` onto the base URL.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_wins() {
        let base = BaseUrlConfig::default()
            .configured("https://api.localtoto.in/api/")
            .dev_proxy("http://localhost:5173/api")
            .host("10.0.0.2")
            .resolve()
            .unwrap();
        assert_eq!(base.as_str(), "https://api.localtoto.in/api");
        assert_eq!(base.source(), BaseUrlSource::Configured);
    }

    #[test]
    fn test_dev_proxy_before_host() {
        let base = BaseUrlConfig::default()
            .configured("  ")
            .dev_proxy("http://localhost:5173/api")
            .host("10.0.0.2")
            .resolve()
            .unwrap();
        assert_eq!(base.source(), BaseUrlSource::DevProxy);
        assert_eq!(base.join("/admin/rides"), "http://localhost:5173/api/admin/rides");
    }

    #[test]
    fn test_host_derived_default() {
        let base = BaseUrlConfig::default().host("10.0.0.2").resolve().unwrap();
        assert_eq!(base.as_str(), "http://10.0.0.2:4000/api");
        assert_eq!(base.source(), BaseUrlSource::HostDerived);

        let base = BaseUrlConfig::default().resolve().unwrap();
        assert_eq!(base.as_str(), "http://localhost:4000/api");
    }

    #[test]
    fn test_invalid_urls_are_rejected() {
        assert!(BaseUrlConfig::default().configured("not a url").resolve().is_err());
        assert!(BaseUrlConfig::default().configured("mailto:admin@localtoto.in").resolve().is_err());
    }
}
