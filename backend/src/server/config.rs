//! Server settings loaded via `OrthoConfig` from CLI flags, `COUNTRIES_*`
//! environment variables and configuration files.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use countries_backend::domain::DEFAULT_PER_CAPITA_USD;
use countries_backend::outbound::exchange_rates::DEFAULT_EXCHANGE_RATES_URL;
use countries_backend::outbound::rest_countries::DEFAULT_REST_COUNTRIES_URL;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IMAGE_CACHE_DIR: &str = "cache";

/// Runtime configuration for the countries service.
///
/// Every field is optional; accessors supply the defaults.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COUNTRIES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Country list endpoint.
    pub countries_url: Option<String>,
    /// Exchange-rate endpoint (base USD).
    pub exchange_rates_url: Option<String>,
    /// Upper bound for each upstream request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Per-capita GDP constant in USD.
    pub gdp_per_capita_usd: Option<u32>,
    /// Directory holding rendered summary images.
    pub image_cache_dir: Option<PathBuf>,
}

/// A configured value could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|error| SettingsError::Invalid {
        field,
        message: error.to_string(),
    })
}

impl ServerSettings {
    /// Settings with every field unset, so each accessor yields its default.
    #[cfg(test)]
    pub(crate) fn unset() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            pool_max_size: None,
            countries_url: None,
            exchange_rates_url: None,
            request_timeout_secs: None,
            gdp_per_capita_usd: None,
            image_cache_dir: None,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Non-blank database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn countries_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "countries_url",
            self.countries_url
                .as_deref()
                .unwrap_or(DEFAULT_REST_COUNTRIES_URL),
        )
    }

    pub fn exchange_rates_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "exchange_rates_url",
            self.exchange_rates_url
                .as_deref()
                .unwrap_or(DEFAULT_EXCHANGE_RATES_URL),
        )
    }

    /// Timeout for each upstream request; zero is raised to one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }

    pub fn gdp_per_capita_usd(&self) -> u32 {
        self.gdp_per_capita_usd.unwrap_or(DEFAULT_PER_CAPITA_USD)
    }

    pub fn image_cache_dir(&self) -> PathBuf {
        self.image_cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_CACHE_DIR))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "COUNTRIES_BIND_ADDR",
        "COUNTRIES_DATABASE_URL",
        "COUNTRIES_POOL_MAX_SIZE",
        "COUNTRIES_COUNTRIES_URL",
        "COUNTRIES_EXCHANGE_RATES_URL",
        "COUNTRIES_REQUEST_TIMEOUT_SECS",
        "COUNTRIES_GDP_PER_CAPITA_USD",
        "COUNTRIES_IMAGE_CACHE_DIR",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("countries-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(
            settings.countries_url().expect("url").as_str(),
            DEFAULT_REST_COUNTRIES_URL
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.gdp_per_capita_usd(), DEFAULT_PER_CAPITA_USD);
        assert_eq!(settings.image_cache_dir(), PathBuf::from("cache"));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[0].1 = Some("127.0.0.1:9000".to_owned());
        vars[1].1 = Some("postgres://localhost/countries".to_owned());
        vars[5].1 = Some("3".to_owned());
        vars[6].1 = Some("2000".to_owned());
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/countries")
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        assert_eq!(settings.gdp_per_capita_usd(), 2000);
    }

    #[rstest]
    #[case(Some("   "), None)]
    #[case(Some(" postgres://db "), Some("postgres://db"))]
    fn blank_database_url_means_in_memory(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = ServerSettings {
            database_url: raw.map(str::to_owned),
            ..ServerSettings::unset()
        };
        assert_eq!(settings.database_url(), expected);
    }

    #[rstest]
    fn malformed_source_url_is_reported() {
        let settings = ServerSettings {
            exchange_rates_url: Some("not a url".to_owned()),
            ..ServerSettings::unset()
        };

        let error = settings.exchange_rates_url().expect_err("invalid url");

        assert!(error.to_string().starts_with("invalid exchange_rates_url"));
    }
}
