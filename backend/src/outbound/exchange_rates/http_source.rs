//! Reqwest-backed exchange-rate source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::LatestRatesDto;
use crate::domain::ports::{ExchangeRateSource, ExchangeRateSourceError, ExchangeRates};
use crate::outbound::http_support::{HttpFailure, build_client, get_body};

/// Public endpoint quoting every currency against one US dollar.
pub const DEFAULT_EXCHANGE_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// `ExchangeRateSource` over the open exchange-rate API.
pub struct ExchangeRateHttpSource {
    client: Client,
    endpoint: Url,
}

impl ExchangeRateHttpSource {
    /// Build an adapter whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
        })
    }
}

#[async_trait]
impl ExchangeRateSource for ExchangeRateHttpSource {
    async fn fetch_rates(&self) -> Result<ExchangeRates, ExchangeRateSourceError> {
        let body = get_body(&self.client, &self.endpoint)
            .await
            .map_err(map_failure)?;
        parse_rates(&body)
    }
}

fn parse_rates(body: &[u8]) -> Result<ExchangeRates, ExchangeRateSourceError> {
    let decoded: LatestRatesDto = serde_json::from_slice(body).map_err(|error| {
        ExchangeRateSourceError::decode(format!("invalid rate payload: {error}"))
    })?;
    decoded
        .into_rates()
        .map_err(ExchangeRateSourceError::decode)
}

fn map_failure(failure: HttpFailure) -> ExchangeRateSourceError {
    match failure {
        HttpFailure::Transport(message) => ExchangeRateSourceError::transport(message),
        HttpFailure::Timeout(message) => ExchangeRateSourceError::timeout(message),
        HttpFailure::Status(status, message) => ExchangeRateSourceError::status(status, message),
        HttpFailure::Decode(message) => ExchangeRateSourceError::decode(message),
    }
}
