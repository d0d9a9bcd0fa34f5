//! Reqwest-backed REST Countries source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::CountryDto;
use crate::domain::ports::{CountrySource, CountrySourceError, SourceCountry};
use crate::outbound::http_support::{HttpFailure, build_client, get_body};

/// Public endpoint returning every country with the fields the service stores.
pub const DEFAULT_REST_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

/// `CountrySource` over the REST Countries v2 API.
pub struct RestCountriesHttpSource {
    client: Client,
    endpoint: Url,
}

impl RestCountriesHttpSource {
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
impl CountrySource for RestCountriesHttpSource {
    async fn fetch_countries(&self) -> Result<Vec<SourceCountry>, CountrySourceError> {
        let body = get_body(&self.client, &self.endpoint)
            .await
            .map_err(map_failure)?;
        parse_countries(&body)
    }
}

fn parse_countries(body: &[u8]) -> Result<Vec<SourceCountry>, CountrySourceError> {
    let decoded: Vec<CountryDto> = serde_json::from_slice(body).map_err(|error| {
        CountrySourceError::decode(format!("invalid country list payload: {error}"))
    })?;
    Ok(decoded.into_iter().map(SourceCountry::from).collect())
}

fn map_failure(failure: HttpFailure) -> CountrySourceError {
    match failure {
        HttpFailure::Transport(message) => CountrySourceError::transport(message),
        HttpFailure::Timeout(message) => CountrySourceError::timeout(message),
        HttpFailure::Status(status, message) => CountrySourceError::status(status, message),
        HttpFailure::Decode(message) => CountrySourceError::decode(message),
    }
}
