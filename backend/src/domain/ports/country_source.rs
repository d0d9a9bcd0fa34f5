//! Driven port for the upstream country catalogue.

use async_trait::async_trait;

use super::define_port_error;

/// One country as published upstream, before domain validation.
///
/// Adapters map their wire format into this shape and pick a single currency
/// code; trimming, blank-name filtering and de-duplication happen in the
/// domain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: u64,
    pub currency_code: Option<String>,
    pub flag_url: Option<String>,
}

define_port_error! {
    /// Errors raised while fetching the country catalogue.
    pub enum CountrySourceError {
        /// The request never produced a response.
        Transport { message: String } =>
            "country source transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } =>
            "country source timed out: {message}",
        /// The source answered with a non-success status.
        Status { status: u16, message: String } =>
            "country source returned HTTP {status}: {message}",
        /// The body was not the expected JSON.
        Decode { message: String } =>
            "country source response decode failed: {message}",
    }
}

/// Port for fetching the full upstream country list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetch every country the source publishes.
    async fn fetch_countries(&self) -> Result<Vec<SourceCountry>, CountrySourceError>;
}

/// Fixture source serving a fixed list.
#[derive(Debug, Clone, Default)]
pub struct FixtureCountrySource {
    pub countries: Vec<SourceCountry>,
}

#[async_trait]
impl CountrySource for FixtureCountrySource {
    async fn fetch_countries(&self) -> Result<Vec<SourceCountry>, CountrySourceError> {
        Ok(self.countries.clone())
    }
}
