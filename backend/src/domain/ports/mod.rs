//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`CountrySource`, `ExchangeRateSource`, `CountryRepository`,
//! `SummaryImageCache`, `SummaryRenderer`) are implemented in `outbound`.
//! Driving ports (`CountryRefreshCommand`, `CountriesQuery`,
//! `CountriesCommand`, `SummaryImageQuery`) are implemented by domain services
//! and consumed by `inbound::http`.

mod macros;
pub(crate) use macros::define_port_error;

mod countries_command;
mod countries_query;
mod country_refresh_command;
mod country_repository;
mod country_source;
mod exchange_rate_source;
mod summary_image_cache;
mod summary_image_query;
mod summary_renderer;

#[cfg(test)]
pub use countries_command::MockCountriesCommand;
pub use countries_command::{CountriesCommand, FixtureCountriesCommand};
#[cfg(test)]
pub use countries_query::MockCountriesQuery;
pub use countries_query::{CountriesQuery, FixtureCountriesQuery};
#[cfg(test)]
pub use country_refresh_command::MockCountryRefreshCommand;
pub use country_refresh_command::{
    CountryRefreshCommand, FixtureCountryRefreshCommand, RefreshOutcome,
};
#[cfg(test)]
pub use country_repository::MockCountryRepository;
pub use country_repository::{
    CountryRepository, CountryRepositoryError, FixtureCountryRepository, UpsertSummary,
};
#[cfg(test)]
pub use country_source::MockCountrySource;
pub use country_source::{CountrySource, CountrySourceError, FixtureCountrySource, SourceCountry};
#[cfg(test)]
pub use exchange_rate_source::MockExchangeRateSource;
pub use exchange_rate_source::{
    ExchangeRateSource, ExchangeRateSourceError, ExchangeRates, FixtureExchangeRateSource,
};
#[cfg(test)]
pub use summary_image_cache::MockSummaryImageCache;
pub use summary_image_cache::{
    FixtureSummaryImageCache, SummaryImageCache, SummaryImageCacheError,
};
#[cfg(test)]
pub use summary_image_query::MockSummaryImageQuery;
pub use summary_image_query::{
    FIXTURE_PNG, FixtureSummaryImageQuery, SummaryImage, SummaryImageQuery,
};
#[cfg(test)]
pub use summary_renderer::MockSummaryRenderer;
pub use summary_renderer::{SummaryRenderer, SummaryRendererError};
