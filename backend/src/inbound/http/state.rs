//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see the
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CountriesCommand, CountriesQuery, CountryRefreshCommand, SummaryImageQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use countries_backend::domain::ports::{
///     FixtureCountriesCommand, FixtureCountriesQuery, FixtureCountryRefreshCommand,
///     FixtureSummaryImageQuery,
/// };
/// use countries_backend::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     refresh: Arc::new(FixtureCountryRefreshCommand),
///     countries: Arc::new(FixtureCountriesQuery),
///     countries_command: Arc::new(FixtureCountriesCommand),
///     images: Arc::new(FixtureSummaryImageQuery),
/// };
/// let _countries = state.countries.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub refresh: Arc<dyn CountryRefreshCommand>,
    pub countries: Arc<dyn CountriesQuery>,
    pub countries_command: Arc<dyn CountriesCommand>,
    pub images: Arc<dyn SummaryImageQuery>,
}
