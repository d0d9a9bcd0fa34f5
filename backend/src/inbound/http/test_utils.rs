//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureCountriesCommand, FixtureCountriesQuery, FixtureCountryRefreshCommand,
    FixtureSummaryImageQuery,
};
use crate::inbound::http::state::HttpState;

/// State wired entirely to fixtures; override fields with struct update
/// syntax to install mocks.
pub(crate) fn fixture_state() -> HttpState {
    HttpState {
        refresh: Arc::new(FixtureCountryRefreshCommand),
        countries: Arc::new(FixtureCountriesQuery),
        countries_command: Arc::new(FixtureCountriesCommand),
        images: Arc::new(FixtureSummaryImageQuery),
    }
}
