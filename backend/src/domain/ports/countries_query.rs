//! Driving port for reading countries.

use async_trait::async_trait;

use crate::domain::{Country, CountryListQuery, Error, RefreshStatus};

/// Domain use-case port backing the read endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountriesQuery: Send + Sync {
    async fn list(&self, query: &CountryListQuery) -> Result<Vec<Country>, Error>;

    /// Fetch one country; `not_found` when absent.
    async fn get(&self, name: &str) -> Result<Country, Error>;

    async fn status(&self) -> Result<RefreshStatus, Error>;
}

/// Fixture query over an empty store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCountriesQuery;

#[async_trait]
impl CountriesQuery for FixtureCountriesQuery {
    async fn list(&self, _query: &CountryListQuery) -> Result<Vec<Country>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, _name: &str) -> Result<Country, Error> {
        Err(Error::not_found("Country not found"))
    }

    async fn status(&self) -> Result<RefreshStatus, Error> {
        Ok(RefreshStatus::default())
    }
}
