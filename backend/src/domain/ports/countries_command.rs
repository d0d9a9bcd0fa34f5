//! Driving port for single-row writes.

use async_trait::async_trait;

use crate::domain::{Country, Error, NewCountry};

/// Domain use-case port for direct create and delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountriesCommand: Send + Sync {
    /// Validate and insert a country; `conflict` if the name is taken.
    async fn create(&self, input: NewCountry) -> Result<Country, Error>;

    /// Delete by name, returning the removed row; `not_found` when absent.
    async fn delete(&self, name: &str) -> Result<Country, Error>;
}

/// Fixture command that rejects every write as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCountriesCommand;

#[async_trait]
impl CountriesCommand for FixtureCountriesCommand {
    async fn create(&self, _input: NewCountry) -> Result<Country, Error> {
        Err(Error::service_unavailable("country store not configured"))
    }

    async fn delete(&self, _name: &str) -> Result<Country, Error> {
        Err(Error::not_found("Country not found"))
    }
}
