//! Driven port for the country store.
//!
//! Names are the natural key and compare case-insensitively; implementations
//! must never hold two rows whose names differ only by case.

use async_trait::async_trait;

use crate::domain::{Country, CountryListQuery, CountryRecord, CountrySummary, RefreshStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by country persistence adapters.
    pub enum CountryRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "country store connection failed: {message}",
        /// A statement failed or a row could not be converted.
        Query { message: String } =>
            "country store query failed: {message}",
        /// A row with the same name already exists.
        Duplicate { name: String } =>
            "country {name} already exists",
    }
}

/// Counts produced by [`CountryRepository::upsert_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertSummary {
    pub created: u64,
    pub updated: u64,
}

/// Port for reading and writing country rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// Create or overwrite every record, keyed by name, as one atomic unit.
    ///
    /// On error nothing is written.
    async fn upsert_all(
        &self,
        records: &[CountryRecord],
    ) -> Result<UpsertSummary, CountryRepositoryError>;

    /// Insert a single new row; fails with `Duplicate` if the name exists.
    async fn insert(&self, record: &CountryRecord) -> Result<Country, CountryRepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, CountryRepositoryError>;

    /// Filtered, ordered listing.
    async fn list(&self, query: &CountryListQuery) -> Result<Vec<Country>, CountryRepositoryError>;

    /// Remove a row, returning it if it existed.
    async fn delete_by_name(&self, name: &str) -> Result<Option<Country>, CountryRepositoryError>;

    async fn status(&self) -> Result<RefreshStatus, CountryRepositoryError>;

    /// Consistent aggregate snapshot with the `top_n` countries by GDP.
    async fn summary(&self, top_n: usize) -> Result<CountrySummary, CountryRepositoryError>;
}

/// Fixture repository that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCountryRepository;

#[async_trait]
impl CountryRepository for FixtureCountryRepository {
    async fn upsert_all(
        &self,
        records: &[CountryRecord],
    ) -> Result<UpsertSummary, CountryRepositoryError> {
        Ok(UpsertSummary {
            created: records.len() as u64,
            updated: 0,
        })
    }

    async fn insert(&self, record: &CountryRecord) -> Result<Country, CountryRepositoryError> {
        Ok(record.clone().into_country(1))
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Country>, CountryRepositoryError> {
        Ok(None)
    }

    async fn list(
        &self,
        _query: &CountryListQuery,
    ) -> Result<Vec<Country>, CountryRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_by_name(&self, _name: &str) -> Result<Option<Country>, CountryRepositoryError> {
        Ok(None)
    }

    async fn status(&self) -> Result<RefreshStatus, CountryRepositoryError> {
        Ok(RefreshStatus::default())
    }

    async fn summary(&self, _top_n: usize) -> Result<CountrySummary, CountryRepositoryError> {
        Ok(CountrySummary::default())
    }
}
