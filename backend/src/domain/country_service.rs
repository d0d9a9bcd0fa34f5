//! Country read and single-row write services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CountriesCommand, CountriesQuery, CountryRepository, CountryRepositoryError, SummaryImageCache,
};
use crate::domain::{
    Country, CountryListQuery, CountryRecord, CountryValidationError, Error, GdpEstimator, NewCountry, RefreshStatus,
    validation_failed,
};

/// Message for lookups and deletes of unknown names.
pub const COUNTRY_NOT_FOUND: &str = "Country not found";

pub(crate) fn map_repository_error(error: CountryRepositoryError) -> Error {
    match error {
        CountryRepositoryError::Connection { message } => {
            warn!(%message, "country store unavailable");
            Error::service_unavailable("country store unavailable")
        }
        CountryRepositoryError::Query { message } => {
            Error::internal(format!("country store error: {message}"))
        }
        CountryRepositoryError::Duplicate { name } => {
            Error::conflict(format!("Country \"{name}\" already exists"))
                .with_details(json!({ "fields": { "name": "already exists" } }))
        }
    }
}

/// Domain service implementing [`CountriesQuery`] and [`CountriesCommand`].
pub struct CountriesService<R: ?Sized> {
    repository: Arc<R>,
    images: Arc<dyn SummaryImageCache>,
    clock: Arc<dyn Clock>,
    estimator: GdpEstimator,
}

impl<R: ?Sized> CountriesService<R> {
    pub fn new(
        repository: Arc<R>,
        images: Arc<dyn SummaryImageCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            images,
            clock,
            estimator: GdpEstimator::default(),
        }
    }

    #[must_use]
    pub fn with_estimator(mut self, estimator: GdpEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    async fn invalidate_images(&self) {
        if let Err(error) = self.images.invalidate().await {
            warn!(%error, "failed to invalidate cached summary images");
        }
    }
}

#[async_trait]
impl<R> CountriesQuery for CountriesService<R>
where
    R: CountryRepository + ?Sized,
{
    async fn list(&self, query: &CountryListQuery) -> Result<Vec<Country>, Error> {
        self.repository
            .list(query)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, name: &str) -> Result<Country, Error> {
        self.repository
            .find_by_name(name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(COUNTRY_NOT_FOUND))
    }

    async fn status(&self) -> Result<RefreshStatus, Error> {
        self.repository
            .status()
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> CountriesCommand for CountriesService<R>
where
    R: CountryRepository + ?Sized,
{
    async fn create(&self, input: NewCountry) -> Result<Country, Error> {
        let (facts, rate) = input.validate().map_err(|errors| validation_failed(&errors))?;
        if rate.is_some_and(|rate| self.estimator.estimate(facts.population(), rate).is_none()) {
            return Err(validation_failed(&[CountryValidationError::OutOfRange {
                field: "exchange_rate",
            }]));
        }
        let record = CountryRecord::derive(facts, rate, &self.estimator, self.clock.utc());
        let country = self
            .repository
            .insert(&record)
            .await
            .map_err(map_repository_error)?;
        info!(name = %country.name, id = country.id, "country created");
        self.invalidate_images().await;
        Ok(country)
    }

    async fn delete(&self, name: &str) -> Result<Country, Error> {
        let deleted = self
            .repository
            .delete_by_name(name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(COUNTRY_NOT_FOUND))?;
        info!(name = %deleted.name, "country deleted");
        self.invalidate_images().await;
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "country_service_tests.rs"]
mod tests;
