//! Refresh reconciliation.
//!
//! Fetches the upstream catalogue and rate table, derives rate and GDP for
//! every country and upserts the lot by name in one repository call. A failed
//! catalogue fetch aborts before anything is written; a failed rate fetch
//! degrades to null rates.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::country_service::map_repository_error;
use crate::domain::ports::{
    CountryRefreshCommand, CountryRepository, CountrySource, ExchangeRateSource, ExchangeRates,
    RefreshOutcome, SourceCountry, SummaryImageCache,
};
use crate::domain::{CountryFacts, CountryName, CountryRecord, Error, GdpEstimator};

/// Message returned when the primary catalogue cannot be fetched.
pub const SOURCE_UNAVAILABLE: &str = "External data source unavailable";

/// Domain service implementing [`CountryRefreshCommand`].
///
/// Runs are serialised: a second caller waits for the first to finish, then
/// performs its own complete refresh.
pub struct CountryRefreshService<S: ?Sized, X: ?Sized, R: ?Sized> {
    countries: Arc<S>,
    rates: Arc<X>,
    repository: Arc<R>,
    images: Arc<dyn SummaryImageCache>,
    clock: Arc<dyn Clock>,
    estimator: GdpEstimator,
    running: Mutex<()>,
}

impl<S: ?Sized, X: ?Sized, R: ?Sized> CountryRefreshService<S, X, R> {
    pub fn new(
        countries: Arc<S>,
        rates: Arc<X>,
        repository: Arc<R>,
        images: Arc<dyn SummaryImageCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            countries,
            rates,
            repository,
            images,
            clock,
            estimator: GdpEstimator::default(),
            running: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_estimator(mut self, estimator: GdpEstimator) -> Self {
        self.estimator = estimator;
        self
    }
}

impl<S, X, R> CountryRefreshService<S, X, R>
where
    S: CountrySource + ?Sized,
    X: ExchangeRateSource + ?Sized,
    R: CountryRepository + ?Sized,
{
    async fn fetch(&self) -> Result<(Vec<SourceCountry>, ExchangeRates), Error> {
        let (countries, rates) =
            tokio::join!(self.countries.fetch_countries(), self.rates.fetch_rates());

        let countries = countries.map_err(|error| {
            warn!(%error, "country source unavailable; refresh aborted");
            Error::service_unavailable(SOURCE_UNAVAILABLE).with_details(Value::String(error.to_string()))
        })?;
        let rates = rates.unwrap_or_else(|error| {
            warn!(%error, "exchange rates unavailable; storing countries without GDP");
            ExchangeRates::default()
        });
        Ok((countries, rates))
    }
}

#[async_trait]
impl<S, X, R> CountryRefreshCommand for CountryRefreshService<S, X, R>
where
    S: CountrySource + ?Sized,
    X: ExchangeRateSource + ?Sized,
    R: CountryRepository + ?Sized,
{
    async fn refresh(&self) -> Result<RefreshOutcome, Error> {
        let _running = self.running.lock().await;
        let (source, rates) = self.fetch().await?;
        let fetched = source.len();

        let refreshed_at = self.clock.utc();
        let records: Vec<CountryRecord> = normalise(source)
            .into_iter()
            .map(|facts| {
                let rate = facts
                    .currency_code()
                    .and_then(|code| rates.rate_for(code));
                CountryRecord::derive(facts, rate, &self.estimator, refreshed_at)
            })
            .collect();

        let summary = self
            .repository
            .upsert_all(&records)
            .await
            .map_err(map_repository_error)?;

        if let Err(error) = self.images.invalidate().await {
            warn!(%error, "failed to invalidate cached summary images");
        }

        let outcome = RefreshOutcome {
            total_countries: records.len() as u64,
            created: summary.created,
            updated: summary.updated,
            last_refreshed_at: refreshed_at,
        };
        info!(
            fetched,
            stored = outcome.total_countries,
            created = outcome.created,
            updated = outcome.updated,
            rates = rates.len(),
            "countries refreshed"
        );
        Ok(outcome)
    }
}

/// Validate upstream records: trim names, drop blank or invalid ones and
/// keep the last occurrence of a (case-insensitive) duplicate name.
pub fn normalise(source: Vec<SourceCountry>) -> Vec<CountryFacts> {
    let mut by_key = BTreeMap::new();
    for country in source {
        match to_facts(country) {
            Ok(facts) => {
                by_key.insert(facts.name().key(), facts);
            }
            Err((name, error)) => debug!(name, %error, "skipping upstream country"),
        }
    }
    by_key.into_values().collect()
}

fn to_facts(
    country: SourceCountry,
) -> Result<CountryFacts, (String, crate::domain::CountryValidationError)> {
    let SourceCountry {
        name,
        capital,
        region,
        population,
        currency_code,
        flag_url,
    } = country;
    let facts = CountryName::new(&name)
        .map(|valid| CountryFacts::new(valid, population))
        .and_then(|facts| facts.with_capital(capital))
        .and_then(|facts| facts.with_region(region))
        .and_then(|facts| facts.with_currency_code(currency_code))
        .map_err(|error| (name, error))?;
    Ok(facts.with_flag_url(flag_url))
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
