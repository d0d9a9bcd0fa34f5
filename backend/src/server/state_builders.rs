//! Builders for the repository and the HTTP state ports.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use countries_backend::domain::ports::{CountryRepository, SummaryImageCache};
use countries_backend::domain::{
    CountriesService, CountryRefreshService, GdpEstimator, SummaryImageService,
};
use countries_backend::inbound::http::state::HttpState;
use countries_backend::outbound::exchange_rates::ExchangeRateHttpSource;
use countries_backend::outbound::memory::InMemoryCountryRepository;
use countries_backend::outbound::persistence::{
    DbPool, DieselCountryRepository, MigrationError, PoolConfig, PoolError, run_pending_migrations,
};
use countries_backend::outbound::rest_countries::RestCountriesHttpSource;
use countries_backend::outbound::summary_image::{FileSummaryImageCache, PlottersSummaryRenderer};

use super::config::{ServerSettings, SettingsError};

/// Failures while assembling the application from settings.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("database migrations failed: {0}")]
    Migrations(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to open image cache directory: {0}")]
    ImageCache(#[source] std::io::Error),
}

/// Select the country store.
///
/// PostgreSQL is used when a database URL is configured (pending migrations
/// are applied first); otherwise rows live in process memory.
pub async fn build_repository(
    settings: &ServerSettings,
) -> Result<Arc<dyn CountryRepository>, StartupError> {
    match settings.database_url() {
        Some(url) => {
            let applied = run_pending_migrations(url).await?;
            info!(applied, "database schema is current");
            let pool = DbPool::new(
                PoolConfig::new(url)
                    .with_max_size(settings.pool_max_size())
                    .with_connection_timeout(settings.request_timeout()),
            )
            .await?;
            Ok(Arc::new(DieselCountryRepository::new(pool)))
        }
        None => {
            warn!("no database URL configured; countries are kept in memory");
            Ok(Arc::new(InMemoryCountryRepository::new()))
        }
    }
}

/// Wire domain services onto the given repository.
pub fn build_http_state(
    settings: &ServerSettings,
    repository: Arc<dyn CountryRepository>,
) -> Result<HttpState, StartupError> {
    let timeout = settings.request_timeout();
    let countries_source = RestCountriesHttpSource::new(settings.countries_url()?, timeout)?;
    let rates_source = ExchangeRateHttpSource::new(settings.exchange_rates_url()?, timeout)?;
    let cache_dir = settings.image_cache_dir();
    let images: Arc<dyn SummaryImageCache> = Arc::new(
        FileSummaryImageCache::open(&cache_dir).map_err(StartupError::ImageCache)?,
    );
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let estimator = GdpEstimator::new(settings.gdp_per_capita_usd());

    let refresh = CountryRefreshService::new(
        Arc::new(countries_source),
        Arc::new(rates_source),
        Arc::clone(&repository),
        Arc::clone(&images),
        Arc::clone(&clock),
    )
    .with_estimator(estimator);
    let countries = Arc::new(
        CountriesService::new(Arc::clone(&repository), Arc::clone(&images), clock)
            .with_estimator(estimator),
    );
    let summary = SummaryImageService::new(
        repository,
        images,
        Arc::new(PlottersSummaryRenderer::new()),
    );

    info!(cache_dir = %cache_dir.display(), "HTTP state assembled");
    Ok(HttpState {
        refresh: Arc::new(refresh),
        countries: countries.clone(),
        countries_command: countries,
        images: Arc::new(summary),
    })
}

#[cfg(test)]
mod tests {
    //! Startup wiring against the in-memory store.

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use countries_backend::domain::ports::CountriesQuery;

    #[rstest]
    #[tokio::test]
    async fn missing_database_url_selects_memory_store() {
        let repository = build_repository(&ServerSettings::unset())
            .await
            .expect("memory store");

        let status = repository.status().await.expect("status");

        assert_eq!(status.total_countries, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn http_state_builds_and_creates_cache_directory() {
        let dir = TempDir::new().expect("temp dir");
        let cache_dir = dir.path().join("images");
        let settings = ServerSettings {
            image_cache_dir: Some(cache_dir.clone()),
            ..ServerSettings::unset()
        };
        let repository = build_repository(&settings).await.expect("memory store");

        let state = build_http_state(&settings, repository).expect("state");

        assert!(cache_dir.is_dir());
        let status = state.countries.status().await.expect("status");
        assert_eq!(status.total_countries, 0);
    }

    #[rstest]
    fn malformed_source_url_fails_startup() {
        let settings = ServerSettings {
            countries_url: Some("::".to_owned()),
            ..ServerSettings::unset()
        };

        let Err(error) = build_http_state(&settings, Arc::new(InMemoryCountryRepository::new()))
        else {
            panic!("malformed countries URL should fail startup");
        };

        assert!(matches!(error, StartupError::Settings(_)));
    }
}
