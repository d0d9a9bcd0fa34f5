//! Summary image service: render once per data version, serve from cache.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::country_service::map_repository_error;
use crate::domain::ports::{
    CountryRepository, SummaryImage, SummaryImageCache, SummaryImageQuery, SummaryRenderer,
};
use crate::domain::{Error, TOP_BY_GDP, TraceId};

/// Domain service implementing [`SummaryImageQuery`].
///
/// Cache failures are logged and bypassed; only rendering failures surface.
pub struct SummaryImageService<R: ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn SummaryImageCache>,
    renderer: Arc<dyn SummaryRenderer>,
}

impl<R: ?Sized> SummaryImageService<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn SummaryImageCache>,
        renderer: Arc<dyn SummaryRenderer>,
    ) -> Self {
        Self {
            repository,
            cache,
            renderer,
        }
    }
}

#[async_trait]
impl<R> SummaryImageQuery for SummaryImageService<R>
where
    R: CountryRepository + ?Sized,
{
    async fn summary_image(&self) -> Result<SummaryImage, Error> {
        let summary = self
            .repository
            .summary(TOP_BY_GDP)
            .await
            .map_err(map_repository_error)?;
        let version = summary.version();

        match self.cache.load(&version).await {
            Ok(Some(png)) => {
                debug!(%version, "summary image served from cache");
                return Ok(SummaryImage { version, png });
            }
            Ok(None) => {}
            Err(error) => warn!(%error, %version, "summary image cache read failed"),
        }

        let renderer = Arc::clone(&self.renderer);
        let trace_id = TraceId::current();
        let png = tokio::task::spawn_blocking(move || {
            let _span = trace_id.map(|id| tracing::debug_span!("render", trace_id = %id).entered());
            renderer.render(&summary)
        })
        .await
        .map_err(|error| Error::internal(format!("summary render task failed: {error}")))?
        .map_err(|error| Error::internal(error.to_string()))?;

        if let Err(error) = self.cache.store(&version, &png).await {
            warn!(%error, %version, "summary image cache write failed");
        }
        debug!(%version, bytes = png.len(), "summary image rendered");
        Ok(SummaryImage { version, png })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        CountryRepositoryError, MockCountryRepository, MockSummaryImageCache,
        MockSummaryRenderer, SummaryImageCacheError,
    };
    use crate::domain::{CountrySummary, ErrorCode, RefreshStatus};

    fn summary() -> CountrySummary {
        CountrySummary {
            status: RefreshStatus {
                total_countries: 2,
                last_refreshed_at: Utc.timestamp_millis_opt(1_700_000_000_000).single(),
            },
            ..CountrySummary::default()
        }
    }

    fn repository_with(summary: CountrySummary) -> MockCountryRepository {
        let mut repository = MockCountryRepository::new();
        repository
            .expect_summary()
            .with(eq(TOP_BY_GDP))
            .times(1)
            .return_once(move |_| Ok(summary));
        repository
    }

    fn service(
        repository: MockCountryRepository,
        cache: MockSummaryImageCache,
        renderer: MockSummaryRenderer,
    ) -> SummaryImageService<MockCountryRepository> {
        SummaryImageService::new(Arc::new(repository), Arc::new(cache), Arc::new(renderer))
    }

    #[rstest]
    #[tokio::test]
    async fn cached_image_skips_rendering() {
        let mut cache = MockSummaryImageCache::new();
        cache
            .expect_load()
            .withf(|version| version == "2-1700000000000")
            .times(1)
            .return_once(|_| Ok(Some(vec![1, 2, 3])));
        let mut renderer = MockSummaryRenderer::new();
        renderer.expect_render().never();

        let image = service(repository_with(summary()), cache, renderer)
            .summary_image()
            .await
            .expect("image");

        assert_eq!(image.png, vec![1, 2, 3]);
        assert_eq!(image.version, "2-1700000000000");
    }

    #[rstest]
    #[tokio::test]
    async fn miss_renders_and_stores() {
        let mut cache = MockSummaryImageCache::new();
        cache.expect_load().times(1).return_once(|_| Ok(None));
        cache
            .expect_store()
            .withf(|version, png| version == "2-1700000000000" && png == [9_u8, 9].as_slice())
            .times(1)
            .return_once(|_, _| Ok(()));
        let mut renderer = MockSummaryRenderer::new();
        renderer
            .expect_render()
            .times(1)
            .return_once(|_| Ok(vec![9, 9]));

        let image = service(repository_with(summary()), cache, renderer)
            .summary_image()
            .await
            .expect("image");

        assert_eq!(image.png, vec![9, 9]);
    }

    #[rstest]
    #[tokio::test]
    async fn cache_failures_do_not_fail_the_request() {
        let mut cache = MockSummaryImageCache::new();
        cache
            .expect_load()
            .return_once(|_| Err(SummaryImageCacheError::io("disk gone")));
        cache
            .expect_store()
            .return_once(|_, _| Err(SummaryImageCacheError::io("disk gone")));
        let mut renderer = MockSummaryRenderer::new();
        renderer.expect_render().return_once(|_| Ok(vec![7]));

        let image = service(repository_with(CountrySummary::default()), cache, renderer)
            .summary_image()
            .await
            .expect("image");

        assert_eq!(image.version, "empty");
        assert_eq!(image.png, vec![7]);
    }

    #[rstest]
    #[tokio::test]
    async fn store_outage_is_service_unavailable() {
        let mut repository = MockCountryRepository::new();
        repository
            .expect_summary()
            .return_once(|_| Err(CountryRepositoryError::connection("refused")));

        let error = service(
            repository,
            MockSummaryImageCache::new(),
            MockSummaryRenderer::new(),
        )
        .summary_image()
        .await
        .expect_err("store down");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
