//! Driving port for the summary image.

use async_trait::async_trait;

use crate::domain::Error;

/// PNG bytes plus the data version they were rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryImage {
    pub version: String,
    pub png: Vec<u8>,
}

/// Domain use-case port for `GET /countries/image`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryImageQuery: Send + Sync {
    async fn summary_image(&self) -> Result<SummaryImage, Error>;
}

/// Minimal valid 1×1 PNG used by the fixture.
pub const FIXTURE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0xff, 0xff, 0x3f,
    0x00, 0x05, 0xfe, 0x02, 0xfe, 0xa7, 0x35, 0x81, 0x84, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e,
    0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Fixture query serving [`FIXTURE_PNG`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSummaryImageQuery;

#[async_trait]
impl SummaryImageQuery for FixtureSummaryImageQuery {
    async fn summary_image(&self) -> Result<SummaryImage, Error> {
        Ok(SummaryImage {
            version: "empty".to_owned(),
            png: FIXTURE_PNG.to_vec(),
        })
    }
}
