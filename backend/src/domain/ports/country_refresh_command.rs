//! Driving port for refreshing the country store from upstream sources.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;

/// Result of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RefreshOutcome {
    /// Rows touched by this run.
    pub total_countries: u64,
    pub created: u64,
    pub updated: u64,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Domain use-case port for `POST /countries/refresh`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountryRefreshCommand: Send + Sync {
    async fn refresh(&self) -> Result<RefreshOutcome, Error>;
}

/// Fixture command reporting an empty refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCountryRefreshCommand;

#[async_trait]
impl CountryRefreshCommand for FixtureCountryRefreshCommand {
    async fn refresh(&self) -> Result<RefreshOutcome, Error> {
        Ok(RefreshOutcome {
            total_countries: 0,
            created: 0,
            updated: 0,
            last_refreshed_at: DateTime::<Utc>::UNIX_EPOCH,
        })
    }
}
