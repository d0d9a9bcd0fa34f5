//! Aggregate views over the country store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Label used for rows without a region.
pub const UNKNOWN_REGION: &str = "Unknown";
/// Number of countries shown in the GDP ranking.
pub const TOP_BY_GDP: usize = 5;

/// Store-wide counters exposed by `GET /status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct RefreshStatus {
    #[schema(example = 250)]
    pub total_countries: u64,
    /// Most recent `last_refreshed_at` across all rows.
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// One entry of the GDP ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdpRank {
    pub name: String,
    pub estimated_gdp: Decimal,
}

/// Number of countries sharing a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCount {
    pub region: String,
    pub count: u64,
}

impl RegionCount {
    /// Merge per-region counts, labelling missing regions [`UNKNOWN_REGION`]
    /// and ordering by descending count then region name.
    pub fn tally<I, S>(groups: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (Option<S>, u64)>,
        S: Into<String>,
    {
        let mut merged: BTreeMap<String, u64> = BTreeMap::new();
        for (region, count) in groups {
            let label = region.map_or_else(|| UNKNOWN_REGION.to_owned(), Into::into);
            *merged.entry(label).or_default() += count;
        }
        let mut regions: Vec<Self> = merged
            .into_iter()
            .map(|(region, count)| Self { region, count })
            .collect();
        regions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.region.cmp(&b.region)));
        regions
    }
}

/// Consistent snapshot rendered into the summary image.
///
/// `regions` is ordered by descending count then region name; rows without a
/// region are counted under [`UNKNOWN_REGION`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountrySummary {
    pub status: RefreshStatus,
    pub top_by_gdp: Vec<GdpRank>,
    pub regions: Vec<RegionCount>,
}

impl CountrySummary {
    pub fn is_empty(&self) -> bool {
        self.status.total_countries == 0
    }

    /// Cache key for the rendered image. Changes whenever a refresh, create
    /// or delete changes the total or the latest refresh time.
    ///
    /// # Examples
    /// ```
    /// use countries_backend::domain::CountrySummary;
    ///
    /// assert_eq!(CountrySummary::default().version(), "empty");
    /// ```
    pub fn version(&self) -> String {
        match self.status.last_refreshed_at {
            Some(at) if !self.is_empty() => {
                format!("{}-{}", self.status.total_countries, at.timestamp_millis())
            }
            _ => "empty".to_owned(),
        }
    }
}
