//! Domain entities, pure logic, ports and services.
//!
//! Nothing in here knows about HTTP, SQL or the filesystem; adapters live in
//! `inbound` and `outbound` and meet the domain through [`ports`].
//!
//! Public surface:
//! - `Country`, `CountryFacts`, `CountryRecord`, `NewCountry`: the country
//!   model from raw input to persisted row.
//! - `GdpEstimator`: fixed-point GDP derivation.
//! - `CountryListQuery`, `CountrySort`: validated listing parameters.
//! - `CountrySummary`, `RefreshStatus`: aggregate views.
//! - `CountryRefreshService`, `CountriesService`, `SummaryImageService`:
//!   implementations of the driving ports.
//! - `Error`, `ErrorCode`, `TraceId`: transport-agnostic failures and
//!   correlation.

pub mod country;
pub mod country_query;
pub mod country_service;
pub mod error;
pub mod gdp;
pub mod ports;
pub mod refresh;
pub mod summary;
pub mod summary_image;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::country::{
    Country, CountryFacts, CountryName, CountryRecord, CountryValidationError, NewCountry,
    name_key, validation_failed,
};
pub use self::country_query::{CountryListQuery, CountryQueryError, CountrySort, UnknownSort};
pub use self::country_service::{COUNTRY_NOT_FOUND, CountriesService};
pub use self::error::{Error, ErrorCode};
pub use self::gdp::{DEFAULT_PER_CAPITA_USD, GdpEstimate, GdpEstimator};
pub use self::refresh::{CountryRefreshService, SOURCE_UNAVAILABLE};
pub use self::summary::{
    CountrySummary, GdpRank, RegionCount, RefreshStatus, TOP_BY_GDP, UNKNOWN_REGION,
};
pub use self::summary_image::SummaryImageService;
pub use self::trace_id::TraceId;

/// HTTP header carrying the request's [`TraceId`].
pub const TRACE_ID_HEADER: &str = "trace-id";
