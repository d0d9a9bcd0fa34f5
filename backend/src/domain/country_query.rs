//! Validated list query: filters, ordering and the in-process predicate used
//! by non-SQL stores.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::country::{CURRENCY_CODE_MAX, Country, CountryValidationError, REGION_MAX};

/// Supported orderings for `GET /countries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CountrySort {
    GdpDesc,
    GdpAsc,
    PopulationDesc,
    PopulationAsc,
    NameDesc,
    NameAsc,
}

impl CountrySort {
    pub const ALL: [CountrySort; 6] = [
        Self::GdpDesc,
        Self::GdpAsc,
        Self::PopulationDesc,
        Self::PopulationAsc,
        Self::NameDesc,
        Self::NameAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GdpDesc => "gdp_desc",
            Self::GdpAsc => "gdp_asc",
            Self::PopulationDesc => "population_desc",
            Self::PopulationAsc => "population_asc",
            Self::NameDesc => "name_desc",
            Self::NameAsc => "name_asc",
        }
    }

    /// Comma separated list of accepted values.
    pub fn allowed() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for CountrySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised `sort` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort {value:?}")]
pub struct UnknownSort {
    pub value: String,
}

impl FromStr for CountrySort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| UnknownSort {
                value: s.to_owned(),
            })
    }
}

/// Validation failure for a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryQueryError {
    Field(CountryValidationError),
    Sort(UnknownSort),
}

/// Filters and ordering for listing countries.
///
/// Region and currency filters match case-insensitively and are AND-combined.
/// Without a sort, rows come back by name ascending.
///
/// # Examples
/// ```
/// use countries_backend::domain::{CountryListQuery, CountrySort};
///
/// let query = CountryListQuery::parse(Some("Africa"), None, Some("gdp_desc")).unwrap();
/// assert_eq!(query.sort(), CountrySort::GdpDesc);
/// assert!(CountryListQuery::parse(None, None, Some("size")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryListQuery {
    region: Option<String>,
    currency: Option<String>,
    sort: Option<CountrySort>,
}

impl CountryListQuery {
    /// Validate raw query parameters, reporting every problem at once.
    pub fn parse(
        region: Option<&str>,
        currency: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, Vec<CountryQueryError>> {
        let mut errors = Vec::new();
        let region = filter_value(region, "region", REGION_MAX).unwrap_or_else(|error| {
            errors.push(CountryQueryError::Field(error));
            None
        });
        let currency = filter_value(currency, "currency", CURRENCY_CODE_MAX).unwrap_or_else(|error| {
            errors.push(CountryQueryError::Field(error));
            None
        });
        let sort = match sort.map(str::trim) {
            None => None,
            Some(raw) => match raw.parse::<CountrySort>() {
                Ok(sort) => Some(sort),
                Err(error) => {
                    errors.push(CountryQueryError::Sort(error));
                    None
                }
            },
        };
        if errors.is_empty() {
            Ok(Self {
                region,
                currency,
                sort,
            })
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: CountrySort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Effective ordering; defaults to [`CountrySort::NameAsc`].
    pub fn sort(&self) -> CountrySort {
        self.sort.unwrap_or(CountrySort::NameAsc)
    }

    /// Whether `country` passes every filter.
    pub fn matches(&self, country: &Country) -> bool {
        eq_ignore_case(self.region(), country.region.as_deref())
            && eq_ignore_case(self.currency(), country.currency_code.as_deref())
    }

    /// Ordering under [`Self::sort`], with null GDP last and name ascending as
    /// the tie-break.
    pub fn compare(&self, a: &Country, b: &Country) -> Ordering {
        let primary = match self.sort() {
            CountrySort::GdpDesc => nulls_last(a.estimated_gdp, b.estimated_gdp, true),
            CountrySort::GdpAsc => nulls_last(a.estimated_gdp, b.estimated_gdp, false),
            CountrySort::PopulationDesc => b.population.cmp(&a.population),
            CountrySort::PopulationAsc => a.population.cmp(&b.population),
            CountrySort::NameDesc => b.key().cmp(&a.key()),
            CountrySort::NameAsc => Ordering::Equal,
        };
        primary.then_with(|| a.key().cmp(&b.key()))
    }
}

fn filter_value(
    raw: Option<&str>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, CountryValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CountryValidationError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(CountryValidationError::TooLong { field, max });
    }
    Ok(Some(trimmed.to_owned()))
}

fn eq_ignore_case(filter: Option<&str>, value: Option<&str>) -> bool {
    match (filter, value) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(filter), Some(value)) => filter.to_lowercase() == value.to_lowercase(),
    }
}

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
