//! Country entities.
//!
//! Three shapes flow through the service:
//! - [`CountryFacts`]: validated, source-agnostic input (from the upstream
//!   catalogue or a direct create request).
//! - [`CountryRecord`]: the write model. Exchange rate and GDP are derived here
//!   and nowhere else, so a stored GDP always matches its population and rate.
//! - [`Country`]: a persisted row, including its surrogate `id`.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::gdp::{GdpEstimate, GdpEstimator, rate_limit, round_rate};

/// Maximum stored length of a country name.
pub const NAME_MAX: usize = 255;
/// Maximum stored length of a capital.
pub const CAPITAL_MAX: usize = 255;
/// Maximum stored length of a region.
pub const REGION_MAX: usize = 100;
/// Maximum stored length of a currency code.
pub const CURRENCY_CODE_MAX: usize = 10;

/// Field-level validation failure for country input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryValidationError {
    MissingField { field: &'static str },
    Blank { field: &'static str },
    TooLong { field: &'static str, max: usize },
    Negative { field: &'static str },
    NotPositive { field: &'static str },
    OutOfRange { field: &'static str },
}

impl CountryValidationError {
    /// Name of the offending field as it appears on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::Blank { field }
            | Self::TooLong { field, .. }
            | Self::Negative { field }
            | Self::NotPositive { field }
            | Self::OutOfRange { field } => field,
        }
    }
}

impl fmt::Display for CountryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { .. } => f.write_str("is required"),
            Self::Blank { .. } => f.write_str("must not be blank"),
            Self::TooLong { max, .. } => write!(f, "must be at most {max} characters"),
            Self::Negative { .. } => f.write_str("must not be negative"),
            Self::NotPositive { .. } => f.write_str("must be greater than zero"),
            Self::OutOfRange { .. } => f.write_str("is out of range"),
        }
    }
}

impl std::error::Error for CountryValidationError {}

/// Collapse field failures into a single `invalid_request` error whose
/// details map each field to its message.
///
/// # Examples
/// ```
/// use countries_backend::domain::{CountryValidationError, validation_failed};
///
/// let err = validation_failed(&[CountryValidationError::Blank { field: "name" }]);
/// assert_eq!(err.details().unwrap()["fields"]["name"], "must not be blank");
/// ```
pub fn validation_failed(errors: &[CountryValidationError]) -> Error {
    let fields: Map<String, Value> = errors
        .iter()
        .map(|error| (error.field().to_owned(), Value::String(error.to_string())))
        .collect();
    Error::invalid_request("Validation failed").with_details(json!({ "fields": fields }))
}

/// Trimmed, non-blank country name.
///
/// Equality on the wrapper is exact; use [`CountryName::key`] for the
/// case-insensitive identity the store enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryName(String);

impl CountryName {
    /// Validate and construct a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CountryValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CountryValidationError::Blank { field: "name" });
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(CountryValidationError::TooLong {
                field: "name",
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Case-folded identity used for lookup, delete and upsert.
    pub fn key(&self) -> String {
        name_key(&self.0)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for CountryName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CountryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-folded identity of a raw name, trimmed the same way [`CountryName`]
/// trims.
pub fn name_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validated country attributes that do not depend on exchange rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFacts {
    name: CountryName,
    capital: Option<String>,
    region: Option<String>,
    population: u64,
    currency_code: Option<String>,
    flag_url: Option<String>,
}

impl CountryFacts {
    pub fn new(name: CountryName, population: u64) -> Self {
        Self {
            name,
            capital: None,
            region: None,
            population,
            currency_code: None,
            flag_url: None,
        }
    }

    /// Attach a capital. Blank values are dropped.
    pub fn with_capital(
        mut self,
        capital: Option<impl AsRef<str>>,
    ) -> Result<Self, CountryValidationError> {
        self.capital = optional_text(capital, "capital", CAPITAL_MAX)?;
        Ok(self)
    }

    /// Attach a region. Blank values are dropped.
    pub fn with_region(
        mut self,
        region: Option<impl AsRef<str>>,
    ) -> Result<Self, CountryValidationError> {
        self.region = optional_text(region, "region", REGION_MAX)?;
        Ok(self)
    }

    /// Attach a currency code, normalised to upper case. Blank values are
    /// dropped.
    pub fn with_currency_code(
        mut self,
        code: Option<impl AsRef<str>>,
    ) -> Result<Self, CountryValidationError> {
        self.currency_code = optional_text(code, "currency_code", CURRENCY_CODE_MAX)?
            .map(|code| code.to_uppercase());
        Ok(self)
    }

    /// Attach a flag URL. Blank values are dropped.
    #[must_use]
    pub fn with_flag_url(mut self, flag_url: Option<impl AsRef<str>>) -> Self {
        self.flag_url = flag_url
            .map(|url| url.as_ref().trim().to_owned())
            .filter(|url| !url.is_empty());
        self
    }

    pub fn name(&self) -> &CountryName {
        &self.name
    }

    pub fn capital(&self) -> Option<&str> {
        self.capital.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn currency_code(&self) -> Option<&str> {
        self.currency_code.as_deref()
    }

    pub fn flag_url(&self) -> Option<&str> {
        self.flag_url.as_deref()
    }
}

fn optional_text(
    value: Option<impl AsRef<str>>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, CountryValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(CountryValidationError::TooLong { field, max });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Unvalidated direct-create input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCountry {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: Option<i64>,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<Decimal>,
    pub flag_url: Option<String>,
}

impl NewCountry {
    /// Validate every field, returning the facts and the supplied rate.
    ///
    /// `name`, `population` and `currency_code` are required.
    pub fn validate(self) -> Result<(CountryFacts, Option<Decimal>), Vec<CountryValidationError>> {
        let mut errors = Vec::new();

        let name = match self.name.as_deref().map(CountryName::new) {
            Some(Ok(name)) => Some(name),
            Some(Err(error)) => {
                errors.push(error);
                None
            }
            None => {
                errors.push(CountryValidationError::MissingField { field: "name" });
                None
            }
        };
        let population = match self.population.map(u64::try_from) {
            Some(Ok(population)) => Some(population),
            Some(Err(_)) => {
                errors.push(CountryValidationError::Negative {
                    field: "population",
                });
                None
            }
            None => {
                errors.push(CountryValidationError::MissingField {
                    field: "population",
                });
                None
            }
        };
        match self.currency_code.as_deref().map(str::trim) {
            None => errors.push(CountryValidationError::MissingField {
                field: "currency_code",
            }),
            Some("") => errors.push(CountryValidationError::Blank {
                field: "currency_code",
            }),
            Some(_) => {}
        }
        if let Some(rate) = self.exchange_rate.map(round_rate) {
            if rate <= Decimal::ZERO {
                errors.push(CountryValidationError::NotPositive {
                    field: "exchange_rate",
                });
            } else if rate >= rate_limit() {
                errors.push(CountryValidationError::OutOfRange {
                    field: "exchange_rate",
                });
            }
        }

        let lengths = [
            optional_text(self.capital.as_deref(), "capital", CAPITAL_MAX),
            optional_text(self.region.as_deref(), "region", REGION_MAX),
            optional_text(
                self.currency_code.as_deref(),
                "currency_code",
                CURRENCY_CODE_MAX,
            ),
        ];
        errors.extend(lengths.into_iter().filter_map(Result::err));

        let (Some(name), Some(population), true) = (name, population, errors.is_empty()) else {
            return Err(errors);
        };
        let facts = CountryFacts::new(name, population)
            .with_capital(self.capital.as_deref())
            .and_then(|facts| facts.with_region(self.region.as_deref()))
            .and_then(|facts| facts.with_currency_code(self.currency_code.as_deref()))
            .map_err(|error| vec![error])?
            .with_flag_url(self.flag_url.as_deref());
        Ok((facts, self.exchange_rate))
    }
}

/// Write model handed to the repository.
///
/// ## Invariants
/// - `estimated_gdp.is_none() == exchange_rate.is_none()`.
/// - Both are derived from `facts.population()` by [`GdpEstimator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    facts: CountryFacts,
    estimate: Option<GdpEstimate>,
    last_refreshed_at: DateTime<Utc>,
}

impl CountryRecord {
    /// Derive the stored rate and GDP for `facts` from the raw `rate`.
    pub fn derive(
        facts: CountryFacts,
        rate: Option<Decimal>,
        estimator: &GdpEstimator,
        at: DateTime<Utc>,
    ) -> Self {
        let estimate = rate.and_then(|rate| estimator.estimate(facts.population(), rate));
        Self {
            facts,
            estimate,
            last_refreshed_at: at,
        }
    }

    pub fn facts(&self) -> &CountryFacts {
        &self.facts
    }

    pub fn name(&self) -> &CountryName {
        self.facts.name()
    }

    pub fn exchange_rate(&self) -> Option<Decimal> {
        self.estimate.map(|estimate| estimate.exchange_rate())
    }

    pub fn estimated_gdp(&self) -> Option<Decimal> {
        self.estimate.map(|estimate| estimate.gdp())
    }

    pub fn last_refreshed_at(&self) -> DateTime<Utc> {
        self.last_refreshed_at
    }

    /// Materialise the persisted form under `id`.
    pub fn into_country(self, id: i64) -> Country {
        let exchange_rate = self.exchange_rate();
        let estimated_gdp = self.estimated_gdp();
        let CountryFacts {
            name,
            capital,
            region,
            population,
            currency_code,
            flag_url,
        } = self.facts;
        Country {
            id,
            name: name.0,
            capital,
            region,
            population,
            currency_code,
            exchange_rate,
            estimated_gdp,
            flag_url,
            last_refreshed_at: self.last_refreshed_at,
        }
    }
}

/// Persisted country row as returned to clients.
///
/// Decimals serialise as strings so their scale survives JSON
/// (`"1600.230000"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Country {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Nigeria")]
    pub name: String,
    #[schema(example = "Abuja")]
    pub capital: Option<String>,
    #[schema(example = "Africa")]
    pub region: Option<String>,
    #[schema(example = 206_139_589)]
    pub population: u64,
    #[schema(example = "NGN")]
    pub currency_code: Option<String>,
    #[schema(value_type = Option<String>, example = "1600.230000")]
    pub exchange_rate: Option<Decimal>,
    #[schema(value_type = Option<String>, example = "193228088.15")]
    pub estimated_gdp: Option<Decimal>,
    #[schema(example = "https://flagcdn.com/ng.svg")]
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

impl Country {
    /// Case-folded identity, see [`name_key`].
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("  Nigeria ", "Nigeria")]
    #[case("Côte d'Ivoire", "Côte d'Ivoire")]
    fn name_is_trimmed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(CountryName::new(raw).expect("valid").as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_name_is_rejected(#[case] raw: &str) {
        assert_eq!(
            CountryName::new(raw),
            Err(CountryValidationError::Blank { field: "name" })
        );
    }

    #[rstest]
    fn overlong_name_is_rejected() {
        let raw = "x".repeat(NAME_MAX + 1);
        assert!(matches!(
            CountryName::new(raw),
            Err(CountryValidationError::TooLong { field: "name", .. })
        ));
    }

    #[rstest]
    fn key_folds_case() {
        let name = CountryName::new("ÅLAND Islands").expect("valid");
        assert_eq!(name.key(), "åland islands");
        assert_eq!(name_key(" åland islands "), name.key());
    }

    #[rstest]
    fn blank_optional_fields_become_none() {
        let facts = CountryFacts::new(CountryName::new("Nowhere").expect("valid"), 0)
            .with_capital(Some("  "))
            .and_then(|facts| facts.with_region(Some("")))
            .and_then(|facts| facts.with_currency_code(Some(" ")))
            .expect("blank values are accepted")
            .with_flag_url(Some(""));
        assert_eq!(facts.capital(), None);
        assert_eq!(facts.region(), None);
        assert_eq!(facts.currency_code(), None);
        assert_eq!(facts.flag_url(), None);
    }

    #[rstest]
    fn currency_code_is_upper_cased() {
        let facts = CountryFacts::new(CountryName::new("Ghana").expect("valid"), 1)
            .with_currency_code(Some("ghs"))
            .expect("valid code");
        assert_eq!(facts.currency_code(), Some("GHS"));
    }

    #[rstest]
    fn overlong_region_is_rejected() {
        let result = CountryFacts::new(CountryName::new("Ghana").expect("valid"), 1)
            .with_region(Some("r".repeat(REGION_MAX + 1)));
        assert_eq!(
            result.err(),
            Some(CountryValidationError::TooLong {
                field: "region",
                max: REGION_MAX
            })
        );
    }

    #[rstest]
    #[case(Some(Decimal::new(160_023, 2)), true)]
    #[case(None, false)]
    #[case(Some(Decimal::ZERO), false)]
    fn rate_and_gdp_are_null_together(#[case] rate: Option<Decimal>, #[case] present: bool) {
        let facts = CountryFacts::new(CountryName::new("Nigeria").expect("valid"), 206_139_589);
        let record = CountryRecord::derive(facts, rate, &GdpEstimator::default(), at());
        assert_eq!(record.exchange_rate().is_some(), present);
        assert_eq!(record.estimated_gdp().is_some(), present);
    }

    #[rstest]
    fn into_country_carries_every_field() {
        let facts = CountryFacts::new(CountryName::new("Nigeria").expect("valid"), 206_139_589)
            .with_capital(Some("Abuja"))
            .and_then(|facts| facts.with_region(Some("Africa")))
            .and_then(|facts| facts.with_currency_code(Some("NGN")))
            .expect("valid facts")
            .with_flag_url(Some("https://flagcdn.com/ng.svg"));
        let record = CountryRecord::derive(
            facts,
            Some(Decimal::new(160_023, 2)),
            &GdpEstimator::default(),
            at(),
        );

        let country = record.into_country(7);

        assert_eq!(country.id, 7);
        assert_eq!(country.capital.as_deref(), Some("Abuja"));
        assert_eq!(country.region.as_deref(), Some("Africa"));
        assert_eq!(country.currency_code.as_deref(), Some("NGN"));
        assert_eq!(
            country.exchange_rate.map(|rate| rate.to_string()).as_deref(),
            Some("1600.230000")
        );
        assert_eq!(country.last_refreshed_at, at());
    }

    fn new_country() -> NewCountry {
        NewCountry {
            name: Some("Ghana".to_owned()),
            population: Some(31_072_940),
            currency_code: Some("GHS".to_owned()),
            ..NewCountry::default()
        }
    }

    #[rstest]
    fn new_country_with_required_fields_validates() {
        let (facts, rate) = new_country().validate().expect("valid input");
        assert_eq!(facts.name().as_str(), "Ghana");
        assert_eq!(facts.population(), 31_072_940);
        assert_eq!(rate, None);
    }

    #[rstest]
    fn new_country_reports_all_missing_fields() {
        let errors = NewCountry::default().validate().expect_err("empty input");
        let fields: Vec<_> = errors.iter().map(CountryValidationError::field).collect();
        assert_eq!(fields, ["name", "population", "currency_code"]);
    }

    #[rstest]
    #[case(NewCountry { population: Some(-1), ..new_country() }, "population")]
    #[case(NewCountry { name: Some(" ".to_owned()), ..new_country() }, "name")]
    #[case(NewCountry { currency_code: Some(String::new()), ..new_country() }, "currency_code")]
    #[case(NewCountry { exchange_rate: Some(Decimal::ZERO), ..new_country() }, "exchange_rate")]
    #[case(NewCountry { exchange_rate: Some(Decimal::new(4, 7)), ..new_country() }, "exchange_rate")]
    #[case(NewCountry { exchange_rate: Some(Decimal::from(100_000_000_000_000_u64)), ..new_country() }, "exchange_rate")]
    #[case(NewCountry { region: Some("r".repeat(REGION_MAX + 1)), ..new_country() }, "region")]
    fn new_country_rejects_bad_field(#[case] input: NewCountry, #[case] field: &str) {
        let errors = input.validate().expect_err("invalid input");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), field);
    }

    #[rstest]
    #[case(Decimal::new(4, 7), "must be greater than zero")]
    #[case(Decimal::from(100_000_000_000_000_u64), "is out of range")]
    fn unstorable_rate_is_a_field_error(#[case] rate: Decimal, #[case] message: &str) {
        let input = NewCountry {
            exchange_rate: Some(rate),
            ..new_country()
        };
        let errors = input.validate().expect_err("unstorable rate");
        assert_eq!(errors[0].to_string(), message);
    }

    #[rstest]
    fn validation_failed_lists_every_field() {
        let error = validation_failed(&[
            CountryValidationError::Blank { field: "name" },
            CountryValidationError::Negative { field: "population" },
        ]);
        let fields = &error.details().expect("details")["fields"];
        assert_eq!(fields["name"], "must not be blank");
        assert_eq!(fields["population"], "must not be negative");
    }
}
