//! Driven port for currency exchange rates.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::define_port_error;

/// Rates quoted as local currency units per one base unit (USD).
///
/// # Examples
/// ```
/// use countries_backend::domain::ports::ExchangeRates;
/// use rust_decimal::Decimal;
///
/// let rates = ExchangeRates::from_iter([("NGN", Decimal::new(160_023, 2))]);
/// assert_eq!(rates.rate_for("ngn"), Some(Decimal::new(160_023, 2)));
/// assert_eq!(rates.rate_for("EUR"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExchangeRates(HashMap<String, Decimal>);

impl ExchangeRates {
    /// Rate for `code`, matched case-insensitively.
    pub fn rate_for(&self, code: &str) -> Option<Decimal> {
        self.0.get(&code.trim().to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Decimal)> for ExchangeRates {
    fn from_iter<I: IntoIterator<Item = (K, Decimal)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, rate)| (code.as_ref().trim().to_uppercase(), rate))
                .collect(),
        )
    }
}

define_port_error! {
    /// Errors raised while fetching exchange rates.
    pub enum ExchangeRateSourceError {
        /// The request never produced a response.
        Transport { message: String } =>
            "exchange rate transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } =>
            "exchange rate request timed out: {message}",
        /// The source answered with a non-success status.
        Status { status: u16, message: String } =>
            "exchange rate source returned HTTP {status}: {message}",
        /// The body was not the expected JSON.
        Decode { message: String } =>
            "exchange rate response decode failed: {message}",
    }
}

/// Port for fetching the current rate table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<ExchangeRates, ExchangeRateSourceError>;
}

/// Fixture source serving a fixed table.
#[derive(Debug, Clone, Default)]
pub struct FixtureExchangeRateSource {
    pub rates: ExchangeRates,
}

#[async_trait]
impl ExchangeRateSource for FixtureExchangeRateSource {
    async fn fetch_rates(&self) -> Result<ExchangeRates, ExchangeRateSourceError> {
        Ok(self.rates.clone())
    }
}
