//! Wire shape for `GET /v6/latest/USD`.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Number;

use crate::domain::ports::ExchangeRates;

#[derive(Debug, Deserialize)]
pub(super) struct LatestRatesDto {
    pub(super) result: Option<String>,
    #[serde(rename = "error-type")]
    pub(super) error_type: Option<String>,
    #[serde(default)]
    pub(super) rates: BTreeMap<String, Number>,
}

impl LatestRatesDto {
    /// Convert into domain rates, preserving the JSON literal's digits.
    pub(super) fn into_rates(self) -> Result<ExchangeRates, String> {
        if self.result.as_deref() == Some("error") {
            return Err(format!(
                "rate source reported error: {}",
                self.error_type.as_deref().unwrap_or("unknown")
            ));
        }
        self.rates
            .into_iter()
            .map(|(code, rate)| parse_rate(&rate).map(|rate| (code, rate)))
            .collect()
    }
}

fn parse_rate(number: &Number) -> Result<Decimal, String> {
    let literal = number.to_string();
    Decimal::from_str(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .map_err(|error| format!("rate {literal} is not a decimal: {error}"))
}
