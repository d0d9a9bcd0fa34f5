//! GDP estimation.
//!
//! Exchange rates are expressed as local currency units per one US dollar, so
//! the estimate divides: `population × per_capita_usd / rate`. All arithmetic
//! is fixed-point.

use rust_decimal::{Decimal, RoundingStrategy};

/// Default per-capita output in US dollars.
pub const DEFAULT_PER_CAPITA_USD: u32 = 1500;
/// Stored scale of exchange rates.
pub const RATE_SCALE: u32 = 6;
/// Stored scale of GDP estimates.
pub const GDP_SCALE: u32 = 2;
/// Integer digits available to a stored rate (`NUMERIC(20, 6)`).
const RATE_INTEGER_DIGITS: u32 = 14;
/// Integer digits available to a stored GDP (`NUMERIC(28, 2)`).
const GDP_INTEGER_DIGITS: u32 = 26;

/// Smallest rate the store cannot hold.
pub fn rate_limit() -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(RATE_INTEGER_DIGITS), 0)
}

/// Smallest GDP the store cannot hold.
pub fn gdp_limit() -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(GDP_INTEGER_DIGITS), 0)
}

/// A consistent (rate, GDP) pair. Only [`GdpEstimator::estimate`] builds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdpEstimate {
    exchange_rate: Decimal,
    gdp: Decimal,
}

impl GdpEstimate {
    /// Rate at scale [`RATE_SCALE`].
    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    /// GDP at scale [`GDP_SCALE`].
    pub fn gdp(&self) -> Decimal {
        self.gdp
    }
}

/// Pure GDP estimator parameterised by the per-capita constant.
///
/// # Examples
/// ```
/// use countries_backend::domain::GdpEstimator;
/// use rust_decimal::Decimal;
///
/// let estimate = GdpEstimator::default()
///     .estimate(206_139_589, Decimal::new(160_023, 2))
///     .unwrap();
/// assert_eq!(estimate.exchange_rate().to_string(), "1600.230000");
/// assert_eq!(estimate.gdp().to_string(), "193228088.15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdpEstimator {
    per_capita_usd: Decimal,
}

impl Default for GdpEstimator {
    fn default() -> Self {
        Self {
            per_capita_usd: Decimal::from(DEFAULT_PER_CAPITA_USD),
        }
    }
}

impl GdpEstimator {
    pub fn new(per_capita_usd: u32) -> Self {
        Self {
            per_capita_usd: Decimal::from(per_capita_usd),
        }
    }

    pub fn per_capita_usd(&self) -> Decimal {
        self.per_capita_usd
    }

    /// Estimate GDP for `population` at `rate`.
    ///
    /// Returns `None` when the rate is not strictly positive after rounding
    /// to [`RATE_SCALE`], or when the rate or result would not fit the store.
    /// Callers then store neither rate nor GDP.
    pub fn estimate(&self, population: u64, rate: Decimal) -> Option<GdpEstimate> {
        let exchange_rate = normalise_rate(rate)?;
        let gdp = Decimal::from(population)
            .checked_mul(self.per_capita_usd)?
            .checked_div(exchange_rate)?;
        let mut gdp = gdp.round_dp_with_strategy(GDP_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if gdp >= gdp_limit() {
            return None;
        }
        gdp.rescale(GDP_SCALE);
        Some(GdpEstimate { exchange_rate, gdp })
    }
}

/// Round `rate` to [`RATE_SCALE`] without range checks.
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round `rate` to the stored scale; non-positive or unstorable rates count
/// as missing.
pub fn normalise_rate(rate: Decimal) -> Option<Decimal> {
    let mut rounded = round_rate(rate);
    if rounded <= Decimal::ZERO || rounded >= rate_limit() {
        return None;
    }
    rounded.rescale(RATE_SCALE);
    Some(rounded)
}
