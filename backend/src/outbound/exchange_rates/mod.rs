//! Open exchange-rate API adapter for the `ExchangeRateSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_EXCHANGE_RATES_URL, ExchangeRateHttpSource};
