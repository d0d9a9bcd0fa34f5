//! REST Countries (v2) adapter for the `CountrySource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_REST_COUNTRIES_URL, RestCountriesHttpSource};
