//! Wire shapes for `GET /v2/all?fields=name,capital,region,population,flag,currencies`.

use serde::Deserialize;

use crate::domain::ports::SourceCountry;

#[derive(Debug, Deserialize)]
pub(super) struct CountryDto {
    #[serde(default)]
    pub(super) name: String,
    pub(super) capital: Option<String>,
    pub(super) region: Option<String>,
    pub(super) population: Option<u64>,
    pub(super) flag: Option<String>,
    pub(super) currencies: Option<Vec<CurrencyDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CurrencyDto {
    pub(super) code: Option<String>,
}

impl From<CountryDto> for SourceCountry {
    fn from(dto: CountryDto) -> Self {
        // Only the first listed currency with a code is used.
        let currency_code = dto
            .currencies
            .into_iter()
            .flatten()
            .find_map(|currency| currency.code);
        Self {
            name: dto.name,
            capital: dto.capital,
            region: dto.region,
            // Missing or null populations count as zero.
            population: dto.population.unwrap_or(0),
            currency_code,
            flag_url: dto.flag,
        }
    }
}
