//! Diesel row types for the `countries` table.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::ports::CountryRepositoryError;
use crate::domain::{Country, CountryRecord};

use super::schema::countries;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct CountryRow {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<Decimal>,
    pub estimated_gdp: Option<Decimal>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

impl TryFrom<CountryRow> for Country {
    type Error = CountryRepositoryError;

    fn try_from(row: CountryRow) -> Result<Self, Self::Error> {
        let population = u64::try_from(row.population).map_err(|_| {
            CountryRepositoryError::query(format!("negative population stored for {}", row.name))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            capital: row.capital,
            region: row.region,
            population,
            currency_code: row.currency_code,
            exchange_rate: row.exchange_rate,
            estimated_gdp: row.estimated_gdp,
            flag_url: row.flag_url,
            last_refreshed_at: row.last_refreshed_at,
        })
    }
}

/// Full-row write used for both insert and overwrite; absent optionals are
/// written as NULL.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = countries)]
#[diesel(treat_none_as_null = true)]
pub(super) struct CountryWriteRow<'a> {
    pub name: &'a str,
    pub capital: Option<&'a str>,
    pub region: Option<&'a str>,
    pub population: i64,
    pub currency_code: Option<&'a str>,
    pub exchange_rate: Option<Decimal>,
    pub estimated_gdp: Option<Decimal>,
    pub flag_url: Option<&'a str>,
    pub last_refreshed_at: DateTime<Utc>,
}

impl<'a> TryFrom<&'a CountryRecord> for CountryWriteRow<'a> {
    type Error = CountryRepositoryError;

    fn try_from(record: &'a CountryRecord) -> Result<Self, Self::Error> {
        let facts = record.facts();
        let population = i64::try_from(facts.population()).map_err(|_| {
            CountryRepositoryError::query(format!(
                "population of {} exceeds storage range",
                facts.name()
            ))
        })?;
        Ok(Self {
            name: facts.name().as_str(),
            capital: facts.capital(),
            region: facts.region(),
            population,
            currency_code: facts.currency_code(),
            exchange_rate: record.exchange_rate(),
            estimated_gdp: record.estimated_gdp(),
            flag_url: facts.flag_url(),
            last_refreshed_at: record.last_refreshed_at(),
        })
    }
}
