//! PostgreSQL-backed country store.
//!
//! Names are matched through `lower(name)`, which is also the unique index,
//! so rows differing only by case cannot coexist. Batch upserts run in one
//! transaction; aggregate reads run in one transaction so they observe a
//! single snapshot.
//!
//! Name ordering compares `lower(name)` under the `"C"` collation so rows
//! sort by code point, matching the in-memory store on any database locale.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, sql};
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::ports::{CountryRepository, CountryRepositoryError, UpsertSummary};
use crate::domain::{
    Country, CountryListQuery, CountryRecord, CountrySort, CountrySummary, GdpRank, RefreshStatus,
    RegionCount, name_key,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CountryRow, CountryWriteRow};
use super::pool::DbPool;
use super::schema::countries;

/// `lower(name)` compared bytewise, which for UTF-8 is code point order.
fn name_order() -> SqlLiteral<Text> {
    sql::<Text>(r#"lower(countries.name) COLLATE "C""#)
}

diesel::define_sql_function!(fn lower(value: Nullable<Text>) -> Nullable<Text>);

/// Diesel implementation of [`CountryRepository`].
#[derive(Clone)]
pub struct DieselCountryRepository {
    pool: DbPool,
}

impl DieselCountryRepository {
    /// ```rust,no_run
    /// use countries_backend::outbound::persistence::{DbPool, DieselCountryRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/countries")).await?;
    /// let repository = DieselCountryRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_into_countries(rows: Vec<CountryRow>) -> Result<Vec<Country>, CountryRepositoryError> {
    rows.into_iter().map(Country::try_from).collect()
}

#[async_trait]
impl CountryRepository for DieselCountryRepository {
    async fn upsert_all(
        &self,
        records: &[CountryRecord],
    ) -> Result<UpsertSummary, CountryRepositoryError> {
        let rows = records
            .iter()
            .map(|record| CountryWriteRow::try_from(record).map(|row| (record.name().key(), row)))
            .collect::<Result<Vec<_>, _>>()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let summary = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let mut summary = UpsertSummary::default();
                    for (key, row) in &rows {
                        let updated = diesel::update(
                            countries::table
                                .filter(lower(countries::name.nullable()).eq(key.as_str())),
                        )
                        .set(row)
                        .execute(conn)
                        .await?;
                        if updated == 0 {
                            diesel::insert_into(countries::table)
                                .values(row)
                                .execute(conn)
                                .await?;
                            summary.created += 1;
                        } else {
                            summary.updated += 1;
                        }
                    }
                    Ok(summary)
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| map_diesel_error(error, None))?;

        debug!(
            created = summary.created,
            updated = summary.updated,
            "country batch upserted"
        );
        Ok(summary)
    }

    async fn insert(&self, record: &CountryRecord) -> Result<Country, CountryRepositoryError> {
        let row = CountryWriteRow::try_from(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted: CountryRow = diesel::insert_into(countries::table)
            .values(&row)
            .returning(CountryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, Some(record.name().as_str())))?;
        Country::try_from(inserted)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, CountryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CountryRow> = countries::table
            .filter(lower(countries::name.nullable()).eq(name_key(name)))
            .select(CountryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, None))?;
        row.map(Country::try_from).transpose()
    }

    async fn list(&self, query: &CountryListQuery) -> Result<Vec<Country>, CountryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut statement = countries::table
            .select(CountryRow::as_select())
            .into_boxed();

        if let Some(region) = query.region() {
            statement = statement.filter(lower(countries::region).eq(region.to_lowercase()));
        }
        if let Some(currency) = query.currency() {
            statement =
                statement.filter(lower(countries::currency_code).eq(currency.to_lowercase()));
        }

        let by_name = name_order();
        statement = match query.sort() {
            CountrySort::GdpDesc => {
                statement.order((countries::estimated_gdp.desc().nulls_last(), by_name.asc()))
            }
            CountrySort::GdpAsc => {
                statement.order((countries::estimated_gdp.asc().nulls_last(), by_name.asc()))
            }
            CountrySort::PopulationDesc => {
                statement.order((countries::population.desc(), by_name.asc()))
            }
            CountrySort::PopulationAsc => {
                statement.order((countries::population.asc(), by_name.asc()))
            }
            CountrySort::NameDesc => statement.order(by_name.desc()),
            CountrySort::NameAsc => statement.order(by_name.asc()),
        };

        let rows: Vec<CountryRow> = statement
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, None))?;
        rows_into_countries(rows)
    }

    async fn delete_by_name(&self, name: &str) -> Result<Option<Country>, CountryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CountryRow> = diesel::delete(
            countries::table.filter(lower(countries::name.nullable()).eq(name_key(name))),
        )
        .returning(CountryRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|error| map_diesel_error(error, None))?;
        row.map(Country::try_from).transpose()
    }

    async fn status(&self) -> Result<RefreshStatus, CountryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (total, latest): (i64, Option<DateTime<Utc>>) = countries::table
            .select((count_star(), diesel::dsl::max(countries::last_refreshed_at)))
            .first(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, None))?;
        Ok(RefreshStatus {
            total_countries: u64::try_from(total).unwrap_or_default(),
            last_refreshed_at: latest,
        })
    }

    async fn summary(&self, top_n: usize) -> Result<CountrySummary, CountryRepositoryError> {
        let limit = i64::try_from(top_n)
            .map_err(|_| CountryRepositoryError::query("summary limit exceeds i64 range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (status, top, groups) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let status: (i64, Option<DateTime<Utc>>) = countries::table
                        .select((count_star(), diesel::dsl::max(countries::last_refreshed_at)))
                        .first(conn)
                        .await?;
                    let top: Vec<(String, Option<Decimal>)> = countries::table
                        .filter(countries::estimated_gdp.is_not_null())
                        .order((
                            countries::estimated_gdp.desc(),
                            name_order().asc(),
                        ))
                        .limit(limit)
                        .select((countries::name, countries::estimated_gdp))
                        .load(conn)
                        .await?;
                    let groups: Vec<(Option<String>, i64)> = countries::table
                        .group_by(countries::region)
                        .select((countries::region, count_star()))
                        .load(conn)
                        .await?;
                    Ok((status, top, groups))
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| map_diesel_error(error, None))?;

        let (total, latest) = status;
        Ok(CountrySummary {
            status: RefreshStatus {
                total_countries: u64::try_from(total).unwrap_or_default(),
                last_refreshed_at: latest,
            },
            top_by_gdp: top
                .into_iter()
                .filter_map(|(name, gdp)| {
                    gdp.map(|estimated_gdp| GdpRank {
                        name,
                        estimated_gdp,
                    })
                })
                .collect(),
            regions: RegionCount::tally(
                groups
                    .into_iter()
                    .map(|(region, count)| (region, u64::try_from(count).unwrap_or_default())),
            ),
        })
    }
}
