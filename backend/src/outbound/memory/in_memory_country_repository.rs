//! Country store held in process memory.
//!
//! Rows are keyed by their case-folded name behind one `RwLock`, so batch
//! upserts are atomic with respect to readers and aggregates see a single
//! snapshot. Data is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{CountryRepository, CountryRepositoryError, UpsertSummary};
use crate::domain::{
    Country, CountryListQuery, CountryRecord, CountrySummary, GdpRank, RefreshStatus, RegionCount,
    name_key,
};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<String, Country>,
    next_id: i64,
}

impl Table {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn status(&self) -> RefreshStatus {
        RefreshStatus {
            total_countries: self.rows.len() as u64,
            last_refreshed_at: self.rows.values().map(|row| row.last_refreshed_at).max(),
        }
    }
}

/// In-memory implementation of [`CountryRepository`].
#[derive(Debug, Default)]
pub struct InMemoryCountryRepository {
    table: RwLock<Table>,
}

impl InMemoryCountryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CountryRepository for InMemoryCountryRepository {
    async fn upsert_all(
        &self,
        records: &[CountryRecord],
    ) -> Result<UpsertSummary, CountryRepositoryError> {
        let mut table = self.table.write().await;
        let mut summary = UpsertSummary::default();
        for record in records {
            let key = record.name().key();
            let id = match table.rows.get(&key) {
                Some(existing) => {
                    summary.updated += 1;
                    existing.id
                }
                None => {
                    summary.created += 1;
                    table.allocate_id()
                }
            };
            table.rows.insert(key, record.clone().into_country(id));
        }
        Ok(summary)
    }

    async fn insert(&self, record: &CountryRecord) -> Result<Country, CountryRepositoryError> {
        let mut table = self.table.write().await;
        let key = record.name().key();
        if table.rows.contains_key(&key) {
            return Err(CountryRepositoryError::duplicate(record.name().as_str()));
        }
        let id = table.allocate_id();
        let country = record.clone().into_country(id);
        table.rows.insert(key, country.clone());
        Ok(country)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Country>, CountryRepositoryError> {
        Ok(self.table.read().await.rows.get(&name_key(name)).cloned())
    }

    async fn list(&self, query: &CountryListQuery) -> Result<Vec<Country>, CountryRepositoryError> {
        let table = self.table.read().await;
        let mut countries: Vec<Country> = table
            .rows
            .values()
            .filter(|country| query.matches(country))
            .cloned()
            .collect();
        countries.sort_by(|a, b| query.compare(a, b));
        Ok(countries)
    }

    async fn delete_by_name(&self, name: &str) -> Result<Option<Country>, CountryRepositoryError> {
        Ok(self.table.write().await.rows.remove(&name_key(name)))
    }

    async fn status(&self) -> Result<RefreshStatus, CountryRepositoryError> {
        Ok(self.table.read().await.status())
    }

    async fn summary(&self, top_n: usize) -> Result<CountrySummary, CountryRepositoryError> {
        let table = self.table.read().await;

        let mut ranked: Vec<(&Country, rust_decimal::Decimal)> = table
            .rows
            .values()
            .filter_map(|country| country.estimated_gdp.map(|gdp| (country, gdp)))
            .collect();
        ranked.sort_by(|(a, gdp_a), (b, gdp_b)| gdp_b.cmp(gdp_a).then_with(|| a.key().cmp(&b.key())));

        Ok(CountrySummary {
            status: table.status(),
            top_by_gdp: ranked
                .into_iter()
                .take(top_n)
                .map(|(country, estimated_gdp)| GdpRank {
                    name: country.name.clone(),
                    estimated_gdp,
                })
                .collect(),
            regions: RegionCount::tally(
                table
                    .rows
                    .values()
                    .map(|country| (country.region.as_deref(), 1)),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::test_support::record;
    use crate::domain::{CountrySort, UNKNOWN_REGION};

    #[fixture]
    fn repository() -> InMemoryCountryRepository {
        InMemoryCountryRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_matches_names_case_insensitively(repository: InMemoryCountryRepository) {
        let first = repository
            .upsert_all(&[record("Ghana", 10, "GHS", Some(12))])
            .await
            .expect("first upsert");
        let second = repository
            .upsert_all(&[record("GHANA", 20, "GHS", Some(12))])
            .await
            .expect("second upsert");

        assert_eq!(first, UpsertSummary { created: 1, updated: 0 });
        assert_eq!(second, UpsertSummary { created: 0, updated: 1 });
        let stored = repository
            .find_by_name("ghana")
            .await
            .expect("lookup")
            .expect("row present");
        assert_eq!(stored.id, 1);
        assert_eq!(stored.name, "GHANA");
        assert_eq!(stored.population, 20);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_case_variant_duplicates(repository: InMemoryCountryRepository) {
        repository
            .insert(&record("Chad", 1, "XAF", None))
            .await
            .expect("insert");

        let error = repository
            .insert(&record("chad", 2, "XAF", None))
            .await
            .expect_err("duplicate");

        assert!(matches!(error, CountryRepositoryError::Duplicate { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn list_filters_and_orders_null_gdp_last(repository: InMemoryCountryRepository) {
        repository
            .upsert_all(&[
                record("Benin", 5, "XOF", None),
                record("Togo", 5, "XOF", Some(500)),
                record("Niger", 50, "XOF", Some(500)),
                record("Ghana", 30, "GHS", Some(12)),
            ])
            .await
            .expect("seed");

        let query = CountryListQuery::default()
            .with_currency("xof")
            .with_sort(CountrySort::GdpDesc);
        let names: Vec<String> = repository
            .list(&query)
            .await
            .expect("list")
            .into_iter()
            .map(|country| country.name)
            .collect();

        assert_eq!(names, ["Niger", "Togo", "Benin"]);
    }

    #[rstest]
    #[tokio::test]
    async fn names_sort_by_code_point(repository: InMemoryCountryRepository) {
        repository
            .upsert_all(&[
                record("Éire", 1, "EUR", None),
                record("Zambia", 1, "ZMW", None),
                record("Åland Islands", 1, "EUR", None),
                record("angola", 1, "AOA", None),
            ])
            .await
            .expect("seed");

        let names: Vec<String> = repository
            .list(&CountryListQuery::default())
            .await
            .expect("list")
            .into_iter()
            .map(|country| country.name)
            .collect();

        assert_eq!(names, ["angola", "Zambia", "Åland Islands", "Éire"]);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_once(repository: InMemoryCountryRepository) {
        repository
            .insert(&record("Chad", 1, "XAF", None))
            .await
            .expect("insert");

        assert!(repository.delete_by_name("CHAD").await.expect("delete").is_some());
        assert!(repository.delete_by_name("chad").await.expect("delete").is_none());
        assert_eq!(repository.status().await.expect("status").total_countries, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn summary_ranks_gdp_and_counts_regions(repository: InMemoryCountryRepository) {
        repository
            .upsert_all(&[
                record("Benin", 5, "XOF", None),
                record("Niger", 50, "XOF", Some(500)),
                record("Ghana", 30, "GHS", Some(12)),
            ])
            .await
            .expect("seed");

        let summary = repository.summary(1).await.expect("summary");

        assert_eq!(summary.status.total_countries, 3);
        let [top] = summary.top_by_gdp.as_slice() else {
            panic!("expected one ranked country");
        };
        assert_eq!(top.name, "Ghana");
        assert!(top.estimated_gdp > Decimal::ZERO);
        assert_eq!(
            summary.regions,
            [RegionCount {
                region: UNKNOWN_REGION.to_owned(),
                count: 3,
            }]
        );
    }
}
