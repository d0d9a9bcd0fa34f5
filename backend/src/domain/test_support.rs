//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{CountryFacts, CountryName, CountryRecord, GdpEstimator};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn record(name: &str, population: u64, currency: &str, rate: Option<i64>) -> CountryRecord {
    let facts = CountryFacts::new(CountryName::new(name).expect("valid name"), population)
        .with_currency_code(Some(currency))
        .expect("valid currency");
    CountryRecord::derive(
        facts,
        rate.map(rust_decimal::Decimal::from),
        &GdpEstimator::default(),
        fixture_timestamp(),
    )
}
