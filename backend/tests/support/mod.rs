//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates, so each pulls this module in
//! with `mod support;` and uses only what it needs.

#![allow(
    dead_code,
    reason = "each integration test crate uses a different subset of helpers"
)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use tempfile::TempDir;

use countries_backend::domain::ports::{
    CountryRepository, CountrySource, CountrySourceError, ExchangeRateSource,
    ExchangeRateSourceError, ExchangeRates, SourceCountry, SummaryImageCache, SummaryRenderer,
    SummaryRendererError,
};
use countries_backend::domain::{
    CountriesService, CountryRefreshService, CountrySummary, SummaryImageService,
};
use countries_backend::inbound::http::state::HttpState;
use countries_backend::outbound::memory::InMemoryCountryRepository;
use countries_backend::outbound::summary_image::{FileSummaryImageCache, PlottersSummaryRenderer};

/// Country catalogue that can be switched into a failing state.
#[derive(Default)]
pub struct SwitchableCountrySource {
    countries: Mutex<Vec<SourceCountry>>,
    failing: AtomicBool,
}

impl SwitchableCountrySource {
    pub fn new(countries: Vec<SourceCountry>) -> Self {
        Self {
            countries: Mutex::new(countries),
            failing: AtomicBool::new(false),
        }
    }

    pub fn replace(&self, countries: Vec<SourceCountry>) {
        *self.countries.lock().expect("source lock") = countries;
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CountrySource for SwitchableCountrySource {
    async fn fetch_countries(&self) -> Result<Vec<SourceCountry>, CountrySourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CountrySourceError::timeout("deadline of 10s elapsed"));
        }
        Ok(self.countries.lock().expect("source lock").clone())
    }
}

/// Exchange-rate table that can be switched into a failing state.
#[derive(Default)]
pub struct SwitchableRateSource {
    rates: Mutex<ExchangeRates>,
    failing: AtomicBool,
}

impl SwitchableRateSource {
    pub fn new(rates: ExchangeRates) -> Self {
        Self {
            rates: Mutex::new(rates),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExchangeRateSource for SwitchableRateSource {
    async fn fetch_rates(&self) -> Result<ExchangeRates, ExchangeRateSourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ExchangeRateSourceError::status(502_u16, "bad gateway"));
        }
        Ok(self.rates.lock().expect("rates lock").clone())
    }
}

/// Clock that advances one second per reading.
pub struct SteppingClock {
    next_second: AtomicI64,
}

impl SteppingClock {
    pub fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            next_second: AtomicI64::new(at.timestamp()),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let second = self.next_second.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(second, 0)
            .single()
            .expect("timestamp in range")
    }
}

/// Renderer wrapper counting how often a render actually happens.
#[derive(Default)]
pub struct CountingRenderer {
    inner: PlottersSummaryRenderer,
    renders: AtomicUsize,
}

impl CountingRenderer {
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl SummaryRenderer for CountingRenderer {
    fn render(&self, summary: &CountrySummary) -> Result<Vec<u8>, SummaryRendererError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        self.inner.render(summary)
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn source_country(
    name: &str,
    region: Option<&str>,
    population: u64,
    currency: Option<&str>,
) -> SourceCountry {
    SourceCountry {
        name: name.to_owned(),
        capital: None,
        region: region.map(str::to_owned),
        population,
        currency_code: currency.map(str::to_owned),
        flag_url: None,
    }
}

/// A small catalogue covering rates, missing rates and missing currencies.
pub fn catalogue() -> Vec<SourceCountry> {
    vec![
        source_country("Nigeria", Some("Africa"), 206_139_589, Some("NGN")),
        source_country("Ghana", Some("Africa"), 31_072_940, Some("GHS")),
        source_country("France", Some("Europe"), 67_391_582, Some("EUR")),
        source_country("Tuvalu", Some("Oceania"), 11_792, Some("TVD")),
        source_country("Antarctica", None, 1_000, None),
    ]
}

pub fn rates() -> ExchangeRates {
    ExchangeRates::from_iter([
        ("NGN", Decimal::new(160_023, 2)),
        ("GHS", Decimal::new(1_195, 2)),
        ("EUR", Decimal::new(92, 2)),
    ])
}

/// Services over an in-memory store and a disk cache in a temp directory.
pub struct Harness {
    pub countries: Arc<SwitchableCountrySource>,
    pub rates: Arc<SwitchableRateSource>,
    pub repository: Arc<InMemoryCountryRepository>,
    pub renderer: Arc<CountingRenderer>,
    pub cache_dir: TempDir,
    pub state: HttpState,
}

impl Harness {
    pub fn new() -> Self {
        let countries = Arc::new(SwitchableCountrySource::new(catalogue()));
        let rates = Arc::new(SwitchableRateSource::new(rates()));
        let repository = Arc::new(InMemoryCountryRepository::new());
        let renderer = Arc::new(CountingRenderer::default());
        let cache_dir = TempDir::new().expect("temp dir");
        let images: Arc<dyn SummaryImageCache> =
            Arc::new(FileSummaryImageCache::open(cache_dir.path()).expect("cache dir"));
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::starting_at(start_time()));
        let store: Arc<dyn CountryRepository> = repository.clone();

        let countries_service = Arc::new(CountriesService::new(
            Arc::clone(&store),
            Arc::clone(&images),
            Arc::clone(&clock),
        ));
        let state = HttpState {
            refresh: Arc::new(CountryRefreshService::new(
                countries.clone(),
                rates.clone(),
                Arc::clone(&store),
                Arc::clone(&images),
                clock,
            )),
            countries: countries_service.clone(),
            countries_command: countries_service,
            images: Arc::new(SummaryImageService::new(store, images, renderer.clone())),
        };

        Self {
            countries,
            rates,
            repository,
            renderer,
            cache_dir,
            state,
        }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    /// Names of the files currently in the image cache directory.
    pub fn cached_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.cache_dir.path())
            .expect("read cache dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}
