//! PostgreSQL persistence via Diesel, `diesel-async` and bb8.
//!
//! Row structs and the schema stay private; only the repository, the pool and
//! the migration runner are exported.

mod diesel_basic_error_mapping;
mod diesel_country_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_country_repository::DieselCountryRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
