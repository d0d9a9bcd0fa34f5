//! Outbound adapters implementing the driven ports.
//!
//! - **rest_countries**, **exchange_rates**: `reqwest` clients for the two
//!   upstream data sources.
//! - **persistence**: PostgreSQL store using Diesel and `diesel-async`.
//! - **memory**: process-local store used when no database is configured.
//! - **summary_image**: `plotters` renderer and on-disk image cache.
//!
//! Adapters translate between domain types and infrastructure
//! representations; they hold no business rules.

pub mod exchange_rates;
mod http_support;
pub mod memory;
pub mod persistence;
pub mod rest_countries;
pub mod summary_image;
