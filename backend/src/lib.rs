//! Countries backend library: domain, adapters and HTTP surface.
//!
//! The binary in `main.rs` wires these together; integration tests build the
//! same application from [`inbound::http::configure`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
