//! HTTP inbound adapter exposing the countries REST endpoints.
//!
//! ```text
//! POST   /countries/refresh
//! GET    /countries
//! POST   /countries
//! GET    /countries/image
//! GET    /countries/{name}
//! DELETE /countries/{name}
//! GET    /status
//! GET    /health/ready
//! GET    /health/live
//! ```

use actix_web::web;

pub mod countries;
pub mod error;
pub mod health;
pub mod image;
pub mod refresh;
pub mod schemas;
pub mod state;
pub mod status;
mod validation;

pub use error::ApiResult;

/// Register the country endpoints and extractor error handlers.
///
/// Static `/countries/*` paths are registered before `/countries/{name}` so
/// they are not captured as names. Health probes are wired separately
/// because they depend on [`health::HealthState`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use countries_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(refresh::refresh_countries)
        .service(image::summary_image)
        .service(countries::list_countries)
        .service(countries::create_country)
        .service(countries::get_country)
        .service(countries::delete_country)
        .service(status::status);
}

#[cfg(test)]
pub(crate) mod test_utils;
