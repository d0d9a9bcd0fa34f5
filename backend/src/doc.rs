//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the schemas they exchange. Domain types the domain keeps free of
//! utoipa are described by wrappers in [`crate::inbound::http::schemas`].
//!
//! Swagger UI serves the document in debug builds.

use crate::domain::{Country, CountrySort, RefreshStatus};
use crate::domain::ports::RefreshOutcome;
use crate::inbound::http::countries::CreateCountryRequest;
use crate::inbound::http::refresh::RefreshResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, MessageResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Countries backend API",
        description = "Country data cached from public sources, with estimated GDP, \
                       filtered listings and a rendered summary image."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::refresh::refresh_countries,
        crate::inbound::http::image::summary_image,
        crate::inbound::http::countries::list_countries,
        crate::inbound::http::countries::create_country,
        crate::inbound::http::countries::get_country,
        crate::inbound::http::countries::delete_country,
        crate::inbound::http::status::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Country,
        CountrySort,
        RefreshStatus,
        RefreshOutcome,
        RefreshResponse,
        CreateCountryRequest,
        MessageResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "countries", description = "Refresh, query and manage countries"),
        (name = "status", description = "Store-wide counters"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
