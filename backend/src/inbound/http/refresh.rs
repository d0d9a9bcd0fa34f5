//! Refresh trigger.
//!
//! ```text
//! POST /countries/refresh
//! ```

use actix_web::{post, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::RefreshOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Message returned after a successful refresh.
pub const REFRESH_SUCCEEDED: &str = "Countries refreshed successfully";

/// Body for a successful refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshResponse {
    #[schema(example = "Countries refreshed successfully")]
    pub message: String,
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
}

/// Fetch both upstream sources and reconcile them into the store.
///
/// Blocks until the upsert pass completes; overlapping calls are serialised.
#[utoipa::path(
    post,
    path = "/countries/refresh",
    responses(
        (status = 200, description = "Refresh completed", body = RefreshResponse),
        (status = 503, description = "Country source or store unavailable", body = ErrorSchema)
    ),
    tags = ["countries"],
    operation_id = "refreshCountries"
)]
#[post("/countries/refresh")]
pub async fn refresh_countries(state: web::Data<HttpState>) -> ApiResult<web::Json<RefreshResponse>> {
    let outcome = state.refresh.refresh().await?;
    info!(
        total = outcome.total_countries,
        created = outcome.created,
        updated = outcome.updated,
        "countries refreshed"
    );
    Ok(web::Json(RefreshResponse {
        message: REFRESH_SUCCEEDED.to_owned(),
        outcome,
    }))
}
