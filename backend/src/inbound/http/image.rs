//! Rendered summary image.
//!
//! ```text
//! GET /countries/image
//! ```

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Header carrying the data version the image was rendered from.
pub const SUMMARY_VERSION_HEADER: &str = "x-summary-version";

/// PNG summary of the store; a placeholder when no data has been loaded.
#[utoipa::path(
    get,
    path = "/countries/image",
    responses(
        (
            status = 200,
            description = "Summary image",
            content_type = "image/png",
            body = Vec<u8>,
            headers(("Cache-Control" = String, description = "Always no-cache"))
        ),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["countries"],
    operation_id = "getSummaryImage"
)]
#[get("/countries/image")]
pub async fn summary_image(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let image = state.images.summary_image().await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::png())
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header((SUMMARY_VERSION_HEADER, image.version))
        .body(image.png))
}
