//! Store-wide status.
//!
//! ```text
//! GET /status
//! ```

use actix_web::{get, web};

use crate::domain::RefreshStatus;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Total row count and the most recent refresh time.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Store status", body = RefreshStatus),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["status"],
    operation_id = "getStatus"
)]
#[get("/status")]
pub async fn status(state: web::Data<HttpState>) -> ApiResult<web::Json<RefreshStatus>> {
    Ok(web::Json(state.countries.status().await?))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::inbound::http::configure;
    use crate::inbound::http::test_utils::fixture_state;

    #[rstest]
    #[actix_web::test]
    async fn empty_store_reports_zero_and_null() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_state()))
                .configure(configure),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/status").to_request(),
        )
        .await;

        assert!(response.status().is_success());
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body, json!({"total_countries": 0, "last_refreshed_at": null}));
    }
}
