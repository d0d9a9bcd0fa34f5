//! OpenAPI schema definitions for types the domain keeps framework-free.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The named country does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A country with the same name already exists.
    #[schema(rename = "conflict")]
    Conflict,
    /// An upstream source or the store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "Country not found")]
    error: String,
    /// Stable machine-readable code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Field-level messages or upstream failure text.
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// Body carrying a single confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Country \"Nigeria\" deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
