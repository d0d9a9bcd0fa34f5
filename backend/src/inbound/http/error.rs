//! HTTP adapter mapping for domain errors.
//!
//! The domain error type stays HTTP-agnostic; this module turns it into a
//! status code and the uniform JSON body, and routes extractor failures
//! through the same shape.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned in place of any internal error.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn with_current_trace(error: Error) -> Error {
    match (error.trace_id(), TraceId::current()) {
        (None, Some(id)) => error.with_trace_id(id.to_string()),
        _ => error,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal(INTERNAL_MESSAGE);
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let body = with_current_trace(redact_if_internal(self));
        if body.code() == ErrorCode::InternalError {
            error!(error = %self, trace_id = body.trace_id(), "request failed");
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = body.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(body)
    }
}

/// Render malformed JSON bodies with the uniform error body.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected request body");
    Error::invalid_request("Invalid JSON body")
        .with_details(serde_json::Value::String(err.to_string()))
        .into()
}

/// Render malformed query strings with the uniform error body.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected query string");
    Error::invalid_request("Invalid query parameters")
        .with_details(serde_json::Value::String(err.to_string()))
        .into()
}

/// Render undecodable path segments with the uniform error body.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected path");
    Error::invalid_request("Invalid path parameter")
        .with_details(serde_json::Value::String(err.to_string()))
        .into()
}
