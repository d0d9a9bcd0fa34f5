//! Transport plumbing shared by the reqwest-backed sources.
//!
//! Each adapter owns its DTOs and error type; this module only performs the
//! GET, classifies failures and hands back the raw body.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::debug;

const USER_AGENT: &str = concat!("countries-backend/", env!("CARGO_PKG_VERSION"));
const PREVIEW_CHAR_LIMIT: usize = 160;

/// Failure classes common to every outbound JSON fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HttpFailure {
    Transport(String),
    Timeout(String),
    Status(u16, String),
    Decode(String),
}

/// Build a client with a whole-request deadline.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// GET `url` and return the body of a successful response.
pub(crate) async fn get_body(client: &Client, url: &Url) -> Result<Vec<u8>, HttpFailure> {
    debug!(%url, "fetching upstream document");
    let response = client
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

fn map_transport_error(error: reqwest::Error) -> HttpFailure {
    if error.is_timeout() {
        HttpFailure::Timeout(error.to_string())
    } else if error.is_decode() {
        HttpFailure::Decode(error.to_string())
    } else {
        HttpFailure::Transport(error.to_string())
    }
}

pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> HttpFailure {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => HttpFailure::Timeout(message),
        _ => HttpFailure::Status(status.as_u16(), message),
    }
}

/// Whitespace-collapsed, length-limited rendering of an error body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
