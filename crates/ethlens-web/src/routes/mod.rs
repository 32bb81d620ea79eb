//! Route handlers.

pub mod accounts;
pub mod dashboard;
pub mod graph;
pub mod neighbors;
pub mod summary;
pub mod timeline;

use axum::http::StatusCode;
use tracing::error;

use ethlens_core::EthlensError;

/// Handler result with the error body as plain text.
pub type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Map a domain error to its HTTP status.
pub fn api_error(err: EthlensError) -> (StatusCode, String) {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_invalid_request() {
        StatusCode::BAD_REQUEST
    } else {
        error!(error = %err, "Request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string())
}

/// Parse an optional query parameter, falling back to `default` when absent.
pub(crate) fn parse_or<T>(raw: Option<&str>, default: T) -> ApiResult<T>
where
    T: std::str::FromStr<Err = EthlensError>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse().map_err(api_error),
        None => Ok(default),
    }
}

/// Split a comma-separated list, dropping empty items.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}
