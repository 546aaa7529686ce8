use crate::core::error::ServiceError;
use axum::http::StatusCode;
use log::error;

pub mod debug;

/// Maps a service failure onto an HTTP error response.
pub(crate) fn internal_error(e: ServiceError) -> (StatusCode, String) {
    error!("{e}");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
