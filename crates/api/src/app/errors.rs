use axum::http::StatusCode;
use axum::response::IntoResponse;

use medstock_infra::services::MembershipError;

use crate::app::dto::Failure;

pub fn failure(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(Failure::new(message))).into_response()
}

/// Anything that is not the caller's fault.
pub fn internal(err: impl std::fmt::Display) -> axum::response::Response {
    failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub fn membership_error_to_response(err: MembershipError) -> axum::response::Response {
    match err {
        MembershipError::Invalid(e) => failure(StatusCode::BAD_REQUEST, e.to_string()),
        MembershipError::TeamNotFound(_) => failure(StatusCode::NOT_FOUND, err.to_string()),
        MembershipError::Store(e) => internal(e),
    }
}
