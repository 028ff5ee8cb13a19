use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use factory_routers::ViewError;

pub fn view_error_to_response(err: ViewError) -> axum::response::Response {
    match err {
        ViewError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        ViewError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        ViewError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ViewError::ActionNotAllowed(action) => json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            format!("action `{action}` is not allowed"),
        ),
        ViewError::MissingLookup(_) | ViewError::Internal(_) => {
            tracing::error!(error = %err, "view failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
