use axum::{
    extract::rejection::JsonRejection,
    http,
    response::{IntoResponse, Response},
};
pub type WebResult<T> = std::result::Result<T, WebError>;

/// Failures that happen outside of the recipe lookup itself.
///
/// Upstream failures never become a `WebError`; they are reported inside a 200 body.
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Invalid request body: {0}")]
    BadRequest(#[from] JsonRejection),
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            // Keep axum's status (400, 415 or 422) so schema failures stay distinguishable
            WebError::BadRequest(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text()).into_response()
            }
            WebError::NotFound => (http::StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
}
