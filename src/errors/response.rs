use axum::{
    response::{IntoResponse, Response, Json},
    http::StatusCode,
};
use serde::Serialize;
use crate::errors::AppError;
use crate::models::api::{Empty, Envelope};

/// Successful reply: a 200 envelope around `T`.
pub struct ApiResponse<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        envelope(StatusCode::OK, self.0)
    }
}

fn envelope<T: Serialize>(code: StatusCode, payload: T) -> Response {
    let body = Envelope {
        status: code.as_u16(),
        message: code.canonical_reason().unwrap_or("").to_string(),
        payload,
    };
    (code, Json(body)).into_response()
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationFailed
            | AppError::Unauthenticated
            | AppError::Forbidden { .. } => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Redis(_) | AppError::Queue(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Only the status and its canonical text reach the client. Details stay in the log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = code.as_u16(), "Request rejected");
        }
        envelope(code, Empty {})
    }
}
