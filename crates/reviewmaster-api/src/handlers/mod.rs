// SPDX-License-Identifier: GPL-3.0-or-later
pub mod catalog;
pub mod shows;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reviewmaster_application::{CatalogError, ShowImportError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Error returned by every handler, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            CatalogError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            CatalogError::Storage(source) => {
                error!(target: "api", error = ?source, "catalog storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<ShowImportError> for ApiError {
    fn from(err: ShowImportError) -> Self {
        match err {
            ShowImportError::MissingTitle => Self::bad_request(err.to_string()),
            ShowImportError::NoCandidate(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ShowImportError::Upstream(ref source) => {
                error!(target: "api", error = %source, "show lookup failed");
                Self::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
            ShowImportError::Catalog(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Request body extractor whose rejections render as [`ErrorResponse`] with 400.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
