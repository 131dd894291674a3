// SPDX-License-Identifier: GPL-3.0-or-later
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use reviewmaster_application::{AppState, ShowImportService};
use reviewmaster_metadata::ShowCandidate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use super::catalog::EntityResponse;
use super::{ApiError, ApiJson, ApiResult, ErrorResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LookupQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportShowRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowCandidateResponse {
    pub external_id: u64,
    pub title: String,
    pub genres: Vec<String>,
    pub premiere_year: Option<i32>,
    pub cast: Vec<String>,
    /// Upstream audience rating, 0-10.
    pub rating: Option<f64>,
}

impl From<ShowCandidate> for ShowCandidateResponse {
    fn from(c: ShowCandidate) -> Self {
        Self {
            external_id: c.external_id,
            title: c.title,
            genres: c.genres,
            premiere_year: c.premiere_year,
            cast: c.cast,
            rating: c.rating,
        }
    }
}

fn show_import(state: &AppState) -> ApiResult<&ShowImportService> {
    state.show_import.as_ref().ok_or_else(|| {
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "show lookup is disabled")
    })
}

/// Look up TV shows by title in the external catalog
#[utoipa::path(
    get,
    path = "/tv_shows/lookup",
    params(LookupQuery),
    responses(
        (status = 200, description = "Candidates, best match first", body = Vec<ShowCandidateResponse>),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 502, description = "Upstream lookup failed", body = ErrorResponse),
        (status = 503, description = "Show lookup disabled", body = ErrorResponse)
    ),
    tag = "shows"
)]
pub async fn lookup_shows(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<Vec<ShowCandidateResponse>>> {
    let service = show_import(&state)?;
    let title = query.title.unwrap_or_default();
    debug!(target: "api", %title, "show lookup");

    let candidates = service.lookup(&title).await?;
    Ok(Json(candidates.into_iter().map(Into::into).collect()))
}

/// Create a TV show from the best lookup match
#[utoipa::path(
    post,
    path = "/tv_shows/import",
    request_body = ImportShowRequest,
    responses(
        (status = 201, description = "Show created", body = EntityResponse),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 404, description = "No show matches the title", body = ErrorResponse),
        (status = 502, description = "Upstream lookup failed", body = ErrorResponse),
        (status = 503, description = "Show lookup disabled", body = ErrorResponse)
    ),
    tag = "shows"
)]
pub async fn import_show(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImportShowRequest>,
) -> ApiResult<(StatusCode, Json<EntityResponse>)> {
    let service = show_import(&state)?;
    let title = request.title.unwrap_or_default();
    let entity = service.import(&title).await?;
    Ok((StatusCode::CREATED, Json(entity.into())))
}
