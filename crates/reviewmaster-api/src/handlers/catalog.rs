// SPDX-License-Identifier: GPL-3.0-or-later

//! Handlers shared by `/movies`, `/books` and `/tv_shows`.
//!
//! The router mounts the same handlers once per kind and passes the kind in
//! through an [`Extension`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use reviewmaster_application::AppState;
use reviewmaster_domain::{Entity, EntityId, EntityKind, Review, ReviewId};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use super::{ApiError, ApiJson, ApiResult, ErrorResponse, MessageResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub review_id: i64,
    pub rating: f64,
    pub note: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            review_id: review.review_id.get(),
            rating: review.rating.value(),
            note: review.note,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntityResponse {
    pub id: i64,
    pub name: String,
    pub genre: String,
    /// Mean of all review ratings, `null` without reviews.
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewResponse>,
}

impl From<Entity> for EntityResponse {
    fn from(entity: Entity) -> Self {
        let average_rating = entity.average_rating();
        Self {
            id: entity.id.get(),
            name: entity.name,
            genre: entity.genre,
            average_rating,
            reviews: entity.reviews.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of `POST /{kind}`. Books and shows send `title`, movies send `name`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEntityRequest {
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEntityRequest {
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    pub rating: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditReviewRequest {
    pub rating: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GenreQuery {
    /// Case-insensitive substring of the genre.
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive substring of the name.
    pub query: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ApiResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("{} is required", field))),
    }
}

fn entities(list: Vec<Entity>) -> Json<Vec<EntityResponse>> {
    Json(list.into_iter().map(Into::into).collect())
}

// ============================================================================
// Handlers
// ============================================================================

/// List every entity of a kind with its reviews
#[utoipa::path(
    get,
    path = "/{kind}",
    params(("kind" = String, Path, description = "movies, books or tv_shows")),
    responses(
        (status = 200, description = "All entities in creation order", body = Vec<EntityResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_entities(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EntityResponse>>> {
    debug!(target: "api", %kind, "listing entities");
    Ok(entities(state.catalog(kind).list_entities().await?))
}

/// Create an entity
#[utoipa::path(
    post,
    path = "/{kind}",
    params(("kind" = String, Path, description = "movies, books or tv_shows")),
    request_body = CreateEntityRequest,
    responses(
        (status = 201, description = "Entity created", body = EntityResponse),
        (status = 400, description = "Name missing or blank", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_entity(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateEntityRequest>,
) -> ApiResult<(StatusCode, Json<EntityResponse>)> {
    debug!(target: "api", %kind, ?request, "creating entity");
    let name = request
        .name
        .as_deref()
        .ok_or_else(|| ApiError::bad_request(format!("{} is required", kind.name_field())))?;

    let entity = state
        .catalog(kind)
        .create_entity(name, request.genre.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Entities whose genre contains the given text
#[utoipa::path(
    get,
    path = "/{kind}/genre",
    params(("kind" = String, Path, description = "movies, books or tv_shows"), GenreQuery),
    responses(
        (status = 200, description = "Matching entities", body = Vec<EntityResponse>),
        (status = 400, description = "Genre missing", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn search_by_genre(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> ApiResult<Json<Vec<EntityResponse>>> {
    let genre = required(&query.genre, "genre")?;
    Ok(entities(state.catalog(kind).search_by_genre(genre).await?))
}

/// Entities whose name contains the given text
#[utoipa::path(
    get,
    path = "/{kind}/search",
    params(("kind" = String, Path, description = "movies, books or tv_shows"), SearchQuery),
    responses(
        (status = 200, description = "Matching entities", body = Vec<EntityResponse>),
        (status = 400, description = "Query missing", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn search_by_name(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<EntityResponse>>> {
    let needle = required(&query.query, "query")?;
    Ok(entities(state.catalog(kind).search_by_name(needle).await?))
}

/// Get a single entity by ID
#[utoipa::path(
    get,
    path = "/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Entity found", body = EntityResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_entity(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EntityResponse>> {
    let id = EntityId::new(id);
    match state.catalog(kind).get_entity(id).await? {
        Some(entity) => Ok(Json(entity.into())),
        None => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("{} {} not found", kind.label(), id),
        )),
    }
}

/// Update name and/or genre
#[utoipa::path(
    put,
    path = "/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID")
    ),
    request_body = UpdateEntityRequest,
    responses(
        (status = 200, description = "Entity updated", body = EntityResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn update_entity(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateEntityRequest>,
) -> ApiResult<Json<EntityResponse>> {
    debug!(target: "api", %kind, id, ?request, "updating entity");
    let entity = state
        .catalog(kind)
        .update_entity(
            EntityId::new(id),
            request.name.as_deref(),
            request.genre.as_deref(),
        )
        .await?;
    Ok(Json(entity.into()))
}

/// Delete an entity and all of its reviews
#[utoipa::path(
    delete,
    path = "/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Entity deleted", body = MessageResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn delete_entity(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let id = EntityId::new(id);
    state.catalog(kind).delete_entity(id).await?;
    Ok(Json(MessageResponse {
        message: format!("{} {} deleted", kind.label(), id),
    }))
}

/// Reviews of one entity
#[utoipa::path(
    get,
    path = "/{kind}/{id}/reviews",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Reviews in insertion order", body = Vec<ReviewResponse>),
        (status = 404, description = "Entity not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    let reviews = state.catalog(kind).list_reviews(EntityId::new(id)).await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

/// Add a review
#[utoipa::path(
    post,
    path = "/{kind}/{id}/reviews",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID")
    ),
    request_body = AddReviewRequest,
    responses(
        (status = 201, description = "Review added", body = ReviewResponse),
        (status = 400, description = "Rating missing or out of range", body = ErrorResponse),
        (status = 404, description = "Entity not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn add_review(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<AddReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    let rating = request
        .rating
        .ok_or_else(|| ApiError::bad_request("rating is required"))?;
    let review = state
        .catalog(kind)
        .add_review(EntityId::new(id), rating, request.note.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Edit a review; omitted fields are kept
#[utoipa::path(
    put,
    path = "/{kind}/{id}/reviews/{review_id}",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID"),
        ("review_id" = i64, Path, description = "Review ID")
    ),
    request_body = EditReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Nothing to update or rating out of range", body = ErrorResponse),
        (status = 404, description = "Entity or review not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn edit_review(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i64, i64)>,
    ApiJson(request): ApiJson<EditReviewRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    let review = state
        .catalog(kind)
        .edit_review(
            EntityId::new(id),
            ReviewId::new(review_id),
            request.rating,
            request.note.as_deref(),
        )
        .await?;
    Ok(Json(review.into()))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/{kind}/{id}/reviews/{review_id}",
    params(
        ("kind" = String, Path, description = "movies, books or tv_shows"),
        ("id" = i64, Path, description = "Entity ID"),
        ("review_id" = i64, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 404, description = "Entity or review not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    Extension(kind): Extension<EntityKind>,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MessageResponse>> {
    let review_id = ReviewId::new(review_id);
    state
        .catalog(kind)
        .delete_review(EntityId::new(id), review_id)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("review {} deleted", review_id),
    }))
}
