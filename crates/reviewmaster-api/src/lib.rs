// SPDX-License-Identifier: GPL-3.0-or-later
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Extension, Json, Router,
};
use handlers::catalog::{
    add_review, create_entity, delete_entity, delete_review, edit_review, get_entity,
    list_entities, list_reviews, search_by_genre, search_by_name, update_entity,
    AddReviewRequest, CreateEntityRequest, EditReviewRequest, EntityResponse, ReviewResponse,
    UpdateEntityRequest, __path_add_review, __path_create_entity, __path_delete_entity,
    __path_delete_review, __path_edit_review, __path_get_entity, __path_list_entities,
    __path_list_reviews, __path_search_by_genre, __path_search_by_name, __path_update_entity,
};
use handlers::shows::{
    import_show, lookup_shows, ImportShowRequest, ShowCandidateResponse, __path_import_show,
    __path_lookup_shows,
};
use handlers::{ErrorResponse, MessageResponse};
use reviewmaster_application::AppState;
use reviewmaster_domain::EntityKind;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Serialize, utoipa::ToSchema)]
struct HealthResponse {
    status: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_entities,
        create_entity,
        search_by_genre,
        search_by_name,
        get_entity,
        update_entity,
        delete_entity,
        list_reviews,
        add_review,
        edit_review,
        delete_review,
        lookup_shows,
        import_show,
    ),
    components(
        schemas(
            HealthResponse,
            EntityResponse,
            ReviewResponse,
            CreateEntityRequest,
            UpdateEntityRequest,
            AddReviewRequest,
            EditReviewRequest,
            ImportShowRequest,
            ShowCandidateResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "catalog", description = "Movies, books and TV shows"),
        (name = "reviews", description = "Reviews nested under an entity"),
        (name = "shows", description = "External TV show lookup")
    ),
    info(
        title = "ReviewMaster API",
        version = "0.1.0",
        description = "Catalog of movies, books and TV shows with user reviews",
    )
)]
struct ApiDoc;

/// The same handler set, mounted under `/{kind.path()}`.
fn catalog_routes(kind: EntityKind) -> Router<AppState> {
    let base = format!("/{}", kind.path());
    Router::new()
        .route(&base, get(list_entities).post(create_entity))
        .route(&format!("{base}/genre"), get(search_by_genre))
        .route(&format!("{base}/search"), get(search_by_name))
        .route(
            &format!("{base}/:id"),
            get(get_entity).put(update_entity).delete(delete_entity),
        )
        .route(
            &format!("{base}/:id/reviews"),
            get(list_reviews).post(add_review),
        )
        .route(
            &format!("{base}/:id/reviews/:review_id"),
            put(edit_review).delete(delete_review),
        )
        .layer(Extension(kind))
}

pub fn router(state: AppState) -> Router {
    info!(target: "api", "building router");

    let catalog = EntityKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            router.merge(catalog_routes(kind))
        });

    let shows = Router::new()
        .route("/tv_shows/lookup", get(lookup_shows))
        .route("/tv_shows/import", post(import_show));

    let openapi = ApiDoc::openapi();

    Router::new()
        .route("/health", get(health))
        .merge(catalog)
        .merge(shows)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
