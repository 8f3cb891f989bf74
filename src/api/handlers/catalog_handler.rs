//! Catalog handlers for singers, albums, songs and tags.
//!
//! Reads go straight to the catalog service. Writes are admin-only and pass
//! through the mediator so their field rules are checked first.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, MethodRouter},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::JsonBody;
use crate::api::middleware::{admin_middleware, auth_middleware};
use crate::api::AppState;
use crate::domain::{Album, Singer, Song, Tag};
use crate::errors::{AppResult, ErrorResponse};
use crate::requests::{CreateAlbum, CreateSinger, CreateSong, CreateTag};

/// Wrap a route so only authenticated admins reach it.
fn admin_only(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    route
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Album routes. Every album endpoint needs a bearer token.
pub fn album_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_albums)
                .merge(post(create_album).route_layer(middleware::from_fn(admin_middleware))),
        )
        .route("/:id", get(get_album))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Song routes. Reading is public.
pub fn song_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_songs).merge(admin_only(post(create_song), state)))
        .route("/:id", get(get_song))
}

/// Singer routes. The full listing is an admin view.
pub fn singer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", admin_only(get(list_singers).post(create_singer), state))
        .route("/:id", get(get_singer))
}

/// Tag routes.
pub fn tag_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", admin_only(post(create_tag), state))
        .route("/:id", get(get_tag))
}

/// List albums
#[utoipa::path(
    get,
    path = "/Albums",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All albums", body = [Album]),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    )
)]
pub async fn list_albums(State(state): State<AppState>) -> AppResult<Json<Vec<Album>>> {
    Ok(Json(state.catalog_service.list_albums().await?))
}

/// Get an album by id
#[utoipa::path(
    get,
    path = "/Albums/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Album id")),
    responses(
        (status = 200, description = "Album found", body = Album),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "No such album", body = ErrorResponse)
    )
)]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Album>> {
    Ok(Json(state.catalog_service.get_album(id).await?))
}

/// Create an album
#[utoipa::path(
    post,
    path = "/Albums",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateAlbum,
    responses(
        (status = 201, description = "Album created", body = Album),
        (status = 400, description = "Validation error or unknown singer", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn create_album(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAlbum>,
) -> AppResult<(StatusCode, Json<Album>)> {
    let album = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

/// List songs
#[utoipa::path(
    get,
    path = "/Songs",
    tag = "Catalog",
    responses((status = 200, description = "All songs", body = [Song]))
)]
pub async fn list_songs(State(state): State<AppState>) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(state.catalog_service.list_songs().await?))
}

/// Get a song by id
#[utoipa::path(
    get,
    path = "/Songs/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Song id")),
    responses(
        (status = 200, description = "Song found", body = Song),
        (status = 404, description = "No such song", body = ErrorResponse)
    )
)]
pub async fn get_song(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Song>> {
    Ok(Json(state.catalog_service.get_song(id).await?))
}

/// Create a song
#[utoipa::path(
    post,
    path = "/Songs",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateSong,
    responses(
        (status = 201, description = "Song created", body = Song),
        (status = 400, description = "Validation error or unknown album/singer", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn create_song(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateSong>,
) -> AppResult<(StatusCode, Json<Song>)> {
    let song = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

/// List singers
#[utoipa::path(
    get,
    path = "/Singers",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All singers", body = [Singer]),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn list_singers(State(state): State<AppState>) -> AppResult<Json<Vec<Singer>>> {
    Ok(Json(state.catalog_service.list_singers().await?))
}

/// Get a singer by id
#[utoipa::path(
    get,
    path = "/Singers/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Singer id")),
    responses(
        (status = 200, description = "Singer found", body = Singer),
        (status = 404, description = "No such singer", body = ErrorResponse)
    )
)]
pub async fn get_singer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Singer>> {
    Ok(Json(state.catalog_service.get_singer(id).await?))
}

/// Create a singer
#[utoipa::path(
    post,
    path = "/Singers",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateSinger,
    responses(
        (status = 201, description = "Singer created", body = Singer),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn create_singer(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateSinger>,
) -> AppResult<(StatusCode, Json<Singer>)> {
    let singer = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(singer)))
}

/// Get a tag by id
#[utoipa::path(
    get,
    path = "/Tags/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag found", body = Tag),
        (status = 404, description = "No such tag", body = ErrorResponse)
    )
)]
pub async fn get_tag(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Tag>> {
    Ok(Json(state.catalog_service.get_tag(id).await?))
}

/// Get a tag by name, creating it if it does not exist yet
#[utoipa::path(
    post,
    path = "/Tags",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateTag,
    responses(
        (status = 200, description = "Existing or newly created tag", body = Tag),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTag>,
) -> AppResult<Json<Tag>> {
    Ok(Json(state.mediator.send(request).await?))
}
