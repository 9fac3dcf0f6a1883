use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use tracing::error;

use quill_db::models::{PostRow, PostWithVotesRow};
use quill_db::queries::{PostDelete, PostUpdate};
use quill_types::api::{PostPayload, PostResponse, PostWithVotes, UserResponse};
use quill_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::parse_db_time;
use crate::users::user_response;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub search: String,
}

fn default_limit() -> i64 {
    10
}

/// All posts are visible to any authenticated caller; ownership only gates
/// mutation.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Json<Vec<PostWithVotes>>, ApiError> {
    // Run blocking DB work off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || {
        db.db.list_posts(&query.search, query.limit, query.skip)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(rows.into_iter().map(post_with_votes).collect()))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Json<PostWithVotes>, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_post_with_votes(id))
        .await
        .map_err(join_error)??
        .ok_or_else(|| ApiError::NotFound(format!("Post with id {id} not found")))?;

    Ok(Json(post_with_votes(row)))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PostPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let owner_id = user.id;
    let row = tokio::task::spawn_blocking(move || {
        db.db
            .create_post(owner_id, &payload.title, &payload.content, payload.published)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(post_response(row, owner_from(&user)))))
}

/// Full replace of title/content/published; `published` falls back to the
/// payload default (true) when omitted.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PostPayload>,
) -> Result<Json<PostResponse>, ApiError> {
    let db = state.clone();
    let caller_id = user.id;
    let outcome = tokio::task::spawn_blocking(move || {
        db.db
            .update_post(id, caller_id, &payload.title, &payload.content, payload.published)
    })
    .await
    .map_err(join_error)??;

    match outcome {
        PostUpdate::Updated(row) => Ok(Json(post_response(row, owner_from(&user)))),
        PostUpdate::Missing => Err(ApiError::NotFound(format!("Post with id {id} not found"))),
        PostUpdate::NotOwner => Err(ApiError::Forbidden(
            "You don't have permission to update this post".to_string(),
        )),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    let db = state.clone();
    let caller_id = user.id;
    let outcome = tokio::task::spawn_blocking(move || db.db.delete_post(id, caller_id))
        .await
        .map_err(join_error)??;

    match outcome {
        PostDelete::Deleted => Ok(StatusCode::NO_CONTENT),
        PostDelete::Missing => Err(ApiError::NotFound(format!("Post with id {id} not found"))),
        PostDelete::NotOwner => Err(ApiError::Forbidden(
            "You don't have permission to delete this post".to_string(),
        )),
    }
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", e);
    ApiError::Internal(e.into())
}

fn owner_from(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        created_at: user.created_at,
    }
}

fn post_response(post: PostRow, owner: UserResponse) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        published: post.published,
        created_at: parse_db_time(&post.created_at, "post", post.id),
        owner_id: post.owner_id,
        owner,
    }
}

fn post_with_votes(row: PostWithVotesRow) -> PostWithVotes {
    let owner = user_response(&row.owner);
    PostWithVotes {
        post: post_response(row.post, owner),
        votes: row.votes,
    }
}
