use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use tracing::error;

use quill_db::queries::VoteChange;
use quill_types::api::VoteRequest;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// Two-state vote toggle: `dir=1` adds the caller's vote, `dir=0` removes
/// it. The store reports what happened; this handler maps it onto statuses.
pub async fn cast_vote(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.dir > 1 {
        return Err(ApiError::Unprocessable("dir must be 0 or 1".to_string()));
    }

    let db = state.clone();
    let user_id = user.id;
    let post_id = req.post_id;
    let up = req.dir == 1;

    let change = tokio::task::spawn_blocking(move || db.db.apply_vote(post_id, user_id, up))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })??;

    let message = match change {
        VoteChange::Added => format!("User {user_id} has successfully voted post {post_id}"),
        VoteChange::Removed => format!("User {user_id} has successfully unvoted post {post_id}"),
        VoteChange::AlreadyVoted => {
            return Err(ApiError::Conflict(format!(
                "User {user_id} has already voted post {post_id}"
            )));
        }
        VoteChange::NotVoted => {
            return Err(ApiError::NotFound(format!(
                "User {user_id} has not voted post {post_id}"
            )));
        }
        VoteChange::PostMissing => {
            return Err(ApiError::NotFound(format!("Post {post_id} not found")));
        }
    };

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "message": message }))))
}
