use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    api::{parse_id, ApiResult, PAGE_LIMIT},
    db::repositories::CommentRepository,
    state::AppState,
};
use tweetai_types::Comment;

/// GET /api/posts/:id/comments - First page of a post's comments
pub async fn get_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    let post_id = parse_id(&post_id, "post")?;

    let comment_repo = CommentRepository::new(state.db.pool.clone());
    let comments = comment_repo.get_by_post(post_id, PAGE_LIMIT)?;
    Ok(Json(comments))
}
