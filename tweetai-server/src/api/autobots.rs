use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{parse_id, ApiResult, PAGE_LIMIT},
    db::repositories::{AutobotRepository, PostRepository},
    state::AppState,
};
use tweetai_types::{Autobot, Post};

/// GET /api/autobots - First page of autobots
pub async fn list_autobots(State(state): State<AppState>) -> ApiResult<Json<Vec<Autobot>>> {
    let autobot_repo = AutobotRepository::new(state.db.pool.clone());
    let autobots = autobot_repo.list(PAGE_LIMIT)?;
    Ok(Json(autobots))
}

/// GET /api/autobots/:id/posts - First page of an autobot's posts
pub async fn get_autobot_posts(
    State(state): State<AppState>,
    Path(autobot_id): Path<String>,
) -> ApiResult<Json<Vec<Post>>> {
    let autobot_id = parse_id(&autobot_id, "autobot")?;

    let post_repo = PostRepository::new(state.db.pool.clone());
    let posts = post_repo.get_by_autobot(autobot_id, PAGE_LIMIT)?;
    Ok(Json(posts))
}

/// POST /api/update-autobot-count - Push the current autobot count to real-time clients
pub async fn update_autobot_count(State(state): State<AppState>) -> ApiResult<(StatusCode, &'static str)> {
    let autobot_repo = AutobotRepository::new(state.db.pool.clone());
    let count = autobot_repo.count()?;

    let receivers = state.counts.publish_autobot_count(count);
    tracing::info!("Broadcast autobot count {} to {} clients", count, receivers);

    Ok((StatusCode::OK, "OK"))
}
