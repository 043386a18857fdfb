use crate::{
    errors::AppError,
    models::{CommentWithAuthor, FeedPage, User},
    startup::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing;

#[derive(Deserialize)]
pub struct CommentBody {
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub pages: Vec<FeedPage>,
    pub has_next_page: bool,
    pub opened_comment_section: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPageResponse {
    pub page_index: Option<usize>,
    pub page: Option<FeedPage>,
    pub has_next_page: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSectionResponse {
    pub opened_comment_section: Option<String>,
}

/// GET /feed
pub async fn get_feed(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let pages = state.feed.pages().await;
    tracing::debug!(pages = pages.len(), "Serving loaded feed pages");
    Ok(Json(FeedResponse {
        pages,
        has_next_page: state.feed.has_next_page().await,
        opened_comment_section: state.feed.opened_comment_section().await,
    }))
}

/// POST /feed/next
pub async fn fetch_next_page(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let page_index = state.feed.fetch_next_page().await?;
    let page = match page_index {
        Some(index) => state.feed.page(index).await,
        None => None,
    };
    Ok(Json(NextPageResponse {
        page_index,
        page,
        has_next_page: state.feed.has_next_page().await,
    }))
}

/// GET /feed/pages/{page_index}
pub async fn get_page(
    State(state): State<Arc<AppState>>,
    Path(page_index): Path<usize>,
) -> Result<Json<FeedPage>, AppError> {
    state
        .feed
        .page(page_index)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Feed page {}", page_index)))
}

/// POST /feed/pages/{page_index}/memes/{meme_id}/comments
pub async fn submit_comment(
    State(state): State<Arc<AppState>>,
    Path((page_index, meme_id)): Path<(usize, String)>,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, Json<CommentWithAuthor>), AppError> {
    let created = state
        .feed
        .submit_comment(&meme_id, &body.content, page_index)
        .await?;
    tracing::info!(%meme_id, page_index, "Comment submitted via handler");
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /feed/memes/{meme_id}/comment-section
pub async fn toggle_comment_section(
    State(state): State<Arc<AppState>>,
    Path(meme_id): Path<String>,
) -> Json<CommentSectionResponse> {
    let opened_comment_section = state.feed.toggle_comment_section(&meme_id).await;
    Json(CommentSectionResponse {
        opened_comment_section,
    })
}

/// PUT /feed/memes/{meme_id}/draft
pub async fn set_draft(
    State(state): State<Arc<AppState>>,
    Path(meme_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> StatusCode {
    state.feed.set_draft(&meme_id, body.content).await;
    StatusCode::NO_CONTENT
}

/// POST /feed/pages/{page_index}/memes/{meme_id}/draft
pub async fn submit_draft(
    State(state): State<Arc<AppState>>,
    Path((page_index, meme_id)): Path<(usize, String)>,
) -> Result<(StatusCode, Json<CommentWithAuthor>), AppError> {
    let created = state.feed.submit_draft(&meme_id, page_index).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /me
pub async fn current_user(State(state): State<Arc<AppState>>) -> Result<Json<User>, AppError> {
    let user = state.feed.current_user().await?;
    Ok(Json(user.clone()))
}
