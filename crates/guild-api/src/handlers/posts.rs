//! Handlers for posts, likes, and comments.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Public feed, newest first |
//! | `POST`   | `/posts` | Authenticated |
//! | `GET`    | `/posts/{id}` | |
//! | `PATCH`  | `/posts/{id}` | Author-only |
//! | `DELETE` | `/posts/{id}` | Author-only |
//! | `POST`   | `/posts/{id}/like`, `/posts/{id}/unlike` | Idempotent |
//! | `GET`    | `/posts/{id}/comments` | Public, newest first |
//! | `POST`   | `/posts/{id}/comments` | Authenticated, ≤ 500 chars |
//! | `DELETE` | `/comments/{id}` | Comment author or post owner |
//! | `GET`    | `/my/posts` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use guild_core::{
  notify::Notifier,
  post::{self, Comment, LikeOutcome, Post, UnlikeOutcome},
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

// ─── Feed ────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S, N>(
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let posts = state
    .store
    .list_posts()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(posts))
}

/// `GET /my/posts`
pub async fn my_posts<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let posts = state
    .store
    .posts_by(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(posts))
}

#[derive(Debug, Deserialize)]
pub struct PostBody {
  pub content: String,
}

/// `POST /posts`
pub async fn create<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Json(body): Json<PostBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  post::validate_post_content(&body.content)?;

  let created = state
    .store
    .create_post(actor.actor_id, body.content)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /posts/{id}`
pub async fn get_one<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;
  Ok(Json(post))
}

/// `PATCH /posts/{id}`
pub async fn update_one<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PostBody>,
) -> Result<Json<Post>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  post::validate_post_content(&body.content)?;

  let updated = state
    .store
    .update_post(id, &actor, body.content)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(updated))
}

/// `DELETE /posts/{id}`
pub async fn delete_one<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  state
    .store
    .delete_post(id, &actor)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Likes ───────────────────────────────────────────────────────────────────

/// `POST /posts/{id}/like`
pub async fn like<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LikeOutcome>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let outcome = state
    .store
    .like_post(actor.actor_id, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}

/// `POST /posts/{id}/unlike`
pub async fn unlike<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<UnlikeOutcome>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let outcome = state
    .store
    .unlike_post(actor.actor_id, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// `GET /posts/{id}/comments`
pub async fn comments<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let comments = state
    .store
    .comments_for_post(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub text: String,
}

/// `POST /posts/{id}/comments`
pub async fn add_comment<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  post::validate_comment_text(&body.text)?;

  let comment = state
    .store
    .add_comment(id, actor.actor_id, body.text)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /comments/{id}`
pub async fn delete_comment<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  state
    .store
    .delete_comment(id, &actor)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
