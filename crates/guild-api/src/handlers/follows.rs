//! Handlers for the follow graph.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/actors/{id}/follow` | Idempotent; self-follow is 409 |
//! | `DELETE` | `/actors/{id}/unfollow` | Idempotent |
//! | `GET`    | `/my/followers`, `/my/following` | Resolved display names |
//! | `GET`    | `/my/suggestions` | `?limit=` caps the ranking, default 10 |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use guild_core::{
  actor::Role,
  follow::{Connection, FollowOutcome, Suggestion, UnfollowOutcome},
  notify::Notifier,
  store::PortalStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

// ─── Listing views ───────────────────────────────────────────────────────────

/// One row of a followers/following listing, with the display name already
/// resolved.
#[derive(Debug, Serialize)]
pub struct ConnectionView {
  pub id:    Uuid,
  pub email: String,
  pub role:  Role,
  pub name:  String,
}

impl From<Connection> for ConnectionView {
  fn from(c: Connection) -> Self {
    let name = c.display_name();
    Self {
      id: c.actor.actor_id,
      email: c.actor.email,
      role: c.actor.role,
      name,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ConnectionListResponse {
  pub count: usize,
  pub users: Vec<ConnectionView>,
}

fn connection_list(connections: Vec<Connection>) -> ConnectionListResponse {
  let users: Vec<ConnectionView> =
    connections.into_iter().map(Into::into).collect();
  ConnectionListResponse { count: users.len(), users }
}

// ─── Edges ───────────────────────────────────────────────────────────────────

/// `POST /actors/{id}/follow`
pub async fn follow<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(target): Path<Uuid>,
) -> Result<Json<FollowOutcome>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let outcome = state
    .store
    .follow(actor.actor_id, target)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}

/// `DELETE /actors/{id}/unfollow`
pub async fn unfollow<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(target): Path<Uuid>,
) -> Result<Json<UnfollowOutcome>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let outcome = state
    .store
    .unfollow(actor.actor_id, target)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}

// ─── Listings ────────────────────────────────────────────────────────────────

/// `GET /my/followers`
pub async fn my_followers<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<ConnectionListResponse>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let followers = state
    .store
    .followers_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(connection_list(followers)))
}

/// `GET /my/following`
pub async fn my_following<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<ConnectionListResponse>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let following = state
    .store
    .following_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(connection_list(following)))
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
  pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionView {
  pub id:          Uuid,
  pub email:       String,
  pub role:        Role,
  pub name:        String,
  pub connections: i64,
}

impl From<Suggestion> for SuggestionView {
  fn from(s: Suggestion) -> Self {
    let name =
      guild_core::profile::display_name(&s.actor, s.profile.as_ref());
    Self {
      id: s.actor.actor_id,
      email: s.actor.email,
      role: s.actor.role,
      name,
      connections: s.connections,
    }
  }
}

/// `GET /my/suggestions[?limit=N]`
pub async fn suggestions<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Query(params): Query<SuggestionParams>,
) -> Result<Json<Vec<SuggestionView>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let limit = params.limit.unwrap_or(10).min(100);
  let suggestions = state
    .store
    .suggestions_for(actor.actor_id, limit)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(suggestions.into_iter().map(Into::into).collect()))
}
