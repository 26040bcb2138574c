//! Handlers for profiles.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/my/profile` | 404 until one is created |
//! | `PUT`  | `/my/profile` | Upsert; kind must match the actor's role |
//! | `GET`  | `/actors/{id}/profile` | Public profile of any actor |

use axum::{
  Json,
  extract::{Path, State},
};
use guild_core::{notify::Notifier, profile::Profile, store::PortalStore};
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

/// `GET /my/profile`
pub async fn get_mine<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<Profile>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let profile = state
    .store
    .profile_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("no profile yet".into()))?;
  Ok(Json(profile))
}

/// `PUT /my/profile` — body is the tagged [`Profile`] payload.
pub async fn put_mine<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Json(profile): Json<Profile>,
) -> Result<Json<Profile>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let stored = state
    .store
    .upsert_profile(actor.actor_id, profile)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stored))
}

/// `GET /actors/{id}/profile`
pub async fn get_of_actor<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  if state
    .store
    .get_actor(id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("actor {id} not found")));
  }

  let profile = state
    .store
    .profile_of(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound("no profile yet".into()))?;
  Ok(Json(profile))
}
