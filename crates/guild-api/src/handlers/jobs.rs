//! Handlers for `/jobs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/jobs` | Public listing; all query filters conjunctive |
//! | `POST`   | `/jobs` | Employer/Company only |
//! | `GET`    | `/jobs/{id}` | 404 once soft-deleted |
//! | `PATCH`  | `/jobs/{id}` | Publisher-only partial update |
//! | `DELETE` | `/jobs/{id}` | Soft delete; irreversible |
//! | `POST`   | `/jobs/{id}/activate`, `/jobs/{id}/deactivate` | Publisher-only |
//! | `GET`    | `/my/posted-jobs`, `/my/job-stats` | Publisher self-serve |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use guild_core::{
  job::{JobFilter, JobPosting, JobStats, JobUpdate, NewJob},
  notify::Notifier,
  policy::{self, DenyReason},
  store::PortalStore,
};
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

/// `GET /jobs` — filters arrive as query parameters.
pub async fn list<S, N>(
  State(state): State<AppState<S, N>>,
  Query(filter): Query<JobFilter>,
) -> Result<Json<Vec<JobPosting>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let jobs = state
    .store
    .list_jobs(&filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(jobs))
}

/// `POST /jobs`
pub async fn create<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Json(body): Json<NewJob>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  if !policy::can_create_job(&actor) {
    return Err(ApiError::Forbidden(DenyReason::RoleCannotPost.to_string()));
  }
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("job title is empty".into()));
  }

  let job = state
    .store
    .create_job(&actor, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(job)))
}

/// `GET /jobs/{id}`
pub async fn get_one<S, N>(
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<JobPosting>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let job = state
    .store
    .get_job(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))?;
  Ok(Json(job))
}

/// `PATCH /jobs/{id}`
pub async fn update_one<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(update): Json<JobUpdate>,
) -> Result<Json<JobPosting>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let job = state
    .store
    .update_job(id, &actor, update)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}

/// `DELETE /jobs/{id}` — soft delete.
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
    .soft_delete_job(id, &actor)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /jobs/{id}/activate`
pub async fn activate<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<JobPosting>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let job = state
    .store
    .set_job_active(id, &actor, true)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}

/// `POST /jobs/{id}/deactivate`
pub async fn deactivate<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<JobPosting>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let job = state
    .store
    .set_job_active(id, &actor, false)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}

/// `GET /my/posted-jobs`
pub async fn my_posted<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<JobPosting>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let jobs = state
    .store
    .jobs_published_by(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(jobs))
}

/// `GET /my/job-stats`
pub async fn stats<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<JobStats>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let stats = state
    .store
    .job_stats(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
