//! Handlers for application endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/jobs/{id}/apply` | One application per actor per job |
//! | `GET`   | `/jobs/{id}/applicants` | Publisher-only |
//! | `GET`   | `/applications/{id}` | Publisher or applicant |
//! | `PATCH` | `/applications/{id}/status` | Publisher-only; any → any |
//! | `GET`   | `/my/applied-jobs` | Applicant self-serve |
//! | `GET`   | `/my/application-stats` | Per-status counts for a publisher |

use std::str::FromStr;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use guild_core::{
  application::{Application, ApplicationStatus, NewApplication, StatusStats},
  notify::Notifier,
  policy,
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

/// Best-effort "you have a new applicant" mail; never fails the request.
async fn notify_publisher<S, N>(
  state: &AppState<S, N>,
  job_id: Uuid,
  applicant_name: &str,
) where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let lookup = async {
    let job = state.store.get_job(job_id).await.ok()??;
    let publisher = state.store.get_actor(job.publisher_id).await.ok()??;
    Some((publisher.email, job.title))
  };

  match lookup.await {
    Some((email, title)) => {
      if let Err(e) = state
        .notifier
        .new_application(&email, &title, applicant_name)
        .await
      {
        tracing::warn!("application notification failed: {e}");
      }
    }
    None => tracing::warn!(%job_id, "application notification skipped"),
  }
}

/// `POST /jobs/{id}/apply`
pub async fn apply<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(job_id): Path<Uuid>,
  Json(body): Json<NewApplication>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  if body.resume_ref.trim().is_empty() {
    return Err(ApiError::BadRequest("resume reference is required".into()));
  }

  let application = state
    .store
    .apply_to_job(&actor, job_id, body)
    .await
    .map_err(ApiError::from_store)?;

  notify_publisher(&state, job_id, &actor.full_name()).await;

  Ok((StatusCode::CREATED, Json(application)))
}

/// `GET /jobs/{id}/applicants`
pub async fn applicants<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<Application>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  if !policy::can_view_applications(&actor) {
    return Err(ApiError::Forbidden(
      "only employers and companies can view applications".into(),
    ));
  }

  let applications = state
    .store
    .applications_for_job(job_id, &actor)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(applications))
}

/// `GET /applications/{id}` — visible to the applicant and the publisher.
pub async fn get_one<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let application = state
    .store
    .get_application(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("application {id} not found")))?;

  if application.applicant_id != actor.actor_id {
    let publisher_id = state
      .store
      .get_job(application.job_id)
      .await
      .map_err(ApiError::from_store)?
      .map(|job| job.publisher_id);
    if publisher_id != Some(actor.actor_id) {
      return Err(ApiError::Forbidden(
        "not your application to view".into(),
      ));
    }
  }

  Ok(Json(application))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
  pub status: String,
}

/// `PATCH /applications/{id}/status` — body: `{"status":"shortlisted"}`.
pub async fn set_status<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SetStatusBody>,
) -> Result<Json<Application>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let status = ApplicationStatus::from_str(&body.status)
    .map_err(|_| guild_core::Error::InvalidStatus(body.status.clone()))?;

  let application = state
    .store
    .set_application_status(id, status, &actor)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(application))
}

/// `GET /my/applied-jobs`
pub async fn my_applied<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<Vec<Application>>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let applications = state
    .store
    .applications_by(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(applications))
}

/// `GET /my/application-stats`
pub async fn status_stats<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
) -> Result<Json<StatusStats>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  if !policy::can_view_applications(&actor) {
    return Err(ApiError::Forbidden(
      "only employers and companies can view applications".into(),
    ));
  }

  let stats = state
    .store
    .application_status_stats(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
