//! Handlers for `/auth/*` and `/my/permissions`.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/auth/register` | Creates an unverified account, sends an OTP |
//! | `POST`  | `/auth/login` | Returns a bearer token; verified accounts only |
//! | `POST`  | `/auth/logout` | Revokes the presented session |
//! | `POST`  | `/auth/verify-otp` | Flips `verified` on a code match |
//! | `POST`  | `/auth/resend-otp` | New code for an unverified account |
//! | `POST`  | `/auth/forgot-password` | OTP round-trip for a reset |
//! | `POST`  | `/auth/reset-password` | Consumes the reset OTP |
//! | `POST`  | `/auth/change-password` | Authenticated, old password required |
//! | `PATCH` | `/auth/role` | Roles are mutable post-registration |
//! | `GET`   | `/my/permissions` | Role-derived capability set |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use guild_core::{
  actor::{Actor, NewActor, Role},
  notify::{Notifier, OtpPurpose},
  policy,
  store::PortalStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{
    self, Identity, bearer_token, generate_otp, generate_session_token,
    token_digest,
  },
  error::ApiError,
};

// ─── Input validation ────────────────────────────────────────────────────────

fn validate_email(email: &str) -> Result<(), ApiError> {
  if email.trim().is_empty() || !email.contains('@') {
    return Err(ApiError::BadRequest(format!("invalid email: {email:?}")));
  }
  Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
  if password.len() < 8 {
    return Err(ApiError::BadRequest(
      "password must be at least 8 characters".into(),
    ));
  }
  Ok(())
}

/// Best-effort OTP delivery; a failed send never fails the request.
async fn deliver_otp<N: Notifier>(
  notifier: &N,
  email: &str,
  code: &str,
  purpose: OtpPurpose,
) {
  if let Err(e) = notifier.send_otp(email, code, purpose).await {
    tracing::warn!(email, "otp delivery failed: {e}");
  }
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:      String,
  pub password:   String,
  pub first_name: String,
  pub last_name:  String,
  pub role:       Role,
}

/// `POST /auth/register`
pub async fn register<S, N>(
  State(state): State<AppState<S, N>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  validate_email(&body.email)?;
  validate_password(&body.password)?;

  let otp = generate_otp();
  let actor = state
    .store
    .create_actor(NewActor {
      email:         body.email,
      password_hash: auth::hash_password(&body.password)?,
      first_name:    body.first_name,
      last_name:     body.last_name,
      role:          body.role,
      otp:           otp.clone(),
    })
    .await
    .map_err(ApiError::from_store)?;

  deliver_otp(
    state.notifier.as_ref(),
    &actor.email,
    &otp,
    OtpPurpose::Verification,
  )
  .await;

  Ok((StatusCode::CREATED, Json(actor)))
}

// ─── Login / logout ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub access_token: String,
  pub actor:        Actor,
}

/// `POST /auth/login`
pub async fn login<S, N>(
  State(state): State<AppState<S, N>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let actor = state
    .store
    .get_actor_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("no account for {}", body.email)))?;

  if !actor.verified {
    return Err(guild_core::Error::NotVerified.into());
  }

  let phc = state
    .store
    .password_hash_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  if !auth::verify_password(&body.password, &phc) {
    return Err(ApiError::Unauthorized);
  }

  let token = generate_session_token();
  state
    .store
    .create_session(token_digest(&token), actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(LoginResponse { access_token: token, actor }))
}

/// `POST /auth/logout` — revokes the session named by the bearer token.
pub async fn logout<S, N>(
  Identity(_actor): Identity,
  State(state): State<AppState<S, N>>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  // Identity already proved the token exists; re-read it for revocation.
  let token = bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
  state
    .store
    .delete_session(token_digest(token))
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── OTP verification ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyOtpBody {
  pub email: String,
  pub otp:   String,
}

/// `POST /auth/verify-otp`
pub async fn verify_otp<S, N>(
  State(state): State<AppState<S, N>>,
  Json(body): Json<VerifyOtpBody>,
) -> Result<Json<Actor>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let actor = state
    .store
    .get_actor_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("no account for {}", body.email)))?;

  let pending = state
    .store
    .otp_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  if pending.as_deref() != Some(body.otp.as_str()) {
    return Err(guild_core::Error::InvalidOtp.into());
  }

  let verified = state
    .store
    .mark_verified(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(verified))
}

#[derive(Debug, Deserialize)]
pub struct ResendOtpBody {
  pub email: String,
}

/// `POST /auth/resend-otp`
pub async fn resend_otp<S, N>(
  State(state): State<AppState<S, N>>,
  Json(body): Json<ResendOtpBody>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let actor = state
    .store
    .get_actor_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("no account for {}", body.email)))?;

  if actor.verified {
    return Err(ApiError::BadRequest("email already verified".into()));
  }

  let otp = generate_otp();
  state
    .store
    .set_otp(actor.actor_id, Some(otp.clone()))
    .await
    .map_err(ApiError::from_store)?;

  deliver_otp(
    state.notifier.as_ref(),
    &actor.email,
    &otp,
    OtpPurpose::Verification,
  )
  .await;

  Ok(StatusCode::ACCEPTED)
}

// ─── Password reset ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
  pub email: String,
}

/// `POST /auth/forgot-password`
pub async fn forgot_password<S, N>(
  State(state): State<AppState<S, N>>,
  Json(body): Json<ForgotPasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let actor = state
    .store
    .get_actor_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("no account for {}", body.email)))?;

  let otp = generate_otp();
  state
    .store
    .set_otp(actor.actor_id, Some(otp.clone()))
    .await
    .map_err(ApiError::from_store)?;

  deliver_otp(
    state.notifier.as_ref(),
    &actor.email,
    &otp,
    OtpPurpose::PasswordReset,
  )
  .await;

  Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
  pub email:        String,
  pub otp:          String,
  pub new_password: String,
}

/// `POST /auth/reset-password`
pub async fn reset_password<S, N>(
  State(state): State<AppState<S, N>>,
  Json(body): Json<ResetPasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  validate_password(&body.new_password)?;

  let actor = state
    .store
    .get_actor_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("no account for {}", body.email)))?;

  let pending = state
    .store
    .otp_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  if pending.as_deref() != Some(body.otp.as_str()) {
    return Err(guild_core::Error::InvalidOtp.into());
  }

  state
    .store
    .set_password_hash(actor.actor_id, auth::hash_password(&body.new_password)?)
    .await
    .map_err(ApiError::from_store)?;
  state
    .store
    .set_otp(actor.actor_id, None)
    .await
    .map_err(ApiError::from_store)?;

  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
  pub old_password: String,
  pub new_password: String,
}

/// `POST /auth/change-password`
pub async fn change_password<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Json(body): Json<ChangePasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  validate_password(&body.new_password)?;

  let phc = state
    .store
    .password_hash_of(actor.actor_id)
    .await
    .map_err(ApiError::from_store)?;
  if !auth::verify_password(&body.old_password, &phc) {
    return Err(ApiError::BadRequest("old password is incorrect".into()));
  }

  state
    .store
    .set_password_hash(actor.actor_id, auth::hash_password(&body.new_password)?)
    .await
    .map_err(ApiError::from_store)?;

  Ok(StatusCode::NO_CONTENT)
}

// ─── Role & permissions ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateRoleBody {
  pub role: Role,
}

/// `PATCH /auth/role`
pub async fn update_role<S, N>(
  Identity(actor): Identity,
  State(state): State<AppState<S, N>>,
  Json(body): Json<UpdateRoleBody>,
) -> Result<Json<Actor>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  let updated = state
    .store
    .set_role(actor.actor_id, body.role)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(updated))
}

/// `GET /my/permissions`
pub async fn permissions<S, N>(
  Identity(actor): Identity,
) -> Result<Json<policy::PermissionSet>, ApiError>
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  Ok(Json(policy::permissions_for(&actor)))
}
