//! Error types for `guild-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::policy::DenyReason;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(String),

  #[error("permission denied: {0}")]
  PermissionDenied(DenyReason),

  #[error("actor not found: {0}")]
  ActorNotFound(Uuid),

  #[error("job not found: {0}")]
  JobNotFound(Uuid),

  #[error("application not found: {0}")]
  ApplicationNotFound(Uuid),

  #[error("post not found: {0}")]
  PostNotFound(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("already applied to this job")]
  AlreadyApplied,

  #[error("you cannot follow yourself")]
  SelfFollow,

  #[error("email already registered: {0}")]
  EmailTaken(String),

  #[error("unknown application status: {0:?}")]
  InvalidStatus(String),

  #[error("unknown role: {0:?}")]
  InvalidRole(String),

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("email not verified")]
  NotVerified,

  #[error("invalid or expired otp")]
  InvalidOtp,

  #[error("profile kind does not match actor role")]
  ProfileKindMismatch,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
