//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Domain failures surface with their proper status codes: validation as
//! 400, missing auth as 401, policy denials as 403, absent entities as 404,
//! conflicts (double apply, taken email) as 409. Anything else is a 500.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a storage-layer error, surfacing any domain error found in its
  /// source chain with the right status code.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(e) = current {
      if let Some(core) = e.downcast_ref::<guild_core::Error>() {
        return Self::from_core(core);
      }
      current = e.source();
    }
    ApiError::Store(Box::new(err))
  }

  fn from_core(err: &guild_core::Error) -> Self {
    use guild_core::Error as E;
    match err {
      E::Validation(_) | E::InvalidStatus(_) | E::InvalidRole(_)
      | E::NotVerified | E::InvalidOtp => {
        ApiError::BadRequest(err.to_string())
      }
      E::InvalidCredentials => ApiError::Unauthorized,
      E::PermissionDenied(reason) => ApiError::Forbidden(reason.to_string()),
      E::ActorNotFound(_)
      | E::JobNotFound(_)
      | E::ApplicationNotFound(_)
      | E::PostNotFound(_)
      | E::CommentNotFound(_) => ApiError::NotFound(err.to_string()),
      E::AlreadyApplied | E::SelfFollow | E::EmailTaken(_)
      | E::ProfileKindMismatch => ApiError::Conflict(err.to_string()),
      E::Serialization(_) => ApiError::Store(err.to_string().into()),
    }
  }
}

impl From<guild_core::Error> for ApiError {
  fn from(err: guild_core::Error) -> Self { Self::from_core(&err) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_through_a_source_chain() {
    let store_err: guild_store_sqlite::Error =
      guild_core::Error::AlreadyApplied.into();
    assert!(matches!(
      ApiError::from_store(store_err),
      ApiError::Conflict(_)
    ));

    let store_err: guild_store_sqlite::Error =
      guild_core::Error::PermissionDenied(
        guild_core::policy::DenyReason::NotPublisher,
      )
      .into();
    assert!(matches!(
      ApiError::from_store(store_err),
      ApiError::Forbidden(_)
    ));

    let store_err: guild_store_sqlite::Error =
      guild_core::Error::JobNotFound(uuid::Uuid::new_v4()).into();
    assert!(matches!(
      ApiError::from_store(store_err),
      ApiError::NotFound(_)
    ));
  }

  #[test]
  fn unknown_errors_fall_through_to_store() {
    let err = std::io::Error::other("disk on fire");
    assert!(matches!(ApiError::from_store(err), ApiError::Store(_)));
  }
}
