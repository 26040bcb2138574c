//! Error type for `guild-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain-level failures (not found, permission denied, conflicts) carried
  /// through from `guild-core` so callers can match on them. Kept as a
  /// `source` so HTTP layers can recover the domain error from the chain.
  #[error("core error: {0}")]
  Core(#[from] guild_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored discriminant (role, status, job type) failed to decode.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
