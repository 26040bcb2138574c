//! Bearer-token auth: session issuing, credential hashing, and the
//! [`Identity`] extractor.
//!
//! A login mints a 32-byte random token; only its SHA-256 digest is stored.
//! Every authenticated handler extracts [`Identity`], which resolves the
//! presented token back to an [`Actor`] through the session table. Requests
//! without a valid token are rejected before any handler logic runs.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use guild_core::{actor::Actor, notify::Notifier, store::PortalStore};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{AppState, error::ApiError};

// ─── Token and OTP generation ────────────────────────────────────────────────

/// Mint an opaque session token: 32 random bytes, hex-encoded.
pub fn generate_session_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The digest under which a session token is stored and looked up.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// A fresh 6-digit one-time code.
pub fn generate_otp() -> String {
  let mut bytes = [0u8; 4];
  OsRng.fill_bytes(&mut bytes);
  let n = u32::from_be_bytes(bytes) % 900_000 + 100_000;
  n.to_string()
}

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))
}

/// Verify a password against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The resolved caller. Present in a handler's arguments means the request
/// carried a valid session token.
pub struct Identity(pub Actor);

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

impl<S, N> FromRequestParts<AppState<S, N>> for Identity
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, N>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

    let actor = state
      .store
      .actor_for_session(token_digest(token))
      .await
      .map_err(ApiError::from_store)?
      .ok_or(ApiError::Unauthorized)?;

    Ok(Identity(actor))
  }
}
