//! Actor — an account identity with a portal role.
//!
//! The actor row holds only identity and credential metadata. Everything
//! descriptive (headline, phone, company blurb) lives in the actor's
//! [`Profile`](crate::profile::Profile).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role an actor plays on the portal.
///
/// Roles gate what an actor may do (see [`crate::policy`]); they are mutable
/// after registration, unlike the actor's identity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Employee,
  Employer,
  Company,
}

/// An account identity. `actor_id` and `email` never change after
/// registration; `role` may be updated and `verified` flips once the OTP
/// round-trip completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
  pub actor_id:   Uuid,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub role:       Role,
  pub verified:   bool,
  pub created_at: DateTime<Utc>,
}

impl Actor {
  /// "First Last", trimmed — the fallback when no profile overrides it.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_string()
  }
}

/// Input to [`crate::store::PortalStore::create_actor`].
///
/// The password is already hashed and the verification OTP already generated
/// by the caller; the store never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewActor {
  pub email:         String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  pub role:          Role,
  pub otp:           String,
}
