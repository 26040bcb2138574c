//! Job applications and their status lifecycle.
//!
//! An application is created once per (job, applicant) pair and never
//! deleted. Its only mutable field is `status`, written exclusively by the
//! job's publisher. Transitions are deliberately permissive: any status may
//! be set to any other, so a posting can move an applicant back from
//! `Shortlisted` to `Reviewing` without ceremony.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an application sits in the publisher's pipeline.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApplicationStatus {
  Submitted,
  Reviewing,
  Shortlisted,
  Rejected,
  Hired,
}

impl ApplicationStatus {
  /// `Rejected` and `Hired` end the pipeline; the rest are re-enterable.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Rejected | Self::Hired)
  }
}

/// One actor's application to one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
  pub application_id: Uuid,
  pub job_id:         Uuid,
  pub applicant_id:   Uuid,
  pub status:         ApplicationStatus,
  /// Opaque reference into blob storage; no file bytes pass through here.
  pub resume_ref:     String,
  pub cover_letter:   Option<String>,
  pub applied_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

/// Input to [`crate::store::PortalStore::apply_to_job`]. Status always starts
/// at [`ApplicationStatus::Submitted`]; it is not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
  pub resume_ref:   String,
  pub cover_letter: Option<String>,
}

/// Per-status application counts across a publisher's postings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusStats {
  pub submitted:   i64,
  pub reviewing:   i64,
  pub shortlisted: i64,
  pub rejected:    i64,
  pub hired:       i64,
}

impl StatusStats {
  pub fn bump(&mut self, status: ApplicationStatus, count: i64) {
    match status {
      ApplicationStatus::Submitted => self.submitted += count,
      ApplicationStatus::Reviewing => self.reviewing += count,
      ApplicationStatus::Shortlisted => self.shortlisted += count,
      ApplicationStatus::Rejected => self.rejected += count,
      ApplicationStatus::Hired => self.hired += count,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn status_discriminants_round_trip() {
    use strum::IntoEnumIterator;
    for status in ApplicationStatus::iter() {
      let parsed = ApplicationStatus::from_str(&status.to_string()).unwrap();
      assert_eq!(parsed, status);
    }
  }

  #[test]
  fn unknown_status_fails_to_parse() {
    assert!(ApplicationStatus::from_str("pending").is_err());
  }

  #[test]
  fn terminal_statuses() {
    assert!(ApplicationStatus::Rejected.is_terminal());
    assert!(ApplicationStatus::Hired.is_terminal());
    assert!(!ApplicationStatus::Submitted.is_terminal());
    assert!(!ApplicationStatus::Reviewing.is_terminal());
    assert!(!ApplicationStatus::Shortlisted.is_terminal());
  }
}
