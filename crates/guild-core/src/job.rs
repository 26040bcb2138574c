//! Job postings and the filter record used to query them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::Role;

// ─── Discriminants ───────────────────────────────────────────────────────────

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
pub enum JobType {
  Fulltime,
  Parttime,
  Intern,
}

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
pub enum WorkMode {
  Onsite,
  Remote,
  Hybrid,
}

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
pub enum ExperienceLevel {
  Entry,
  Mid,
  Senior,
}

// ─── Posting ─────────────────────────────────────────────────────────────────

/// A published job posting.
///
/// Postings are soft-deleted: `deleted_at` is set and `is_active` dropped to
/// `false` in the same write. `application_count` is denormalized state
/// maintained by the store alongside application inserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
  pub job_id:            Uuid,
  pub title:             String,
  pub description:       String,
  pub requirements:      Option<String>,
  pub company_name:      String,
  pub location:          Option<String>,
  /// Free text, e.g. "80k-100k" or "negotiable". Filtered by substring only.
  pub salary:            Option<String>,
  pub job_type:          JobType,
  pub work_mode:         WorkMode,
  pub experience:        ExperienceLevel,
  pub publisher_id:      Uuid,
  /// The publisher's role at posting time, kept as a snapshot.
  pub publisher_role:    Role,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
  pub is_active:         bool,
  pub deleted_at:        Option<DateTime<Utc>>,
  pub application_count: i64,
}

impl JobPosting {
  /// A posting accepts applications only while active and not deleted.
  pub fn is_open(&self) -> bool { self.is_active && self.deleted_at.is_none() }
}

/// Input to [`crate::store::PortalStore::create_job`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
  pub title:        String,
  pub description:  String,
  pub requirements: Option<String>,
  pub company_name: String,
  pub location:     Option<String>,
  pub salary:       Option<String>,
  pub job_type:     JobType,
  pub work_mode:    WorkMode,
  pub experience:   ExperienceLevel,
}

/// Partial update applied by the publisher; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub requirements: Option<String>,
  pub company_name: Option<String>,
  pub location:     Option<String>,
  pub salary:       Option<String>,
  pub job_type:     Option<JobType>,
  pub work_mode:    Option<WorkMode>,
  pub experience:   Option<ExperienceLevel>,
}

// ─── Filter record ───────────────────────────────────────────────────────────

/// Parameters for [`crate::store::PortalStore::list_jobs`].
///
/// All provided filters compose conjunctively; only active, non-deleted
/// postings are ever returned, ordered newest-first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
  /// Case-insensitive substring over the title.
  pub title:              Option<String>,
  /// Case-insensitive substring over the location.
  pub location:           Option<String>,
  pub job_type:           Option<JobType>,
  pub work_mode:          Option<WorkMode>,
  pub experience:         Option<ExperienceLevel>,
  /// Comma-separated skills; every one must appear in the requirements text.
  pub skills:             Option<String>,
  /// Case-insensitive substring over the company name.
  pub company:            Option<String>,
  /// Only postings created within the last N days.
  pub posted_within_days: Option<i64>,
  /// Substring heuristics over the free-text salary column.
  pub salary_min:         Option<String>,
  pub salary_max:         Option<String>,
  pub limit:              Option<usize>,
  pub offset:             Option<usize>,
}

impl JobFilter {
  /// Split the comma-separated `skills` parameter into trimmed, non-empty
  /// terms.
  pub fn skill_terms(&self) -> Vec<String> {
    self
      .skills
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase)
      .collect()
  }
}

// ─── Publisher stats ─────────────────────────────────────────────────────────

/// Aggregate view over a publisher's postings.
#[derive(Debug, Clone, Serialize)]
pub struct JobStats {
  pub total_posted:          i64,
  pub active:                i64,
  pub inactive:              i64,
  pub applications_received: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skill_terms_split_and_normalise() {
    let filter = JobFilter {
      skills: Some("Rust, sql , , Async".into()),
      ..Default::default()
    };
    assert_eq!(filter.skill_terms(), vec!["rust", "sql", "async"]);
  }

  #[test]
  fn skill_terms_empty_when_absent() {
    assert!(JobFilter::default().skill_terms().is_empty());
  }

  #[test]
  fn deleted_posting_is_not_open() {
    let mut job = sample_job();
    assert!(job.is_open());

    job.deleted_at = Some(chrono::Utc::now());
    job.is_active = false;
    assert!(!job.is_open());
  }

  fn sample_job() -> JobPosting {
    JobPosting {
      job_id:            uuid::Uuid::new_v4(),
      title:             "Backend Engineer".into(),
      description:       "Build things".into(),
      requirements:      None,
      company_name:      "Acme".into(),
      location:          None,
      salary:            None,
      job_type:          JobType::Fulltime,
      work_mode:         WorkMode::Remote,
      experience:        ExperienceLevel::Mid,
      publisher_id:      uuid::Uuid::new_v4(),
      publisher_role:    Role::Employer,
      created_at:        chrono::Utc::now(),
      updated_at:        chrono::Utc::now(),
      is_active:         true,
      deleted_at:        None,
      application_count: 0,
    }
  }
}
