//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enum discriminants (role,
//! job type, status) use their lowercase `Display` form. Profile payloads are
//! stored as compact JSON next to a kind discriminant. UUIDs are stored as
//! hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use guild_core::{
  actor::{Actor, Role},
  application::{Application, ApplicationStatus},
  job::{ExperienceLevel, JobPosting, JobType, WorkMode},
  post::{Comment, Post},
  profile::Profile,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enum discriminants ──────────────────────────────────────────────────────

/// Parse a stored discriminant through its strum `FromStr`.
fn decode_enum<T: FromStr>(s: &str, what: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::Decode(format!("unknown {what}: {s:?}")))
}

pub fn decode_role(s: &str) -> Result<Role> { decode_enum(s, "role") }

pub fn decode_status(s: &str) -> Result<ApplicationStatus> {
  decode_enum(s, "application status")
}

pub fn decode_job_type(s: &str) -> Result<JobType> {
  decode_enum(s, "job type")
}

pub fn decode_work_mode(s: &str) -> Result<WorkMode> {
  decode_enum(s, "work mode")
}

pub fn decode_experience(s: &str) -> Result<ExperienceLevel> {
  decode_enum(s, "experience level")
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `actors` row.
pub struct RawActor {
  pub actor_id:   String,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub role:       String,
  pub verified:   bool,
  pub created_at: String,
}

impl RawActor {
  /// The column list matching [`RawActor::from_row`].
  pub const COLUMNS: &'static str =
    "actor_id, email, first_name, last_name, role, verified, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      actor_id:   row.get(0)?,
      email:      row.get(1)?,
      first_name: row.get(2)?,
      last_name:  row.get(3)?,
      role:       row.get(4)?,
      verified:   row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_actor(self) -> Result<Actor> {
    Ok(Actor {
      actor_id:   decode_uuid(&self.actor_id)?,
      email:      self.email,
      first_name: self.first_name,
      last_name:  self.last_name,
      role:       decode_role(&self.role)?,
      verified:   self.verified,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `jobs` row.
pub struct RawJob {
  pub job_id:            String,
  pub title:             String,
  pub description:       String,
  pub requirements:      Option<String>,
  pub company_name:      String,
  pub location:          Option<String>,
  pub salary:            Option<String>,
  pub job_type:          String,
  pub work_mode:         String,
  pub experience:        String,
  pub publisher_id:      String,
  pub publisher_role:    String,
  pub created_at:        String,
  pub updated_at:        String,
  pub is_active:         bool,
  pub deleted_at:        Option<String>,
  pub application_count: i64,
}

impl RawJob {
  pub const COLUMNS: &'static str = "job_id, title, description, \
     requirements, company_name, location, salary, job_type, work_mode, \
     experience, publisher_id, publisher_role, created_at, updated_at, \
     is_active, deleted_at, application_count";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      job_id:            row.get(0)?,
      title:             row.get(1)?,
      description:       row.get(2)?,
      requirements:      row.get(3)?,
      company_name:      row.get(4)?,
      location:          row.get(5)?,
      salary:            row.get(6)?,
      job_type:          row.get(7)?,
      work_mode:         row.get(8)?,
      experience:        row.get(9)?,
      publisher_id:      row.get(10)?,
      publisher_role:    row.get(11)?,
      created_at:        row.get(12)?,
      updated_at:        row.get(13)?,
      is_active:         row.get(14)?,
      deleted_at:        row.get(15)?,
      application_count: row.get(16)?,
    })
  }

  pub fn into_job(self) -> Result<JobPosting> {
    Ok(JobPosting {
      job_id:            decode_uuid(&self.job_id)?,
      title:             self.title,
      description:       self.description,
      requirements:      self.requirements,
      company_name:      self.company_name,
      location:          self.location,
      salary:            self.salary,
      job_type:          decode_job_type(&self.job_type)?,
      work_mode:         decode_work_mode(&self.work_mode)?,
      experience:        decode_experience(&self.experience)?,
      publisher_id:      decode_uuid(&self.publisher_id)?,
      publisher_role:    decode_role(&self.publisher_role)?,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
      is_active:         self.is_active,
      deleted_at:        self.deleted_at.as_deref().map(decode_dt).transpose()?,
      application_count: self.application_count,
    })
  }
}

/// Raw strings read directly from an `applications` row.
pub struct RawApplication {
  pub application_id: String,
  pub job_id:         String,
  pub applicant_id:   String,
  pub status:         String,
  pub resume_ref:     String,
  pub cover_letter:   Option<String>,
  pub applied_at:     String,
  pub updated_at:     String,
}

impl RawApplication {
  pub const COLUMNS: &'static str = "application_id, job_id, applicant_id, \
     status, resume_ref, cover_letter, applied_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id: row.get(0)?,
      job_id:         row.get(1)?,
      applicant_id:   row.get(2)?,
      status:         row.get(3)?,
      resume_ref:     row.get(4)?,
      cover_letter:   row.get(5)?,
      applied_at:     row.get(6)?,
      updated_at:     row.get(7)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      application_id: decode_uuid(&self.application_id)?,
      job_id:         decode_uuid(&self.job_id)?,
      applicant_id:   decode_uuid(&self.applicant_id)?,
      status:         decode_status(&self.status)?,
      resume_ref:     self.resume_ref,
      cover_letter:   self.cover_letter,
      applied_at:     decode_dt(&self.applied_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:        String,
  pub author_id:      String,
  pub content:        String,
  pub created_at:     String,
  pub likes_count:    i64,
  pub comments_count: i64,
}

impl RawPost {
  pub const COLUMNS: &'static str =
    "post_id, author_id, content, created_at, likes_count, comments_count";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:        row.get(0)?,
      author_id:      row.get(1)?,
      content:        row.get(2)?,
      created_at:     row.get(3)?,
      likes_count:    row.get(4)?,
      comments_count: row.get(5)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:        decode_uuid(&self.post_id)?,
      author_id:      decode_uuid(&self.author_id)?,
      content:        self.content,
      created_at:     decode_dt(&self.created_at)?,
      likes_count:    self.likes_count,
      comments_count: self.comments_count,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub post_id:    String,
  pub author_id:  String,
  pub text:       String,
  pub created_at: String,
}

impl RawComment {
  pub const COLUMNS: &'static str =
    "comment_id, post_id, author_id, text, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      post_id:    row.get(1)?,
      author_id:  row.get(2)?,
      text:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      post_id:    decode_uuid(&self.post_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Decode an optional (kind, payload) profile pair from a LEFT JOIN.
pub fn decode_profile(
  kind: Option<String>,
  payload: Option<String>,
) -> Result<Option<Profile>> {
  match (kind, payload) {
    (Some(kind), Some(payload)) => {
      let data: serde_json::Value = serde_json::from_str(&payload)?;
      Ok(Some(Profile::from_parts(&kind, data).map_err(
        |e| Error::Decode(format!("profile payload: {e}")),
      )?))
    }
    _ => Ok(None),
  }
}
