//! [`SqliteStore`] — the SQLite implementation of [`PortalStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use guild_core::{
  actor::{Actor, NewActor, Role},
  application::{Application, ApplicationStatus, NewApplication, StatusStats},
  follow::{
    Connection, FollowOutcome, FollowStats, Suggestion, UnfollowOutcome,
  },
  job::{JobFilter, JobPosting, JobStats, JobUpdate, NewJob},
  policy::{self, DenyReason},
  post::{Comment, LikeOutcome, Post, UnlikeOutcome},
  profile::Profile,
  store::PortalStore,
};

use crate::{
  encode::{
    RawActor, RawApplication, RawComment, RawJob, RawPost, decode_profile,
    decode_status, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

/// `actors` columns under the alias `a`, for joined queries.
const ACTOR_COLS_A: &str = "a.actor_id, a.email, a.first_name, a.last_name, \
   a.role, a.verified, a.created_at";

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Guild portal store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a posting regardless of soft-delete state. Ownership checks on
  /// applications must keep working after the posting is deleted.
  async fn fetch_job_any(&self, id: Uuid) -> Result<Option<JobPosting>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM jobs WHERE job_id = ?1",
                RawJob::COLUMNS
              ),
              rusqlite::params![id_str],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }

  /// Load a posting the acting publisher may manage. Deleted postings read
  /// as absent; non-publishers are refused.
  async fn fetch_managed_job(
    &self,
    job_id: Uuid,
    actor: &Actor,
  ) -> Result<JobPosting> {
    let job = self
      .get_job(job_id)
      .await?
      .ok_or(guild_core::Error::JobNotFound(job_id))?;

    if !policy::can_manage_job(actor, &job) {
      return Err(
        guild_core::Error::PermissionDenied(DenyReason::NotPublisher).into(),
      );
    }
    Ok(job)
  }

  /// Write every mutable column of a posting back in one statement.
  async fn persist_job(&self, job: &JobPosting) -> Result<()> {
    let job_id_str     = encode_uuid(job.job_id);
    let title          = job.title.clone();
    let description    = job.description.clone();
    let requirements   = job.requirements.clone();
    let company_name   = job.company_name.clone();
    let location       = job.location.clone();
    let salary         = job.salary.clone();
    let job_type_str   = job.job_type.to_string();
    let work_mode_str  = job.work_mode.to_string();
    let experience_str = job.experience.to_string();
    let updated_at_str = encode_dt(job.updated_at);
    let is_active      = job.is_active;
    let deleted_at_str = job.deleted_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE jobs SET
             title = ?2, description = ?3, requirements = ?4,
             company_name = ?5, location = ?6, salary = ?7, job_type = ?8,
             work_mode = ?9, experience = ?10, updated_at = ?11,
             is_active = ?12, deleted_at = ?13
           WHERE job_id = ?1",
          rusqlite::params![
            job_id_str,
            title,
            description,
            requirements,
            company_name,
            location,
            salary,
            job_type_str,
            work_mode_str,
            experience_str,
            updated_at_str,
            is_active,
            deleted_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Followers/following counts; shared by the outcome-returning edge ops.
  fn stats_query(
    conn: &rusqlite::Connection,
    actor_id: &str,
  ) -> rusqlite::Result<FollowStats> {
    let followers: i64 = conn.query_row(
      "SELECT COUNT(*) FROM follows WHERE following_id = ?1",
      rusqlite::params![actor_id],
      |r| r.get(0),
    )?;
    let following: i64 = conn.query_row(
      "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
      rusqlite::params![actor_id],
      |r| r.get(0),
    )?;
    Ok(FollowStats { followers, following })
  }

  /// Joined actor+profile listing for either side of the follow edge.
  async fn connections_where(
    &self,
    sql: &'static str,
    actor_id: Uuid,
  ) -> Result<Vec<Connection>> {
    let id_str = encode_uuid(actor_id);

    let raws: Vec<(RawActor, Option<String>, Option<String>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((RawActor::from_row(row)?, row.get(7)?, row.get(8)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, kind, payload)| {
        Ok(Connection {
          actor:   raw.into_actor()?,
          profile: decode_profile(kind, payload)?,
        })
      })
      .collect()
  }
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  type Error = Error;

  // ── Actors & credentials ──────────────────────────────────────────────────

  async fn create_actor(&self, input: NewActor) -> Result<Actor> {
    let actor = Actor {
      actor_id:   Uuid::new_v4(),
      email:      input.email.clone(),
      first_name: input.first_name.clone(),
      last_name:  input.last_name.clone(),
      role:       input.role,
      verified:   false,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(actor.actor_id);
    let email    = input.email.clone();
    let hash     = input.password_hash;
    let first    = input.first_name;
    let last     = input.last_name;
    let role_str = input.role.to_string();
    let otp      = input.otp;
    let at_str   = encode_dt(actor.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO actors (
             actor_id, email, password_hash, first_name, last_name,
             role, verified, otp, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
          rusqlite::params![id_str, email, hash, first, last, role_str, otp, at_str],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(guild_core::Error::EmailTaken(input.email).into());
    }
    Ok(actor)
  }

  async fn get_actor(&self, id: Uuid) -> Result<Option<Actor>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawActor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM actors WHERE actor_id = ?1",
                RawActor::COLUMNS
              ),
              rusqlite::params![id_str],
              RawActor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActor::into_actor).transpose()
  }

  async fn get_actor_by_email(&self, email: &str) -> Result<Option<Actor>> {
    let email = email.to_owned();

    let raw: Option<RawActor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM actors WHERE email = ?1",
                RawActor::COLUMNS
              ),
              rusqlite::params![email],
              RawActor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActor::into_actor).transpose()
  }

  async fn password_hash_of(&self, id: Uuid) -> Result<String> {
    let id_str = encode_uuid(id);

    let hash: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT password_hash FROM actors WHERE actor_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    hash.ok_or_else(|| guild_core::Error::ActorNotFound(id).into())
  }

  async fn set_password_hash(&self, id: Uuid, hash: String) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE actors SET password_hash = ?2 WHERE actor_id = ?1",
          rusqlite::params![id_str, hash],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(guild_core::Error::ActorNotFound(id).into());
    }
    Ok(())
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<Actor> {
    let id_str   = encode_uuid(id);
    let role_str = role.to_string();

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE actors SET role = ?2 WHERE actor_id = ?1",
          rusqlite::params![id_str, role_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(guild_core::Error::ActorNotFound(id).into());
    }
    self
      .get_actor(id)
      .await?
      .ok_or_else(|| guild_core::Error::ActorNotFound(id).into())
  }

  async fn otp_of(&self, id: Uuid) -> Result<Option<String>> {
    let id_str = encode_uuid(id);

    let row: Option<Option<String>> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT otp FROM actors WHERE actor_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    row.ok_or_else(|| guild_core::Error::ActorNotFound(id).into())
  }

  async fn set_otp(&self, id: Uuid, otp: Option<String>) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE actors SET otp = ?2 WHERE actor_id = ?1",
          rusqlite::params![id_str, otp],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(guild_core::Error::ActorNotFound(id).into());
    }
    Ok(())
  }

  async fn mark_verified(&self, id: Uuid) -> Result<Actor> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE actors SET verified = 1, otp = NULL WHERE actor_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(guild_core::Error::ActorNotFound(id).into());
    }
    self
      .get_actor(id)
      .await?
      .ok_or_else(|| guild_core::Error::ActorNotFound(id).into())
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    token_hash: String,
    actor_id: Uuid,
  ) -> Result<()> {
    let actor_str = encode_uuid(actor_id);
    let at_str    = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, actor_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![token_hash, actor_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn actor_for_session(
    &self,
    token_hash: String,
  ) -> Result<Option<Actor>> {
    let raw: Option<RawActor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTOR_COLS_A}
                 FROM sessions s
                 JOIN actors a ON a.actor_id = s.actor_id
                 WHERE s.token_hash = ?1"
              ),
              rusqlite::params![token_hash],
              RawActor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActor::into_actor).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Jobs ──────────────────────────────────────────────────────────────────

  async fn create_job(
    &self,
    publisher: &Actor,
    input: NewJob,
  ) -> Result<JobPosting> {
    let now = Utc::now();
    let job = JobPosting {
      job_id:            Uuid::new_v4(),
      title:             input.title,
      description:       input.description,
      requirements:      input.requirements,
      company_name:      input.company_name,
      location:          input.location,
      salary:            input.salary,
      job_type:          input.job_type,
      work_mode:         input.work_mode,
      experience:        input.experience,
      publisher_id:      publisher.actor_id,
      publisher_role:    publisher.role,
      created_at:        now,
      updated_at:        now,
      is_active:         true,
      deleted_at:        None,
      application_count: 0,
    };

    let job_id_str     = encode_uuid(job.job_id);
    let title          = job.title.clone();
    let description    = job.description.clone();
    let requirements   = job.requirements.clone();
    let company_name   = job.company_name.clone();
    let location       = job.location.clone();
    let salary         = job.salary.clone();
    let job_type_str   = job.job_type.to_string();
    let work_mode_str  = job.work_mode.to_string();
    let experience_str = job.experience.to_string();
    let publisher_str  = encode_uuid(job.publisher_id);
    let role_str       = job.publisher_role.to_string();
    let at_str         = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO jobs (
             job_id, title, description, requirements, company_name,
             location, salary, job_type, work_mode, experience,
             publisher_id, publisher_role, created_at, updated_at,
             is_active, deleted_at, application_count
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     ?13, ?13, 1, NULL, 0)",
          rusqlite::params![
            job_id_str,
            title,
            description,
            requirements,
            company_name,
            location,
            salary,
            job_type_str,
            work_mode_str,
            experience_str,
            publisher_str,
            role_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(job)
  }

  async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
    Ok(
      self
        .fetch_job_any(id)
        .await?
        .filter(|job| job.deleted_at.is_none()),
    )
  }

  async fn update_job(
    &self,
    job_id: Uuid,
    actor: &Actor,
    update: JobUpdate,
  ) -> Result<JobPosting> {
    let mut job = self.fetch_managed_job(job_id, actor).await?;

    if let Some(v) = update.title {
      job.title = v;
    }
    if let Some(v) = update.description {
      job.description = v;
    }
    if let Some(v) = update.requirements {
      job.requirements = Some(v);
    }
    if let Some(v) = update.company_name {
      job.company_name = v;
    }
    if let Some(v) = update.location {
      job.location = Some(v);
    }
    if let Some(v) = update.salary {
      job.salary = Some(v);
    }
    if let Some(v) = update.job_type {
      job.job_type = v;
    }
    if let Some(v) = update.work_mode {
      job.work_mode = v;
    }
    if let Some(v) = update.experience {
      job.experience = v;
    }
    job.updated_at = Utc::now();

    self.persist_job(&job).await?;
    Ok(job)
  }

  async fn soft_delete_job(&self, job_id: Uuid, actor: &Actor) -> Result<()> {
    let mut job = self.fetch_managed_job(job_id, actor).await?;

    // is_active drops in the same write that sets the tombstone.
    let now = Utc::now();
    job.deleted_at = Some(now);
    job.is_active = false;
    job.updated_at = now;

    self.persist_job(&job).await?;
    Ok(())
  }

  async fn set_job_active(
    &self,
    job_id: Uuid,
    actor: &Actor,
    active: bool,
  ) -> Result<JobPosting> {
    let mut job = self.fetch_managed_job(job_id, actor).await?;

    job.is_active = active;
    job.updated_at = Utc::now();

    self.persist_job(&job).await?;
    Ok(job)
  }

  async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>> {
    // Conjunctive WHERE clause built from the provided filters; parameters
    // are pushed in the same order as their `?` placeholders.
    let mut conds: Vec<String> =
      vec!["is_active = 1".into(), "deleted_at IS NULL".into()];
    let mut args: Vec<String> = vec![];

    if let Some(title) = &filter.title {
      conds.push("title LIKE ?".into());
      args.push(format!("%{title}%"));
    }
    if let Some(location) = &filter.location {
      conds.push("location LIKE ?".into());
      args.push(format!("%{location}%"));
    }
    if let Some(job_type) = filter.job_type {
      conds.push("job_type = ?".into());
      args.push(job_type.to_string());
    }
    if let Some(work_mode) = filter.work_mode {
      conds.push("work_mode = ?".into());
      args.push(work_mode.to_string());
    }
    if let Some(experience) = filter.experience {
      conds.push("experience = ?".into());
      args.push(experience.to_string());
    }
    for term in filter.skill_terms() {
      conds.push("lower(coalesce(requirements, '')) LIKE ?".into());
      args.push(format!("%{term}%"));
    }
    if let Some(company) = &filter.company {
      conds.push("company_name LIKE ?".into());
      args.push(format!("%{company}%"));
    }
    if let Some(days) = filter.posted_within_days {
      let cutoff = Utc::now() - chrono::Duration::days(days.max(0));
      conds.push("created_at >= ?".into());
      args.push(encode_dt(cutoff));
    }
    if let Some(min) = &filter.salary_min {
      conds.push("salary LIKE ?".into());
      args.push(format!("%{min}%"));
    }
    if let Some(max) = &filter.salary_max {
      conds.push("salary LIKE ?".into());
      args.push(format!("%{max}%"));
    }

    let limit  = filter.limit.unwrap_or(100) as i64;
    let offset = filter.offset.unwrap_or(0) as i64;
    let sql = format!(
      "SELECT {} FROM jobs WHERE {} ORDER BY created_at DESC \
       LIMIT {limit} OFFSET {offset}",
      RawJob::COLUMNS,
      conds.join(" AND "),
    );

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJob::into_job).collect()
  }

  async fn jobs_published_by(
    &self,
    publisher_id: Uuid,
  ) -> Result<Vec<JobPosting>> {
    let id_str = encode_uuid(publisher_id);

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM jobs
           WHERE publisher_id = ?1 AND deleted_at IS NULL
           ORDER BY created_at DESC",
          RawJob::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJob::into_job).collect()
  }

  async fn job_stats(&self, publisher_id: Uuid) -> Result<JobStats> {
    let id_str = encode_uuid(publisher_id);

    let stats = self
      .conn
      .call(move |conn| {
        let (total, active, applications): (i64, i64, i64) = conn.query_row(
          "SELECT COUNT(*),
                  COALESCE(SUM(is_active), 0),
                  COALESCE(SUM(application_count), 0)
           FROM jobs
           WHERE publisher_id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id_str],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?;
        Ok(JobStats {
          total_posted:          total,
          active,
          inactive:              total - active,
          applications_received: applications,
        })
      })
      .await?;

    Ok(stats)
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn apply_to_job(
    &self,
    applicant: &Actor,
    job_id: Uuid,
    input: NewApplication,
  ) -> Result<Application> {
    let job = self
      .fetch_job_any(job_id)
      .await?
      .ok_or(guild_core::Error::JobNotFound(job_id))?;

    policy::can_apply_to_job(applicant, &job)
      .map_err(guild_core::Error::PermissionDenied)?;

    let now = Utc::now();
    let application = Application {
      application_id: Uuid::new_v4(),
      job_id,
      applicant_id:   applicant.actor_id,
      status:         ApplicationStatus::Submitted,
      resume_ref:     input.resume_ref,
      cover_letter:   input.cover_letter,
      applied_at:     now,
      updated_at:     now,
    };

    let app_id_str    = encode_uuid(application.application_id);
    let job_id_str    = encode_uuid(job_id);
    let applicant_str = encode_uuid(applicant.actor_id);
    let status_str    = application.status.to_string();
    let resume_ref    = application.resume_ref.clone();
    let cover_letter  = application.cover_letter.clone();
    let at_str        = encode_dt(now);

    // The UNIQUE (job_id, applicant_id) index is the arbiter under
    // concurrent applies; the counter moves in the same transaction.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = match tx.execute(
          "INSERT INTO applications (
             application_id, job_id, applicant_id, status,
             resume_ref, cover_letter, applied_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            app_id_str,
            job_id_str,
            applicant_str,
            status_str,
            resume_ref,
            cover_letter,
            at_str,
          ],
        ) {
          Ok(_) => true,
          Err(e) if is_constraint_violation(&e) => false,
          Err(e) => return Err(e.into()),
        };

        if inserted {
          tx.execute(
            "UPDATE jobs SET application_count = application_count + 1
             WHERE job_id = ?1",
            rusqlite::params![job_id_str],
          )?;
          tx.commit()?;
        }
        Ok(inserted)
      })
      .await?;

    if !inserted {
      return Err(guild_core::Error::AlreadyApplied.into());
    }
    Ok(application)
  }

  async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM applications WHERE application_id = ?1",
                RawApplication::COLUMNS
              ),
              rusqlite::params![id_str],
              RawApplication::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawApplication::into_application).transpose()
  }

  async fn set_application_status(
    &self,
    application_id: Uuid,
    status: ApplicationStatus,
    actor: &Actor,
  ) -> Result<Application> {
    let mut application = self
      .get_application(application_id)
      .await?
      .ok_or(guild_core::Error::ApplicationNotFound(application_id))?;

    let job = self
      .fetch_job_any(application.job_id)
      .await?
      .ok_or(guild_core::Error::JobNotFound(application.job_id))?;

    if job.publisher_id != actor.actor_id {
      return Err(
        guild_core::Error::PermissionDenied(DenyReason::NotPublisher).into(),
      );
    }

    application.status = status;
    application.updated_at = Utc::now();

    let app_id_str     = encode_uuid(application_id);
    let status_str     = status.to_string();
    let updated_at_str = encode_dt(application.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE applications SET status = ?2, updated_at = ?3
           WHERE application_id = ?1",
          rusqlite::params![app_id_str, status_str, updated_at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(application)
  }

  async fn applications_for_job(
    &self,
    job_id: Uuid,
    actor: &Actor,
  ) -> Result<Vec<Application>> {
    let job = self
      .fetch_job_any(job_id)
      .await?
      .ok_or(guild_core::Error::JobNotFound(job_id))?;

    if job.publisher_id != actor.actor_id {
      return Err(
        guild_core::Error::PermissionDenied(DenyReason::NotPublisher).into(),
      );
    }

    let job_id_str = encode_uuid(job_id);

    let raws: Vec<RawApplication> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM applications WHERE job_id = ?1
           ORDER BY applied_at DESC",
          RawApplication::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![job_id_str], RawApplication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawApplication::into_application)
      .collect()
  }

  async fn applications_by(
    &self,
    applicant_id: Uuid,
  ) -> Result<Vec<Application>> {
    let id_str = encode_uuid(applicant_id);

    let raws: Vec<RawApplication> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM applications WHERE applicant_id = ?1
           ORDER BY applied_at DESC",
          RawApplication::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawApplication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawApplication::into_application)
      .collect()
  }

  async fn application_status_stats(
    &self,
    publisher_id: Uuid,
  ) -> Result<StatusStats> {
    let id_str = encode_uuid(publisher_id);

    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.status, COUNT(*)
           FROM applications a
           JOIN jobs j ON j.job_id = a.job_id
           WHERE j.publisher_id = ?1
           GROUP BY a.status",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |r| {
            Ok((r.get(0)?, r.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut stats = StatusStats::default();
    for (status_str, count) in rows {
      stats.bump(decode_status(&status_str)?, count);
    }
    Ok(stats)
  }

  // ── Follow graph ──────────────────────────────────────────────────────────

  async fn follow(
    &self,
    follower_id: Uuid,
    target_id: Uuid,
  ) -> Result<FollowOutcome> {
    if follower_id == target_id {
      return Err(guild_core::Error::SelfFollow.into());
    }
    if self.get_actor(target_id).await?.is_none() {
      return Err(guild_core::Error::ActorNotFound(target_id).into());
    }

    let follower_str = encode_uuid(follower_id);
    let target_str   = encode_uuid(target_id);
    let at_str       = encode_dt(Utc::now());

    // INSERT OR IGNORE under the pair primary key: concurrent duplicate
    // follows collapse to one edge.
    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO follows (follower_id, following_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![follower_str, target_str, at_str],
        )?;
        let followed = conn.changes() > 0;
        let stats = SqliteStore::stats_query(conn, &target_str)?;
        Ok(FollowOutcome { followed, stats })
      })
      .await?;

    Ok(outcome)
  }

  async fn unfollow(
    &self,
    follower_id: Uuid,
    target_id: Uuid,
  ) -> Result<UnfollowOutcome> {
    if self.get_actor(target_id).await?.is_none() {
      return Err(guild_core::Error::ActorNotFound(target_id).into());
    }

    let follower_str = encode_uuid(follower_id);
    let target_str   = encode_uuid(target_id);

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM follows WHERE follower_id = ?1 AND following_id = ?2",
          rusqlite::params![follower_str, target_str],
        )?;
        let unfollowed = conn.changes() > 0;
        let stats = SqliteStore::stats_query(conn, &target_str)?;
        Ok(UnfollowOutcome { unfollowed, stats })
      })
      .await?;

    Ok(outcome)
  }

  async fn followers_of(&self, actor_id: Uuid) -> Result<Vec<Connection>> {
    self
      .connections_where(
        "SELECT a.actor_id, a.email, a.first_name, a.last_name, a.role, \
           a.verified, a.created_at, p.kind, p.profile_json
         FROM follows f
         JOIN actors a ON a.actor_id = f.follower_id
         LEFT JOIN profiles p ON p.actor_id = a.actor_id
         WHERE f.following_id = ?1
         ORDER BY f.created_at DESC",
        actor_id,
      )
      .await
  }

  async fn following_of(&self, actor_id: Uuid) -> Result<Vec<Connection>> {
    self
      .connections_where(
        "SELECT a.actor_id, a.email, a.first_name, a.last_name, a.role, \
           a.verified, a.created_at, p.kind, p.profile_json
         FROM follows f
         JOIN actors a ON a.actor_id = f.following_id
         LEFT JOIN profiles p ON p.actor_id = a.actor_id
         WHERE f.follower_id = ?1
         ORDER BY f.created_at DESC",
        actor_id,
      )
      .await
  }

  async fn follow_stats(&self, actor_id: Uuid) -> Result<FollowStats> {
    let id_str = encode_uuid(actor_id);

    let stats = self
      .conn
      .call(move |conn| SqliteStore::stats_query(conn, &id_str).map_err(Into::into))
      .await?;

    Ok(stats)
  }

  async fn suggestions_for(
    &self,
    actor_id: Uuid,
    limit: usize,
  ) -> Result<Vec<Suggestion>> {
    let id_str    = encode_uuid(actor_id);
    let limit_val = limit as i64;

    let raws: Vec<(RawActor, Option<String>, Option<String>, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.actor_id, a.email, a.first_name, a.last_name, a.role,
                  a.verified, a.created_at, p.kind, p.profile_json,
                  (SELECT COUNT(*) FROM follows f WHERE f.following_id = a.actor_id)
                + (SELECT COUNT(*) FROM follows f WHERE f.follower_id = a.actor_id)
                  AS connections
           FROM actors a
           LEFT JOIN profiles p ON p.actor_id = a.actor_id
           WHERE a.actor_id != ?1
             AND a.actor_id NOT IN
               (SELECT following_id FROM follows WHERE follower_id = ?1)
           ORDER BY connections DESC, a.created_at ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str, limit_val], |row| {
            Ok((
              RawActor::from_row(row)?,
              row.get(7)?,
              row.get(8)?,
              row.get(9)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, kind, payload, connections)| {
        Ok(Suggestion {
          actor: raw.into_actor()?,
          profile: decode_profile(kind, payload)?,
          connections,
        })
      })
      .collect()
  }

  // ── Posts & engagement ────────────────────────────────────────────────────

  async fn create_post(&self, author_id: Uuid, content: String) -> Result<Post> {
    let post = Post {
      post_id:        Uuid::new_v4(),
      author_id,
      content:        content.clone(),
      created_at:     Utc::now(),
      likes_count:    0,
      comments_count: 0,
    };

    let post_id_str = encode_uuid(post.post_id);
    let author_str  = encode_uuid(author_id);
    let at_str      = encode_dt(post.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, author_id, content, created_at,
                              likes_count, comments_count)
           VALUES (?1, ?2, ?3, ?4, 0, 0)",
          rusqlite::params![post_id_str, author_str, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM posts WHERE post_id = ?1",
                RawPost::COLUMNS
              ),
              rusqlite::params![id_str],
              RawPost::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM posts ORDER BY created_at DESC",
          RawPost::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn posts_by(&self, author_id: Uuid) -> Result<Vec<Post>> {
    let id_str = encode_uuid(author_id);

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM posts WHERE author_id = ?1
           ORDER BY created_at DESC",
          RawPost::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn update_post(
    &self,
    post_id: Uuid,
    actor: &Actor,
    content: String,
  ) -> Result<Post> {
    let mut post = self
      .get_post(post_id)
      .await?
      .ok_or(guild_core::Error::PostNotFound(post_id))?;

    if post.author_id != actor.actor_id {
      return Err(
        guild_core::Error::PermissionDenied(DenyReason::NotAuthor).into(),
      );
    }

    post.content = content.clone();

    let post_id_str = encode_uuid(post_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE posts SET content = ?2 WHERE post_id = ?1",
          rusqlite::params![post_id_str, content],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn delete_post(&self, post_id: Uuid, actor: &Actor) -> Result<()> {
    let post = self
      .get_post(post_id)
      .await?
      .ok_or(guild_core::Error::PostNotFound(post_id))?;

    if post.author_id != actor.actor_id {
      return Err(
        guild_core::Error::PermissionDenied(DenyReason::NotAuthor).into(),
      );
    }

    let post_id_str = encode_uuid(post_id);
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM likes WHERE post_id = ?1",
          rusqlite::params![post_id_str],
        )?;
        tx.execute(
          "DELETE FROM comments WHERE post_id = ?1",
          rusqlite::params![post_id_str],
        )?;
        tx.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![post_id_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn like_post(
    &self,
    actor_id: Uuid,
    post_id: Uuid,
  ) -> Result<LikeOutcome> {
    let actor_str   = encode_uuid(actor_id);
    let post_id_str = encode_uuid(post_id);
    let at_str      = encode_dt(Utc::now());

    // Existence check, edge insert, and counter move share one transaction;
    // the counter is a relative update, never a read-modify-write.
    let outcome: Option<LikeOutcome> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT OR IGNORE INTO likes (actor_id, post_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![actor_str, post_id_str, at_str],
        )?;
        let liked = tx.changes() > 0;

        if liked {
          tx.execute(
            "UPDATE posts SET likes_count = likes_count + 1
             WHERE post_id = ?1",
            rusqlite::params![post_id_str],
          )?;
        }

        let likes_count: i64 = tx.query_row(
          "SELECT likes_count FROM posts WHERE post_id = ?1",
          rusqlite::params![post_id_str],
          |r| r.get(0),
        )?;

        tx.commit()?;
        Ok(Some(LikeOutcome { liked, likes_count }))
      })
      .await?;

    outcome.ok_or_else(|| guild_core::Error::PostNotFound(post_id).into())
  }

  async fn unlike_post(
    &self,
    actor_id: Uuid,
    post_id: Uuid,
  ) -> Result<UnlikeOutcome> {
    let actor_str   = encode_uuid(actor_id);
    let post_id_str = encode_uuid(post_id);

    let outcome: Option<UnlikeOutcome> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        tx.execute(
          "DELETE FROM likes WHERE actor_id = ?1 AND post_id = ?2",
          rusqlite::params![actor_str, post_id_str],
        )?;
        let unliked = tx.changes() > 0;

        if unliked {
          tx.execute(
            "UPDATE posts SET likes_count = likes_count - 1
             WHERE post_id = ?1",
            rusqlite::params![post_id_str],
          )?;
        }

        let likes_count: i64 = tx.query_row(
          "SELECT likes_count FROM posts WHERE post_id = ?1",
          rusqlite::params![post_id_str],
          |r| r.get(0),
        )?;

        tx.commit()?;
        Ok(Some(UnlikeOutcome { unliked, likes_count }))
      })
      .await?;

    outcome.ok_or_else(|| guild_core::Error::PostNotFound(post_id).into())
  }

  async fn add_comment(
    &self,
    post_id: Uuid,
    author_id: Uuid,
    text: String,
  ) -> Result<Comment> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id,
      author_id,
      text:       text.clone(),
      created_at: Utc::now(),
    };

    let comment_id_str = encode_uuid(comment.comment_id);
    let post_id_str    = encode_uuid(post_id);
    let author_str     = encode_uuid(author_id);
    let at_str         = encode_dt(comment.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO comments (comment_id, post_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![comment_id_str, post_id_str, author_str, text, at_str],
        )?;
        tx.execute(
          "UPDATE posts SET comments_count = comments_count + 1
           WHERE post_id = ?1",
          rusqlite::params![post_id_str],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(guild_core::Error::PostNotFound(post_id).into());
    }
    Ok(comment)
  }

  async fn delete_comment(
    &self,
    comment_id: Uuid,
    actor: &Actor,
  ) -> Result<()> {
    let comment_id_str = encode_uuid(comment_id);

    let raw: Option<RawComment> = self
      .conn
      .call({
        let comment_id_str = comment_id_str.clone();
        move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "SELECT {} FROM comments WHERE comment_id = ?1",
                  RawComment::COLUMNS
                ),
                rusqlite::params![comment_id_str],
                RawComment::from_row,
              )
              .optional()?,
          )
        }
      })
      .await?;

    let comment = raw
      .map(RawComment::into_comment)
      .transpose()?
      .ok_or(guild_core::Error::CommentNotFound(comment_id))?;

    let post = self
      .get_post(comment.post_id)
      .await?
      .ok_or(guild_core::Error::PostNotFound(comment.post_id))?;

    if !policy::can_delete_comment(actor, &comment, &post) {
      return Err(
        guild_core::Error::PermissionDenied(DenyReason::NotAuthor).into(),
      );
    }

    let post_id_str = encode_uuid(comment.post_id);
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM comments WHERE comment_id = ?1",
          rusqlite::params![comment_id_str],
        )?;
        if tx.changes() > 0 {
          tx.execute(
            "UPDATE posts SET comments_count = comments_count - 1
             WHERE post_id = ?1",
            rusqlite::params![post_id_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
    let post_id_str = encode_uuid(post_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM comments WHERE post_id = ?1
           ORDER BY created_at DESC",
          RawComment::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![post_id_str], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn upsert_profile(
    &self,
    actor_id: Uuid,
    profile: Profile,
  ) -> Result<Profile> {
    let actor = self
      .get_actor(actor_id)
      .await?
      .ok_or(guild_core::Error::ActorNotFound(actor_id))?;

    if !profile.matches_role(actor.role) {
      return Err(guild_core::Error::ProfileKindMismatch.into());
    }

    let actor_str = encode_uuid(actor_id);
    let kind      = profile.discriminant().to_owned();
    let payload   = profile.to_json()?.to_string();
    let at_str    = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (actor_id, kind, profile_json, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (actor_id) DO UPDATE SET
             kind = excluded.kind,
             profile_json = excluded.profile_json,
             updated_at = excluded.updated_at",
          rusqlite::params![actor_str, kind, payload, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  async fn profile_of(&self, actor_id: Uuid) -> Result<Option<Profile>> {
    let actor_str = encode_uuid(actor_id);

    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT kind, profile_json FROM profiles WHERE actor_id = ?1",
              rusqlite::params![actor_str],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    match row {
      Some((kind, payload)) => decode_profile(Some(kind), Some(payload)),
      None => Ok(None),
    }
  }
}
