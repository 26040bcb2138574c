//! Role policy — pure allow/deny decisions over (actor, resource, action).
//!
//! Every function here is a pure function of its argument snapshots, with no
//! hidden state, so the whole role/action matrix can be unit-tested
//! exhaustively. Unauthenticated requests never reach this module; the HTTP
//! layer rejects them before a handler runs.

use serde::Serialize;
use thiserror::Error;

use crate::{
  actor::{Actor, Role},
  job::JobPosting,
  post::{Comment, Post},
};

// ─── Deny reasons ────────────────────────────────────────────────────────────

/// Why a policy check refused an action. Rendered verbatim to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
  #[error("companies cannot apply for jobs")]
  CompanyRole,

  #[error("you cannot apply to your own job posting")]
  OwnJob,

  #[error("this job is no longer active")]
  InactiveJob,

  #[error("only employers and companies can post jobs")]
  RoleCannotPost,

  #[error("only the job publisher can do this")]
  NotPublisher,

  #[error("only the author can do this")]
  NotAuthor,
}

// ─── Checks ──────────────────────────────────────────────────────────────────

/// Employers and Companies post jobs; Employees do not.
pub fn can_create_job(actor: &Actor) -> bool {
  matches!(actor.role, Role::Employer | Role::Company)
}

/// The fixed rule table for applying, evaluated in order, first match wins.
pub fn can_apply_to_job(
  actor: &Actor,
  job: &JobPosting,
) -> Result<(), DenyReason> {
  match actor.role {
    Role::Company => return Err(DenyReason::CompanyRole),
    Role::Employee | Role::Employer => {}
  }
  if job.publisher_id == actor.actor_id {
    return Err(DenyReason::OwnJob);
  }
  if !job.is_open() {
    return Err(DenyReason::InactiveJob);
  }
  Ok(())
}

/// Only the publisher manages a posting, and only while holding a posting
/// role — a publisher demoted to Employee loses management access.
pub fn can_manage_job(actor: &Actor, job: &JobPosting) -> bool {
  job.publisher_id == actor.actor_id
    && matches!(actor.role, Role::Employer | Role::Company)
}

pub fn can_view_applications(actor: &Actor) -> bool {
  matches!(actor.role, Role::Employer | Role::Company)
}

/// Comment removal: the comment's author or the owner of the post it sits
/// under.
pub fn can_delete_comment(
  actor: &Actor,
  comment: &Comment,
  post: &Post,
) -> bool {
  comment.author_id == actor.actor_id || post.author_id == actor.actor_id
}

// ─── Permission summary ──────────────────────────────────────────────────────

/// The role-derived capability set, serialised for the permissions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionSet {
  pub role:                  Role,
  pub can_create_jobs:       bool,
  pub can_apply_to_jobs:     bool,
  pub can_view_applications: bool,
}

pub fn permissions_for(actor: &Actor) -> PermissionSet {
  PermissionSet {
    role:                  actor.role,
    can_create_jobs:       can_create_job(actor),
    can_apply_to_jobs:     !matches!(actor.role, Role::Company),
    can_view_applications: can_view_applications(actor),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::job::{ExperienceLevel, JobType, WorkMode};

  fn actor(role: Role) -> Actor {
    Actor {
      actor_id:   Uuid::new_v4(),
      email:      format!("{role}@example.com"),
      first_name: "Test".into(),
      last_name:  "User".into(),
      role,
      verified:   true,
      created_at: Utc::now(),
    }
  }

  fn job_published_by(publisher: &Actor) -> JobPosting {
    JobPosting {
      job_id:            Uuid::new_v4(),
      title:             "Engineer".into(),
      description:       "desc".into(),
      requirements:      None,
      company_name:      "Acme".into(),
      location:          None,
      salary:            None,
      job_type:          JobType::Fulltime,
      work_mode:         WorkMode::Onsite,
      experience:        ExperienceLevel::Mid,
      publisher_id:      publisher.actor_id,
      publisher_role:    publisher.role,
      created_at:        Utc::now(),
      updated_at:        Utc::now(),
      is_active:         true,
      deleted_at:        None,
      application_count: 0,
    }
  }

  #[test]
  fn create_job_role_matrix() {
    assert!(!can_create_job(&actor(Role::Employee)));
    assert!(can_create_job(&actor(Role::Employer)));
    assert!(can_create_job(&actor(Role::Company)));
  }

  #[test]
  fn company_never_applies_regardless_of_job() {
    let publisher = actor(Role::Employer);
    let company = actor(Role::Company);

    let mut job = job_published_by(&publisher);
    assert_eq!(
      can_apply_to_job(&company, &job),
      Err(DenyReason::CompanyRole)
    );

    // Still denied for an inactive job, and denied for the same reason —
    // the role rule fires first.
    job.is_active = false;
    assert_eq!(
      can_apply_to_job(&company, &job),
      Err(DenyReason::CompanyRole)
    );
  }

  #[test]
  fn employee_and_employer_can_apply_to_open_jobs() {
    let publisher = actor(Role::Company);
    let job = job_published_by(&publisher);

    assert_eq!(can_apply_to_job(&actor(Role::Employee), &job), Ok(()));
    assert_eq!(can_apply_to_job(&actor(Role::Employer), &job), Ok(()));
  }

  #[test]
  fn cannot_apply_to_own_job() {
    let publisher = actor(Role::Employer);
    let job = job_published_by(&publisher);
    assert_eq!(can_apply_to_job(&publisher, &job), Err(DenyReason::OwnJob));
  }

  #[test]
  fn cannot_apply_to_inactive_or_deleted_job() {
    let publisher = actor(Role::Company);
    let applicant = actor(Role::Employee);

    let mut job = job_published_by(&publisher);
    job.is_active = false;
    assert_eq!(
      can_apply_to_job(&applicant, &job),
      Err(DenyReason::InactiveJob)
    );

    job.is_active = true;
    job.deleted_at = Some(Utc::now());
    assert_eq!(
      can_apply_to_job(&applicant, &job),
      Err(DenyReason::InactiveJob)
    );
  }

  #[test]
  fn only_publisher_with_posting_role_manages() {
    let mut publisher = actor(Role::Employer);
    let stranger = actor(Role::Employer);
    let job = job_published_by(&publisher);

    assert!(can_manage_job(&publisher, &job));
    assert!(!can_manage_job(&stranger, &job));

    publisher.role = Role::Employee;
    assert!(!can_manage_job(&publisher, &job));
  }

  #[test]
  fn view_applications_role_matrix() {
    assert!(!can_view_applications(&actor(Role::Employee)));
    assert!(can_view_applications(&actor(Role::Employer)));
    assert!(can_view_applications(&actor(Role::Company)));
  }

  #[test]
  fn comment_deletion_by_author_or_post_owner() {
    let author = actor(Role::Employee);
    let post_owner = actor(Role::Employer);
    let stranger = actor(Role::Employee);

    let post = Post {
      post_id:        Uuid::new_v4(),
      author_id:      post_owner.actor_id,
      content:        "hello".into(),
      created_at:     Utc::now(),
      likes_count:    0,
      comments_count: 1,
    };
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id:    post.post_id,
      author_id:  author.actor_id,
      text:       "nice".into(),
      created_at: Utc::now(),
    };

    assert!(can_delete_comment(&author, &comment, &post));
    assert!(can_delete_comment(&post_owner, &comment, &post));
    assert!(!can_delete_comment(&stranger, &comment, &post));
  }

  #[test]
  fn permission_set_per_role() {
    let set = permissions_for(&actor(Role::Employee));
    assert!(!set.can_create_jobs);
    assert!(set.can_apply_to_jobs);
    assert!(!set.can_view_applications);

    let set = permissions_for(&actor(Role::Company));
    assert!(set.can_create_jobs);
    assert!(!set.can_apply_to_jobs);
    assert!(set.can_view_applications);
  }
}
