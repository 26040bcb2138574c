//! The `PortalStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `guild-store-sqlite`).
//! Higher layers (`guild-api`) depend on this abstraction, not on any
//! concrete backend.
//!
//! Ownership checks that need current storage state (is this actor the
//! publisher? does this edge exist?) live behind these methods, next to the
//! uniqueness constraints that back them. Pure role checks stay in
//! [`crate::policy`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  actor::{Actor, NewActor, Role},
  application::{Application, ApplicationStatus, NewApplication, StatusStats},
  follow::{Connection, FollowOutcome, FollowStats, Suggestion, UnfollowOutcome},
  job::{JobFilter, JobPosting, JobStats, JobUpdate, NewJob},
  post::{Comment, LikeOutcome, Post, UnlikeOutcome},
  profile::Profile,
};

/// Abstraction over a Guild portal store backend.
///
/// Counter maintenance (application, like, and comment counts) must be
/// atomic relative to the row change it tracks — a relative update in the
/// same transaction, never a read-modify-write round trip. Get-or-create
/// paths (likes, follow edges, applications) rely on storage uniqueness
/// constraints, so concurrent duplicates collapse instead of double-writing.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PortalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Actors & credentials ──────────────────────────────────────────────

  /// Create an account. Fails when the email is already registered.
  fn create_actor(
    &self,
    input: NewActor,
  ) -> impl Future<Output = Result<Actor, Self::Error>> + Send + '_;

  fn get_actor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  fn get_actor_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + 'a;

  /// The stored argon2 PHC string for a login check.
  fn password_hash_of(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  fn set_password_hash(
    &self,
    id: Uuid,
    hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Roles are mutable post-creation.
  fn set_role(
    &self,
    id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Actor, Self::Error>> + Send + '_;

  /// The pending OTP for an account, if any.
  fn otp_of(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Replace (or clear) the pending OTP.
  fn set_otp(
    &self,
    id: Uuid,
    otp: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Flip `verified` on and clear any pending OTP.
  fn mark_verified(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Actor, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a session under the digest of its bearer token. The raw token
  /// never reaches the store.
  fn create_session(
    &self,
    token_hash: String,
    actor_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a bearer-token digest to its actor, if the session exists.
  fn actor_for_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Jobs ──────────────────────────────────────────────────────────────

  fn create_job<'a>(
    &'a self,
    publisher: &'a Actor,
    input: NewJob,
  ) -> impl Future<Output = Result<JobPosting, Self::Error>> + Send + 'a;

  /// Retrieve a posting. Soft-deleted postings read as absent.
  fn get_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<JobPosting>, Self::Error>> + Send + '_;

  /// Publisher-only partial update.
  fn update_job<'a>(
    &'a self,
    job_id: Uuid,
    actor: &'a Actor,
    update: JobUpdate,
  ) -> impl Future<Output = Result<JobPosting, Self::Error>> + Send + 'a;

  /// Publisher-only soft delete: sets `deleted_at` and drops `is_active` in
  /// the same write. A deleted posting never comes back.
  fn soft_delete_job<'a>(
    &'a self,
    job_id: Uuid,
    actor: &'a Actor,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Publisher-only activate/deactivate toggle.
  fn set_job_active<'a>(
    &'a self,
    job_id: Uuid,
    actor: &'a Actor,
    active: bool,
  ) -> impl Future<Output = Result<JobPosting, Self::Error>> + Send + 'a;

  /// Active, non-deleted postings matching every provided filter, newest
  /// first.
  fn list_jobs<'a>(
    &'a self,
    filter: &'a JobFilter,
  ) -> impl Future<Output = Result<Vec<JobPosting>, Self::Error>> + Send + 'a;

  /// Everything a publisher has posted (active or not), newest first.
  fn jobs_published_by(
    &self,
    publisher_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JobPosting>, Self::Error>> + Send + '_;

  fn job_stats(
    &self,
    publisher_id: Uuid,
  ) -> impl Future<Output = Result<JobStats, Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Apply to a posting. Policy-gated on the applicant's role and the
  /// posting's state; at most one application per (job, applicant) pair.
  /// Bumps the posting's application count in the same transaction.
  fn apply_to_job<'a>(
    &'a self,
    applicant: &'a Actor,
    job_id: Uuid,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + 'a;

  fn get_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// Publisher-only status write. Any status may replace any other.
  fn set_application_status<'a>(
    &'a self,
    application_id: Uuid,
    status: ApplicationStatus,
    actor: &'a Actor,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + 'a;

  /// Publisher-only listing of a posting's applications, newest first.
  fn applications_for_job<'a>(
    &'a self,
    job_id: Uuid,
    actor: &'a Actor,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + 'a;

  /// Everything this actor has applied to, newest first.
  fn applications_by(
    &self,
    applicant_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  /// Per-status counts across all of a publisher's postings.
  fn application_status_stats(
    &self,
    publisher_id: Uuid,
  ) -> impl Future<Output = Result<StatusStats, Self::Error>> + Send + '_;

  // ── Follow graph ──────────────────────────────────────────────────────

  /// Create the edge follower → target. Self-follow is an error; an
  /// existing edge is success with `followed = false`.
  fn follow(
    &self,
    follower_id: Uuid,
    target_id: Uuid,
  ) -> impl Future<Output = Result<FollowOutcome, Self::Error>> + Send + '_;

  /// Remove the edge. A missing edge is success with `unfollowed = false`.
  fn unfollow(
    &self,
    follower_id: Uuid,
    target_id: Uuid,
  ) -> impl Future<Output = Result<UnfollowOutcome, Self::Error>> + Send + '_;

  fn followers_of(
    &self,
    actor_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Connection>, Self::Error>> + Send + '_;

  fn following_of(
    &self,
    actor_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Connection>, Self::Error>> + Send + '_;

  fn follow_stats(
    &self,
    actor_id: Uuid,
  ) -> impl Future<Output = Result<FollowStats, Self::Error>> + Send + '_;

  /// Actors not yet followed (and not self), ranked by total connections
  /// descending, capped at `limit`.
  fn suggestions_for(
    &self,
    actor_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Suggestion>, Self::Error>> + Send + '_;

  // ── Posts & engagement ────────────────────────────────────────────────

  fn create_post(
    &self,
    author_id: Uuid,
    content: String,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// The public feed, newest first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn posts_by(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Author-only content replacement.
  fn update_post<'a>(
    &'a self,
    post_id: Uuid,
    actor: &'a Actor,
    content: String,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + 'a;

  /// Author-only removal; likes and comments go with the post.
  fn delete_post<'a>(
    &'a self,
    post_id: Uuid,
    actor: &'a Actor,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Idempotent like: the counter moves only when the edge is new.
  fn like_post(
    &self,
    actor_id: Uuid,
    post_id: Uuid,
  ) -> impl Future<Output = Result<LikeOutcome, Self::Error>> + Send + '_;

  /// Idempotent unlike: the counter moves only when an edge was removed.
  fn unlike_post(
    &self,
    actor_id: Uuid,
    post_id: Uuid,
  ) -> impl Future<Output = Result<UnlikeOutcome, Self::Error>> + Send + '_;

  /// Add a comment and bump the post's comment count in the same
  /// transaction.
  fn add_comment(
    &self,
    post_id: Uuid,
    author_id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Remove a comment (author or post owner only) and drop the count in the
  /// same transaction.
  fn delete_comment<'a>(
    &'a self,
    comment_id: Uuid,
    actor: &'a Actor,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn comments_for_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create or replace an actor's profile. The profile kind must match the
  /// actor's role tag.
  fn upsert_profile(
    &self,
    actor_id: Uuid,
    profile: Profile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn profile_of(
    &self,
    actor_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;
}
