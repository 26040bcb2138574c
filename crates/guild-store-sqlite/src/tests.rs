//! Integration tests for `SqliteStore` against an in-memory database.

use guild_core::{
  actor::{Actor, NewActor, Role},
  application::{ApplicationStatus, NewApplication},
  job::{ExperienceLevel, JobFilter, JobType, NewJob, WorkMode},
  policy::DenyReason,
  profile::Profile,
  store::PortalStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn actor(s: &SqliteStore, email: &str, role: Role) -> Actor {
  s.create_actor(NewActor {
    email:         email.into(),
    password_hash: "$argon2id$stub".into(),
    first_name:    "Test".into(),
    last_name:     "User".into(),
    role,
    otp:           "123456".into(),
  })
  .await
  .unwrap()
}

fn job_input(title: &str) -> NewJob {
  NewJob {
    title:        title.into(),
    description:  "Build and ship".into(),
    requirements: Some("Rust, SQL, async".into()),
    company_name: "Acme".into(),
    location:     Some("Remote".into()),
    salary:       Some("80k-100k".into()),
    job_type:     JobType::Fulltime,
    work_mode:    WorkMode::Remote,
    experience:   ExperienceLevel::Mid,
  }
}

fn application_input() -> NewApplication {
  NewApplication {
    resume_ref:   "resumes/test.pdf".into(),
    cover_letter: Some("Hello".into()),
  }
}

fn assert_denied(err: Error, reason: DenyReason) {
  match err {
    Error::Core(guild_core::Error::PermissionDenied(r)) => {
      assert_eq!(r, reason)
    }
    other => panic!("expected PermissionDenied({reason}), got {other:?}"),
  }
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_actor() {
  let s = store().await;

  let created = actor(&s, "ada@example.com", Role::Employee).await;
  assert!(!created.verified);

  let by_id = s.get_actor(created.actor_id).await.unwrap().unwrap();
  assert_eq!(by_id.email, "ada@example.com");
  assert_eq!(by_id.role, Role::Employee);

  let by_email = s
    .get_actor_by_email("ada@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_email.actor_id, created.actor_id);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  actor(&s, "dup@example.com", Role::Employee).await;

  let err = s
    .create_actor(NewActor {
      email:         "dup@example.com".into(),
      password_hash: "$argon2id$stub".into(),
      first_name:    "Other".into(),
      last_name:     "User".into(),
      role:          Role::Employer,
      otp:           "654321".into(),
    })
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    Error::Core(guild_core::Error::EmailTaken(email)) if email == "dup@example.com"
  ));
}

#[tokio::test]
async fn otp_verification_round_trip() {
  let s = store().await;
  let a = actor(&s, "otp@example.com", Role::Employee).await;

  assert_eq!(s.otp_of(a.actor_id).await.unwrap().as_deref(), Some("123456"));

  let verified = s.mark_verified(a.actor_id).await.unwrap();
  assert!(verified.verified);
  assert_eq!(s.otp_of(a.actor_id).await.unwrap(), None);
}

#[tokio::test]
async fn role_is_mutable_post_creation() {
  let s = store().await;
  let a = actor(&s, "promote@example.com", Role::Employee).await;

  let updated = s.set_role(a.actor_id, Role::Employer).await.unwrap();
  assert_eq!(updated.role, Role::Employer);
}

#[tokio::test]
async fn session_resolves_to_actor() {
  let s = store().await;
  let a = actor(&s, "login@example.com", Role::Employee).await;

  s.create_session("deadbeef".into(), a.actor_id).await.unwrap();
  let resolved = s.actor_for_session("deadbeef".into()).await.unwrap();
  assert_eq!(resolved.unwrap().actor_id, a.actor_id);

  s.delete_session("deadbeef".into()).await.unwrap();
  assert!(s.actor_for_session("deadbeef".into()).await.unwrap().is_none());
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_job() {
  let s = store().await;
  let publisher = actor(&s, "employer@example.com", Role::Employer).await;

  let job = s.create_job(&publisher, job_input("Backend Engineer")).await.unwrap();
  assert!(job.is_active);
  assert_eq!(job.application_count, 0);
  assert_eq!(job.publisher_role, Role::Employer);

  let fetched = s.get_job(job.job_id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Backend Engineer");
}

#[tokio::test]
async fn update_job_is_publisher_only() {
  let s = store().await;
  let publisher = actor(&s, "owner@example.com", Role::Employer).await;
  let stranger = actor(&s, "stranger@example.com", Role::Employer).await;

  let job = s.create_job(&publisher, job_input("Role")).await.unwrap();

  let err = s
    .update_job(
      job.job_id,
      &stranger,
      guild_core::job::JobUpdate {
        title: Some("Hijacked".into()),
        ..Default::default()
      },
    )
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::NotPublisher);

  let updated = s
    .update_job(
      job.job_id,
      &publisher,
      guild_core::job::JobUpdate {
        title: Some("Senior Role".into()),
        ..Default::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(updated.title, "Senior Role");
}

#[tokio::test]
async fn soft_delete_hides_job_and_blocks_reactivation() {
  let s = store().await;
  let publisher = actor(&s, "del@example.com", Role::Company).await;

  let job = s.create_job(&publisher, job_input("Gone Soon")).await.unwrap();
  s.soft_delete_job(job.job_id, &publisher).await.unwrap();

  assert!(s.get_job(job.job_id).await.unwrap().is_none());
  assert!(s.list_jobs(&JobFilter::default()).await.unwrap().is_empty());

  // A deleted posting never comes back.
  let err = s
    .set_job_active(job.job_id, &publisher, true)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(guild_core::Error::JobNotFound(_))
  ));
}

#[tokio::test]
async fn deactivate_hides_from_listing_but_not_from_get() {
  let s = store().await;
  let publisher = actor(&s, "toggle@example.com", Role::Employer).await;

  let job = s.create_job(&publisher, job_input("On and Off")).await.unwrap();
  s.set_job_active(job.job_id, &publisher, false).await.unwrap();

  assert!(s.list_jobs(&JobFilter::default()).await.unwrap().is_empty());
  let fetched = s.get_job(job.job_id).await.unwrap().unwrap();
  assert!(!fetched.is_active);

  s.set_job_active(job.job_id, &publisher, true).await.unwrap();
  assert_eq!(s.list_jobs(&JobFilter::default()).await.unwrap().len(), 1);
}

// ─── Filter engine ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_jobs_newest_first() {
  let s = store().await;
  let publisher = actor(&s, "lister@example.com", Role::Employer).await;

  s.create_job(&publisher, job_input("First")).await.unwrap();
  s.create_job(&publisher, job_input("Second")).await.unwrap();
  s.create_job(&publisher, job_input("Third")).await.unwrap();

  let jobs = s.list_jobs(&JobFilter::default()).await.unwrap();
  let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
  assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn filters_compose_conjunctively() {
  let s = store().await;
  let publisher = actor(&s, "filters@example.com", Role::Company).await;

  s.create_job(&publisher, job_input("Remote Fulltime")).await.unwrap();

  let mut onsite = job_input("Onsite Fulltime");
  onsite.location = Some("Berlin".into());
  s.create_job(&publisher, onsite).await.unwrap();

  let mut intern = job_input("Remote Intern");
  intern.job_type = JobType::Intern;
  s.create_job(&publisher, intern).await.unwrap();

  let jobs = s
    .list_jobs(&JobFilter {
      job_type: Some(JobType::Fulltime),
      location: Some("Remote".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(jobs.len(), 1);
  assert_eq!(jobs[0].title, "Remote Fulltime");
}

#[tokio::test]
async fn title_filter_is_case_insensitive_substring() {
  let s = store().await;
  let publisher = actor(&s, "title@example.com", Role::Employer).await;

  s.create_job(&publisher, job_input("Senior Backend Engineer")).await.unwrap();
  s.create_job(&publisher, job_input("Designer")).await.unwrap();

  let jobs = s
    .list_jobs(&JobFilter {
      title: Some("backend".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(jobs.len(), 1);
  assert_eq!(jobs[0].title, "Senior Backend Engineer");
}

#[tokio::test]
async fn skills_filter_requires_every_term() {
  let s = store().await;
  let publisher = actor(&s, "skills@example.com", Role::Employer).await;

  // requirements: "Rust, SQL, async"
  s.create_job(&publisher, job_input("Match")).await.unwrap();

  let mut other = job_input("No SQL");
  other.requirements = Some("Rust only".into());
  s.create_job(&publisher, other).await.unwrap();

  let jobs = s
    .list_jobs(&JobFilter {
      skills: Some("rust, sql".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(jobs.len(), 1);
  assert_eq!(jobs[0].title, "Match");
}

#[tokio::test]
async fn posted_within_days_cutoff() {
  let s = store().await;
  let publisher = actor(&s, "fresh@example.com", Role::Employer).await;
  s.create_job(&publisher, job_input("Fresh")).await.unwrap();

  let within_week = s
    .list_jobs(&JobFilter {
      posted_within_days: Some(7),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(within_week.len(), 1);

  // A zero-day window cuts off at "now", excluding everything already
  // created.
  let none = s
    .list_jobs(&JobFilter {
      posted_within_days: Some(0),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn salary_filter_is_substring_heuristic() {
  let s = store().await;
  let publisher = actor(&s, "salary@example.com", Role::Employer).await;

  // salary: "80k-100k"
  s.create_job(&publisher, job_input("Paid")).await.unwrap();

  let hit = s
    .list_jobs(&JobFilter {
      salary_min: Some("80k".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(hit.len(), 1);

  let miss = s
    .list_jobs(&JobFilter {
      salary_min: Some("200k".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(miss.is_empty());
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_creates_submitted_and_bumps_count() {
  let s = store().await;
  let publisher = actor(&s, "emp@example.com", Role::Employer).await;
  let applicant = actor(&s, "dev@example.com", Role::Employee).await;

  let job = s.create_job(&publisher, job_input("Open Role")).await.unwrap();
  let application = s
    .apply_to_job(&applicant, job.job_id, application_input())
    .await
    .unwrap();

  assert_eq!(application.status, ApplicationStatus::Submitted);
  assert_eq!(application.applicant_id, applicant.actor_id);

  let job = s.get_job(job.job_id).await.unwrap().unwrap();
  assert_eq!(job.application_count, 1);
}

#[tokio::test]
async fn second_apply_conflicts_and_count_stays_at_one() {
  let s = store().await;
  let publisher = actor(&s, "emp2@example.com", Role::Employer).await;
  let applicant = actor(&s, "dev2@example.com", Role::Employee).await;

  let job = s.create_job(&publisher, job_input("Once Only")).await.unwrap();
  s.apply_to_job(&applicant, job.job_id, application_input())
    .await
    .unwrap();

  let err = s
    .apply_to_job(&applicant, job.job_id, application_input())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(guild_core::Error::AlreadyApplied)
  ));

  let job = s.get_job(job.job_id).await.unwrap().unwrap();
  assert_eq!(job.application_count, 1);
}

#[tokio::test]
async fn company_cannot_apply() {
  let s = store().await;
  let publisher = actor(&s, "emp3@example.com", Role::Employer).await;
  let company = actor(&s, "corp@example.com", Role::Company).await;

  let job = s.create_job(&publisher, job_input("Role")).await.unwrap();
  let err = s
    .apply_to_job(&company, job.job_id, application_input())
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::CompanyRole);
}

#[tokio::test]
async fn cannot_apply_to_own_or_inactive_job() {
  let s = store().await;
  let publisher = actor(&s, "own@example.com", Role::Employer).await;
  let applicant = actor(&s, "appl@example.com", Role::Employee).await;

  let job = s.create_job(&publisher, job_input("Mine")).await.unwrap();
  let err = s
    .apply_to_job(&publisher, job.job_id, application_input())
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::OwnJob);

  s.set_job_active(job.job_id, &publisher, false).await.unwrap();
  let err = s
    .apply_to_job(&applicant, job.job_id, application_input())
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::InactiveJob);
}

#[tokio::test]
async fn status_updates_are_publisher_gated() {
  let s = store().await;
  let publisher = actor(&s, "pub@example.com", Role::Employer).await;
  let applicant = actor(&s, "cand@example.com", Role::Employee).await;
  let other = actor(&s, "other@example.com", Role::Employer).await;

  let job = s.create_job(&publisher, job_input("Pipeline")).await.unwrap();
  let application = s
    .apply_to_job(&applicant, job.job_id, application_input())
    .await
    .unwrap();

  let updated = s
    .set_application_status(
      application.application_id,
      ApplicationStatus::Shortlisted,
      &publisher,
    )
    .await
    .unwrap();
  assert_eq!(updated.status, ApplicationStatus::Shortlisted);

  let err = s
    .set_application_status(
      application.application_id,
      ApplicationStatus::Hired,
      &other,
    )
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::NotPublisher);

  // Permissive transitions: a terminal status can be walked back.
  s.set_application_status(
    application.application_id,
    ApplicationStatus::Rejected,
    &publisher,
  )
  .await
  .unwrap();
  let back = s
    .set_application_status(
      application.application_id,
      ApplicationStatus::Reviewing,
      &publisher,
    )
    .await
    .unwrap();
  assert_eq!(back.status, ApplicationStatus::Reviewing);
}

#[tokio::test]
async fn applicant_listing_is_publisher_only() {
  let s = store().await;
  let publisher = actor(&s, "list@example.com", Role::Company).await;
  let applicant = actor(&s, "seeker@example.com", Role::Employee).await;
  let stranger = actor(&s, "nosy@example.com", Role::Employer).await;

  let job = s.create_job(&publisher, job_input("Popular")).await.unwrap();
  s.apply_to_job(&applicant, job.job_id, application_input())
    .await
    .unwrap();

  let listed = s
    .applications_for_job(job.job_id, &publisher)
    .await
    .unwrap();
  assert_eq!(listed.len(), 1);

  let err = s
    .applications_for_job(job.job_id, &stranger)
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::NotPublisher);
}

#[tokio::test]
async fn status_stats_count_per_discriminant() {
  let s = store().await;
  let publisher = actor(&s, "stats@example.com", Role::Employer).await;
  let a = actor(&s, "a@example.com", Role::Employee).await;
  let b = actor(&s, "b@example.com", Role::Employee).await;

  let job = s.create_job(&publisher, job_input("Stats")).await.unwrap();
  let app_a = s
    .apply_to_job(&a, job.job_id, application_input())
    .await
    .unwrap();
  s.apply_to_job(&b, job.job_id, application_input())
    .await
    .unwrap();

  s.set_application_status(
    app_a.application_id,
    ApplicationStatus::Hired,
    &publisher,
  )
  .await
  .unwrap();

  let stats = s
    .application_status_stats(publisher.actor_id)
    .await
    .unwrap();
  assert_eq!(stats.submitted, 1);
  assert_eq!(stats.hired, 1);
  assert_eq!(stats.reviewing, 0);
}

// ─── Follow graph ────────────────────────────────────────────────────────────

#[tokio::test]
async fn self_follow_is_rejected() {
  let s = store().await;
  let a = actor(&s, "self@example.com", Role::Employee).await;

  let err = s.follow(a.actor_id, a.actor_id).await.unwrap_err();
  assert!(matches!(err, Error::Core(guild_core::Error::SelfFollow)));
}

#[tokio::test]
async fn follow_unfollow_round_trip_with_idempotence() {
  let s = store().await;
  let a = actor(&s, "alice@example.com", Role::Employee).await;
  let b = actor(&s, "bob@example.com", Role::Employer).await;

  let out = s.follow(a.actor_id, b.actor_id).await.unwrap();
  assert!(out.followed);
  assert_eq!(out.stats.followers, 1);

  let a_stats = s.follow_stats(a.actor_id).await.unwrap();
  assert_eq!(a_stats.following, 1);
  assert_eq!(a_stats.followers, 0);

  // Re-follow: success, nothing moves.
  let again = s.follow(a.actor_id, b.actor_id).await.unwrap();
  assert!(!again.followed);
  assert_eq!(again.stats.followers, 1);

  let out = s.unfollow(a.actor_id, b.actor_id).await.unwrap();
  assert!(out.unfollowed);
  assert_eq!(out.stats.followers, 0);
  assert_eq!(s.follow_stats(a.actor_id).await.unwrap().following, 0);

  // Unfollow with no edge: success, not an error.
  let again = s.unfollow(a.actor_id, b.actor_id).await.unwrap();
  assert!(!again.unfollowed);
  assert_eq!(again.stats.followers, 0);
}

#[tokio::test]
async fn follow_unknown_target_is_not_found() {
  let s = store().await;
  let a = actor(&s, "lonely@example.com", Role::Employee).await;

  let err = s.follow(a.actor_id, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(guild_core::Error::ActorNotFound(_))
  ));
}

#[tokio::test]
async fn follower_and_following_listings() {
  let s = store().await;
  let a = actor(&s, "f1@example.com", Role::Employee).await;
  let b = actor(&s, "f2@example.com", Role::Employer).await;
  let c = actor(&s, "f3@example.com", Role::Company).await;

  s.follow(a.actor_id, c.actor_id).await.unwrap();
  s.follow(b.actor_id, c.actor_id).await.unwrap();
  s.follow(c.actor_id, a.actor_id).await.unwrap();

  let followers = s.followers_of(c.actor_id).await.unwrap();
  let ids: Vec<_> = followers.iter().map(|f| f.actor.actor_id).collect();
  assert_eq!(followers.len(), 2);
  assert!(ids.contains(&a.actor_id));
  assert!(ids.contains(&b.actor_id));

  let following = s.following_of(c.actor_id).await.unwrap();
  assert_eq!(following.len(), 1);
  assert_eq!(following[0].actor.actor_id, a.actor_id);
}

#[tokio::test]
async fn connection_display_name_uses_company_profile() {
  let s = store().await;
  let follower = actor(&s, "fan@example.com", Role::Employee).await;
  let company = actor(&s, "brand@example.com", Role::Company).await;

  s.upsert_profile(
    company.actor_id,
    Profile::Company {
      company_name: "Acme Robotics".into(),
      website:      None,
      about:        None,
    },
  )
  .await
  .unwrap();

  s.follow(follower.actor_id, company.actor_id).await.unwrap();

  let following = s.following_of(follower.actor_id).await.unwrap();
  assert_eq!(following[0].display_name(), "Acme Robotics");
}

#[tokio::test]
async fn suggestions_exclude_self_and_followed_ranked_by_connections() {
  let s = store().await;
  let viewer = actor(&s, "viewer@example.com", Role::Employee).await;
  let x = actor(&s, "x@example.com", Role::Employee).await;
  let y = actor(&s, "y@example.com", Role::Employer).await;
  let z = actor(&s, "z@example.com", Role::Company).await;

  // y is the best-connected: followed by x and z.
  s.follow(x.actor_id, y.actor_id).await.unwrap();
  s.follow(z.actor_id, y.actor_id).await.unwrap();

  let suggestions = s.suggestions_for(viewer.actor_id, 10).await.unwrap();
  let ids: Vec<_> =
    suggestions.iter().map(|sug| sug.actor.actor_id).collect();

  assert!(!ids.contains(&viewer.actor_id));
  assert_eq!(ids[0], y.actor_id);
  assert_eq!(suggestions[0].connections, 2);

  // Following y removes them from the pool.
  s.follow(viewer.actor_id, y.actor_id).await.unwrap();
  let suggestions = s.suggestions_for(viewer.actor_id, 10).await.unwrap();
  assert!(
    !suggestions
      .iter()
      .any(|sug| sug.actor.actor_id == y.actor_id)
  );

  // The cap applies after ranking.
  let capped = s.suggestions_for(viewer.actor_id, 1).await.unwrap();
  assert_eq!(capped.len(), 1);
}

// ─── Posts & engagement ──────────────────────────────────────────────────────

#[tokio::test]
async fn posts_list_newest_first() {
  let s = store().await;
  let a = actor(&s, "poster@example.com", Role::Employee).await;

  s.create_post(a.actor_id, "first".into()).await.unwrap();
  s.create_post(a.actor_id, "second".into()).await.unwrap();

  let posts = s.list_posts().await.unwrap();
  let contents: Vec<_> = posts.iter().map(|p| p.content.as_str()).collect();
  assert_eq!(contents, vec!["second", "first"]);
}

#[tokio::test]
async fn like_is_idempotent() {
  let s = store().await;
  let author = actor(&s, "author@example.com", Role::Employee).await;
  let fan = actor(&s, "fan2@example.com", Role::Employer).await;

  let post = s.create_post(author.actor_id, "hello".into()).await.unwrap();

  let out = s.like_post(fan.actor_id, post.post_id).await.unwrap();
  assert!(out.liked);
  assert_eq!(out.likes_count, 1);

  // Second like: no-op, count untouched.
  let out = s.like_post(fan.actor_id, post.post_id).await.unwrap();
  assert!(!out.liked);
  assert_eq!(out.likes_count, 1);
}

#[tokio::test]
async fn unlike_is_idempotent() {
  let s = store().await;
  let author = actor(&s, "author2@example.com", Role::Employee).await;
  let fan = actor(&s, "fan3@example.com", Role::Employee).await;

  let post = s.create_post(author.actor_id, "bye".into()).await.unwrap();

  // Unliking before ever liking is success, not an error.
  let out = s.unlike_post(fan.actor_id, post.post_id).await.unwrap();
  assert!(!out.unliked);
  assert_eq!(out.likes_count, 0);

  s.like_post(fan.actor_id, post.post_id).await.unwrap();
  let out = s.unlike_post(fan.actor_id, post.post_id).await.unwrap();
  assert!(out.unliked);
  assert_eq!(out.likes_count, 0);
}

#[tokio::test]
async fn comments_maintain_post_counter() {
  let s = store().await;
  let author = actor(&s, "op@example.com", Role::Employee).await;
  let commenter = actor(&s, "reply@example.com", Role::Employer).await;

  let post = s.create_post(author.actor_id, "thoughts?".into()).await.unwrap();

  let comment = s
    .add_comment(post.post_id, commenter.actor_id, "nice".into())
    .await
    .unwrap();
  s.add_comment(post.post_id, author.actor_id, "thanks".into())
    .await
    .unwrap();

  let post_now = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(post_now.comments_count, 2);

  s.delete_comment(comment.comment_id, &commenter).await.unwrap();
  let post_now = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(post_now.comments_count, 1);
}

#[tokio::test]
async fn comment_deletion_rights() {
  let s = store().await;
  let post_owner = actor(&s, "owner2@example.com", Role::Employee).await;
  let commenter = actor(&s, "talker@example.com", Role::Employee).await;
  let stranger = actor(&s, "lurker@example.com", Role::Employee).await;

  let post = s
    .create_post(post_owner.actor_id, "open thread".into())
    .await
    .unwrap();
  let comment = s
    .add_comment(post.post_id, commenter.actor_id, "hot take".into())
    .await
    .unwrap();

  let err = s
    .delete_comment(comment.comment_id, &stranger)
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::NotAuthor);

  // The post owner can moderate comments under their post.
  s.delete_comment(comment.comment_id, &post_owner).await.unwrap();
  assert!(s.comments_for_post(post.post_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn post_edit_and_delete_are_author_only() {
  let s = store().await;
  let author = actor(&s, "mine@example.com", Role::Employee).await;
  let other = actor(&s, "notmine@example.com", Role::Employee).await;

  let post = s.create_post(author.actor_id, "draft".into()).await.unwrap();

  let err = s
    .update_post(post.post_id, &other, "vandalised".into())
    .await
    .unwrap_err();
  assert_denied(err, DenyReason::NotAuthor);

  let err = s.delete_post(post.post_id, &other).await.unwrap_err();
  assert_denied(err, DenyReason::NotAuthor);

  s.delete_post(post.post_id, &author).await.unwrap();
  assert!(s.get_post(post.post_id).await.unwrap().is_none());
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_upsert_and_fetch() {
  let s = store().await;
  let a = actor(&s, "person@example.com", Role::Employee).await;

  s.upsert_profile(
    a.actor_id,
    Profile::Person {
      phone:    Some("+1 555 0100".into()),
      headline: Some("Rustacean".into()),
      location: None,
    },
  )
  .await
  .unwrap();

  let profile = s.profile_of(a.actor_id).await.unwrap().unwrap();
  assert!(matches!(
    profile,
    Profile::Person { ref headline, .. } if headline.as_deref() == Some("Rustacean")
  ));

  // Replacing is an upsert, not a second row.
  s.upsert_profile(
    a.actor_id,
    Profile::Person {
      phone:    None,
      headline: Some("Engineer".into()),
      location: Some("Lisbon".into()),
    },
  )
  .await
  .unwrap();
  let profile = s.profile_of(a.actor_id).await.unwrap().unwrap();
  assert!(matches!(
    profile,
    Profile::Person { ref headline, .. } if headline.as_deref() == Some("Engineer")
  ));
}

#[tokio::test]
async fn profile_kind_must_match_role() {
  let s = store().await;
  let a = actor(&s, "mismatch@example.com", Role::Employee).await;

  let err = s
    .upsert_profile(
      a.actor_id,
      Profile::Company {
        company_name: "Shadow Corp".into(),
        website:      None,
        about:        None,
      },
    )
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(guild_core::Error::ProfileKindMismatch)
  ));
}
