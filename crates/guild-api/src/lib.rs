//! JSON REST API for the Guild job portal.
//!
//! Exposes an axum [`Router`] backed by any [`guild_core::store::PortalStore`]
//! and any [`guild_core::notify::Notifier`]. TLS and transport concerns are
//! the caller's responsibility.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod notify;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch, post},
};
use guild_core::{notify::Notifier, store::PortalStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use handlers::{accounts, applications, follows, jobs, posts, profiles};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, N> {
  pub store:    Arc<S>,
  pub notifier: Arc<N>,
}

// A manual impl keeps Clone free of `S: Clone` / `N: Clone` bounds.
impl<S, N> Clone for AppState<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S, N>(state: AppState<S, N>) -> Router
where
  S: PortalStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  N: Notifier + Send + Sync + 'static,
{
  Router::new()
    // Accounts
    .route("/auth/register", post(accounts::register::<S, N>))
    .route("/auth/login", post(accounts::login::<S, N>))
    .route("/auth/logout", post(accounts::logout::<S, N>))
    .route("/auth/verify-otp", post(accounts::verify_otp::<S, N>))
    .route("/auth/resend-otp", post(accounts::resend_otp::<S, N>))
    .route("/auth/forgot-password", post(accounts::forgot_password::<S, N>))
    .route("/auth/reset-password", post(accounts::reset_password::<S, N>))
    .route("/auth/change-password", post(accounts::change_password::<S, N>))
    .route("/auth/role", patch(accounts::update_role::<S, N>))
    // Jobs
    .route("/jobs", get(jobs::list::<S, N>).post(jobs::create::<S, N>))
    .route(
      "/jobs/{id}",
      get(jobs::get_one::<S, N>)
        .patch(jobs::update_one::<S, N>)
        .delete(jobs::delete_one::<S, N>),
    )
    .route("/jobs/{id}/activate", post(jobs::activate::<S, N>))
    .route("/jobs/{id}/deactivate", post(jobs::deactivate::<S, N>))
    // Applications
    .route("/jobs/{id}/apply", post(applications::apply::<S, N>))
    .route("/jobs/{id}/applicants", get(applications::applicants::<S, N>))
    .route("/applications/{id}", get(applications::get_one::<S, N>))
    .route(
      "/applications/{id}/status",
      patch(applications::set_status::<S, N>),
    )
    // Follow graph
    .route("/actors/{id}/follow", post(follows::follow::<S, N>))
    .route("/actors/{id}/unfollow", axum::routing::delete(follows::unfollow::<S, N>))
    // Posts & engagement
    .route("/posts", get(posts::list::<S, N>).post(posts::create::<S, N>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<S, N>)
        .patch(posts::update_one::<S, N>)
        .delete(posts::delete_one::<S, N>),
    )
    .route("/posts/{id}/like", post(posts::like::<S, N>))
    .route("/posts/{id}/unlike", post(posts::unlike::<S, N>))
    .route(
      "/posts/{id}/comments",
      get(posts::comments::<S, N>).post(posts::add_comment::<S, N>),
    )
    .route(
      "/comments/{id}",
      axum::routing::delete(posts::delete_comment::<S, N>),
    )
    // Profiles
    .route("/actors/{id}/profile", get(profiles::get_of_actor::<S, N>))
    .route(
      "/my/profile",
      get(profiles::get_mine::<S, N>).put(profiles::put_mine::<S, N>),
    )
    // Self-serve reads
    .route("/my/posted-jobs", get(jobs::my_posted::<S, N>))
    .route("/my/applied-jobs", get(applications::my_applied::<S, N>))
    .route("/my/job-stats", get(jobs::stats::<S, N>))
    .route(
      "/my/application-stats",
      get(applications::status_stats::<S, N>),
    )
    .route("/my/permissions", get(accounts::permissions::<S, N>))
    .route("/my/followers", get(follows::my_followers::<S, N>))
    .route("/my/following", get(follows::my_following::<S, N>))
    .route("/my/suggestions", get(follows::suggestions::<S, N>))
    .route("/my/posts", get(posts::my_posts::<S, N>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
