//! Core types and trait definitions for the Guild job portal.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actor;
pub mod application;
pub mod error;
pub mod follow;
pub mod job;
pub mod notify;
pub mod policy;
pub mod post;
pub mod profile;
pub mod store;

pub use error::{Error, Result};
