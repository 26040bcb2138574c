//! SQLite backend for the Guild portal store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Uniqueness invariants (one
//! application per applicant per job, one like per actor per post, one edge
//! per follower pair) are enforced by the schema; denormalized counters move
//! in the same transaction as the rows they track.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
