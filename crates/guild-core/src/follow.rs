//! The follow graph — directed edges between actors.
//!
//! Edges are unique per ordered pair and an actor never follows itself; both
//! invariants are enforced by storage constraints, not application locks.
//! Follow and unfollow are idempotent: repeating either returns success with
//! the current stats rather than an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{actor::Actor, profile::Profile};

/// A directed edge: `follower_id` follows `following_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
  pub follower_id:  Uuid,
  pub following_id: Uuid,
  pub created_at:   DateTime<Utc>,
}

/// Edge counts for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowStats {
  pub followers: i64,
  pub following: i64,
}

/// Result of a follow call. `followed` is `false` when the edge already
/// existed.
#[derive(Debug, Clone, Serialize)]
pub struct FollowOutcome {
  pub followed: bool,
  pub stats:    FollowStats,
}

/// Result of an unfollow call. `unfollowed` is `false` when there was no
/// edge to remove.
#[derive(Debug, Clone, Serialize)]
pub struct UnfollowOutcome {
  pub unfollowed: bool,
  pub stats:      FollowStats,
}

/// One entry in a followers/following listing: the actor plus their profile,
/// so callers can resolve a display name without a second lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
  pub actor:   Actor,
  pub profile: Option<Profile>,
}

impl Connection {
  pub fn display_name(&self) -> String {
    crate::profile::display_name(&self.actor, self.profile.as_ref())
  }
}

/// A follow suggestion: an actor not yet followed, ranked by how connected
/// they already are.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
  pub actor:       Actor,
  pub profile:     Option<Profile>,
  /// followers + following at ranking time.
  pub connections: i64,
}
