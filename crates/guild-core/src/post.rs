//! Posts, likes, and comments — the social feed.
//!
//! `likes_count` and `comments_count` are denormalized counters. They move
//! only inside the same storage transaction as the edge or row they count,
//! and always by relative update, so concurrent likes never double-count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:        Uuid,
  pub author_id:      Uuid,
  pub content:        String,
  pub created_at:     DateTime<Utc>,
  pub likes_count:    i64,
  pub comments_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

/// Result of a like call. `liked` is `false` when the post was already liked
/// by this actor; the count is unchanged in that case.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
  pub liked:       bool,
  pub likes_count: i64,
}

/// Result of an unlike call; the mirror image of [`LikeOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct UnlikeOutcome {
  pub unliked:     bool,
  pub likes_count: i64,
}

/// Reject empty or over-long comment text before it reaches storage.
pub fn validate_comment_text(text: &str) -> crate::Result<()> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Err(crate::Error::Validation("comment text is empty".into()));
  }
  if trimmed.chars().count() > MAX_COMMENT_LEN {
    return Err(crate::Error::Validation(format!(
      "comment text exceeds {MAX_COMMENT_LEN} characters"
    )));
  }
  Ok(())
}

/// Posts must carry content.
pub fn validate_post_content(content: &str) -> crate::Result<()> {
  if content.trim().is_empty() {
    return Err(crate::Error::Validation("post content is empty".into()));
  }
  Ok(())
}
