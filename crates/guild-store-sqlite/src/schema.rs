//! SQL schema for the Guild SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS actors (
    actor_id      TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    role          TEXT NOT NULL,   -- 'employee' | 'employer' | 'company'
    verified      INTEGER NOT NULL DEFAULT 0,
    otp           TEXT,            -- pending 6-digit code, NULL once used
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,   -- SHA-256 hex of the bearer token
    actor_id   TEXT NOT NULL REFERENCES actors(actor_id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    job_id            TEXT PRIMARY KEY,
    title             TEXT NOT NULL,
    description       TEXT NOT NULL,
    requirements      TEXT,
    company_name      TEXT NOT NULL,
    location          TEXT,
    salary            TEXT,            -- free text, substring-filtered only
    job_type          TEXT NOT NULL,
    work_mode         TEXT NOT NULL,
    experience        TEXT NOT NULL,
    publisher_id      TEXT NOT NULL REFERENCES actors(actor_id),
    publisher_role    TEXT NOT NULL,   -- snapshot at posting time
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    is_active         INTEGER NOT NULL DEFAULT 1,
    deleted_at        TEXT,            -- soft delete; never cleared
    application_count INTEGER NOT NULL DEFAULT 0
);

-- At most one application per (job, applicant); the index is the arbiter
-- under concurrent applies.
CREATE TABLE IF NOT EXISTS applications (
    application_id TEXT PRIMARY KEY,
    job_id         TEXT NOT NULL REFERENCES jobs(job_id),
    applicant_id   TEXT NOT NULL REFERENCES actors(actor_id),
    status         TEXT NOT NULL DEFAULT 'submitted',
    resume_ref     TEXT NOT NULL,
    cover_letter   TEXT,
    applied_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    UNIQUE (job_id, applicant_id)
);

CREATE TABLE IF NOT EXISTS follows (
    follower_id  TEXT NOT NULL REFERENCES actors(actor_id),
    following_id TEXT NOT NULL REFERENCES actors(actor_id),
    created_at   TEXT NOT NULL,
    PRIMARY KEY (follower_id, following_id),
    CHECK (follower_id != following_id)
);

CREATE TABLE IF NOT EXISTS posts (
    post_id        TEXT PRIMARY KEY,
    author_id      TEXT NOT NULL REFERENCES actors(actor_id),
    content        TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    likes_count    INTEGER NOT NULL DEFAULT 0,
    comments_count INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS likes (
    actor_id   TEXT NOT NULL REFERENCES actors(actor_id),
    post_id    TEXT NOT NULL REFERENCES posts(post_id),
    created_at TEXT NOT NULL,
    PRIMARY KEY (actor_id, post_id)
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(post_id),
    author_id  TEXT NOT NULL REFERENCES actors(actor_id),
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    actor_id     TEXT PRIMARY KEY REFERENCES actors(actor_id),
    kind         TEXT NOT NULL,   -- 'person' | 'company'
    profile_json TEXT NOT NULL,   -- JSON payload (inner data only)
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS jobs_publisher_idx      ON jobs(publisher_id);
CREATE INDEX IF NOT EXISTS jobs_created_idx        ON jobs(created_at);
CREATE INDEX IF NOT EXISTS applications_job_idx    ON applications(job_id);
CREATE INDEX IF NOT EXISTS applications_by_idx     ON applications(applicant_id);
CREATE INDEX IF NOT EXISTS follows_following_idx   ON follows(following_id);
CREATE INDEX IF NOT EXISTS posts_author_idx        ON posts(author_id);
CREATE INDEX IF NOT EXISTS likes_post_idx          ON likes(post_id);
CREATE INDEX IF NOT EXISTS comments_post_idx       ON comments(post_id);
CREATE INDEX IF NOT EXISTS sessions_actor_idx      ON sessions(actor_id);

PRAGMA user_version = 1;
";
