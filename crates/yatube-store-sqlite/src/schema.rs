//! SQL schema for the Yatube SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- argon2 PHC string
    date_joined   TEXT NOT NULL       -- RFC 3339 UTC, fixed-width micros
);

CREATE TABLE IF NOT EXISTS post_groups (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

-- author_id is written once by INSERT and never updated.
CREATE TABLE IF NOT EXISTS posts (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    text      TEXT NOT NULL,
    pub_date  TEXT NOT NULL,          -- server-assigned
    author_id INTEGER NOT NULL REFERENCES users(id),
    group_id  INTEGER REFERENCES post_groups(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,      -- hex SHA-256 of the cookie token
    user_id    INTEGER NOT NULL REFERENCES users(id),
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_pub_date_idx ON posts(pub_date DESC, id DESC);
CREATE INDEX IF NOT EXISTS posts_author_idx   ON posts(author_id);
CREATE INDEX IF NOT EXISTS posts_group_idx    ON posts(group_id);

PRAGMA user_version = 1;
";
