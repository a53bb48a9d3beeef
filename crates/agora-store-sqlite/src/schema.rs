//! SQL schema for the agora SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Corpus tables are read-mostly; ids come from the source dataset.
CREATE TABLE IF NOT EXISTS cases (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    url         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS methods (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    url         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chat_sessions (
    session_id  TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    title       TEXT,            -- set once, from the first recorded query
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Turns are insert-only; only the feedback column is ever updated.
CREATE TABLE IF NOT EXISTS chat_histories (
    turn_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id  TEXT NOT NULL REFERENCES chat_sessions(session_id) ON DELETE CASCADE,
    query       TEXT NOT NULL,
    response    TEXT NOT NULL,   -- ResolutionResult JSON, stored verbatim
    feedback    TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_title_idx            ON cases(title);
CREATE INDEX IF NOT EXISTS cases_description_idx      ON cases(description);
CREATE INDEX IF NOT EXISTS methods_title_idx          ON methods(title);
CREATE INDEX IF NOT EXISTS methods_description_idx    ON methods(description);
CREATE INDEX IF NOT EXISTS chat_sessions_user_idx     ON chat_sessions(user_id);
CREATE INDEX IF NOT EXISTS chat_histories_session_idx ON chat_histories(session_id);

PRAGMA user_version = 1;
";
