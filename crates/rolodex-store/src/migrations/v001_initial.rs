//! v001 -- Initial schema creation.
//!
//! Creates the three core tables: `users`, `contacts`, and `sessions`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    email         TEXT NOT NULL UNIQUE,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,              -- salt_hex$hash_hex
    created_at    TEXT NOT NULL               -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Contacts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS contacts (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    fullname   TEXT NOT NULL,
    email      TEXT NOT NULL,
    telephone  TEXT NOT NULL,
    address    TEXT NOT NULL,
    user_id    TEXT NOT NULL,                 -- FK -> users(id), the owner
    is_starred INTEGER NOT NULL DEFAULT 0,    -- boolean 0/1
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_contacts_user_id ON contacts(user_id);
CREATE INDEX IF NOT EXISTS idx_contacts_user_starred
    ON contacts(user_id) WHERE is_starred = 1;

-- ----------------------------------------------------------------
-- Sessions (issued bearer tokens)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY NOT NULL,     -- blake3 hex of the raw token
    user_id    TEXT NOT NULL,                 -- FK -> users(id)
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
