//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// Schema setup. Foreign keys are off by default in SQLite and must be
/// enabled per connection for the users cascade to fire.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS organisations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    slug TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    is_active INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    organisation_id TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    is_active INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (organisation_id, email),
    FOREIGN KEY (organisation_id) REFERENCES organisations(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_users_organisation_id ON users(organisation_id);
"#;

// Organisation queries
pub const UPSERT_ORGANISATION: &str = r#"
INSERT INTO organisations (id, name, slug, email, is_active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
    name = excluded.name,
    slug = excluded.slug,
    email = excluded.email,
    is_active = excluded.is_active,
    updated_at = excluded.updated_at
"#;

pub const SELECT_ORGANISATIONS: &str = r#"
SELECT id, name, slug, email, is_active, created_at, updated_at
FROM organisations
ORDER BY name
"#;

pub const SELECT_ORGANISATION_IDS: &str = "SELECT id FROM organisations";

pub const SELECT_ORGANISATION_BY_ID: &str = r#"
SELECT id, name, slug, email, is_active, created_at, updated_at
FROM organisations
WHERE id = ?1
"#;

pub const SELECT_ORGANISATION_BY_SLUG: &str = r#"
SELECT id, name, slug, email, is_active, created_at, updated_at
FROM organisations
WHERE slug = ?1
"#;

pub const SELECT_ORGANISATION_BY_NAME: &str = r#"
SELECT id, name, slug, email, is_active, created_at, updated_at
FROM organisations
WHERE name = ?1
"#;

pub const ORGANISATION_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM organisations WHERE id = ?1)";

pub const DELETE_ORGANISATION: &str = "DELETE FROM organisations WHERE id = ?1";

// User queries
pub const UPSERT_USER: &str = r#"
INSERT INTO users (id, organisation_id, first_name, last_name, email, is_active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
ON CONFLICT(id) DO UPDATE SET
    first_name = excluded.first_name,
    last_name = excluded.last_name,
    email = excluded.email,
    is_active = excluded.is_active,
    updated_at = excluded.updated_at
"#;

pub const SELECT_USERS_BY_ORGANISATION: &str = r#"
SELECT id, organisation_id, first_name, last_name, email, is_active, created_at, updated_at
FROM users
WHERE organisation_id = ?1
ORDER BY last_name, first_name
"#;

pub const SELECT_USER_IDS_BY_ORGANISATION: &str =
    "SELECT id FROM users WHERE organisation_id = ?1";

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, organisation_id, first_name, last_name, email, is_active, created_at, updated_at
FROM users
WHERE organisation_id = ?1 AND id = ?2
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, organisation_id, first_name, last_name, email, is_active, created_at, updated_at
FROM users
WHERE organisation_id = ?1 AND email = ?2
"#;

pub const USER_EXISTS: &str =
    "SELECT EXISTS(SELECT 1 FROM users WHERE organisation_id = ?1 AND id = ?2)";

pub const USER_EMAIL_TAKEN: &str =
    "SELECT EXISTS(SELECT 1 FROM users WHERE organisation_id = ?1 AND email = ?2)";

pub const DELETE_USER: &str = "DELETE FROM users WHERE organisation_id = ?1 AND id = ?2";
