/// Reference DDL for the `calendarapp_event` table.
///
/// The table is owned by the calendar web application; `Database::open`
/// never applies this. It exists for in-memory databases and tests, and it
/// pins the column order that `EventRepo` selects and prints in.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS calendarapp_event (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    user_id INTEGER NOT NULL
);
"#;

/// Column list in schema order, shared by every SELECT in the events repo.
pub const EVENT_COLUMNS: &str =
    "id, is_active, is_deleted, created_at, updated_at, title, description, start_time, end_time, user_id";

pub const PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
"#;
