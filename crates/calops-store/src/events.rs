//! Event repository — CRUD for the `calendarapp_event` table.
//!
//! The table backs the external calendar web application; this repo is a
//! maintenance side-channel to it. Update and delete address rows by `id`
//! only and treat a zero-row match as a silent no-op.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::database::Database;
use crate::error::StoreError;
use crate::schema::EVENT_COLUMNS;

/// One row of `calendarapp_event`, fields in schema column order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRow {
    pub id: i64,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub user_id: i64,
}

impl fmt::Display for EventRow {
    /// Renders the row in the tuple form the listing prints, columns in
    /// schema order, text quoted, NULL as None.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, '{}', '{}', '{}', {}, '{}', '{}', {})",
            self.id,
            u8::from(self.is_active),
            u8::from(self.is_deleted),
            self.created_at,
            self.updated_at,
            self.title,
            match &self.description {
                Some(d) => format!("'{d}'"),
                None => "None".to_string(),
            },
            self.start_time,
            self.end_time,
            self.user_id,
        )
    }
}

/// Parameters for inserting a new event.
pub struct NewEvent<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub is_active: bool,
    pub user_id: i64,
}

/// Field changes for an update. `None` leaves the column untouched;
/// `updated_at` is always refreshed.
#[derive(Default)]
pub struct EventUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// How `delete` removes a row.
///
/// The schema carries an `is_deleted` flag but the application's own
/// maintenance path removed rows permanently. Both behaviors are exposed;
/// hard removal is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Permanent `DELETE FROM` removal.
    Hard,
    /// Set `is_deleted = 1` and refresh `updated_at`, keeping the row.
    Soft,
}

/// Current local time in the format the web application's driver stores.
fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

pub struct EventRepo {
    db: Database,
}

impl EventRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a fully-specified event. `created_at` and `updated_at` are
    /// captured now; the id comes back from the storage layer.
    #[instrument(skip(self, event), fields(title = event.title))]
    pub fn insert(&self, event: &NewEvent<'_>) -> Result<EventRow, StoreError> {
        self.db.with_conn(|conn| {
            let now = now_timestamp();
            conn.execute(
                "INSERT INTO calendarapp_event (
                     is_active, is_deleted, created_at, updated_at,
                     title, description, start_time, end_time, user_id
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    event.is_active,
                    false,
                    now,
                    now,
                    event.title,
                    event.description,
                    event.start_time,
                    event.end_time,
                    event.user_id,
                ],
            )?;
            let id = conn.last_insert_rowid();

            Ok(EventRow {
                id,
                is_active: event.is_active,
                is_deleted: false,
                created_at: now.clone(),
                updated_at: now,
                title: event.title.to_string(),
                description: event.description.map(String::from),
                start_time: event.start_time.to_string(),
                end_time: event.end_time.to_string(),
                user_id: event.user_id,
            })
        })
    }

    /// Update title and/or description for one row, refreshing `updated_at`.
    /// Returns `false` if no row has this id.
    #[instrument(skip(self, changes), fields(event_id = id))]
    pub fn update(&self, id: i64, changes: &EventUpdate<'_>) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let mut sets = String::from("updated_at = ?1");
            let mut params: Vec<Box<dyn rusqlite::types::ToSql>> =
                vec![Box::new(now_timestamp())];

            if let Some(title) = changes.title {
                params.push(Box::new(title.to_string()));
                sets.push_str(&format!(", title = ?{}", params.len()));
            }
            if let Some(description) = changes.description {
                params.push(Box::new(description.to_string()));
                sets.push_str(&format!(", description = ?{}", params.len()));
            }

            params.push(Box::new(id));
            let sql = format!(
                "UPDATE calendarapp_event SET {sets} WHERE id = ?{}",
                params.len()
            );

            let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            let changed = conn.execute(&sql, param_refs.as_slice())?;
            Ok(changed > 0)
        })
    }

    /// Remove one row by id, hard or soft. Returns `false` if no row
    /// has this id.
    #[instrument(skip(self), fields(event_id = id, policy = ?policy))]
    pub fn delete(&self, id: i64, policy: DeletePolicy) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let changed = match policy {
                DeletePolicy::Hard => conn.execute(
                    "DELETE FROM calendarapp_event WHERE id = ?1",
                    rusqlite::params![id],
                )?,
                DeletePolicy::Soft => conn.execute(
                    "UPDATE calendarapp_event SET is_deleted = 1, updated_at = ?1 WHERE id = ?2",
                    rusqlite::params![now_timestamp(), id],
                )?,
            };
            Ok(changed > 0)
        })
    }

    /// List every row in storage order (no ORDER BY, matching the
    /// application's unfiltered dump).
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<EventRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM calendarapp_event"))?;
            let rows = stmt
                .query_map([], map_event_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Fetch one row by id.
    pub fn get(&self, id: i64) -> Result<Option<EventRow>, StoreError> {
        use rusqlite::OptionalExtension;

        self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {EVENT_COLUMNS} FROM calendarapp_event WHERE id = ?1"),
                    rusqlite::params![id],
                    map_event_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Count all rows, soft-deleted included.
    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM calendarapp_event", [], |row| {
                    row.get(0)
                })?;
            Ok(count)
        })
    }
}

fn map_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        is_active: row.get(1)?,
        is_deleted: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        title: row.get(5)?,
        description: row.get(6)?,
        start_time: row.get(7)?,
        end_time: row.get(8)?,
        user_id: row.get(9)?,
    })
}
