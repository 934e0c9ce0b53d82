//! src/domain/entry.rs
use chrono::{DateTime, Utc};

/// A subscription entry as persisted in the `emails` table.
///
/// `id` is assigned by the database and never changes. `email` is unique
/// and is the key every lookup, update and delete goes through.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmailEntry {
    pub id: i64,
    pub email: String,
    /// `None` until the subscriber confirms.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Opted-out addresses must never be mailed.
    pub opt_out: bool,
}
