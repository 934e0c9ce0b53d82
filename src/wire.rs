//! src/wire.rs
//!
//! Request and response bodies of the RPC surface, plus the mapping between
//! the wire entry and the stored [`domain::EmailEntry`].
//!
//! `confirmedAt` travels as Unix seconds. The wire has no null, so `0` stands
//! for "not confirmed" in both directions. An entry confirmed exactly at the
//! epoch therefore reads back as unconfirmed.
use crate::domain;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Wire value of `confirmedAt` for an unconfirmed entry.
pub const UNCONFIRMED: i64 = 0;

/// Earliest `timestamptz` Postgres stores: 4714-11-24 00:00:00 BC.
/// chrono's own upper limit is below Postgres', so only the low end needs a bound.
pub const MIN_CONFIRMED_AT: i64 = -210_866_803_200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEntry {
    #[serde(default)]
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub confirmed_at: i64,
    #[serde(default)]
    pub opt_out: bool,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("confirmedAt {0} is not a representable timestamp")]
pub struct TimestampOutOfRange(pub i64);

impl From<&domain::EmailEntry> for EmailEntry {
    fn from(entry: &domain::EmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email.clone(),
            confirmed_at: entry
                .confirmed_at
                .map(|t| t.timestamp())
                .unwrap_or(UNCONFIRMED),
            opt_out: entry.opt_out,
        }
    }
}

impl From<domain::EmailEntry> for EmailEntry {
    fn from(entry: domain::EmailEntry) -> Self {
        Self::from(&entry)
    }
}

impl TryFrom<EmailEntry> for domain::EmailEntry {
    type Error = TimestampOutOfRange;

    fn try_from(entry: EmailEntry) -> Result<Self, Self::Error> {
        let confirmed_at = match entry.confirmed_at {
            UNCONFIRMED => None,
            secs if secs < MIN_CONFIRMED_AT => {
                return Err(TimestampOutOfRange(secs));
            }
            secs => Some(
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .ok_or(TimestampOutOfRange(secs))?,
            ),
        };

        Ok(Self {
            id: entry.id,
            email: entry.email,
            confirmed_at,
            opt_out: entry.opt_out,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmailRequest {
    pub email_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailRequest {
    pub email_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailBatchRequest {
    pub page: i32,
    pub count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub email_entry: EmailEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEmailRequest {
    pub email_addr: String,
}

/// Answer to every single-entry procedure. `email_entry` is `None` when the
/// address has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    pub email_entry: Option<EmailEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailBatchResponse {
    pub email_entries: Vec<EmailEntry>,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
