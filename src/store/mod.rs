//! src/store/mod.rs
//!
//! Persistence of [`EmailEntry`] rows in the `emails` table.
use crate::domain::EmailEntry;
use sqlx::PgPool;

mod error;
pub use error::StoreError;

/// Pagination over the `emails` table, ordered by `id`. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchParams {
    pub page: i32,
    pub count: i32,
}

impl BatchParams {
    fn limit_offset(&self) -> Result<(i64, i64), StoreError> {
        if self.page <= 0 {
            return Err(StoreError::InvalidArgument(format!(
                "page must be positive, got {}",
                self.page
            )));
        }
        if self.count <= 0 {
            return Err(StoreError::InvalidArgument(format!(
                "count must be positive, got {}",
                self.count
            )));
        }

        let limit = i64::from(self.count);
        let offset = (i64::from(self.page) - 1) * limit;
        Ok((limit, offset))
    }
}

/// Owns the connection pool. Built once at startup and closed on shutdown.
#[derive(Debug, Clone)]
pub struct EntryStore {
    pool: PgPool,
}

impl EntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await
    }

    #[tracing::instrument(name = "Inserting a new email entry", skip(self))]
    pub async fn create_email(&self, email: &str) -> Result<(), StoreError> {
        require_address(email)?;

        sqlx::query(
            r#"
            INSERT INTO emails (email, confirmed_at, opt_out)
            VALUES ($1, NULL, FALSE)
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, email))?;

        Ok(())
    }

    /// `Ok(None)` when no row has this address.
    #[tracing::instrument(name = "Fetching an email entry", skip(self))]
    pub async fn get_email(&self, email: &str) -> Result<Option<EmailEntry>, StoreError> {
        require_address(email)?;

        let entry = sqlx::query_as::<_, EmailEntry>(
            r#"
            SELECT id, email, confirmed_at, opt_out
            FROM emails
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// A page shorter than `count` is the last one.
    #[tracing::instrument(name = "Fetching a batch of email entries", skip(self))]
    pub async fn get_email_batch(
        &self,
        params: BatchParams,
    ) -> Result<Vec<EmailEntry>, StoreError> {
        let (limit, offset) = params.limit_offset()?;

        let entries = sqlx::query_as::<_, EmailEntry>(
            r#"
            SELECT id, email, confirmed_at, opt_out
            FROM emails
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Replaces `confirmed_at` and `opt_out` of the row matching `entry.email`.
    /// `entry.id` plays no part in the lookup.
    #[tracing::instrument(name = "Updating an email entry", skip(self))]
    pub async fn update_email(&self, entry: &EmailEntry) -> Result<(), StoreError> {
        require_address(&entry.email)?;

        let result = sqlx::query(
            r#"
            UPDATE emails
            SET confirmed_at = $2, opt_out = $3
            WHERE email = $1
            "#,
        )
        .bind(&entry.email)
        .bind(entry.confirmed_at)
        .bind(entry.opt_out)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(entry.email.clone()));
        }

        Ok(())
    }

    /// Returns whether a row was removed. Deleting a missing address is not an error.
    #[tracing::instrument(name = "Deleting an email entry", skip(self))]
    pub async fn delete_email(&self, email: &str) -> Result<bool, StoreError> {
        require_address(email)?;

        let result = sqlx::query(
            r#"
            DELETE FROM emails
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn require_address(email: &str) -> Result<(), StoreError> {
    if email.trim().is_empty() {
        return Err(StoreError::InvalidArgument(
            "email address must not be empty".into(),
        ));
    }
    Ok(())
}
