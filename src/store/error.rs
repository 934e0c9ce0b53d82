//! src/store/error.rs

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Email {0} already exists")]
    Duplicate(String),
    #[error("Email {0} not found")]
    NotFound(String),
    #[error("The database is unavailable")]
    Unavailable(#[source] sqlx::Error),
    #[error("Failed to execute query")]
    Unexpected(#[source] sqlx::Error),
}

impl StoreError {
    /// Classifies an insert failure, turning a unique violation into `Duplicate`.
    pub(crate) fn from_insert(e: sqlx::Error, email: &str) -> Self {
        let is_duplicate =
            matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
        if is_duplicate {
            tracing::warn!("Refusing duplicate email {}", email);
            return StoreError::Duplicate(email.to_string());
        }
        e.into()
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => {
                tracing::error!("Database unreachable: {:#?}", e);
                StoreError::Unavailable(e)
            }
            e => {
                tracing::error!("Failed to execute query: {:#?}", e);
                StoreError::Unexpected(e)
            }
        }
    }
}
