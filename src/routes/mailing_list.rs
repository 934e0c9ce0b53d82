//! src/routes/mailing_list.rs
//!
//! The RPC procedures. Each one forwards to the [`EntryStore`] and answers in
//! the wire shape. Mutations answer with what the store holds afterwards,
//! read back with a separate query rather than echoed from the request.
use crate::domain::{self, EmailAddress};
use crate::routes::error_chain_fmt;
use crate::store::{BatchParams, EntryStore, StoreError};
use crate::wire::{
    CreateEmailRequest, DeleteEmailRequest, EmailResponse, ErrorResponse, GetEmailBatchRequest,
    GetEmailBatchResponse, GetEmailRequest, UpdateEmailRequest,
};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum MailingListError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Conflict(String),
    #[error("The mailing list store is unavailable")]
    Unavailable(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for MailingListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for MailingListError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidArgument(message) => MailingListError::InvalidArgument(message),
            StoreError::Duplicate(_) => MailingListError::Conflict(e.to_string()),
            StoreError::Unavailable(_) => MailingListError::Unavailable(e.into()),
            StoreError::NotFound(_) | StoreError::Unexpected(_) => {
                MailingListError::UnexpectedError(e.into())
            }
        }
    }
}

impl ResponseError for MailingListError {
    fn status_code(&self) -> StatusCode {
        match self {
            MailingListError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            MailingListError::Conflict(_) => StatusCode::CONFLICT,
            MailingListError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MailingListError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Reads the entry back from the store. A missing entry is an empty response.
#[tracing::instrument(name = "Reading back an email entry", skip(store))]
async fn email_response(
    store: &EntryStore,
    email: &str,
) -> Result<EmailResponse, MailingListError> {
    let entry = store.get_email(email).await?;
    if entry.is_none() {
        tracing::info!("Email {} not found", email);
    }

    Ok(EmailResponse {
        email_entry: entry.map(Into::into),
    })
}

pub async fn create(
    store: &EntryStore,
    email_addr: String,
) -> Result<EmailResponse, MailingListError> {
    let email = EmailAddress::parse(email_addr)
        .map_err(|e| MailingListError::InvalidArgument(e.to_string()))?;

    store.create_email(email.as_ref()).await?;

    email_response(store, email.as_ref()).await
}

pub async fn get(
    store: &EntryStore,
    email_addr: &str,
) -> Result<EmailResponse, MailingListError> {
    email_response(store, email_addr).await
}

pub async fn get_batch(
    store: &EntryStore,
    params: BatchParams,
) -> Result<GetEmailBatchResponse, MailingListError> {
    let entries = store.get_email_batch(params).await?;

    Ok(GetEmailBatchResponse {
        email_entries: entries.into_iter().map(Into::into).collect(),
    })
}

/// Updates are keyed by the entry's email. An unknown email is an empty
/// response and inserts nothing.
pub async fn update(
    store: &EntryStore,
    entry: crate::wire::EmailEntry,
) -> Result<EmailResponse, MailingListError> {
    let entry = domain::EmailEntry::try_from(entry)
        .map_err(|e| MailingListError::InvalidArgument(e.to_string()))?;

    match store.update_email(&entry).await {
        Ok(()) => {}
        Err(StoreError::NotFound(email)) => {
            tracing::info!("Email {} not found, nothing updated", email);
            return Ok(EmailResponse::default());
        }
        Err(e) => return Err(e.into()),
    }

    email_response(store, &entry.email).await
}

/// Answers with the entry as it was just before removal.
pub async fn delete(
    store: &EntryStore,
    email_addr: &str,
) -> Result<EmailResponse, MailingListError> {
    let Some(entry) = store.get_email(email_addr).await? else {
        tracing::info!("Email {} not found, nothing deleted", email_addr);
        return Ok(EmailResponse::default());
    };

    // Lost a race with another delete.
    if !store.delete_email(email_addr).await? {
        return Ok(EmailResponse::default());
    }

    Ok(EmailResponse {
        email_entry: Some(entry.into()),
    })
}

#[tracing::instrument(
    name = "RPC CreateEmail",
    skip(request, store),
    fields(
        request_id = %Uuid::new_v4(),
        email_addr = %request.email_addr
    )
)]
pub async fn create_email(
    request: web::Json<CreateEmailRequest>,
    store: web::Data<EntryStore>,
) -> Result<HttpResponse, MailingListError> {
    let response = create(&store, request.into_inner().email_addr).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    name = "RPC GetEmail",
    skip(request, store),
    fields(
        request_id = %Uuid::new_v4(),
        email_addr = %request.email_addr
    )
)]
pub async fn get_email(
    request: web::Json<GetEmailRequest>,
    store: web::Data<EntryStore>,
) -> Result<HttpResponse, MailingListError> {
    let response = get(&store, &request.email_addr).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    name = "RPC GetEmailBatch",
    skip(request, store),
    fields(
        request_id = %Uuid::new_v4(),
        page = %request.page,
        count = %request.count
    )
)]
pub async fn get_email_batch(
    request: web::Json<GetEmailBatchRequest>,
    store: web::Data<EntryStore>,
) -> Result<HttpResponse, MailingListError> {
    let params = BatchParams {
        page: request.page,
        count: request.count,
    };
    let response = get_batch(&store, params).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    name = "RPC UpdateEmail",
    skip(request, store),
    fields(
        request_id = %Uuid::new_v4(),
        email_addr = %request.email_entry.email
    )
)]
pub async fn update_email(
    request: web::Json<UpdateEmailRequest>,
    store: web::Data<EntryStore>,
) -> Result<HttpResponse, MailingListError> {
    let response = update(&store, request.into_inner().email_entry).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    name = "RPC DeleteEmail",
    skip(request, store),
    fields(
        request_id = %Uuid::new_v4(),
        email_addr = %request.email_addr
    )
)]
pub async fn delete_email(
    request: web::Json<DeleteEmailRequest>,
    store: web::Data<EntryStore>,
) -> Result<HttpResponse, MailingListError> {
    let response = delete(&store, &request.email_addr).await?;
    Ok(HttpResponse::Ok().json(response))
}
