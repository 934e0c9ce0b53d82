//! src/client.rs
//!
//! Typed client for the RPC surface served by [`crate::startup`].
use crate::wire::{
    CreateEmailRequest, DeleteEmailRequest, EmailEntry, EmailResponse, ErrorResponse,
    GetEmailBatchRequest, GetEmailBatchResponse, GetEmailRequest, UpdateEmailRequest,
};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Deadline applied to every call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Failed to reach the mailing list service")]
    Transport(#[from] reqwest::Error),
    #[error("Request rejected with {status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Transport(e) => e.status(),
            ClientError::Rejected { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailingListClient {
    http_client: Client,
    base_url: String,
}

impl MailingListClient {
    pub fn new(address: &str) -> Result<Self, ClientError> {
        Self::with_timeout(address, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(address: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url(address),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(name = "RPC call", skip(self, request))]
    async fn call<Req, Res>(&self, procedure: &str, request: &Req) -> Result<Res, ClientError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}/rpc/{}", self.base_url, procedure))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
            };
            return Err(ClientError::Rejected { status, message });
        }

        Ok(response.json().await?)
    }

    pub async fn create_email(
        &self,
        email_addr: &str,
    ) -> Result<Option<EmailEntry>, ClientError> {
        let request = CreateEmailRequest {
            email_addr: email_addr.to_string(),
        };
        let response: EmailResponse = self.call("CreateEmail", &request).await?;
        Ok(response.email_entry)
    }

    /// `Ok(None)` when the address has no entry.
    pub async fn get_email(
        &self,
        email_addr: &str,
    ) -> Result<Option<EmailEntry>, ClientError> {
        let request = GetEmailRequest {
            email_addr: email_addr.to_string(),
        };
        let response: EmailResponse = self.call("GetEmail", &request).await?;
        Ok(response.email_entry)
    }

    pub async fn get_email_batch(
        &self,
        page: i32,
        count: i32,
    ) -> Result<Vec<EmailEntry>, ClientError> {
        let request = GetEmailBatchRequest { page, count };
        let response: GetEmailBatchResponse = self.call("GetEmailBatch", &request).await?;
        Ok(response.email_entries)
    }

    pub async fn update_email(
        &self,
        entry: &EmailEntry,
    ) -> Result<Option<EmailEntry>, ClientError> {
        let request = UpdateEmailRequest {
            email_entry: entry.clone(),
        };
        let response: EmailResponse = self.call("UpdateEmail", &request).await?;
        Ok(response.email_entry)
    }

    /// Returns the entry as it was before deletion.
    pub async fn delete_email(
        &self,
        email_addr: &str,
    ) -> Result<Option<EmailEntry>, ClientError> {
        let request = DeleteEmailRequest {
            email_addr: email_addr.to_string(),
        };
        let response: EmailResponse = self.call("DeleteEmail", &request).await?;
        Ok(response.email_entry)
    }
}

/// `":8081"` dials localhost, a bare `host:port` gets an `http://` scheme.
fn base_url(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else if address.starts_with(':') {
        format!("http://127.0.0.1{}", address)
    } else {
        format!("http://{}", address)
    }
}
