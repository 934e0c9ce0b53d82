//! Exercises every procedure once against a running server:
//! create, confirm, delete, then list the first page.
use anyhow::Context;
use mailing_list::client::{ClientError, MailingListClient};
use mailing_list::configuration::rpc_address;
use mailing_list::telemetry::{get_subscriber, init_subscriber};
use mailing_list::wire::EmailEntry;

const DEMO_ADDRESS: &str = "client5@test.tld";

fn log_response(response: &Option<EmailEntry>) {
    match response {
        Some(entry) => tracing::info!(?entry, "Response"),
        None => tracing::info!("Email not found"),
    }
}

async fn create_email(
    client: &MailingListClient,
    addr: &str,
) -> Result<Option<EmailEntry>, ClientError> {
    tracing::info!("Create email");
    let response = client.create_email(addr).await?;
    log_response(&response);
    Ok(response)
}

async fn update_email(
    client: &MailingListClient,
    entry: &EmailEntry,
) -> Result<Option<EmailEntry>, ClientError> {
    tracing::info!("Update email");
    let response = client.update_email(entry).await?;
    log_response(&response);
    Ok(response)
}

async fn delete_email(
    client: &MailingListClient,
    addr: &str,
) -> Result<Option<EmailEntry>, ClientError> {
    tracing::info!("Delete email");
    let response = client.delete_email(addr).await?;
    log_response(&response);
    Ok(response)
}

async fn get_email_batch(
    client: &MailingListClient,
    page: i32,
    count: i32,
) -> Result<(), ClientError> {
    tracing::info!("Get email batch");
    let entries = client.get_email_batch(page, count).await?;
    let total = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        tracing::info!(?entry, "Item [{} of {}]", i + 1, total);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("mailing_list_client".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let address = rpc_address().context("Failed to read MAILINGLIST_RPC_ADDR")?;
    let client = MailingListClient::new(&address)?;
    tracing::info!("Dialing {}", client.base_url());

    let mut entry = create_email(&client, DEMO_ADDRESS)
        .await?
        .context("Created email could not be read back")?;

    entry.confirmed_at = 10_000;
    update_email(&client, &entry).await?;
    delete_email(&client, &entry.email).await?;
    get_email_batch(&client, 1, 5).await?;

    Ok(())
}
