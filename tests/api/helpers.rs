//! tests/api/helpers.rs

use mailing_list::client::MailingListClient;
use mailing_list::configuration::get_configuration;
use mailing_list::startup::build;
use mailing_list::telemetry::{get_subscriber, init_subscriber};
use mailing_list::wire::EmailEntry;
use once_cell::sync::Lazy;
use secrecy::ExposeSecret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::time::Duration;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // Set TEST_LOG=true to see logs during tests
    // Use bunyan to format the logs nicely:
    // $ TEST_LOG=true cargo test | bunyan
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct Test {
    pub address: String,
    pub db_pool: PgPool,
    pub client: MailingListClient,
}

impl Test {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(&format!("{}{}", self.address, path))
            .await
            .expect("Failed to execute request.")
    }

    /// Calls a procedure with a raw JSON body, bypassing the typed client.
    pub async fn post_rpc(&self, procedure: &str, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/rpc/{}", self.address, procedure))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create(&self, email: &str) -> EmailEntry {
        self.client
            .create_email(email)
            .await
            .expect("Failed to create email.")
            .expect("Created email was not returned.")
    }

    pub async fn row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM emails")
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count emails.")
    }
}

pub async fn setup() -> Test {
    Lazy::force(&TRACING);

    let mut config = get_configuration().expect("Failed to read configuration.");
    config.application.address = "127.0.0.1:0".to_string();
    config.database.database_name = Uuid::new_v4().to_string();

    // Create database
    let mut connection = PgConnection::connect(
        config
            .database
            .connection_string_without_db()
            .expose_secret(),
    )
    .await
    .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(
            r#"CREATE DATABASE "{}";"#,
            config.database.database_name
        ))
        .await
        .expect("Failed to create database.");

    // Migrate database
    let db_pool = PgPool::connect(config.database.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to migrate the database");

    // Launch the server
    let app = build(config.clone()).expect("Failed to build server.");
    let address = format!("http://127.0.0.1:{}", app.port());

    tracing::info!("Test running with the following Settings:\n{:#?}", config);

    // Launch the server as a background task
    let _ = tokio::spawn(app.run());

    let client = MailingListClient::with_timeout(&address, Duration::from_secs(10))
        .expect("Failed to build client.");

    Test {
        address,
        db_pool,
        client,
    }
}

/// A running app whose database lives on a port nothing listens on.
pub struct UnreachableStore {
    pub address: String,
    pub client: MailingListClient,
}

impl UnreachableStore {
    pub async fn post_rpc(&self, procedure: &str, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/rpc/{}", self.address, procedure))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn setup_with_unreachable_database() -> UnreachableStore {
    Lazy::force(&TRACING);

    let mut config = get_configuration().expect("Failed to read configuration.");
    config.application.address = "127.0.0.1:0".to_string();
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;

    // The pool connects lazily, so building succeeds without a database
    let app = build(config).expect("Failed to build server.");
    let address = format!("http://127.0.0.1:{}", app.port());
    let _ = tokio::spawn(app.run());

    let client = MailingListClient::with_timeout(&address, Duration::from_secs(10))
        .expect("Failed to build client.");

    UnreachableStore { address, client }
}
