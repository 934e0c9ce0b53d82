//! src/startup.rs
use crate::configuration::Settings;
use crate::routes::{
    create_email, delete_email, get_email, get_email_batch, health_check, update_email,
    MailingListError,
};
use crate::store::EntryStore;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
    store: EntryStore,
}

impl Application {
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serves until the server stops, then releases the database pool.
    pub async fn run(self) -> std::io::Result<()> {
        let result = self.server.await;
        self.store.close().await;
        tracing::info!("Database pool closed");
        result
    }
}

pub fn build(config: Settings) -> Result<Application, anyhow::Error> {
    let address = config.application.address.clone();
    let tcp_listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind {}", address))?;
    let port = tcp_listener.local_addr()?.port();

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(config.database.connection_string().expose_secret())
        .context("Failed to configure the Postgres pool")?;
    let store = EntryStore::new(pool);

    let server = run(tcp_listener, store.clone())?;
    tracing::info!("RPC server listening on {}", address);

    Ok(Application {
        port,
        server,
        store,
    })
}

pub fn run(listener: TcpListener, store: EntryStore) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);

    let server = HttpServer::new(move || {
        // Malformed bodies answer with the same JSON error shape as every other failure
        let json_config = web::JsonConfig::default().error_handler(|e, _req| {
            tracing::warn!("Rejecting malformed request body: {}", e);
            MailingListError::InvalidArgument(e.to_string()).into()
        });

        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/rpc")
                    .route("/CreateEmail", web::post().to(create_email))
                    .route("/GetEmail", web::post().to(get_email))
                    .route("/GetEmailBatch", web::post().to(get_email_batch))
                    .route("/UpdateEmail", web::post().to(update_email))
                    .route("/DeleteEmail", web::post().to(delete_email)),
            )
            .app_data(json_config)
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
