use mailing_list::configuration::get_configuration;
use mailing_list::startup::build;
use mailing_list::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("mailing_list".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration()?;
    let app = build(config)?;
    app.run().await?;

    Ok(())
}
