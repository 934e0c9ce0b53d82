//! src/configuration.rs
use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Address used by both the server and the client when nothing else is configured.
pub const DEFAULT_RPC_ADDRESS: &str = "127.0.0.1:8081";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_address() -> String {
    DEFAULT_RPC_ADDRESS.to_string()
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name
        ))
    }

    /// Omitting the database name connects to the Postgres instance, not a specific
    /// logical database. This is useful for operations that create or drop databases.
    pub fn connection_string_without_db(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        ))
    }
}

#[derive(PartialEq, Debug)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                s
            )),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct RpcAddress {
    rpc_addr: Option<String>,
}

impl RpcAddress {
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("MAILINGLIST_").from_iter(vars)
    }

    fn into_address(self) -> Option<String> {
        self.rpc_addr
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty())
    }
}

/// Reads `MAILINGLIST_RPC_ADDR`. Empty values count as unset.
pub fn rpc_address_from_env() -> Result<Option<String>, envy::Error> {
    RpcAddress::from_vars(std::env::vars()).map(RpcAddress::into_address)
}

/// The address a client should dial: `MAILINGLIST_RPC_ADDR`, or the default.
pub fn rpc_address() -> Result<String, envy::Error> {
    Ok(rpc_address_from_env()?.unwrap_or_else(default_address))
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    // A missing `.env` file is not an error.
    dotenvy::dotenv().ok();

    // Detect the running environment.
    // Default to `local` if not specified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        // E.g. `APP_DATABASE__HOST=db` sets `Settings.database.host`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;

    if let Some(address) =
        rpc_address_from_env().map_err(|e| ConfigError::Foreign(Box::new(e)))?
    {
        settings.application.address = address;
    }

    Ok(settings)
}
