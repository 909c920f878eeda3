use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_KEY: &str = "deepnote-api-key-change-me";

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub common: core_config::Config,
    pub postgres: PostgresConfig,
    pub mongodb: MongoConfig,
    pub security: SecurityConfig,
    pub document_encoding: DocumentEncoding,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub server_selection_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub api_key: Secret<String>,
}

/// How LibreChat results are placed in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentEncoding {
    /// Extended JSON text stored as a string value; callers decode it twice.
    #[default]
    Legacy,
    /// The same extended JSON embedded as nested JSON.
    Native,
}

impl FromStr for DocumentEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(DocumentEncoding::Legacy),
            "native" => Ok(DocumentEncoding::Native),
            _ => Err(format!("Invalid document encoding: {}", s)),
        }
    }
}

impl PostgresConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(self.password.expose_secret())
            .application_name("ai-ecosystem-bridge")
    }
}

impl MongoConfig {
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}/", self.host, self.port)
    }
}

impl BridgeConfig {
    pub fn load() -> Result<Self, AppError> {
        // Also loads .env, so the lookups below see its values
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(BridgeConfig {
            common,
            postgres: PostgresConfig {
                host: vars.string("POSTGRES_HOST", "postgres"),
                port: vars.parsed("POSTGRES_PORT", 5432)?,
                database: vars.string("POSTGRES_DB", "chatwoot"),
                user: vars.string("POSTGRES_USER", "chatwoot"),
                password: Secret::new(vars.string("POSTGRES_PASSWORD", "chatwoot")),
            },
            mongodb: MongoConfig {
                host: vars.string("MONGO_HOST", "mongo"),
                port: vars.parsed("MONGO_PORT", 27017)?,
                database: vars.string("MONGO_DB", "LibreChat"),
                server_selection_timeout: vars.millis("MONGO_SERVER_SELECTION_TIMEOUT_MS")?,
                connect_timeout: vars.millis("MONGO_CONNECT_TIMEOUT_MS")?,
            },
            security: SecurityConfig {
                api_key: Secret::new(vars.string("BRIDGE_API_KEY", DEFAULT_API_KEY)),
            },
            document_encoding: vars.parsed("BRIDGE_DOCUMENT_ENCODING", DocumentEncoding::Legacy)?,
            otlp_endpoint: vars.get("OTLP_ENDPOINT"),
        })
    }

    pub fn uses_default_api_key(&self) -> bool {
        self.security.api_key.expose_secret() == DEFAULT_API_KEY
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
                AppError::ConfigError(anyhow::anyhow!("{} has invalid value {:?}: {}", key, raw, e))
            }),
            None => Ok(default),
        }
    }

    fn millis(&self, key: &str) -> Result<Option<Duration>, AppError> {
        match self.get(key) {
            Some(_) => Ok(Some(Duration::from_millis(self.parsed(key, 0u64)?))),
            None => Ok(None),
        }
    }
}
