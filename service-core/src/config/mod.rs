use crate::error::AppError;
use config::{Config as Cfg, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut loaded = Self::from_environment(Environment::with_prefix("APP").separator("__"))?;
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            loaded.log_level = level;
        }
        Ok(loaded)
    }

    /// Environment variables are the only source; there is no config file.
    fn from_environment(environment: Environment) -> Result<Self, AppError> {
        let config = Cfg::builder().add_source(environment).build()?;
        Ok(config.try_deserialize()?)
    }
}
