use crate::error::Result;
use config::{builder::DefaultState, ConfigBuilder, Environment};
use serde::Deserialize;

/// Runtime settings, read from the environment (and `.env`) at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// "development" or "production"
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// SQLite database path or `sqlite:` URL
    pub database_url: String,
    pub database_max_connections: u32,
    /// Chat completions are disabled when unset
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub nlg_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_builder(config::Config::builder().add_source(Environment::default()))
    }

    /// Apply defaults underneath an existing builder and deserialize
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .set_default("environment", "development")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("database_url", "hungie.db")?
            .set_default("database_max_connections", 5)?
            .set_default("openai_model", "gpt-3.5-turbo")?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("nlg_timeout_secs", 30)?
            .build()?
            .try_deserialize::<Config>()?;

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// API key, ignoring blank values
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
