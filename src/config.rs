use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// `sqlite:` url of the backing store. Empty selects the non-durable
    /// in-memory fallback.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// Credential for the text-generation service. Empty selects the mock
    /// strategy unconditionally.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuotaConfig {
    #[serde(default = "default_free_monthly_limit")]
    pub free_monthly_limit: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_monthly_limit: default_free_monthly_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_free_monthly_limit() -> u32 {
    mealweek_user::FREE_MONTHLY_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Layered load: optional `mealweek.toml` in the working directory, an
    /// optional explicit file, then `MEALWEEK__*` environment overrides.
    pub fn load(path: Option<String>) -> Result<Config, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(File::with_name("mealweek").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(&path));
        }

        builder
            .add_source(Environment::with_prefix("MEALWEEK").separator("__"))
            .build()?
            .try_deserialize()
    }
}
