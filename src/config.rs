use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which persistence backend serves profiles and matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Empty disables the Redis tier
    #[serde(default)]
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_networking_profession")]
    pub networking_profession: u32,
    #[serde(default = "default_networking_interest")]
    pub networking_interest: u32,
    #[serde(default = "default_friendship_hobby")]
    pub friendship_hobby: u32,
    #[serde(default = "default_friendship_age_range")]
    pub friendship_age_range: u32,
    #[serde(default = "default_activity_hobby")]
    pub activity_hobby: u32,
    #[serde(default = "default_baseline_interest")]
    pub baseline_interest: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            networking_profession: default_networking_profession(),
            networking_interest: default_networking_interest(),
            friendship_hobby: default_friendship_hobby(),
            friendship_age_range: default_friendship_age_range(),
            activity_hobby: default_activity_hobby(),
            baseline_interest: default_baseline_interest(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            networking_profession: value.networking_profession,
            networking_interest: value.networking_interest,
            friendship_hobby: value.friendship_hobby,
            friendship_age_range: value.friendship_age_range,
            activity_hobby: value.activity_hobby,
            baseline_interest: value.baseline_interest,
        }
    }
}

fn default_networking_profession() -> u32 { 3 }
fn default_networking_interest() -> u32 { 2 }
fn default_friendship_hobby() -> u32 { 2 }
fn default_friendship_age_range() -> u32 { 3 }
fn default_activity_hobby() -> u32 { 3 }
fn default_baseline_interest() -> u32 { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RAPPORT_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RAPPORT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RAPPORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RAPPORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Apply well-known unprefixed environment variables
///
/// `DATABASE_URL`, `REDIS_URL` and `JWT_SECRET` take precedence over the
/// configuration files so container platforms can inject them directly.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in [
        ("DATABASE_URL", "database.url"),
        ("REDIS_URL", "cache.redis_url"),
        ("JWT_SECRET", "auth.jwt_secret"),
    ] {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
