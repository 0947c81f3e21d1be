use config::{ConfigError, Environment, Map};
use serde::Deserialize;

const ENV_VARS: [&str; 3] = ["LOG_ENV", "HOST", "PORT"];

pub const DEFAULT_LOG_ENV: &str = "development";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Startup configuration, read once from `LOG_ENV`, `HOST` and `PORT`.
///
/// Missing values fall back to their defaults. A `PORT` that is not a valid
/// port number also falls back, and the rejected value is kept in
/// `rejected_port` so it can be reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_env: String,
    pub host: String,
    pub port: u16,
    pub rejected_port: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    log_env: String,
    host: String,
    port: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_env: DEFAULT_LOG_ENV.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rejected_port: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .set_default("log_env", DEFAULT_LOG_ENV)?
            .set_default("host", DEFAULT_HOST)?
            .add_source(Environment::default().source(Some(lookup_env())))
            .build()?
            .try_deserialize()?;

        let port = parse_port(raw.port.as_deref());
        let rejected_port = raw.port.filter(|value| value.parse::<u16>().is_err());

        Ok(Self {
            log_env: raw.log_env,
            host: raw.host,
            port,
            rejected_port,
        })
    }
}

// Only the exact variable names are read. A missing or non-Unicode value is
// treated as absent.
fn lookup_env() -> Map<String, String> {
    ENV_VARS
        .iter()
        .filter_map(|name| {
            std::env::var(name)
                .ok()
                .map(|value| (name.to_string(), value))
        })
        .collect()
}

pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
