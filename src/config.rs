use reqwest::Url;
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const RENEWAL_PERIOD: Duration = Duration::from_millis(600_000);
pub const LOGIN_SETTLE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub port: u16,
    pub data_path: PathBuf,
    pub renewal_period: Duration,
    pub login_settle: Duration,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let api_base = try_load::<String>("API_BASE_URL", DEFAULT_API_BASE)?;
        let api_base = Url::parse(&api_base).map_err(|err| ConfigError {
            key: "API_BASE_URL",
            message: err.to_string(),
        })?;

        Ok(Self {
            api_base,
            port: try_load("PORT", "8080")?,
            data_path: resolve_data_path(),
            renewal_period: renewal_period(try_load(
                "SESSION_RENEWAL_SECS",
                &RENEWAL_PERIOD.as_secs().to_string(),
            )?)?,
            login_settle: Duration::from_millis(try_load(
                "LOGIN_SETTLE_MS",
                &LOGIN_SETTLE.as_millis().to_string(),
            )?),
        })
    }

    /// Defaults for everything except the backend and storage location.
    pub fn new(api_base: Url, data_path: PathBuf) -> Self {
        Self {
            api_base,
            port: 8080,
            data_path,
            renewal_period: RENEWAL_PERIOD,
            login_settle: LOGIN_SETTLE,
        }
    }
}

/// The renewal ticker needs a period of at least one second.
fn renewal_period(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        warn!("SESSION_RENEWAL_SECS must be greater than zero");
        return Err(ConfigError {
            key: "SESSION_RENEWAL_SECS",
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/session.json")
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|err: T::Err| {
        warn!("invalid {key} value: {err}");
        ConfigError {
            key,
            message: err.to_string(),
        }
    })
}
