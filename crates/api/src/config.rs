use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use vidgen_core::generation::GenerationParams;
use vidgen_remote::RemoteConfig;
use vidgen_store::StoreBackendKind;
use vidgen_tracker::PollConfig;

/// Errors raised while reading configuration. The binary aborts on any of
/// these before binding a socket.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// Everything except the generation API key has a default suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 10 MiB). Inline
    /// `data:` images travel in the submit body.
    pub max_body_bytes: usize,
    /// Job store backend (default: `fs`).
    pub store_backend: StoreBackendKind,
    /// Root directory for the `fs` backend (default: `data/jobs`).
    pub store_path: PathBuf,
    /// Generation service connection.
    pub remote: RemoteConfig,
    /// Fixed parameters sent with every submission.
    pub generation: GenerationParams,
    /// Background polling behaviour.
    pub poll: PollConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                        |
    /// |----------------------------|--------------------------------|
    /// | `HOST`                     | `0.0.0.0`                      |
    /// | `PORT`                     | `3000`                         |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                           |
    /// | `MAX_BODY_BYTES`           | `10485760`                     |
    /// | `STORE_BACKEND`            | `fs`                           |
    /// | `STORE_PATH`               | `data/jobs`                    |
    /// | `GENERATION_API_KEY`       | required                       |
    /// | `GENERATION_API_URL`       | `https://api.dev.runwayml.com` |
    /// | `GENERATION_API_VERSION`   | `2024-11-06`                   |
    /// | `GENERATION_TIMEOUT_SECS`  | `30`                           |
    /// | `GENERATION_MODEL`         | `gen3a_turbo`                  |
    /// | `GENERATION_RATIO`         | `1280:768`                     |
    /// | `GENERATION_DURATION_SECS` | `5`                            |
    /// | `GENERATION_PROMPT`        | built-in prompt                |
    /// | `POLL_INTERVAL_MS`         | `1000`                         |
    /// | `POLL_MAX_FAILURES`        | `5`                            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&var, "PORT", 3000, "port number")?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 =
            parse_or(&var, "REQUEST_TIMEOUT_SECS", 30, "number of seconds")?;
        let max_body_bytes: usize =
            parse_or(&var, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES, "number of bytes")?;

        let store_backend = match var("STORE_BACKEND") {
            None => StoreBackendKind::Fs,
            Some(name) => {
                StoreBackendKind::from_name(&name).ok_or(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    expected: "store backend (memory or fs)",
                    value: name,
                })?
            }
        };
        let store_path = PathBuf::from(var("STORE_PATH").unwrap_or_else(|| "data/jobs".into()));

        let api_key = var("GENERATION_API_KEY").ok_or(ConfigError::Missing {
            name: "GENERATION_API_KEY",
        })?;
        let mut remote = RemoteConfig::new(api_key);
        if let Some(url) = var("GENERATION_API_URL") {
            remote = remote.with_api_url(url);
        }
        if let Some(version) = var("GENERATION_API_VERSION") {
            remote.api_version = version;
        }
        remote.timeout = Duration::from_secs(parse_or(
            &var,
            "GENERATION_TIMEOUT_SECS",
            remote.timeout.as_secs(),
            "number of seconds",
        )?);

        let defaults = GenerationParams::default();
        let generation = GenerationParams {
            prompt_text: var("GENERATION_PROMPT").unwrap_or(defaults.prompt_text),
            duration_secs: parse_or(
                &var,
                "GENERATION_DURATION_SECS",
                defaults.duration_secs,
                "number of seconds",
            )?,
            model: var("GENERATION_MODEL").unwrap_or(defaults.model),
            ratio: var("GENERATION_RATIO").unwrap_or(defaults.ratio),
        };

        let poll_defaults = PollConfig::default();
        let poll = PollConfig {
            interval: Duration::from_millis(parse_or(
                &var,
                "POLL_INTERVAL_MS",
                poll_defaults.interval.as_millis() as u64,
                "number of milliseconds",
            )?),
            max_consecutive_failures: parse_or(
                &var,
                "POLL_MAX_FAILURES",
                poll_defaults.max_consecutive_failures,
                "positive integer",
            )?,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            store_backend,
            store_path,
            remote,
            generation,
            poll,
        })
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}
