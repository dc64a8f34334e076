//! Runtime configuration read from the environment.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be set when {reason}")]
    Missing { name: &'static str, reason: &'static str },

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which implementation backs the phrase and progress stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory fixture seeded with the built-in catalog.
    Memory,
    Postgres,
}

/// S3-compatible bucket holding synthesized phrase audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBucketConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Base URL clients fetch cached audio from.
    pub public_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub session_size: usize,
    pub max_audio_bytes: usize,
    /// Longest typed answer accepted, in chars.
    pub max_answer_chars: usize,
    pub transcriber_url: Option<String>,
    pub gcp_api_key: Option<String>,
    pub gemini_model: String,
    pub audio_bucket: Option<AudioBucketConfig>,
    pub hint_timeout: Duration,
    pub transcribe_timeout: Duration,
    pub audio_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            store: StoreBackend::Memory,
            database_url: None,
            session_size: 10,
            max_audio_bytes: 10 * 1024 * 1024,
            max_answer_chars: 500,
            transcriber_url: None,
            gcp_api_key: None,
            gemini_model: "gemini-pro".to_string(),
            audio_bucket: None,
            hint_timeout: Duration::from_millis(4_000),
            transcribe_timeout: Duration::from_millis(15_000),
            audio_timeout: Duration::from_millis(5_000),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = match var("STORE_BACKEND").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let database_url = var("DATABASE_URL");
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing {
                name: "DATABASE_URL",
                reason: "STORE_BACKEND=postgres",
            });
        }

        let audio_bucket = var("AUDIO_BUCKET").map(|bucket| {
            let region = var("S3_REGION").unwrap_or_else(|| "auto".to_string());
            let endpoint = var("S3_ENDPOINT");
            let public_url = var("AUDIO_PUBLIC_URL").unwrap_or_else(|| match &endpoint {
                Some(e) => format!("{}/{}", e.trim_end_matches('/'), bucket),
                None => format!("https://{}.s3.amazonaws.com", bucket),
            });
            AudioBucketConfig {
                bucket,
                region,
                endpoint,
                access_key: var("S3_ACCESS_KEY"),
                secret_key: var("S3_SECRET_KEY"),
                public_url,
            }
        });

        let session_size = parse_or(&var, "SESSION_SIZE", defaults.session_size)?;
        if session_size == 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or(&var, "PORT", defaults.port)?,
            store,
            database_url,
            session_size,
            max_audio_bytes: parse_or(&var, "MAX_AUDIO_BYTES", defaults.max_audio_bytes)?,
            max_answer_chars: parse_or(&var, "MAX_ANSWER_CHARS", defaults.max_answer_chars)?,
            transcriber_url: var("TRANSCRIBER_URL"),
            gcp_api_key: var("GCP_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            audio_bucket,
            hint_timeout: millis_or(&var, "HINT_TIMEOUT_MS", defaults.hint_timeout)?,
            transcribe_timeout: millis_or(&var, "TRANSCRIBE_TIMEOUT_MS", defaults.transcribe_timeout)?,
            audio_timeout: millis_or(&var, "AUDIO_TIMEOUT_MS", defaults.audio_timeout)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn millis_or<F>(var: &F, name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(var, name, default.as_millis() as u64).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(
            config(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::Missing {
                name: "DATABASE_URL",
                reason: "STORE_BACKEND=postgres",
            })
        );

        let cfg = config(&[
            ("STORE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/swiftspeak"),
        ])
        .unwrap();
        assert_eq!(cfg.store, StoreBackend::Postgres);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(matches!(
            config(&[("STORE_BACKEND", "firestore")]),
            Err(ConfigError::Invalid { name: "STORE_BACKEND", .. })
        ));
    }

    #[test]
    fn timeouts_and_numbers_parse() {
        let cfg = config(&[
            ("PORT", "9000"),
            ("HINT_TIMEOUT_MS", "250"),
            ("SESSION_SIZE", "5"),
            ("MAX_ANSWER_CHARS", "120"),
        ])
        .unwrap();
        assert_eq!(cfg.max_answer_chars, 120);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.hint_timeout, Duration::from_millis(250));
        assert_eq!(cfg.session_size, 5);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");

        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("SESSION_SIZE", "0")]).is_err());
    }

    #[test]
    fn audio_bucket_public_url_follows_endpoint() {
        let cfg = config(&[
            ("AUDIO_BUCKET", "swifttalk"),
            ("S3_ENDPOINT", "http://localhost:9000/"),
        ])
        .unwrap();
        let bucket = cfg.audio_bucket.unwrap();
        assert_eq!(bucket.public_url, "http://localhost:9000/swifttalk");
        assert_eq!(bucket.region, "auto");

        let cfg = config(&[("AUDIO_BUCKET", "swifttalk")]).unwrap();
        assert_eq!(
            cfg.audio_bucket.unwrap().public_url,
            "https://swifttalk.s3.amazonaws.com"
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("GCP_API_KEY", "  "), ("TRANSCRIBER_URL", "")]).unwrap();
        assert_eq!(cfg.gcp_api_key, None);
        assert_eq!(cfg.transcriber_url, None);
    }
}
