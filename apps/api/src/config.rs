use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::embedding_client::{hashing, ProviderKind, DEFAULT_MODEL, DEFAULT_OPENAI_URL};
use crate::matching::BandThresholds;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub thresholds: BandThresholds,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("EMBEDDING_PROVIDER")
            .unwrap_or_else(|| "openai".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "openai" => ProviderKind::OpenAi {
                api_key: lookup("OPENAI_API_KEY").context(
                    "Required environment variable 'OPENAI_API_KEY' is not set \
                     (or set EMBEDDING_PROVIDER=hashing to run offline)",
                )?,
                model: lookup("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                url: lookup("EMBEDDING_API_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
                timeout: Duration::from_secs(parse_or(&lookup, "EMBEDDING_TIMEOUT_SECS", 60)?),
            },
            "hashing" => ProviderKind::Hashing {
                dimension: parse_or(&lookup, "HASHING_DIMENSION", hashing::DEFAULT_DIMENSION)?,
            },
            other => bail!("EMBEDDING_PROVIDER must be 'openai' or 'hashing', got '{other}'"),
        };

        let defaults = BandThresholds::default();
        let thresholds = BandThresholds::new(
            parse_or(&lookup, "MATCH_BAND_EXCELLENT", defaults.excellent)?,
            parse_or(&lookup, "MATCH_BAND_GOOD", defaults.good)?,
            parse_or(&lookup, "MATCH_BAND_MODERATE", defaults.moderate)?,
        )
        .context("MATCH_BAND_* thresholds are inconsistent")?;

        Ok(Config {
            provider,
            thresholds,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}
