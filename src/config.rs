//! Service configuration from environment variables.

use std::path::PathBuf;

use crate::services::advisor::DEFAULT_ADVISOR_MAX_TOKENS;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    /// Directory holding the sketchpad page and its WASM bundle.
    pub static_dir: PathBuf,
    pub max_tokens: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, static_dir: PathBuf::from(DEFAULT_STATIC_DIR), max_tokens: DEFAULT_ADVISOR_MAX_TOKENS }
    }
}

impl ServiceConfig {
    /// Read `PORT`, `STATIC_DIR` and `ADVISOR_MAX_TOKENS`. Unset or unparsable
    /// values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: env_parse(var("PORT"), DEFAULT_PORT),
            static_dir: var("STATIC_DIR")
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            max_tokens: env_parse(var("ADVISOR_MAX_TOKENS"), DEFAULT_ADVISOR_MAX_TOKENS),
        }
    }
}

fn env_parse<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
