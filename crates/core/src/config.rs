// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration
//!
//! Loaded from TOML (every field optional) and then overridden by the
//! environment variables the deployment scripts already set
//! (`REDIS_HOST`, `DB_HOST`, ...).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_REDIS_HOST: &str = "redis";
const DEFAULT_REDIS_PORT: &str = "6666";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockguardConfig {
    pub lock: LockConfig,
    pub database: DatabaseConfig,
    pub policy: PolicyConfig,
}

/// Quorum lock settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// One URL per independent lock store
    pub stores: Vec<String>,
    /// Default lock ttl for deductions
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Fraction of the ttl reserved for clock drift between stores
    pub drift_factor: f64,
    /// Retries after the first failed attempt
    pub retry_count: u32,
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
    /// Upper bound of the random delay added to `retry_delay`
    #[serde(with = "humantime_serde")]
    pub retry_jitter: Duration,
    /// Per-store deadline within one attempt
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
    /// Remaining validity under which a held lock is reported as running out
    #[serde(with = "humantime_serde")]
    pub extension_threshold: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            stores: vec![redis_url(DEFAULT_REDIS_HOST, DEFAULT_REDIS_PORT)],
            ttl: Duration::from_secs(5),
            drift_factor: 0.01,
            retry_count: 40,
            retry_delay: Duration::from_millis(200),
            retry_jitter: Duration::from_millis(200),
            store_timeout: Duration::from_millis(50),
            extension_threshold: Duration::from_millis(500),
        }
    }
}

impl LockConfig {
    pub fn with_retry(mut self, count: u32, delay: Duration, jitter: Duration) -> Self {
        self.retry_count = count;
        self.retry_delay = delay;
        self.retry_jitter = jitter;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Per-store deadline for an acquisition with `ttl`; always below the ttl
    pub fn attempt_timeout(&self, ttl: Duration) -> Duration {
        self.store_timeout.min(ttl / 2)
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl.is_zero() {
            return Err(ConfigError::Invalid("lock.ttl must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.drift_factor) {
            return Err(ConfigError::Invalid(format!(
                "lock.drift_factor must be in [0, 1), got {}",
                self.drift_factor
            )));
        }
        Ok(())
    }
}

/// Relational backend settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Counter table name
    pub table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: postgres_url("user", "password", "localhost", "5432", "test"),
            max_connections: 10,
            table: "product".to_string(),
        }
    }
}

/// Fault-injection knobs for the diagnostic policies
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Pause between mutation and commit in the racy policies
    #[serde(with = "humantime_serde")]
    pub commit_delay: Duration,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            commit_delay: Duration::from_millis(100),
        }
    }
}

impl StockguardConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Apply overrides from the process environment
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok());
        self.validate()?;
        Ok(self)
    }

    /// Apply overrides from `lookup` (an environment-like key/value source)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(urls) = lookup("REDIS_URLS") {
            self.lock.stores = urls
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from)
                .collect();
        } else if lookup("REDIS_HOST").is_some() || lookup("REDIS_PORT").is_some() {
            let host = lookup("REDIS_HOST").unwrap_or_else(|| DEFAULT_REDIS_HOST.to_string());
            let port = lookup("REDIS_PORT").unwrap_or_else(|| DEFAULT_REDIS_PORT.to_string());
            self.lock.stores = vec![redis_url(&host, &port)];
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        } else {
            let keys = ["DB_HOST", "DB_PORT", "DB_USERNAME", "DB_PASSWORD", "DB_DATABASE"];
            if keys.iter().any(|key| lookup(key).is_some()) {
                let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
                self.database.url = postgres_url(
                    &get("DB_USERNAME", "user"),
                    &get("DB_PASSWORD", "password"),
                    &get("DB_HOST", "localhost"),
                    &get("DB_PORT", "5432"),
                    &get("DB_DATABASE", "test"),
                );
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lock.validate()?;
        if self.lock.stores.is_empty() {
            return Err(ConfigError::Invalid(
                "lock.stores must list at least one store".into(),
            ));
        }
        if !is_identifier(&self.database.table) {
            return Err(ConfigError::Invalid(format!(
                "database.table must be a plain identifier, got '{}'",
                self.database.table
            )));
        }
        Ok(())
    }
}

fn redis_url(host: &str, port: &str) -> String {
    format!("redis://{}:{}", host, port)
}

fn postgres_url(user: &str, password: &str, host: &str, port: &str, database: &str) -> String {
    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, database)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
