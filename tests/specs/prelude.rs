//! Shared helpers for CLI specs

#![allow(dead_code)]

pub use predicates::prelude::*;

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Short retry delays so contended loads finish quickly
pub const FAST_CONFIG: &str = r#"
[lock]
retry_count = 5000
retry_delay = "1ms"
retry_jitter = "2ms"

[policy]
commit_delay = "50ms"
"#;

/// Temporary directory holding a config file for `sg`
pub struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(FAST_CONFIG)
    }

    pub fn with_config(toml: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("sg.toml");
        std::fs::write(&config, toml).unwrap();
        Self { dir, config }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config
    }

    /// `sg` with this workspace's config and a clean environment
    pub fn sg(&self) -> Sg {
        let mut cmd = Command::cargo_bin("sg").unwrap();
        cmd.current_dir(self.path()).arg("--config").arg(&self.config);
        for var in [
            "RUST_LOG",
            "REDIS_URLS",
            "REDIS_HOST",
            "REDIS_PORT",
            "DATABASE_URL",
            "DB_HOST",
            "DB_PORT",
            "DB_USERNAME",
            "DB_PASSWORD",
            "DB_DATABASE",
        ] {
            cmd.env_remove(var);
        }
        Sg { cmd }
    }
}

pub struct Sg {
    cmd: Command,
}

impl Sg {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and expect exit code 0
    pub fn passes(mut self) -> Output {
        let output = self.cmd.assert().success().get_output().clone();
        Output::from(output)
    }

    /// Run and expect a non-zero exit code
    pub fn fails(mut self) -> Output {
        let output = self.cmd.assert().failure().get_output().clone();
        Output::from(output)
    }
}

pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Output {
    pub fn stdout_has(self, expected: &str) -> Self {
        assert!(
            predicate::str::contains(expected).eval(&self.stdout),
            "stdout missing {:?}:\n{}",
            expected,
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        assert!(
            !self.stdout.contains(unexpected),
            "stdout has {:?}:\n{}",
            unexpected,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        assert!(
            predicate::str::contains(expected).eval(&self.stderr),
            "stderr missing {:?}:\n{}",
            expected,
            self.stderr
        );
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}
