//! Configuration model resolved from the process environment.

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::models::environment::Environment;

const MAX_THREADS_VAR: &str = "RAILS_MAX_THREADS";
const MIN_THREADS_VAR: &str = "RAILS_MIN_THREADS";
const PORT_VAR: &str = "PORT";
const ENVIRONMENT_VAR: &str = "RAILS_ENV";
const APP_DIR_VAR: &str = "APP_DIR";
const SHARED_DIR_VAR: &str = "SHARED_DIR";
const WORKERS_VAR: &str = "WEB_CONCURRENCY";

const DEFAULT_MAX_THREADS: usize = 5;
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_APP_DIR: &str = "YOUR_APP/current";
const DEFAULT_SHARED_DIR: &str = "YOUR_APP/shared";
const DEFAULT_WORKERS: usize = 2;

/// Runtime configuration shared across the bootstrap.
///
/// Every field comes from an environment variable with a literal fallback;
/// nothing is read again after startup.
#[derive(Clone, Debug, Serialize, Validate)]
#[validate(schema(function = validate_thread_bounds))]
pub struct ServerConfig {
    /// Upper bound of each worker's thread pool.
    #[validate(range(min = 1))]
    pub max_threads: usize,
    /// Lower bound of each worker's thread pool. Follows `max_threads`
    /// unless set explicitly.
    #[validate(range(min = 1))]
    pub min_threads: usize,
    pub port: u16,
    pub environment: Environment,
    /// Present only when the environment is production or staging.
    pub deployment: Option<DeploymentConfig>,
}

impl ServerConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Resolve the configuration from an arbitrary variable source.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_threads = fetch_parsed(&lookup, MAX_THREADS_VAR, DEFAULT_MAX_THREADS)?;
        let min_threads = fetch_parsed(&lookup, MIN_THREADS_VAR, max_threads)?;
        let port = fetch_parsed(&lookup, PORT_VAR, DEFAULT_PORT)?;
        let environment = Environment::from(
            fetch(&lookup, ENVIRONMENT_VAR, Environment::default().as_str()).as_str(),
        );

        let deployment = if environment.is_deployed() {
            Some(DeploymentConfig {
                app_dir: PathBuf::from(fetch(&lookup, APP_DIR_VAR, DEFAULT_APP_DIR)),
                shared_dir: PathBuf::from(fetch(&lookup, SHARED_DIR_VAR, DEFAULT_SHARED_DIR)),
                workers: fetch_parsed(&lookup, WORKERS_VAR, DEFAULT_WORKERS)?,
            })
        } else {
            None
        };

        Ok(Self {
            max_threads,
            min_threads,
            port,
            environment,
            deployment,
        })
    }

    /// Grace period granted to workers before shutdown, where the
    /// environment defines one.
    pub fn worker_timeout(&self) -> Option<Duration> {
        self.environment.worker_timeout()
    }
}

/// Settings that only apply when serving from a deployed release.
#[derive(Clone, Debug, Serialize)]
pub struct DeploymentConfig {
    /// Release directory the application runs from.
    pub app_dir: PathBuf,
    /// Directory shared between releases; logs, pids and sockets live here.
    pub shared_dir: PathBuf,
    /// Worker process count. A count of 0 leaves the runtime default.
    pub workers: usize,
}

impl DeploymentConfig {
    /// Log file capturing the process output stream.
    pub fn stderr_log(&self) -> PathBuf {
        self.shared_dir.join("log/server.stderr.log")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.shared_dir.join("tmp/pids/server.pid")
    }

    pub fn state_file(&self) -> PathBuf {
        self.shared_dir.join("tmp/pids/server.state")
    }

    pub fn socket_path(&self) -> PathBuf {
        self.shared_dir.join("sockets/server.sock")
    }
}

/// Resolve a variable, falling back to a literal default.
fn fetch<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).unwrap_or_else(|| default.to_string())
}

/// Resolve a numeric variable, falling back to a typed default.
fn fetch_parsed<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr<Err = ParseIntError>,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidNumber {
                var,
                value: value.clone(),
                source,
            }),
        None => Ok(default),
    }
}

fn validate_thread_bounds(config: &ServerConfig) -> Result<(), ValidationError> {
    if config.min_threads > config.max_threads {
        return Err(ValidationError::new("thread_bounds")
            .with_message("min_threads must not exceed max_threads".into()));
    }
    Ok(())
}

/// Errors surfaced while resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}
