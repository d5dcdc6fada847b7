//! Named runtime environments and their behavior switches.
use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Grace period granted to workers in development.
const DEV_WORKER_TIMEOUT: Duration = Duration::from_secs(3600);

/// Runtime environment the process was launched in.
///
/// Unrecognized names are kept verbatim; they enable neither the
/// development nor the deployment behavior.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
    Staging,
    #[serde(untagged)]
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Other(name) => name,
        }
    }

    /// Whether the process serves from a deployed release.
    pub fn is_deployed(&self) -> bool {
        matches!(self, Environment::Production | Environment::Staging)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// How long a worker may run before being shut down. Only development
    /// gets one.
    pub fn worker_timeout(&self) -> Option<Duration> {
        if self.is_development() {
            Some(DEV_WORKER_TIMEOUT)
        } else {
            None
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        match name {
            "development" => Environment::Development,
            "test" => Environment::Test,
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            other => Environment::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
