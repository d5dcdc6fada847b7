//! Process logging setup.
use std::fs::{self, OpenOptions};
use std::io;

use env_logger::{Env, Target};

use crate::models::config::ServerConfig;

/// Initialize the global logger for the resolved configuration.
///
/// Deployed environments append to the stderr log under the shared
/// directory; everything else logs to standard error. The filter comes
/// from `RUST_LOG` with a default of `info`.
pub fn init(config: &ServerConfig) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    if let Some(deployment) = &config.deployment {
        let stderr_log = deployment.stderr_log();
        if let Some(dir) = stderr_log.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(stderr_log)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // The logger can only be installed once per process; the file-system
    // setup above has already happened by this point.
    let _ = builder.try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DeploymentConfig;
    use crate::models::environment::Environment;
    use tempfile::tempdir;

    #[test]
    fn deployed_init_creates_log_file() {
        let dir = tempdir().unwrap();
        let deployment = DeploymentConfig {
            app_dir: dir.path().join("current"),
            shared_dir: dir.path().join("shared"),
            workers: 2,
        };
        let config = ServerConfig {
            max_threads: 5,
            min_threads: 5,
            port: 3000,
            environment: Environment::Production,
            deployment: Some(deployment.clone()),
        };

        init(&config).unwrap();

        assert!(deployment.stderr_log().exists());
    }

    #[test]
    fn development_init_needs_no_directories() {
        let config = ServerConfig {
            max_threads: 5,
            min_threads: 5,
            port: 3000,
            environment: Environment::Development,
            deployment: None,
        };

        assert!(init(&config).is_ok());
    }
}
