//! Server bootstrap forwarding the resolved configuration to actix-web.
use std::env;
use std::fs;
use std::io;
use std::process;

use actix_web::dev::Server;
use actix_web::{App, HttpServer};
use log::info;
use serde::Serialize;

use crate::models::config::{DeploymentConfig, ServerConfig};
use crate::models::environment::Environment;

/// Snapshot written next to the pid file for operational tooling.
#[derive(Debug, Serialize)]
struct ServerState {
    pid: u32,
    environment: Environment,
    addresses: Vec<String>,
}

/// Build the server from the configuration and bind its listeners.
///
/// The returned server has not started serving yet; `run` drives it.
/// Deployed environments switch the working directory to the release
/// directory, bind the unix socket under the shared directory and record
/// the pid and state files.
pub fn bind(config: &ServerConfig) -> io::Result<Server> {
    let mut server = HttpServer::new(|| App::new())
        .worker_max_blocking_threads(config.max_threads)
        .bind(("0.0.0.0", config.port))?;

    if let Some(timeout) = config.worker_timeout() {
        server = server.shutdown_timeout(timeout.as_secs());
    }

    if let Some(deployment) = &config.deployment {
        // Serve from the release directory.
        env::set_current_dir(&deployment.app_dir)?;

        if deployment.workers > 0 {
            server = server.workers(deployment.workers);
        }

        let socket = deployment.socket_path();
        if let Some(dir) = socket.parent() {
            fs::create_dir_all(dir)?;
        }
        server = server.bind_uds(&socket)?;

        let addresses = server
            .addrs()
            .iter()
            .map(|addr| addr.to_string())
            .collect();
        write_runtime_files(deployment, &config.environment, addresses)?;
    }

    info!(
        "server configured for {} on port {} with {}..{} threads",
        config.environment, config.port, config.min_threads, config.max_threads
    );

    Ok(server.run())
}

/// Bind and serve until the process is stopped.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    bind(&config)?.await
}

fn write_runtime_files(
    deployment: &DeploymentConfig,
    environment: &Environment,
    addresses: Vec<String>,
) -> io::Result<()> {
    let pid_file = deployment.pid_file();
    if let Some(dir) = pid_file.parent() {
        fs::create_dir_all(dir)?;
    }

    let pid = process::id();
    fs::write(&pid_file, pid.to_string())?;

    let state = ServerState {
        pid,
        environment: environment.clone(),
        addresses,
    };
    let payload = serde_json::to_string_pretty(&state).map_err(io::Error::other)?;
    fs::write(deployment.state_file(), payload)
}
