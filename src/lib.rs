//! Runtime shell for the web service: resolves typed settings from the
//! process environment and forwards them to the actix-web runtime.
pub mod logging;
pub mod models;
pub mod server;
