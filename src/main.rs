//! # HTTP/1.1 Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: configuración, logging, bind y loop de accept.

use http11_server::config::Config;
use http11_server::logging;
use http11_server::server::Server;

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "http11_server starting");
    config.log_summary();

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            std::process::exit(1);
        }
    };

    // Esto bloquea el thread principal hasta que el proceso termine
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}
