//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! - `tcp`: listener, acepta conexiones y lanza un thread por cada una
//! - `connection`: un ciclo request/response sobre una conexión

pub mod connection;
pub mod tcp;

use std::io;

use thiserror::Error;

// Re-exportar para facilitar el uso
pub use connection::ConnectionSettings;
pub use tcp::Server;

/// Errores del servidor fuera de una conexión
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el socket de escucha
    #[error("Failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
