//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http11_server --port 4221 --directory /tmp/files \
//!   --read-timeout-ms 5000 \
//!   --max-body-bytes 1048576
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4221 FILES_DIR=/tmp/files LOG_LEVEL=debug ./http11_server
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::http::request::DEFAULT_MAX_BODY_BYTES;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "http11_server")]
#[command(about = "Servidor HTTP/1.1 mínimo: echo, user-agent y archivos")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio donde se leen/escriben los archivos de /files/
    #[arg(long, default_value = "./data", env = "FILES_DIR")]
    pub directory: PathBuf,

    // === Timeouts ===
    /// Tiempo máximo esperando bytes del cliente, en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "10000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Tiempo máximo escribiendo la respuesta, en milisegundos (0 = sin límite)
    #[arg(long = "write-timeout-ms", default_value = "10000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Límites ===
    /// Tamaño máximo aceptado para el body de un request
    #[arg(long = "max-body-bytes", default_value_t = DEFAULT_MAX_BODY_BYTES, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    // === Logging ===
    /// Nivel de log (trace, debug, info, warn, error); RUST_LOG tiene prioridad
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http11_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read timeout para los sockets, `None` si está deshabilitado
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Write timeout para los sockets, `None` si está deshabilitado
    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            directory = %self.directory.display(),
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            max_body_bytes = self.max_body_bytes,
            log_level = %self.log_level,
            "Configuration loaded"
        );
        if !self.directory.is_dir() {
            tracing::warn!(
                directory = %self.directory.display(),
                "Files directory does not exist; GET /files/* will return 404 and POST will fail"
            );
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4221,
            host: "127.0.0.1".to_string(),
            directory: PathBuf::from("./data"),
            read_timeout_ms: 10_000,
            write_timeout_ms: 10_000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: "info".to_string(),
        }
    }
}
