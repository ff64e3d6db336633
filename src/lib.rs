//! # HTTP/1.1 Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado desde cero sobre TCP: una
//! conexión, un request, una respuesta.
//!
//! ## Arquitectura
//!
//! ```text
//! Listener → (thread por conexión) → decode → Router → Handler → encode → close
//! ```
//!
//! - `http`: wire codec (requests, responses, status codes, Content-Encoding)
//! - `router`: tabla ordenada de rutas → `HandlerKind`
//! - `handlers`: root, echo, user-agent, lectura/escritura de archivos
//! - `server`: listener y manejo de cada conexión
//! - `config`: argumentos CLI y variables de entorno
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http11_server::config::Config;
//! use http11_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al hacer bind");
//! server.run().expect("Error en el loop de accept");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
