//! # Módulo HTTP
//!
//! Wire codec HTTP/1.1 implementado desde cero, sin librerías de alto nivel:
//!
//! - Decodificación de requests directamente desde el stream
//! - Construcción y serialización de responses
//! - Códigos de estado
//! - Negociación de `Content-Encoding`
//!
//! Fuera de alcance: keep-alive, chunked transfer encoding, header folding.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```

pub mod encoding; // Negociación y compresión del body
pub mod request;  // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses
pub mod status;   // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use encoding::ContentCoding;
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
