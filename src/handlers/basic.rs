//! # Handlers Básicos
//! src/handlers/basic.rs
//!
//! - `/` y `/index.html`: 200 sin body
//! - `/echo/<valor>`: devuelve el valor, comprimido si se negocia gzip
//! - `/user-agent`: devuelve el header `User-Agent`
//! - cualquier otra ruta: 404 sin body

use crate::http::{ContentCoding, Request, Response, StatusCode};

use super::HandlerError;

/// Handler para `/` y `/index.html`
pub fn root() -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para `/echo/<valor>`
///
/// Si `Accept-Encoding` incluye `gzip`, el body va comprimido y
/// `Content-Length` es el largo de los bytes comprimidos.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Content-Length: 3
///
/// abc
/// ```
pub fn echo(req: &Request, payload: &str) -> Result<Response, HandlerError> {
    let response = Response::new(StatusCode::Ok).with_header("Content-Type", "text/plain");

    match req.header("Accept-Encoding").and_then(ContentCoding::negotiate) {
        Some(coding) => {
            let encoded = coding
                .encode(payload.as_bytes())
                .map_err(HandlerError::Compression)?;
            Ok(response
                .with_header("Content-Encoding", coding.as_str())
                .with_body_bytes(encoded))
        }
        None => Ok(response.with_body(payload)),
    }
}

/// Handler para `/user-agent`
pub fn user_agent(req: &Request) -> Result<Response, HandlerError> {
    let agent = req
        .header("User-Agent")
        .ok_or(HandlerError::MissingHeader("User-Agent"))?;

    Ok(Response::new(StatusCode::Ok)
        .with_header("Content-Type", "text/plain")
        .with_body(agent))
}

/// Respuesta para rutas desconocidas
pub fn not_found() -> Response {
    Response::new(StatusCode::NotFound)
}
