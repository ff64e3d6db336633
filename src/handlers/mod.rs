//! # Handlers del Servidor
//!
//! Un handler por ruta. Cada uno es una función pura de
//! `(request, sistema de archivos)` a `Response`; ninguno guarda estado
//! entre invocaciones.
//!
//! - **basic**: `/`, `/echo/<valor>`, `/user-agent` y el 404 por defecto
//! - **files**: lectura y escritura de `/files/<archivo>` bajo el
//!   directorio base configurado
//!
//! Los handlers retornan `Result<Response, HandlerError>`; [`dispatch`]
//! convierte los errores en la respuesta HTTP que corresponde.

pub mod basic;
pub mod files;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::http::{Method, Request, Response, StatusCode};
use crate::router::{HandlerKind, RouteMatch};

/// Estado de solo lectura compartido por todos los handlers
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Directorio base de `/files/<archivo>`
    files_dir: PathBuf,
}

impl HandlerContext {
    pub fn new(files_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }
}

/// Errores que un handler puede reportar
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Falta un header que el handler necesita
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// Nombre de archivo vacío o que intenta salir del directorio base
    #[error("Invalid filename: {0:?}")]
    InvalidFileName(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    FileReadError { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    FileWriteError { path: PathBuf, source: io::Error },

    #[error("Compression failed: {0}")]
    Compression(#[source] io::Error),
}

impl HandlerError {
    /// Código de estado con el que se responde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::MissingHeader(_) | HandlerError::InvalidFileName(_) => StatusCode::BadRequest,
            HandlerError::FileNotFound(_) | HandlerError::FileReadError { .. } => StatusCode::NotFound,
            HandlerError::FileWriteError { .. } | HandlerError::Compression(_) => {
                StatusCode::InternalServerError
            }
        }
    }

    /// Convierte el error en respuesta
    ///
    /// Los 404 de archivos van sin body; el resto lleva el mensaje en JSON.
    pub fn into_response(self) -> Response {
        match self.status() {
            StatusCode::NotFound => Response::new(StatusCode::NotFound),
            status => Response::error(status, &self.to_string()),
        }
    }
}

/// Ejecuta el handler elegido por el router
pub fn dispatch(matched: &RouteMatch, request: &Request, ctx: &HandlerContext) -> Response {
    let param = matched.param.as_deref().unwrap_or_default();

    let result = match matched.handler {
        HandlerKind::Root => Ok(basic::root()),
        HandlerKind::Echo => basic::echo(request, param),
        HandlerKind::UserAgent => basic::user_agent(request),
        HandlerKind::Files => match request.method() {
            Method::GET => files::read(ctx, param),
            Method::POST => files::write(ctx, param, request.body()),
        },
        HandlerKind::NotFound => Ok(basic::not_found()),
    };

    result.unwrap_or_else(|err| {
        if err.status().is_server_error() {
            tracing::error!(error = %err, handler = ?matched.handler, "Handler failed");
        } else {
            tracing::debug!(error = %err, handler = ?matched.handler, "Handler rejected request");
        }
        err.into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;

    fn run(raw: &[u8], ctx: &HandlerContext) -> Response {
        let request = Request::parse(raw).unwrap();
        let matched = Router::new().route(request.method(), request.path());
        dispatch(&matched, &request, ctx)
    }

    #[test]
    fn test_dispatch_root() {
        let ctx = HandlerContext::new("/nonexistent");
        let response = run(b"GET / HTTP/1.1\r\n\r\n", &ctx);

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_dispatch_not_found() {
        let ctx = HandlerContext::new("/nonexistent");
        let response = run(b"GET /nope HTTP/1.1\r\n\r\n", &ctx);

        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_dispatch_missing_user_agent_is_400() {
        let ctx = HandlerContext::new("/nonexistent");
        let response = run(b"GET /user-agent HTTP/1.1\r\n\r\n", &ctx);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_dispatch_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = HandlerContext::new(dir.path());

        let mut raw = b"POST /files/blob HTTP/1.1\r\nContent-Length: 4\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0x00, 0xFF, 0x00, 0x7F]);
        assert_eq!(run(&raw, &ctx).status(), StatusCode::Created);

        let response = run(b"GET /files/blob HTTP/1.1\r\n\r\n", &ctx);
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), &[0x00, 0xFF, 0x00, 0x7F]);
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(HandlerError::MissingHeader("User-Agent").status(), StatusCode::BadRequest);
        assert_eq!(HandlerError::InvalidFileName("..".into()).status(), StatusCode::BadRequest);
        assert_eq!(HandlerError::FileNotFound(PathBuf::from("x")).status(), StatusCode::NotFound);
        assert_eq!(
            HandlerError::FileWriteError {
                path: PathBuf::from("x"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }
            .status(),
            StatusCode::InternalServerError
        );
    }

    #[test]
    fn test_not_found_error_has_empty_body() {
        let response = HandlerError::FileNotFound(PathBuf::from("missing")).into_response();

        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(response.body().is_empty());
    }
}
