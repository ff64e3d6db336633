//! # Handlers de Archivos
//! src/handlers/files.rs
//!
//! `GET /files/<archivo>` y `POST /files/<archivo>` sobre el directorio
//! base configurado. El contenido se trata siempre como bytes.
//!
//! No hay coordinación entre conexiones: dos POST simultáneos al mismo
//! archivo terminan con el contenido del último en escribir.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::http::{Response, StatusCode};

use super::{HandlerContext, HandlerError};

/// Resuelve `<directorio base>/<name>`
///
/// Rechaza nombres vacíos, `.`, `..` y cualquier separador, para que el
/// path resultante nunca salga del directorio base.
pub fn resolve(ctx: &HandlerContext, name: &str) -> Result<PathBuf, HandlerError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(HandlerError::InvalidFileName(name.to_string()));
    }

    Ok(ctx.files_dir().join(name))
}

/// Handler para `GET /files/<archivo>`
///
/// 200 con el contenido exacto, o 404 si no existe o no se puede leer.
pub fn read(ctx: &HandlerContext, name: &str) -> Result<Response, HandlerError> {
    let path = resolve(ctx, name)?;

    let contents = match fs::read(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(HandlerError::FileNotFound(path)),
        Err(source) => return Err(HandlerError::FileReadError { path, source }),
    };

    tracing::debug!(path = %path.display(), bytes = contents.len(), "File read");

    Ok(Response::new(StatusCode::Ok)
        .with_header("Content-Type", "application/octet-stream")
        .with_body_bytes(contents))
}

/// Handler para `POST /files/<archivo>`
///
/// Crea o trunca el archivo con el body del request. El directorio base
/// no se crea: si falta, la escritura falla con 500.
pub fn write(ctx: &HandlerContext, name: &str, body: &[u8]) -> Result<Response, HandlerError> {
    let path = resolve(ctx, name)?;

    if let Err(source) = fs::write(&path, body) {
        return Err(HandlerError::FileWriteError { path, source });
    }

    tracing::debug!(path = %path.display(), bytes = body.len(), "File written");

    Ok(Response::new(StatusCode::Created))
}
