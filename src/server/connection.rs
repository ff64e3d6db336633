//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Un ciclo request/response por conexión, sin keep-alive:
//!
//! 1. Configurar los timeouts del socket
//! 2. Decodificar el request desde el stream
//! 3. Rutear y ejecutar el handler
//! 4. Serializar y escribir la respuesta
//! 5. Cerrar (al soltar el stream)
//!
//! Los errores de decodificación se responden con 4xx. Los errores de
//! socket se registran y la conexión se abandona.

use std::io::{self, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::handlers::{self, HandlerContext};
use crate::http::request::is_timeout;
use crate::http::{ParseError, Request, Response};
use crate::router::Router;

/// Parámetros por conexión derivados de la configuración
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub max_body_bytes: usize,
}

impl ConnectionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Atiende una conexión aceptada de principio a fin
///
/// Nunca hace panic ni propaga errores: todo termina en el log.
pub fn handle_connection(
    stream: TcpStream,
    id: u64,
    router: &Router,
    ctx: &HandlerContext,
    settings: ConnectionSettings,
) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let span = tracing::info_span!("connection", id, peer = %peer);
    let _guard = span.enter();

    if let Err(e) = serve(&stream, router, ctx, settings) {
        tracing::error!(error = %e, "Connection aborted");
    }
}

fn serve(
    stream: &TcpStream,
    router: &Router,
    ctx: &HandlerContext,
    settings: ConnectionSettings,
) -> io::Result<()> {
    let start = Instant::now();

    stream.set_read_timeout(settings.read_timeout)?;
    stream.set_write_timeout(settings.write_timeout)?;

    let mut reader = BufReader::new(stream);
    let response = match Request::read_from(&mut reader, settings.max_body_bytes) {
        Ok(request) => {
            tracing::info!(method = request.method().as_str(), path = request.path(), "Request received");
            let matched = router.route(request.method(), request.path());
            handlers::dispatch(&matched, &request, ctx)
        }
        Err(ParseError::EmptyRequest) => {
            tracing::debug!("Peer closed without sending a request");
            return Ok(());
        }
        Err(ParseError::Io(e)) if !is_timeout(&e) => return Err(e),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to decode request");
            Response::error(e.status(), &e.to_string())
        }
    };

    let mut writer = stream;
    writer.write_all(&response.to_bytes())?;
    writer.flush()?;

    tracing::info!(
        status = response.status().as_u16(),
        bytes = response.body().len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Response sent"
    );

    // El peer puede haber cerrado ya; no es un error
    let _ = stream.shutdown(Shutdown::Write);

    Ok(())
}
