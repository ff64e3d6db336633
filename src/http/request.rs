//! # Decodificación de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser incremental que lee un request directamente del stream:
//!
//! 1. **Head**: líneas terminadas en `\r\n` hasta la línea vacía
//!    (request line + headers), con un límite de [`MAX_HEADER_BYTES`].
//! 2. **Headers**: `Name: Value`, nombres sin distinguir mayúsculas.
//! 3. **Body**: exactamente `Content-Length` bytes, leídos en binario.
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```

use std::collections::HashMap;
use std::io::{self, BufRead, Read};

use thiserror::Error;

use super::StatusCode;

/// Única versión de protocolo aceptada
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Tamaño máximo de la sección de headers (request line incluida)
pub const MAX_HEADER_BYTES: usize = 8192;

/// Límite por defecto para el body declarado en `Content-Length`
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,
}

impl Method {
    /// Parsea un método HTTP desde un token de la request line
    fn parse(token: &str) -> Result<Self, ParseError> {
        match token {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            _ => Err(ParseError::UnsupportedMethod(token.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// El peer cerró la conexión sin enviar nada
    #[error("Empty request")]
    EmptyRequest,

    /// El stream terminó antes de la línea vacía que cierra los headers
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// Request line sin el formato `METHOD PATH VERSION`
    #[error("Malformed request line")]
    MalformedRequestLine,

    /// Método HTTP no soportado
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Versión HTTP distinta de HTTP/1.1
    #[error("Unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// Header sin el separador `": "`
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// La sección de headers supera [`MAX_HEADER_BYTES`]
    #[error("Header section too large")]
    HeadersTooLarge,

    /// `Content-Length` por encima del límite configurado
    #[error("Declared body of {declared} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { declared: usize, limit: usize },

    /// El stream terminó antes de completar el body declarado
    #[error("Truncated body: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },

    /// Error de I/O leyendo del socket
    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Código de estado con el que se responde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::BodyTooLarge { .. } => StatusCode::PayloadTooLarge,
            ParseError::Io(e) if is_timeout(e) => StatusCode::RequestTimeout,
            _ => StatusCode::BadRequest,
        }
    }
}

/// En Unix un read timeout se reporta como `WouldBlock`, en Windows como `TimedOut`
pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

/// Representa un request HTTP/1.1 parseado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método HTTP (GET, POST)
    method: Method,

    /// Path de la petición, siempre empieza con `/`
    path: String,

    /// Versión HTTP (siempre "HTTP/1.1")
    version: String,

    /// Headers con el nombre en minúsculas; el último duplicado gana.
    /// `Host` no se guarda.
    headers: HashMap<String, String>,

    /// Body del request, vacío si no hubo `Content-Length`
    body: Vec<u8>,
}

impl Request {
    /// Parsea un request completo desde un buffer en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http11_server::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some("curl"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut reader = buffer;
        Self::read_from(&mut reader, DEFAULT_MAX_BODY_BYTES)
    }

    /// Lee y parsea exactamente un request desde `reader`
    ///
    /// Los bytes que sigan al body declarado quedan sin consumir.
    pub fn read_from<R: BufRead>(reader: &mut R, max_body_bytes: usize) -> Result<Self, ParseError> {
        let mut lines = read_head(reader)?.into_iter();

        // La primera línea siempre existe: read_head no retorna vacío
        let request_line = lines.next().ok_or(ParseError::IncompleteRequest)?;
        let (method, path, version) = parse_request_line(&request_line)?;

        let headers = parse_headers(lines)?;

        let declared = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        if declared > max_body_bytes {
            return Err(ParseError::BodyTooLarge {
                declared,
                limit: max_body_bytes,
            });
        }
        let body = read_body(reader, declared)?;

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers (nombres en minúsculas)
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico sin distinguir mayúsculas
    ///
    /// ```
    /// use http11_server::http::Request;
    ///
    /// let request = Request::parse(b"GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n").unwrap();
    /// assert_eq!(request.header("ACCEPT-ENCODING"), Some("gzip"));
    /// assert_eq!(request.header("missing"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Lee las líneas del head hasta la línea vacía, sin los terminadores
fn read_head<R: BufRead>(reader: &mut R) -> Result<Vec<String>, ParseError> {
    let mut lines: Vec<String> = Vec::new();
    let mut consumed = 0usize;

    loop {
        let mut raw = Vec::new();
        // Un byte extra para detectar que se pasó el límite
        let budget = (MAX_HEADER_BYTES - consumed) as u64 + 1;
        let n = reader.by_ref().take(budget).read_until(b'\n', &mut raw)?;

        if n == 0 {
            return Err(if consumed == 0 {
                ParseError::EmptyRequest
            } else {
                ParseError::IncompleteRequest
            });
        }

        consumed += n;
        if consumed > MAX_HEADER_BYTES {
            return Err(ParseError::HeadersTooLarge);
        }
        if raw.last() != Some(&b'\n') {
            return Err(ParseError::IncompleteRequest);
        }

        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        if raw.is_empty() {
            if lines.is_empty() {
                // CRLF sueltos antes de la request line se ignoran
                continue;
            }
            return Ok(lines);
        }

        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(_) if lines.is_empty() => return Err(ParseError::MalformedRequestLine),
            Err(e) => {
                return Err(ParseError::MalformedHeader(
                    String::from_utf8_lossy(e.as_bytes()).into_owned(),
                ))
            }
        };
        lines.push(line);
    }
}

/// Parsea la request line
///
/// Formato: `GET /path HTTP/1.1`
fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();

    // Exactamente 3 tokens no vacíos: METHOD PATH VERSION
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(ParseError::MalformedRequestLine);
    }

    let method = Method::parse(parts[0])?;

    let path = parts[1];
    if !path.starts_with('/') {
        return Err(ParseError::MalformedRequestLine);
    }

    let version = parts[2];
    if version != HTTP_VERSION {
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }

    Ok((method, path.to_string(), version.to_string()))
}

/// Parsea los headers HTTP
///
/// Cada header tiene formato: "Name: Value"
fn parse_headers<I>(lines: I) -> Result<HashMap<String, String>, ParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut headers = HashMap::new();

    for line in lines {
        let (name, value) = match line.split_once(": ") {
            Some((name, value)) if !name.trim().is_empty() => (name, value),
            _ => return Err(ParseError::MalformedHeader(line.clone())),
        };

        let name = name.trim().to_ascii_lowercase();
        if name == "host" {
            continue;
        }
        headers.insert(name, value.trim().to_string());
    }

    Ok(headers)
}

/// Lee exactamente `expected` bytes de body
fn read_body<R: Read>(reader: &mut R, expected: usize) -> Result<Vec<u8>, ParseError> {
    if expected == 0 {
        return Ok(Vec::new());
    }

    let mut body = Vec::with_capacity(expected);
    let received = reader.by_ref().take(expected as u64).read_to_end(&mut body)?;
    if received < expected {
        return Err(ParseError::TruncatedBody { expected, received });
    }

    Ok(body)
}
