//! # Negociación de Content-Encoding
//!
//! Interpreta `Accept-Encoding` y aplica la compresión elegida al body.
//! El codec no comprime nada por su cuenta: el handler decide si llama a
//! [`ContentCoding::encode`] antes de construir la respuesta.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Codificaciones que el servidor sabe producir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Gzip,
}

impl ContentCoding {
    /// Valor del header `Content-Encoding`
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCoding::Gzip => "gzip",
        }
    }

    /// Elige una codificación a partir del valor de `Accept-Encoding`
    ///
    /// La lista es separada por comas; los parámetros (`;q=...`) se
    /// aceptan y `q=0` cuenta como rechazo.
    ///
    /// ```
    /// use http11_server::http::ContentCoding;
    ///
    /// assert_eq!(ContentCoding::negotiate("br, GZIP;q=0.8"), Some(ContentCoding::Gzip));
    /// assert_eq!(ContentCoding::negotiate("encoding-1, encoding-2"), None);
    /// ```
    pub fn negotiate(accept_encoding: &str) -> Option<Self> {
        accept_encoding
            .split(',')
            .filter_map(parse_token)
            .find_map(|(coding, acceptable)| {
                (acceptable && coding.eq_ignore_ascii_case("gzip")).then_some(ContentCoding::Gzip)
            })
    }

    /// Codifica `payload` con esta codificación
    pub fn encode(&self, payload: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            ContentCoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(payload)?;
                encoder.finish()
            }
        }
    }
}

/// Separa `gzip;q=0.5` en ("gzip", aceptable)
fn parse_token(item: &str) -> Option<(&str, bool)> {
    let mut parts = item.split(';');
    let coding = parts.next()?.trim();
    if coding.is_empty() {
        return None;
    }

    let acceptable = parts
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
        .map(|(_, q)| q.trim().parse::<f32>().map_or(true, |q| q > 0.0))
        .unwrap_or(true);

    Some((coding, acceptable))
}
