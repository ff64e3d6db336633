//! # Logging
//! src/logging.rs
//!
//! Logging estructurado con `tracing`. La salida va por el layer `fmt`
//! de `tracing-subscriber`; `RUST_LOG` tiene prioridad sobre el nivel
//! configurado.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Solo la primera llamada tiene efecto; las siguientes (por ejemplo desde
/// varios tests) se ignoran.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("http11_server={}", level.to_ascii_lowercase())));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_noop() {
        init("debug");
        init("info");
        tracing::info!("still logging");
    }
}
