//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones en un loop y atiende cada una en su propio thread,
//! así un cliente lento no bloquea a los demás. El único estado compartido
//! es el router y el contexto de handlers, ambos de solo lectura.

use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::Arc;
use std::thread;

use socket2::{Domain, Protocol, Socket, Type};

use super::connection::{handle_connection, ConnectionSettings};
use super::ServerError;
use crate::config::Config;
use crate::handlers::HandlerContext;
use crate::router::Router;

/// Backlog de conexiones pendientes del socket de escucha
const LISTEN_BACKLOG: i32 = 128;

/// Servidor HTTP/1.1 con un thread por conexión
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    ctx: Arc<HandlerContext>,
    settings: ConnectionSettings,
}

impl Server {
    /// Hace bind del socket de escucha con `SO_REUSEADDR`
    ///
    /// Es el único error fatal del servidor.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let address = config.address();
        let listener = create_reusable_listener(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        tracing::info!(address = %address, "Listener bound");

        Ok(Self {
            listener,
            router: Arc::new(Router::new()),
            ctx: Arc::new(HandlerContext::new(config.directory.clone())),
            settings: ConnectionSettings::from_config(config),
        })
    }

    /// Dirección real de escucha (útil con puerto 0)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Loop de accept; solo retorna si el listener deja de producir conexiones
    pub fn run(self) -> Result<(), ServerError> {
        tracing::info!(address = %self.local_addr()?, "Accepting connections (one thread per connection)");

        let mut next_id: u64 = 0;

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    next_id += 1;
                    let id = next_id;
                    let router = Arc::clone(&self.router);
                    let ctx = Arc::clone(&self.ctx);
                    let settings = self.settings;

                    let spawned = thread::Builder::new()
                        .name(format!("conn-{id}"))
                        .spawn(move || handle_connection(stream, id, &router, &ctx, settings));

                    if let Err(e) = spawned {
                        tracing::error!(id, error = %e, "Failed to spawn connection thread");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }

        Ok(())
    }
}

/// Crea un `TcpListener` con `SO_REUSEADDR` para que los reinicios
/// rápidos no fallen con "Address already in use"
fn create_reusable_listener(address: &str) -> std::io::Result<TcpListener> {
    let addr = address.to_socket_addrs()?.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "address resolved to nothing")
    })?;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(socket.into())
}
