//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea `(método, path)` a un [`HandlerKind`] más el parámetro extraído
//! del path.
//!
//! ```text
//! Request → Router → HandlerKind (+ parámetro) → handlers::dispatch → Response
//! ```
//!
//! Las rutas son datos: una tabla ordenada de patrones que se evalúa de
//! arriba a abajo, gana la primera coincidencia. Si ninguna coincide el
//! resultado es [`HandlerKind::NotFound`]. Los parámetros se toman tal cual,
//! sin percent-decoding.

use crate::http::Method;

/// Handlers que el servidor sabe ejecutar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Root,
    Echo,
    UserAgent,
    Files,
    NotFound,
}

/// Forma de un patrón de ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// El path debe ser exactamente este
    Exact(&'static str),

    /// El path debe empezar con este prefijo
    Prefix(&'static str),

    /// Como `Prefix`, y el primer segmento después del prefijo es el parámetro
    Capture(&'static str),
}

impl Pattern {
    /// Retorna `Some(parámetro)` si el path coincide
    fn matches(&self, path: &str) -> Option<Option<String>> {
        match *self {
            Pattern::Exact(exact) => (path == exact).then_some(None),
            Pattern::Prefix(prefix) => path.starts_with(prefix).then_some(None),
            Pattern::Capture(prefix) => path.strip_prefix(prefix).map(|rest| {
                let segment = rest.split('/').next().unwrap_or_default();
                Some(segment.to_string())
            }),
        }
    }
}

/// Métodos aceptados por todas las rutas por defecto
const GET_OR_POST: &[Method] = &[Method::GET, Method::POST];

/// Una entrada de la tabla de rutas
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Pattern,
    methods: &'static [Method],
    handler: HandlerKind,
}

/// Resultado del routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub handler: HandlerKind,
    pub param: Option<String>,
}

impl RouteMatch {
    fn not_found() -> Self {
        Self {
            handler: HandlerKind::NotFound,
            param: None,
        }
    }
}

/// Router con una tabla ordenada de rutas
///
/// Se construye una vez al arrancar y no se modifica después.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un router vacío (todo da `NotFound`)
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Crea el router con las rutas del servidor
    ///
    /// | Patrón                     | Handler     |
    /// |----------------------------|-------------|
    /// | `/` o `/index.html`        | `Root`      |
    /// | `/echo/<valor>`            | `Echo`      |
    /// | `/user-agent...`           | `UserAgent` |
    /// | `/files/<archivo>`         | `Files`     |
    pub fn new() -> Self {
        let mut router = Self::empty();
        router.register(Pattern::Exact("/"), GET_OR_POST, HandlerKind::Root);
        router.register(Pattern::Exact("/index.html"), GET_OR_POST, HandlerKind::Root);
        router.register(Pattern::Capture("/echo/"), GET_OR_POST, HandlerKind::Echo);
        router.register(Pattern::Prefix("/user-agent"), GET_OR_POST, HandlerKind::UserAgent);
        router.register(Pattern::Capture("/files/"), GET_OR_POST, HandlerKind::Files);
        router
    }

    /// Registra una ruta al final de la tabla
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::Method;
    /// use http11_server::router::{HandlerKind, Pattern, Router};
    ///
    /// let mut router = Router::empty();
    /// router.register(Pattern::Capture("/say/"), &[Method::GET], HandlerKind::Echo);
    ///
    /// let matched = router.route(Method::GET, "/say/hi");
    /// assert_eq!(matched.handler, HandlerKind::Echo);
    /// assert_eq!(matched.param.as_deref(), Some("hi"));
    /// ```
    pub fn register(&mut self, pattern: Pattern, methods: &'static [Method], handler: HandlerKind) {
        self.routes.push(Route {
            pattern,
            methods,
            handler,
        });
    }

    /// Encuentra la primera ruta que coincide con el request
    pub fn route(&self, method: Method, path: &str) -> RouteMatch {
        self.routes
            .iter()
            .filter(|route| route.methods.contains(&method))
            .find_map(|route| {
                route.pattern.matches(path).map(|param| RouteMatch {
                    handler: route.handler,
                    param,
                })
            })
            .unwrap_or_else(RouteMatch::not_found)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
