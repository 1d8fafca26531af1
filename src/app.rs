//! The application: endpoint router plus middleware stack.

use std::sync::Arc;

use tracing::warn;

use crate::error::Error;
use crate::middleware::{Entry, Next, Registry, Stack};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// An application ready to be served.
///
/// Owns the [`Router`], the committed middleware [`Stack`] and, once first
/// asked for, the [`Registry`] where middlewares are ordered before
/// [`finish`](App::finish) commits them into the stack.
///
/// ```rust
/// use ordo::{App, Request, Response, Router};
/// use ordo::middleware::{Entry, Next};
///
/// async fn hello(_req: Request) -> &'static str { "hello" }
/// async fn pass(req: Request, next: Next) -> Response { next.run(req).await }
///
/// # fn main() -> Result<(), ordo::Error> {
/// let mut app = App::new(Router::new().get("/", hello));
/// app.load_middlewares([Entry::new("trace", pass)])?;
/// app.middlewares().append([Entry::new("auth", pass).path("/admin")])?;
/// app.finish();
/// # Ok(())
/// # }
/// ```
pub struct App {
    router: Arc<Router>,
    stack: Stack,
    registry: Option<Registry>,
}

impl App {
    pub fn new(router: Router) -> Self {
        Self { router: Arc::new(router), stack: Stack::new(), registry: None }
    }

    /// The middleware registry, created on first access.
    pub fn middlewares(&mut self) -> &mut Registry {
        self.registry.get_or_insert_with(Registry::new)
    }

    /// Shortcut for `app.middlewares().load(entries)`.
    pub fn load_middlewares(
        &mut self,
        entries: impl IntoIterator<Item = Entry>,
    ) -> Result<&mut Registry, Error> {
        self.middlewares().load(entries)
    }

    /// Commits the registry into this app's [`Stack`].
    ///
    /// A second call with nothing new in the registry logs a warning and
    /// leaves the stack alone.
    pub fn finish(&mut self) -> &mut Self {
        let registry = self.registry.get_or_insert_with(Registry::new);
        registry.finish(&mut self.stack);
        self
    }

    /// The committed middleware stack.
    pub fn stack(&self) -> &Stack { &self.stack }

    /// Number of entries still waiting in the registry for [`finish`](App::finish).
    pub fn pending_middlewares(&self) -> usize {
        self.registry.as_ref().map_or(0, Registry::len)
    }

    /// Logs a warning when entries are still waiting in the registry. They
    /// never run unless [`finish`](App::finish) commits them. Returns whether
    /// anything was pending.
    pub(crate) fn warn_if_unapplied(&self) -> bool {
        let pending = self.pending_middlewares();
        if pending > 0 {
            warn!(pending, "serving with middlewares that were never applied; call App::finish first");
        }
        pending > 0
    }

    /// Runs `req` through the committed stack and then its endpoint.
    ///
    /// This is what the [`Server`](crate::Server) calls per request; it is
    /// public so an app can be exercised without a socket.
    pub async fn handle(&self, req: impl Into<Request>) -> Response {
        Next::new(self.stack.layers(), Arc::clone(&self.router))
            .run(req.into())
            .await
    }
}

impl Default for App {
    fn default() -> Self { Self::new(Router::new()) }
}

impl From<Router> for App {
    fn from(router: Router) -> Self { Self::new(router) }
}
