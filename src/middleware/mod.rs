//! Middleware layer.
//!
//! Middleware intercepts requests on their way to the endpoint and responses
//! on their way back. It is the right place for cross-cutting concerns:
//! tracing, request-id injection, authentication-header inspection.
//!
//! A middleware is any async function taking the [`Request`] and a [`Next`]
//! continuation:
//!
//! ```rust
//! use ordo::{Request, Response};
//! use ordo::middleware::Next;
//!
//! async fn request_id(mut req: Request, next: Next) -> Response {
//!     req.extensions_mut().insert(RequestId(42));
//!     let mut res = next.run(req).await;
//!     res.set_header("x-request-id", "42");
//!     res
//! }
//!
//! #[derive(Clone)]
//! struct RequestId(u64);
//! ```
//!
//! # Ordering
//!
//! Middlewares are not attached to the app one by one. They are collected as
//! named [`Entry`] values in a [`Registry`], rearranged there (load, prepend,
//! append, before/after another entry) and committed once with
//! [`Registry::finish`]. Committing hands every entry, in order, to a
//! [`Sink`]; the app's own sink is the [`Stack`] that runs per request.

mod entry;
mod registry;
mod sink;
mod stack;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, FnErased, respond};
use crate::request::Request;
use crate::response::IntoResponse;
use crate::router::Router;

pub use entry::Entry;
pub use registry::Registry;
pub use sink::Sink;
pub use stack::Stack;

use stack::Layer;

// ── Type erasure ──────────────────────────────────────────────────────────────

#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

/// A heap-allocated, type-erased middleware, as handed to a [`Sink`].
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware.
///
/// Satisfied automatically by any `async fn` (or closure) of the form:
///
/// ```text
/// async fn name(req: Request, next: Next) -> impl IntoResponse
/// ```
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnErased(self))
    }
}

impl<F, Fut, R> ErasedMiddleware for FnErased<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        respond((self.0)(req, next))
    }
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The rest of the chain: every remaining middleware that applies to the
/// request's path, then the routed endpoint.
///
/// Dropping `Next` without calling [`run`](Next::run) short-circuits the chain.
pub struct Next {
    layers: Arc<Vec<Layer>>,
    cursor: usize,
    router: Arc<Router>,
}

impl Next {
    pub(crate) fn new(layers: Arc<Vec<Layer>>, router: Arc<Router>) -> Self {
        Self { layers, cursor: 0, router }
    }

    /// Passes `req` to the next applicable middleware, or to the endpoint
    /// once the stack is exhausted.
    pub fn run(mut self, req: Request) -> BoxFuture {
        while let Some(layer) = self.layers.get(self.cursor) {
            self.cursor += 1;
            if layer.applies_to(req.path()) {
                let middleware = Arc::clone(&layer.middleware);
                return middleware.call(req, self);
            }
        }

        let router = Arc::clone(&self.router);
        Box::pin(async move { router.dispatch(req).await })
    }
}
