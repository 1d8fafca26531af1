//! Endpoint handler trait and type erasure.
//!
//! The router keeps handlers of different concrete types in one
//! `HashMap<Method, Tree>`, so each handler is boxed behind
//! `dyn ErasedHandler`:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()
//!        ↓
//! Arc::new(FnErased(hello))         stored as BoxedHandler
//!        ↓
//! handler.call(req)                 one vtable dispatch per request
//! ```
//!
//! Middlewares go through the same `FnErased` wrapper, see [`crate::middleware`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid endpoint handler.
///
/// Satisfied automatically by any `async fn` (or closure) of the form:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// Sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnErased(self))
    }
}

/// Holds a concrete function behind the erased traits. Shared by endpoint
/// handlers and [middlewares](crate::middleware::Middleware).
pub(crate) struct FnErased<F>(pub(crate) F);

/// Boxes `fut`, converting its output into a [`Response`].
pub(crate) fn respond<Fut, R>(fut: Fut) -> BoxFuture
where
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    Box::pin(async move { fut.await.into_response() })
}

impl<F, Fut, R> ErasedHandler for FnErased<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        respond((self.0)(req))
    }
}
