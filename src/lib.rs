//! # ordo
//!
//! A minimal HTTP framework for Rust services behind a reverse proxy, with
//! one opinion: middleware order is configuration, and configuration should
//! be easy to rearrange before it is frozen.
//!
//! Middlewares are registered as named [`Entry`](middleware::Entry) values in
//! the app's [`Registry`](middleware::Registry). The registry can be loaded,
//! prepended to, appended to, and spliced relative to an existing entry by
//! name, so a library can hand out a default stack and an application can
//! slot its own middlewares in between. [`App::finish`] commits the final
//! order once; after that the stack is fixed for the life of the server.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ordo::{App, Request, Response, Router, Server};
//! use ordo::middleware::{Entry, Next};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ordo::Error> {
//!     let mut app = App::new(Router::new().get("/users/{id}", get_user));
//!
//!     app.load_middlewares([
//!         Entry::new("trace", trace),
//!         Entry::new("auth", auth).path("/admin"),
//!     ])?
//!     .before("auth", Entry::new("request-id", trace))?;
//!
//!     app.finish();
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn trace(req: Request, next: Next) -> Response {
//!     next.run(req).await
//! }
//!
//! async fn auth(req: Request, next: Next) -> Response {
//!     if req.header("authorization").is_none() {
//!         return Response::status(http::StatusCode::UNAUTHORIZED);
//!     }
//!     next.run(req).await
//! }
//! ```

mod app;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use app::App;
pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
