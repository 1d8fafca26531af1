//! Minimal ordo example — a couple of endpoints behind an ordered middleware stack.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/users/42
//!   curl -i http://localhost:3000/admin/stats
//!   curl -i -H 'authorization: Bearer x' http://localhost:3000/admin/stats

use std::time::Instant;

use http::StatusCode;
use ordo::middleware::{Entry, Next};
use ordo::{App, Request, Response, Router, Server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ordo::Error> {
    tracing_subscriber::fmt::init();

    let router = Router::new()
        .get("/users/{id}", get_user)
        .get("/admin/stats", stats);

    let mut app = App::new(router);

    // A "framework default" stack...
    app.load_middlewares([
        Entry::new("timing", timing),
        Entry::new("auth", auth).path("/admin"),
    ])?;

    // ...that the application rearranges before committing it.
    app.middlewares()
        .prepend([Entry::new("request-id", request_id)])?
        .before("auth", Entry::new("audit", audit).path("/admin"))?;

    app.finish();

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

#[derive(Clone)]
struct RequestId(u64);

async fn request_id(mut req: Request, next: Next) -> Response {
    static NEXT_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
    let id = NEXT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    req.extensions_mut().insert(RequestId(id));

    let mut res = next.run(req).await;
    res.set_header("x-request-id", &id.to_string());
    res
}

async fn timing(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let path = req.path().to_owned();
    let res = next.run(req).await;
    info!(%path, status = %res.status_code(), elapsed = ?started.elapsed(), "request");
    res
}

async fn audit(req: Request, next: Next) -> Response {
    let id = req.extensions().get::<RequestId>().map_or(0, |r| r.0);
    info!(request_id = id, path = req.path(), "admin access");
    next.run(req).await
}

async fn auth(req: Request, next: Next) -> Response {
    if req.header("authorization").is_none() {
        return Response::status(StatusCode::UNAUTHORIZED);
    }
    next.run(req).await
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// GET /admin/stats
async fn stats(_req: Request) -> Response {
    Response::json(br#"{"users":1}"#.to_vec())
}
