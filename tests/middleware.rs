//! End-to-end ordering tests: middlewares record their names on the request
//! and the endpoint echoes the trail back.

use bytes::Bytes;
use http::StatusCode;
use ordo::middleware::{Entry, Middleware, Next};
use ordo::{App, Error, Request, Response, Router};

#[derive(Clone, Default)]
struct Trail(Vec<&'static str>);

fn tag(name: &'static str) -> impl Middleware {
    move |mut req: Request, next: Next| async move {
        {
            let ext = req.extensions_mut();
            match ext.get_mut::<Trail>() {
                Some(trail) => trail.0.push(name),
                None => {
                    ext.insert(Trail(vec![name]));
                }
            }
        }
        next.run(req).await
    }
}

fn entry(name: &'static str) -> Entry {
    Entry::new(name, tag(name))
}

async fn echo(req: Request) -> String {
    req.extensions()
        .get::<Trail>()
        .map(|t| t.0.join(","))
        .unwrap_or_default()
}

fn app() -> App {
    App::new(
        Router::new()
            .get("/", echo)
            .get("/one", echo)
            .get("/one/{rest}", echo)
            .get("/onetwo", echo)
            .get("/ONE", echo)
            .post("/one/submit", echo),
    )
}

async fn get(app: &App, path: &str) -> (StatusCode, String) {
    let req = http::Request::get(path).body(Bytes::new()).unwrap();
    let res = app.handle(req).await;
    let body = String::from_utf8(res.body().to_vec()).unwrap();
    (res.status_code(), body)
}

#[tokio::test]
async fn loads_middlewares() {
    let mut app = app();
    app.load_middlewares([entry("one"), entry("two"), entry("three")])
        .unwrap();
    app.finish();

    assert_eq!(get(&app, "/").await, (StatusCode::OK, "one,two,three".to_owned()));
    assert!(app.middlewares().is_empty());
    assert_eq!(app.pending_middlewares(), 0);
    assert_eq!(app.stack().len(), 3);
}

#[tokio::test]
async fn prepends_middlewares() {
    let mut app = app();
    app.middlewares()
        .load([entry("one"), entry("two")])
        .unwrap()
        .prepend([entry("three"), entry("four")])
        .unwrap();
    app.finish();

    assert_eq!(get(&app, "/").await.1, "three,four,one,two");
}

#[tokio::test]
async fn appends_middlewares_across_accessor_calls() {
    let mut app = app();
    app.load_middlewares([entry("three")])
        .unwrap()
        .prepend([entry("two")])
        .unwrap();

    app.middlewares()
        .append([entry("four"), entry("five")])
        .unwrap();

    app.finish();

    assert_eq!(get(&app, "/").await.1, "two,three,four,five");
}

#[tokio::test]
async fn inserts_before_and_after_another_middleware() -> Result<(), Error> {
    let mut app = app();
    app.load_middlewares([entry("three"), entry("four")])?
        .append([entry("five")])?
        .prepend([entry("one"), entry("two")])?;

    app.middlewares()
        .before("two", entry("b"))?
        .before("b", entry("a"))?
        .after("three", entry("c"))?
        .after("c", entry("d"))?;

    app.finish();

    assert_eq!(get(&app, "/").await.1, "one,a,b,two,three,c,d,four,five");
    Ok(())
}

#[tokio::test]
async fn pathed_middleware_only_runs_under_its_scope() {
    let mut app = app();
    app.load_middlewares([entry("one").path("/one"), entry("all")])
        .unwrap();
    app.finish();

    assert_eq!(get(&app, "/").await.1, "all");
    assert_eq!(get(&app, "/one").await.1, "one,all");
    assert_eq!(get(&app, "/one/deeper").await.1, "one,all");
    assert_eq!(get(&app, "/onetwo").await.1, "all");
    assert_eq!(get(&app, "/ONE").await.1, "one,all");
}

#[tokio::test]
async fn scoped_middleware_wraps_post_routes() {
    let mut app = app();
    app.load_middlewares([entry("all"), entry("one").path("/one")])
        .unwrap();
    app.finish();

    let req = http::Request::post("/one/submit")
        .body(Bytes::from_static(b"payload"))
        .unwrap();
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"all,one");
}

#[tokio::test]
async fn second_finish_does_not_duplicate_layers() {
    let mut app = app();
    app.load_middlewares([entry("one"), entry("two")]).unwrap();
    app.finish().finish();

    assert_eq!(app.stack().len(), 2);
    assert_eq!(get(&app, "/").await.1, "one,two");
}

#[tokio::test]
async fn fresh_sequence_after_commit_is_applied_after_the_first() {
    let mut app = app();
    app.load_middlewares([entry("one")]).unwrap();
    app.finish();
    assert!(app.middlewares().is_committed());

    app.load_middlewares([entry("one"), entry("two")]).unwrap();
    assert!(!app.middlewares().is_committed());
    assert_eq!(app.pending_middlewares(), 2);
    app.finish();

    assert_eq!(get(&app, "/").await.1, "one,one,two");
}

#[test]
fn every_entry_point_rejects_duplicate_names() {
    let mut app = App::default();
    app.load_middlewares([entry("one"), entry("two")]).unwrap();

    let dup = |r: Result<_, Error>| match r {
        Err(Error::DuplicateName(name)) => name,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("duplicate accepted"),
    };

    assert_eq!(dup(app.middlewares().append([entry("one")]).map(|_| ())), "one");
    assert_eq!(dup(app.middlewares().prepend([entry("two")]).map(|_| ())), "two");
    assert_eq!(dup(app.middlewares().before("two", entry("one")).map(|_| ())), "one");
    assert_eq!(dup(app.middlewares().after("one", entry("two")).map(|_| ())), "two");
    assert_eq!(dup(app.load_middlewares([entry("x"), entry("x")]).map(|_| ())), "x");

    assert_eq!(app.middlewares().names(), ["one", "two"]);
}

#[test]
fn unknown_target_is_reported_and_sequence_kept() {
    let mut app = App::default();
    app.load_middlewares([entry("one")]).unwrap();

    let err = app.middlewares().before("missing", entry("x")).unwrap_err();
    assert_eq!(err.to_string(), "Middleware named `missing` could not be found");

    let err = app.middlewares().after("absent", entry("y")).unwrap_err();
    assert!(matches!(err, Error::NotFound(ref name) if name == "absent"));

    assert_eq!(app.middlewares().names(), ["one"]);
}

#[tokio::test]
async fn middleware_can_short_circuit() {
    async fn deny(_req: Request, _next: Next) -> Response {
        Response::status(StatusCode::UNAUTHORIZED)
    }

    let mut app = app();
    app.load_middlewares([entry("one"), Entry::new("deny", deny).path("/one"), entry("two")])
        .unwrap();
    app.finish();

    assert_eq!(get(&app, "/").await, (StatusCode::OK, "one,two".to_owned()));
    assert_eq!(get(&app, "/one").await, (StatusCode::UNAUTHORIZED, String::new()));
}

#[tokio::test]
async fn middlewares_wrap_unrouted_requests_and_keep_params() {
    async fn stamp(req: Request, next: Next) -> Response {
        let mut res = next.run(req).await;
        res.set_header("x-stamped", "yes");
        res
    }

    async fn param(req: Request) -> String {
        req.param("rest").unwrap_or("none").to_owned()
    }

    let mut app = App::new(Router::new().get("/items/{rest}", param));
    app.load_middlewares([Entry::new("stamp", stamp)]).unwrap();
    app.finish();

    let res = app
        .handle(http::Request::get("/items/7").body(Bytes::new()).unwrap())
        .await;
    assert_eq!(res.body(), b"7");
    assert_eq!(res.header("x-stamped"), Some("yes"));

    let res = app
        .handle(http::Request::get("/nowhere").body(Bytes::new()).unwrap())
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.header("x-stamped"), Some("yes"));
}
