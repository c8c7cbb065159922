use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hyper::{Body, Method, Request, Response, StatusCode};
use ngrouter::{
    middleware, BoxError, BoxHandler, Config, Handler, LogLevel, Params, RequestExt, Router,
    RouterService,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn quiet() -> Router {
    init_tracing();
    Router::with_config(Config::default().log_level(LogLevel::Quiet))
}

async fn text(body: &'static str) -> Result<Response<Body>, BoxError> {
    Ok(Response::new(Body::from(body)))
}

fn reply(body: &'static str) -> impl Handler {
    move |_: Request<Body>| text(body)
}

async fn call(service: &RouterService, method: Method, path: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let res = service.serve(req).await.unwrap();
    let status = res.status();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn get() {
    let mut router = quiet();
    router.get("/", reply("ok"));
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/").await, (StatusCode::OK, "ok".to_owned()));
}

#[tokio::test]
async fn each_method() {
    let mut router = quiet();
    router
        .post("/", reply("post"))
        .put("/", reply("put"))
        .patch("/", reply("patch"))
        .delete("/", reply("delete"));
    let service = router.build();

    assert_eq!(call(&service, Method::POST, "/").await.1, "post");
    assert_eq!(call(&service, Method::PUT, "/").await.1, "put");
    assert_eq!(call(&service, Method::PATCH, "/").await.1, "patch");
    assert_eq!(call(&service, Method::DELETE, "/").await.1, "delete");
    assert_eq!(call(&service, Method::GET, "/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn all() {
    let mut router = quiet();
    router.all("/", reply("ok"));
    let service = router.build();

    for method in [Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE] {
        assert_eq!(call(&service, method, "/").await, (StatusCode::OK, "ok".to_owned()));
    }
}

#[tokio::test]
async fn head_and_options_are_not_synthesized() {
    let mut router = quiet();
    router.all("/", reply("ok"));
    let service = router.build();

    assert_eq!(call(&service, Method::HEAD, "/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(call(&service, Method::OPTIONS, "/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn error_response() {
    let mut router = quiet();
    router.get("/error-method", |_: Request<Body>| async {
        Err::<Response<Body>, BoxError>("something bad".into())
    });
    let service = router.build();

    let (status, body) = call(&service, Method::GET, "/error-method").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "something bad");
}

#[tokio::test]
async fn middleware_failure_is_a_server_error() {
    let mut router = quiet();
    router.middleware(middleware::from_fn(|_: Request<Body>, _: BoxHandler| async {
        Err::<Response<Body>, BoxError>("blocked".into())
    }));
    router.get("/", reply("ok"));
    let service = router.build();

    assert_eq!(
        call(&service, Method::GET, "/").await,
        (StatusCode::INTERNAL_SERVER_ERROR, "blocked".to_owned())
    );
}

#[tokio::test]
async fn not_found_runs_nothing() {
    let hits = Arc::new(AtomicUsize::new(0));

    let mut router = quiet();
    let counter = Arc::clone(&hits);
    router.middleware(middleware::from_fn(move |req: Request<Body>, next: BoxHandler| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { next.call(req).await }
    }));
    let counter = Arc::clone(&hits);
    router.get("/hi", move |_: Request<Body>| {
        counter.fetch_add(1, Ordering::SeqCst);
        text("hi")
    });
    let service = router.build();

    let (status, _) = call(&service, Method::GET, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    call(&service, Method::GET, "/hi").await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn static_route_wins_over_param_route() {
    let mut router = quiet();
    router.get("/users/:id", reply("param"));
    router.get("/users/me", reply("static"));
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/users/me").await.1, "static");
    assert_eq!(call(&service, Method::GET, "/users/42").await.1, "param");
}

#[tokio::test]
async fn last_static_registration_wins() {
    let mut router = quiet();
    router.get("/hi", reply("first"));
    router.get("/hi", reply("second"));
    let service = router.build();

    assert_eq!(service.len(), 1);
    assert_eq!(call(&service, Method::GET, "/hi").await.1, "second");
}

#[tokio::test]
async fn first_param_registration_wins() {
    let mut router = quiet();
    router.get("/items/:id", reply("first"));
    router.get("/items/{name}", reply("second"));
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/items/7").await.1, "first");
}

#[tokio::test]
async fn params_reach_the_handler() {
    let mut router = quiet();
    router.get("/sup/:id/and/:this", |req: Request<Body>| async move {
        let params = req.params().cloned().unwrap_or_default();
        let body = format!("{}:{}", params.get("id").unwrap_or(""), params.get("this").unwrap_or(""));
        Ok::<_, BoxError>(Response::new(Body::from(body)))
    });
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/sup/123/and/this").await.1, "123:this");
    assert_eq!(call(&service, Method::GET, "/sup/123/foo/this").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_routes_get_empty_params() {
    let mut router = quiet();
    router.get("/hi", |req: Request<Body>| async move {
        let params = req.extensions().get::<Params>().cloned();
        assert_eq!(params, Some(Params::new()));
        text("hi").await
    });
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/hi").await.0, StatusCode::OK);
}

fn routing_tree() -> RouterService {
    let mut router = quiet();
    router.get("/", reply("h1"));
    router.get("/hi", reply("h2"));
    router.get("/sup/:id/and/:this", reply("h3"));

    let sharing = router.group("/sharing/:x/:hash");
    sharing.get("/", reply("h4"));
    sharing.get("/{network}", reply("h5"));
    sharing.get("/twitter", reply("h5-twitter"));

    let direct = router.group("/direct");
    direct.get("/", reply("h6"));
    direct.get("/download", reply("h6-download"));

    router.build()
}

#[tokio::test]
async fn groups() {
    let service = routing_tree();

    let cases = [
        ("/", StatusCode::OK, "h1"),
        ("/hi", StatusCode::OK, "h2"),
        ("/sup/123/and/this", StatusCode::OK, "h3"),
        ("/sup/123/foo/this", StatusCode::NOT_FOUND, "404 page not found"),
        ("/sharing/z/aBc", StatusCode::OK, "h4"),
        // registered before the static-suffixed route, so it takes the path
        ("/sharing/z/aBc/twitter", StatusCode::OK, "h5"),
        ("/sharing/z/aBc/direct", StatusCode::OK, "h5"),
        ("/sharing/z/aBc/direct/download", StatusCode::NOT_FOUND, "404 page not found"),
        ("/direct", StatusCode::OK, "h6"),
        ("/direct/download", StatusCode::OK, "h6-download"),
    ];

    for (path, status, body) in cases {
        assert_eq!(call(&service, Method::GET, path).await, (status, body.to_owned()), "{}", path);
    }
}

#[tokio::test]
async fn group_params_are_bound() {
    let service = routing_tree();

    let found = service.lookup(&Method::GET, "/sharing/z/aBc/twitter").unwrap();
    assert_eq!(found.params.get("x"), Some("z"));
    assert_eq!(found.params.get("hash"), Some("aBc"));
    assert_eq!(found.params.get("network"), Some("twitter"));
}

#[tokio::test]
async fn group_static_route_reachable() {
    let mut router = quiet();
    let sharing = router.group("/sharing/:x/:hash");
    sharing.get("/twitter", |req: Request<Body>| async move {
        let body = format!("{}/{}", req.param("x").unwrap_or(""), req.param("hash").unwrap_or(""));
        Ok::<_, BoxError>(Response::new(Body::from(body)))
    });
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/sharing/z/aBc/twitter").await.1, "z/aBc");
    assert_eq!(call(&service, Method::GET, "/twitter").await.0, StatusCode::NOT_FOUND);
}

type Trace = Arc<Mutex<Vec<&'static str>>>;

fn tag(name: &'static str, trace: Trace) -> impl ngrouter::Middleware {
    middleware::from_fn(move |req: Request<Body>, next: BoxHandler| {
        let trace = Arc::clone(&trace);
        async move {
            trace.lock().unwrap().push(name);
            next.call(req).await
        }
    })
}

#[tokio::test]
async fn middleware_runs_in_registration_order() {
    let trace: Trace = Arc::default();

    let mut router = quiet();
    router.middleware(tag("first", trace.clone()));
    router.middleware(tag("second", trace.clone()));
    router.get("/", reply("ok"));
    let service = router.build();

    call(&service, Method::GET, "/").await;
    assert_eq!(*trace.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test]
async fn with_scopes_middleware_to_the_child() {
    let trace: Trace = Arc::default();

    let mut router = quiet();
    router.middleware(tag("global", trace.clone()));
    router.get("/public", reply("public"));

    let admin = router.with(tag("admin", trace.clone()));
    admin.get("/admin", reply("admin"));

    assert_eq!(router.middleware_count(), 1);
    let service = router.build();

    call(&service, Method::GET, "/public").await;
    assert_eq!(*trace.lock().unwrap(), vec!["global"]);

    trace.lock().unwrap().clear();
    call(&service, Method::GET, "/admin").await;
    assert_eq!(*trace.lock().unwrap(), vec!["global", "admin"]);
}

#[tokio::test]
async fn with_keeps_base_middleware_count() {
    let trace: Trace = Arc::default();

    let mut router = quiet();
    router.middleware(tag("a", trace.clone()));
    router.middleware(tag("b", trace.clone()));
    router.middleware(tag("c", trace.clone()));

    let child = router.with(tag("d", trace));
    assert!(child.parent().is_some());
    assert_eq!(child.middleware_count(), 4);

    assert_eq!(router.middleware_count(), 3);
}

#[tokio::test]
async fn group_middleware_is_a_snapshot() {
    let trace: Trace = Arc::default();

    let mut router = quiet();
    router.middleware(tag("before", trace.clone()));
    router.group("/api").get("/ping", reply("pong"));
    router.middleware(tag("after", trace.clone()));
    router.get("/root", reply("root"));
    let service = router.build();

    call(&service, Method::GET, "/api/ping").await;
    assert_eq!(*trace.lock().unwrap(), vec!["before"]);

    trace.lock().unwrap().clear();
    call(&service, Method::GET, "/root").await;
    assert_eq!(*trace.lock().unwrap(), vec!["before", "after"]);
}

#[tokio::test]
async fn trailing_slash_removed_by_default() {
    let mut router = quiet();
    router.get("/users", reply("users"));
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/users/").await.1, "users");
    assert_eq!(call(&service, Method::GET, "/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trailing_slash_kept_when_disabled() {
    init_tracing();
    let mut router = Router::with_config(
        Config::default()
            .log_level(LogLevel::Quiet)
            .remove_trailing_slash(false),
    );
    router.get("/users", reply("users"));
    router.get("/users/", reply("users/"));
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/users").await.1, "users");
    assert_eq!(call(&service, Method::GET, "/users/").await.1, "users/");
}

#[tokio::test]
async fn hyper_service() {
    use hyper::service::Service;

    let mut router = quiet();
    router.get("/", reply("ok"));
    let mut make = router.into_service();

    let mut service: RouterService = make.call(()).await.unwrap();
    let res = service
        .call(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn serves_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("test.html"), "<html><body><h1>Test Page</h1></body></html>").unwrap();

    let mut router = quiet();
    router.get(
        "/static/:file",
        ngrouter::FileServer::new(dir.path()).prefix("/static/").into_handler(),
    );
    let service = router.build();

    assert_eq!(
        call(&service, Method::GET, "/static/test.html").await,
        (StatusCode::OK, "<html><body><h1>Test Page</h1></body></html>".to_owned())
    );
    assert_eq!(call(&service, Method::GET, "/static/missing.html").await.0, StatusCode::NOT_FOUND);
}

#[test]
#[should_panic(expected = "unterminated parameter")]
fn malformed_pattern_is_fatal() {
    quiet().get("/users/{id", reply("never"));
}

#[tokio::test]
async fn nested_groups_and_with_on_a_group() {
    let trace: Trace = Arc::default();

    let mut router = quiet();
    let api = router.group("/api");
    api.middleware(tag("api", trace.clone()));
    let v1 = api.group("/v1");
    v1.get("/users/:id", |req: Request<Body>| async move {
        let id = req.param("id").unwrap_or("").to_owned();
        Ok::<_, BoxError>(Response::new(Body::from(id)))
    });
    v1.with(tag("auth", trace.clone())).get("/admin", reply("admin"));
    let service = router.build();

    assert_eq!(call(&service, Method::GET, "/api/v1/users/7").await, (StatusCode::OK, "7".to_owned()));
    assert_eq!(*trace.lock().unwrap(), vec!["api"]);

    trace.lock().unwrap().clear();
    assert_eq!(call(&service, Method::GET, "/api/v1/admin").await, (StatusCode::OK, "admin".to_owned()));
    assert_eq!(*trace.lock().unwrap(), vec!["api", "auth"]);

    assert_eq!(call(&service, Method::GET, "/v1/admin").await.0, StatusCode::NOT_FOUND);
    assert_eq!(call(&service, Method::GET, "/admin").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn middleware_wraps_once_per_route() {
    let wraps = Arc::new(AtomicUsize::new(0));

    let mut router = quiet();
    let counter = Arc::clone(&wraps);
    router.middleware(move |next: BoxHandler| -> BoxHandler {
        counter.fetch_add(1, Ordering::SeqCst);
        next
    });
    router.get("/", reply("ok"));
    let service = router.build();
    assert_eq!(wraps.load(Ordering::SeqCst), 1);

    for _ in 0..3 {
        assert_eq!(call(&service, Method::GET, "/").await.1, "ok");
    }
    assert_eq!(wraps.load(Ordering::SeqCst), 1);
}
