//! The frozen router and its per-request dispatcher.
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::{future, ready};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::Service;
use hyper::{Body, Request, Response, StatusCode};
use tracing::Level;

use crate::config::{Config, LogLevel};
use crate::handler::HandlerResult;
use crate::method::Method;
use crate::params::Params;
use crate::path;
use crate::table::{Endpoint, RouteMatch, RouteTable};

struct Inner {
    table: RouteTable,
    config: Config,
}

/// An immutable, cheaply cloneable router, built by [`Router::build`](crate::Router::build).
///
/// Every clone shares the same route table, so it can be handed to as many
/// connections as the server accepts without locking.
#[derive(Clone)]
pub struct RouterService(Arc<Inner>);

impl RouterService {
    pub(crate) fn new(table: RouteTable, config: Config) -> Self {
        RouterService(Arc::new(Inner { table, config }))
    }

    /// Lookup allows the manual resolution of a method and path without running
    /// the handler.
    /// ```rust
    /// use ngrouter::{BoxError, Router};
    /// use hyper::{Body, Method, Request, Response};
    ///
    /// let mut router = Router::new();
    /// router.get("/sup/:id/and/:this", |_: Request<Body>| async {
    ///     Ok::<_, BoxError>(Response::new(Body::empty()))
    /// });
    /// let service = router.build();
    ///
    /// let found = service.lookup(&Method::GET, "/sup/123/and/this").unwrap();
    /// assert_eq!(found.pattern, "/sup/:id/and/:this");
    /// assert_eq!(found.params.get("id"), Some("123"));
    ///
    /// assert!(service.lookup(&Method::GET, "/sup/123/foo/this").is_none());
    /// ```
    pub fn lookup(&self, method: &hyper::Method, path: &str) -> Option<RouteMatch<'_>> {
        self.resolve(method, path).map(|(endpoint, params)| RouteMatch {
            pattern: &endpoint.pattern,
            params,
        })
    }

    /// Returns the number of routes, one per method and pattern.
    pub fn len(&self) -> usize {
        self.0.table.len()
    }

    /// Returns true if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configuration the router was built with.
    pub fn config(&self) -> &Config {
        &self.0.config
    }

    fn resolve<'a>(
        &'a self,
        method: &hyper::Method,
        path: &str,
    ) -> Option<(&'a Endpoint, Params)> {
        let method = Method::from_http(method)?;
        let path = if self.0.config.remove_trailing_slash {
            path::trim_trailing_slash(path)
        } else {
            path
        };

        self.0.table.lookup(method, path)
    }

    /// Dispatches a request. This is the entry point a server calls once per
    /// request; you will generally not need it directly and can use
    /// [`Router::into_service`](crate::Router::into_service) instead.
    ///
    /// Unmatched requests get a `404 Not Found` without any handler or
    /// middleware running. If the handler chain fails, the response is a
    /// `500 Internal Server Error` carrying the error message.
    /// ```rust,no_run
    /// # use ngrouter::Router;
    /// # use hyper::service::{make_service_fn, service_fn};
    /// # use hyper::{Request, Body, Server};
    /// # use std::convert::Infallible;
    ///
    /// # async fn run() {
    /// let service = Router::new().build();
    ///
    /// let make_svc = make_service_fn(move |_| {
    ///     let service = service.clone();
    ///     async move {
    ///         Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
    ///             service.serve(req)
    ///         }))
    ///     }
    /// });
    ///
    /// let server = Server::bind(&([127, 0, 0, 1], 3000).into())
    ///     .serve(make_svc)
    ///     .await;
    /// # }
    /// ```
    pub fn serve(&self, mut req: Request<Body>) -> ResponseFut {
        let level = self.0.config.log_level;

        match self.resolve(req.method(), req.uri().path()) {
            Some((endpoint, params)) => {
                if level.allows(Level::DEBUG) {
                    tracing::debug!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        pattern = %endpoint.pattern,
                        "route matched"
                    );
                }

                req.extensions_mut().insert(params);

                ResponseFutKind::Boxed {
                    fut: endpoint.handler.call(req),
                    pattern: Arc::clone(&endpoint.pattern),
                    level,
                }
                .into()
            }
            None => {
                if level.allows(Level::DEBUG) {
                    tracing::debug!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        "no route matched"
                    );
                }

                ResponseFutKind::NotFound.into()
            }
        }
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.serve(req)
    }
}

#[doc(hidden)]
pub struct MakeRouterService(pub(crate) RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = Infallible;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

/// The response of a single dispatch.
pub struct ResponseFut {
    kind: ResponseFutKind,
}

impl From<ResponseFutKind> for ResponseFut {
    fn from(kind: ResponseFutKind) -> Self {
        Self { kind }
    }
}

enum ResponseFutKind {
    Boxed {
        fut: BoxFuture<'static, HandlerResult>,
        pattern: Arc<str>,
        level: LogLevel,
    },
    NotFound,
}

impl Future for ResponseFut {
    type Output = Result<Response<Body>, Infallible>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = match &mut self.kind {
            ResponseFutKind::Boxed {
                fut,
                pattern,
                level,
            } => match ready!(fut.as_mut().poll(cx)) {
                Ok(response) => response,
                Err(err) => {
                    if level.allows(Level::ERROR) {
                        tracing::error!(pattern = %pattern, error = %err, "handler failed");
                    }
                    plain_text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
            ResponseFutKind::NotFound => not_found(),
        };

        Poll::Ready(Ok(ready))
    }
}

pub(crate) fn not_found() -> Response<Body> {
    plain_text(StatusCode::NOT_FOUND, "404 page not found")
}

fn plain_text(status: StatusCode, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
