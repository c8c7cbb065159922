//! # ngrouter
//!
//! ngrouter is a small HTTP request router for [hyper](https://hyper.rs).
//!
//! Routes are registered per method against patterns with named parameters,
//! can be grouped below a common prefix, and run through an ordered chain of
//! middleware. Registration and serving are two separate phases: a
//! [`Router`] is built up once at startup and then frozen into an immutable
//! [`RouterService`] that is shared by every connection.
//!
//! ## Features
//!
//! **Static routes first:** A request path that matches a static route is
//! always served by it, even if a parameterized route would match as well.
//! Static lookups are a single hash map access.
//!
//! **First registered, first matched:** Parameterized routes are tried in the
//! order they were registered, across all groups. There is no specificity
//! scoring: if `/users/:id` was registered before `/users/{name}`, it wins.
//!
//! **Route groups:** [`Router::group`] mounts a child router below a prefix,
//! which may itself contain parameters. Groups nest.
//!
//! **Scoped middleware:** [`Router::middleware`] wraps every route of a
//! router; [`Router::with`] derives a child that carries one extra
//! middleware without touching its parent.
//!
//! **Failures become responses:** A handler returns `Result`. When it, or any
//! middleware around it, fails, the router answers with
//! `500 Internal Server Error` and the error message as body.
//!
//! ## Usage
//!
//! Here is a simple example:
//!
//! ```rust,no_run
//! use ngrouter::{BoxError, Router, RequestExt};
//! use hyper::{Request, Response, Body};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, BoxError> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn hello(req: Request<Body>) -> Result<Response<Body>, BoxError> {
//!     let user = req.param("user").ok_or("missing user")?;
//!     Ok(Response::new(format!("Hello, {}", user).into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut router = Router::new();
//!     router.get("/", index);
//!     router.get("/hello/:user", hello);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await;
//! }
//! ```
//!
//! ### Named parameters
//!
//! As you can see, `:user` is a *named parameter*. `{user}` means the same.
//! The values are accessible through [`RequestExt::param`], or as a whole via
//! `req.extensions().get::<Params>()`.
//!
//! Named parameters only match a single, non-empty path segment:
//!
//! ```ignore
//! Pattern: /user/:user
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! ### Groups and middleware
//!
//! ```rust
//! use ngrouter::{middleware, BoxError, BoxHandler, Router};
//! use hyper::{Body, Request, Response};
//!
//! async fn ok(_: Request<Body>) -> Result<Response<Body>, BoxError> {
//!     Ok(Response::new(Body::empty()))
//! }
//!
//! let mut router = Router::new();
//! router.middleware(middleware::from_fn(|req: Request<Body>, next: BoxHandler| async move {
//!     tracing::info!(path = %req.uri().path(), "request");
//!     next.call(req).await
//! }));
//!
//! let sharing = router.group("/sharing/:x/:hash");
//! sharing.get("/", ok);
//! sharing.get("/{network}", ok);
//! sharing.get("/twitter", ok);
//!
//! let direct = router.group("/direct");
//! direct.get("/", ok);
//! direct.get("/download", ok);
//!
//! let service = router.build();
//! assert_eq!(service.len(), 5);
//! ```
//!
//! ### Configuration
//!
//! [`Config`] carries the two switches the router reads: whether a single
//! trailing slash is stripped from request paths (on by default), and how much
//! the router logs through [`tracing`].
//!
//! ### Not Found
//!
//! Requests that match no route, including requests with a method outside
//! [`Method`], get a plain `404 Not Found` without any handler or middleware
//! running.
//!
//! ### Static files
//!
//! You can use the router to serve pages from a static file directory:
//!
//! ```rust,no_run
//! use ngrouter::{FileServer, Router};
//!
//! let mut router = Router::new();
//! router.get("/static/:file", FileServer::new("./public").into_handler());
//! ```

#![forbid(unsafe_code)]

pub mod path;

#[doc(hidden)]
pub mod router;

pub mod middleware;

mod config;
mod error;
mod fs;
mod handler;
mod method;
mod params;
mod service;
mod table;

#[doc(inline)]
pub use router::Router;

pub use config::{Config, LogLevel};
pub use error::{BoxError, PatternError};
pub use fs::FileServer;
pub use handler::{BoxHandler, Handler, HandlerResult};
pub use method::Method;
pub use middleware::Middleware;
pub use params::{Params, RequestExt};
pub use service::{MakeRouterService, ResponseFut, RouterService};
pub use table::RouteMatch;

// test the code examples in README.md
#[cfg(doctest)]
mod test_readme {
    macro_rules! doc_comment {
        ($x:expr) => {
            #[doc = $x]
            extern "C" {}
        };
    }

    doc_comment!(include_str!("../README.md"));
}
