//! [`Router`](crate::Router) is the registration side of the router: a tree
//! of nodes, each owning its routes, its middleware and a mount prefix.
//!
//! ```rust,no_run
//! use ngrouter::{BoxError, Router, RequestExt};
//! use hyper::{Request, Response, Body};
//!
//! async fn index(_: Request<Body>) -> Result<Response<Body>, BoxError> {
//!     Ok(Response::new("Hello, World!".into()))
//! }
//!
//! async fn share(req: Request<Body>) -> Result<Response<Body>, BoxError> {
//!     let hash = req.param("hash").unwrap_or_default();
//!     Ok(Response::new(format!("shared {}", hash).into()))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut router = Router::new();
//!     router.get("/", index);
//!     router.group("/sharing/:x/:hash").get("/twitter", share);
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await;
//! }
//!```
//!
//! The registered pattern, against which the router matches incoming requests,
//! can contain named parameters:
//! ```ignore
//!  Syntax    Type
//!  :name     named parameter
//!  {name}    named parameter
//! ```
//!
//! Named parameters match exactly one non-empty path segment:
//! ```ignore
//!  Path: /blog/:category/:post
//! ```
//!
//!  Requests:
//! ```ignore
//!   /blog/rust/request-routers            match: category="rust", post="request-routers"
//!   /blog/rust/request-routers/           match if trailing slashes are removed
//!   /blog/rust/                           no match
//!   /blog/rust/request-routers/comments   no match
//! ```
//!
//! A request can match more than one pattern. Static routes always win over
//! parameterized ones; among parameterized routes the one registered first
//! wins, across every group of the router.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::Level;

use crate::config::Config;
use crate::error::PatternError;
use crate::handler::{BoxHandler, Handler};
use crate::method::Method;
use crate::middleware::{Chain, Middleware};
use crate::path;
use crate::service::{MakeRouterService, RouterService};
use crate::table::{Route, RouteTable};

/// Router dispatches requests to different handlers via configurable routes.
///
/// A `Router` is only used while routes are being registered. Once
/// everything is in place, [`build`](Router::build) freezes it into a
/// [`RouterService`] that serves requests.
pub struct Router {
    config: Config,
    prefix: String,
    parent: Option<String>,
    middlewares: Chain,
    routes: Vec<Route>,
    children: Vec<Router>,
    sequence: Arc<AtomicUsize>,
}

impl Router {
    /// Creates a root router with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a root router.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            prefix: String::new(),
            parent: None,
            middlewares: Chain::default(),
            routes: Vec::new(),
            children: Vec::new(),
            sequence: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Insert a handler into the router for a specific pattern at the specified method.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed. Use [`try_handle`](Router::try_handle)
    /// to get the error instead.
    /// ```rust
    /// use ngrouter::{BoxError, Method, Router};
    /// use hyper::{Body, Request, Response};
    ///
    /// let mut router = Router::new();
    /// router.handle(Method::Get, "/teapot", |_: Request<Body>| async {
    ///     Ok::<_, BoxError>(Response::new(Body::from("I am a teapot!")))
    /// });
    /// ```
    pub fn handle(&mut self, method: Method, pattern: &str, handler: impl Handler) -> &mut Self {
        if let Err(err) = self.register(method, pattern, Arc::new(handler)) {
            panic!("{}", err);
        }
        self
    }

    /// Like [`handle`](Router::handle), but returns malformed patterns as an error.
    /// ```rust
    /// use ngrouter::{BoxError, Method, PatternError, Router};
    /// use hyper::{Body, Request, Response};
    ///
    /// let mut router = Router::new();
    /// let err = router
    ///     .try_handle(Method::Get, "/users/:id/:id", |_: Request<Body>| async {
    ///         Ok::<_, BoxError>(Response::new(Body::empty()))
    ///     })
    ///     .err()
    ///     .unwrap();
    ///
    /// assert!(matches!(err, PatternError::DuplicateParam { .. }));
    /// ```
    pub fn try_handle(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> Result<&mut Self, PatternError> {
        self.register(method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a handler for `GET` requests
    pub fn get(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::Get, pattern, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::Post, pattern, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::Put, pattern, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::Patch, pattern, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::Delete, pattern, handler)
    }

    /// Register a handler for every method in [`Method::ALL`].
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed.
    pub fn all(&mut self, pattern: &str, handler: impl Handler) -> &mut Self {
        if let Err(err) = self.try_all(pattern, handler) {
            panic!("{}", err);
        }
        self
    }

    /// Like [`all`](Router::all), but returns malformed patterns as an error.
    pub fn try_all(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, PatternError> {
        let handler: BoxHandler = Arc::new(handler);
        for method in Method::ALL {
            self.register(method, pattern, Arc::clone(&handler))?;
        }
        Ok(self)
    }

    fn register(&mut self, method: Method, pattern: &str, handler: BoxHandler) -> Result<(), PatternError> {
        let mut full = path::join(&self.prefix, pattern);
        if self.config.remove_trailing_slash {
            full.truncate(path::trim_trailing_slash(&full).len());
        }

        let compiled = path::compile(&full)?;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        if self.config.log_level.allows(Level::INFO) {
            tracing::info!(method = %method, pattern = %full, "route registered");
        }

        self.routes.push(Route {
            seq,
            method,
            compiled,
            handler,
        });
        Ok(())
    }

    /// Appends a middleware to this router.
    ///
    /// It applies to every route registered on this router, including routes
    /// registered before the call. Groups and [`with`](Router::with) children
    /// created earlier keep the chain they were created with.
    pub fn middleware(&mut self, middleware: impl Middleware) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Returns a child router serving under the same prefix, whose chain is
    /// this router's chain plus `middleware`.
    ///
    /// Routes registered on the child get the extra middleware; this
    /// router's own chain and routes are left untouched.
    /// ```rust
    /// use ngrouter::{BoxError, BoxHandler, Router};
    /// use hyper::{Body, Request, Response};
    ///
    /// fn noop(next: BoxHandler) -> BoxHandler {
    ///     next
    /// }
    ///
    /// let mut router = Router::new();
    /// router.middleware(noop);
    ///
    /// let admin = router.with(noop);
    /// admin.get("/admin", |_: Request<Body>| async {
    ///     Ok::<_, BoxError>(Response::new(Body::empty()))
    /// });
    /// assert_eq!(admin.middleware_count(), 2);
    ///
    /// assert_eq!(router.middleware_count(), 1);
    /// ```
    pub fn with(&mut self, middleware: impl Middleware) -> &mut Router {
        let chain = self.middlewares.with(Arc::new(middleware));
        self.child(self.prefix.clone(), chain)
    }

    /// Returns a child router mounted at `prefix` below this router.
    ///
    /// The child starts with a copy of this router's middleware chain.
    /// Middleware added here afterwards does not reach it.
    /// ```rust
    /// use ngrouter::{BoxError, Router};
    /// use hyper::{Body, Method, Request, Response};
    ///
    /// let mut router = Router::new();
    /// router
    ///     .group("/sharing/:x/:hash")
    ///     .get("/twitter", |_: Request<Body>| async {
    ///         Ok::<_, BoxError>(Response::new(Body::empty()))
    ///     });
    ///
    /// let service = router.build();
    /// let found = service.lookup(&Method::GET, "/sharing/z/aBc/twitter").unwrap();
    /// assert_eq!(found.params.get("x"), Some("z"));
    /// assert_eq!(found.params.get("hash"), Some("aBc"));
    /// ```
    pub fn group(&mut self, prefix: &str) -> &mut Router {
        let prefix = path::join(&self.prefix, prefix);
        let chain = self.middlewares.clone();
        self.child(prefix, chain)
    }

    fn child(&mut self, prefix: String, middlewares: Chain) -> &mut Router {
        let child = Router {
            config: self.config.clone(),
            prefix,
            parent: Some(self.mount_path().to_owned()),
            middlewares,
            routes: Vec::new(),
            children: Vec::new(),
            sequence: Arc::clone(&self.sequence),
        };

        if self.config.log_level.allows(Level::TRACE) {
            tracing::trace!(parent = %self.mount_path(), prefix = %child.mount_path(), "child router created");
        }

        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// The path this router is mounted at.
    pub fn mount_path(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    /// The mount path of the router this one was derived from, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Number of middleware wrapping routes registered on this router.
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// The configuration shared by every node of this router.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Freezes the router into a [`RouterService`].
    ///
    /// All nodes are flattened into one route table, replaying registrations
    /// in the order they happened. A static route registered twice for the
    /// same method keeps the last handler.
    pub fn build(self) -> RouterService {
        let config = self.config.clone();

        let mut routes = Vec::new();
        self.flatten(&mut routes);
        routes.sort_by_key(|(route, _)| route.seq);

        let mut table = RouteTable::default();
        for (route, chain) in routes {
            let method = route.method;
            if let Some(replaced) = table.insert(route, chain) {
                if config.log_level.allows(Level::WARN) {
                    tracing::warn!(method = %method, pattern = %replaced.pattern, "route replaced");
                }
            }
        }

        RouterService::new(table, config)
    }

    fn flatten(self, out: &mut Vec<(Route, Chain)>) {
        let Router {
            middlewares,
            routes,
            children,
            ..
        } = self;

        out.extend(routes.into_iter().map(|route| (route, middlewares.clone())));
        for child in children {
            child.flatten(out);
        }
    }

    /// Converts the `Router` into a `Service` which you can serve directly with `Hyper`.
    /// If you have an existing `Service` that you want to incorporate a `Router` into, see
    /// [`RouterService::serve`](crate::RouterService::serve).
    /// ```rust,no_run
    /// # use ngrouter::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// // Our router...
    /// let router = Router::new();
    ///
    /// // Convert it into a service...
    /// let service = router.into_service();
    ///
    /// // Serve with hyper
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(service)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService(self.build())
    }
}

/// The default router configuration
impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
