//! Middleware wrap a handler with behavior that runs before and after it.
//!
//! A middleware receives the next handler in the chain and returns a new
//! handler. Chains compose onion-style: the first middleware registered is
//! the outermost layer, so it sees the request first and the response last.
//!
//! ```rust
//! use ngrouter::{BoxHandler, Router};
//! use hyper::{Body, Request};
//! use std::sync::Arc;
//!
//! let mut router = Router::new();
//! router.middleware(|next: BoxHandler| -> BoxHandler {
//!     Arc::new(move |req: Request<Body>| {
//!         let next = next.clone();
//!         async move {
//!             let mut res = next.call(req).await?;
//!             res.headers_mut().insert("x-powered-by", "ngrouter".parse().unwrap());
//!             Ok::<_, ngrouter::BoxError>(res)
//!         }
//!     })
//! });
//! assert_eq!(router.middleware_count(), 1);
//! ```
use std::future::Future;
use std::sync::Arc;

use hyper::{Body, Request};

use crate::handler::{BoxHandler, HandlerResult};

/// A handler-to-handler transformation.
pub trait Middleware: Send + Sync + 'static {
    /// Wraps `next`, returning the handler that runs in its place.
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxHandler) -> BoxHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        self(next)
    }
}

/// Builds a middleware from an async function taking the request and the
/// next handler.
///
/// ```rust
/// use ngrouter::{middleware, BoxHandler, Router};
/// use hyper::{Body, Request};
///
/// let mut router = Router::new();
/// router.middleware(middleware::from_fn(|req: Request<Body>, next: BoxHandler| async move {
///     tracing::info!(path = %req.uri().path(), "request");
///     next.call(req).await
/// }));
/// ```
pub fn from_fn<F, R>(f: F) -> FromFn<F>
where
    F: Fn(Request<Body>, BoxHandler) -> R + Send + Sync + 'static,
    R: Future<Output = HandlerResult> + Send + 'static,
{
    FromFn(Arc::new(f))
}

/// Middleware returned by [`from_fn`].
pub struct FromFn<F>(Arc<F>);

impl<F, R> Middleware for FromFn<F>
where
    F: Fn(Request<Body>, BoxHandler) -> R + Send + Sync + 'static,
    R: Future<Output = HandlerResult> + Send + 'static,
{
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        let f = Arc::clone(&self.0);
        Arc::new(move |req: Request<Body>| f(req, Arc::clone(&next)))
    }
}

/// An ordered, append-only list of middleware.
#[derive(Clone, Default)]
pub(crate) struct Chain(Vec<Arc<dyn Middleware>>);

impl Chain {
    pub(crate) fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.0.push(middleware);
    }

    /// A copy of this chain with one more middleware at the end.
    pub(crate) fn with(&self, middleware: Arc<dyn Middleware>) -> Chain {
        let mut chain = self.clone();
        chain.push(middleware);
        chain
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Wraps `handler` so that the first middleware is outermost.
    pub(crate) fn compose(&self, handler: BoxHandler) -> BoxHandler {
        self.0
            .iter()
            .rev()
            .fold(handler, |next, middleware| middleware.wrap(next))
    }
}
