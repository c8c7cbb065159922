use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use hyper::{Body, Request, Response};

use crate::error::BoxError;

/// What a handler resolves to: its own response, or a failure the
/// dispatcher turns into a `500`.
pub type HandlerResult = Result<Response<Body>, BoxError>;

/// A shared, type-erased handler. Middleware receive and return these.
pub type BoxHandler = Arc<dyn Handler>;

/// Represents a HTTP handler function.
/// This trait is implemented for asynchronous functions that take a `Request` and return a
/// `Result<Response<Body>, E>` for any error `E` convertible into a [`BoxError`].
/// ```rust
/// # use ngrouter::{BoxError, BoxHandler};
/// # use hyper::{Request, Response, Body};
/// # use std::sync::Arc;
/// async fn hello(_: Request<Body>) -> Result<Response<Body>, BoxError> {
///     Ok(Response::new(Body::empty()))
/// }
///
/// let handler: BoxHandler = Arc::new(hello);
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult>;
}

impl<F, R, E> Handler for F
where
    F: Fn(Request<Body>) -> R + Send + Sync + 'static,
    R: Future<Output = Result<Response<Body>, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
        let fut = self(req);
        Box::pin(async move { fut.await.map_err(Into::into) })
    }
}
