//! Path parameters bound while resolving a request.
use hyper::Request;

/// Parameters extracted from the request path, in pattern order.
///
/// The dispatcher inserts them into the request extensions before the
/// handler chain runs. Use [`RequestExt`] to read them back.
///
/// ```rust
/// use ngrouter::Params;
///
/// let mut params = Params::new();
/// params.push("x", "z");
/// params.push("hash", "aBc");
///
/// assert_eq!(params.get("hash"), Some("aBc"));
/// assert_eq!(params.get("network"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Adds a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no parameters were bound.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Access to the routing state of a dispatched request.
///
/// ```rust
/// use ngrouter::RequestExt;
/// use hyper::{Body, Request, Response};
///
/// async fn user(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
///     let id = req.param("id").unwrap_or_default().to_owned();
///     Ok(Response::new(Body::from(id)))
/// }
/// ```
pub trait RequestExt {
    /// All parameters bound for this request. Empty for static routes.
    fn params(&self) -> Option<&Params>;

    /// The value bound to a single parameter.
    fn param(&self, name: &str) -> Option<&str> {
        self.params().and_then(|params| params.get(name))
    }
}

impl<B> RequestExt for Request<B> {
    fn params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }
}
