//! Serving files from a directory.
//!
//! [`FileServer`] is an ordinary handler. Register it under a pattern whose
//! prefix matches the one the server strips:
//!
//! ```rust,no_run
//! use ngrouter::{FileServer, Router};
//!
//! let mut router = Router::new();
//! router.get("/static/:file", FileServer::new("./public").into_handler());
//! ```
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Request, Response};

use crate::handler::Handler;
use crate::path;
use crate::service::not_found;

const DEFAULT_PREFIX: &str = "/static/";
const INDEX_FILE: &str = "index.html";

/// Serves files below a root directory, stripping a URL prefix first.
#[derive(Debug, Clone)]
pub struct FileServer {
    root: PathBuf,
    prefix: String,
}

impl FileServer {
    /// Serves `root` under the default `/static/` prefix.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }

    /// Sets the URL prefix removed before looking up files. An empty prefix
    /// falls back to `/static/`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() {
            DEFAULT_PREFIX.to_owned()
        } else {
            prefix
        };
        self
    }

    /// The URL prefix removed before looking up files.
    pub fn url_prefix(&self) -> &str {
        &self.prefix
    }

    /// Maps a request path onto a file below the root. `None` if the path
    /// lies outside the prefix.
    ///
    /// ```rust
    /// use ngrouter::FileServer;
    /// use std::path::Path;
    ///
    /// let files = FileServer::new("/srv/www");
    /// assert_eq!(files.file_path("/static/css/site.css").unwrap(), Path::new("/srv/www/css/site.css"));
    /// assert_eq!(files.file_path("/static/../../etc/passwd").unwrap(), Path::new("/srv/www/etc/passwd"));
    /// assert!(files.file_path("/other/site.css").is_none());
    /// ```
    pub fn file_path(&self, request_path: &str) -> Option<PathBuf> {
        let rest = request_path.strip_prefix(self.prefix.as_str())?;
        let cleaned = path::clean(rest);
        Some(self.root.join(cleaned.trim_start_matches('/')))
    }

    /// Answers a single request. Missing files get a `404 Not Found`; any
    /// other I/O failure is returned as the handler error.
    pub async fn serve(&self, req: Request<Body>) -> Result<Response<Body>, io::Error> {
        let mut file = match self.file_path(req.uri().path()) {
            Some(file) => file,
            None => return Ok(not_found()),
        };

        match tokio::fs::metadata(&file).await {
            Ok(meta) if meta.is_dir() => file.push(INDEX_FILE),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(not_found()),
            Err(err) => return Err(err),
        }

        let contents = match tokio::fs::read(&file).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(not_found()),
            Err(err) => return Err(err),
        };

        let mime = mime_guess::from_path(&file).first_or_octet_stream();
        let content_type = if mime.type_() == "text" {
            format!("{}; charset=utf-8", mime)
        } else {
            mime.to_string()
        };

        let mut response = Response::new(Body::from(contents));
        if let Ok(value) = HeaderValue::from_str(&content_type) {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }

        Ok(response)
    }

    /// Turns the server into a handler for [`Router`](crate::Router) registration.
    pub fn into_handler(self) -> impl Handler {
        let server = Arc::new(self);
        move |req: Request<Body>| {
            let server = Arc::clone(&server);
            async move { server.serve(req).await }
        }
    }
}
