use serde::Deserialize;
use tracing::Level;

/// How much the router logs through `tracing`.
///
/// The router only emits events. Where they end up is decided by the
/// subscriber the application installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Emit nothing.
    Quiet,
    /// Handler failures only.
    Error,
    /// Failures and overwritten routes.
    Warn,
    /// Adds route registration.
    Info,
    /// Adds per-request resolution.
    Debug,
    /// Adds router tree construction.
    Trace,
}

impl LogLevel {
    /// Whether an event at `level` should be emitted.
    pub fn allows(self, level: Level) -> bool {
        let threshold = match self {
            LogLevel::Quiet => return false,
            LogLevel::Error => 1,
            LogLevel::Warn => 2,
            LogLevel::Info => 3,
            LogLevel::Debug => 4,
            LogLevel::Trace => 5,
        };

        let rank = if level == Level::ERROR {
            1
        } else if level == Level::WARN {
            2
        } else if level == Level::INFO {
            3
        } else if level == Level::DEBUG {
            4
        } else {
            5
        };

        rank <= threshold
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

/// Router configuration, fixed when the root [`Router`](crate::Router) is created.
///
/// ```rust
/// use ngrouter::{Config, LogLevel, Router};
///
/// let router = Router::with_config(
///     Config::default()
///         .log_level(LogLevel::Quiet)
///         .remove_trailing_slash(false),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strip a single trailing slash from request paths and registered
    /// patterns, so `/users/` and `/users` are the same route.
    pub remove_trailing_slash: bool,
    /// Log verbosity of the router itself.
    pub log_level: LogLevel,
}

impl Config {
    /// Sets the log verbosity.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Enables or disables trailing slash normalization.
    pub fn remove_trailing_slash(mut self, enabled: bool) -> Self {
        self.remove_trailing_slash = enabled;
        self
    }
}

/// The default router configuration
impl Default for Config {
    fn default() -> Self {
        Self {
            remove_trailing_slash: true,
            log_level: LogLevel::default(),
        }
    }
}
