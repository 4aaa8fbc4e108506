// Error types for the acceptance harness

use std::time::Duration;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failure, used by waits to decide between
/// "not ready yet" and "genuinely broken".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A page-state assertion does not hold (yet)
    Unsatisfied,
    /// The driver could not locate an element, or no page was served at all
    ElementNotFound,
    /// Navigation did not complete
    Navigation,
    /// Any other browser driver failure
    Driver,
    /// HTTP-level failure outside the browser
    Http,
    /// Static mistake in page-object wiring or metadata
    Resolution,
    /// The application under test could not be started
    Startup,
    /// A wait ran out of time
    Timeout,
    /// A wait was cancelled from outside
    Cancelled,
    /// Invalid harness configuration or input
    Config,
}

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum Error {
    /// A page object could not be constructed
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Element not found by selector
    ///
    /// Also raised when the browser shows no page at all, e.g. while the
    /// application is restarting and not yet accepting connections.
    #[error("Element not found: selector '{0}'")]
    ElementNotFound(String),

    /// An assertion about the current page did not hold
    #[error("Assertion failed: {0}")]
    Unsatisfied(String),

    /// Navigation to a URL failed
    #[error("Navigation to '{url}' failed: {message}")]
    Navigation { url: String, message: String },

    /// Browser driver error
    #[error("Driver error: {0}")]
    Driver(String),

    /// HTTP request outside the browser failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The application at the given address does not identify itself
    #[error("Application running on {url} does not send a '{header}' header")]
    NotTheSut { url: String, header: String },

    /// The application under test could not be started at all
    #[error("Failed to start the application under test: {0}")]
    Startup(#[source] std::io::Error),

    /// A wait exhausted its time budget
    ///
    /// `last` holds the most recent tolerated failure for diagnosis.
    #[error(
        "Timed out after {elapsed:?} waiting for {what} ({attempts} observations){}",
        describe_last(.last)
    )]
    Timeout {
        what: String,
        elapsed: Duration,
        attempts: u32,
        last: Option<Box<Error>>,
    },

    /// A wait was cancelled before its condition held
    #[error("Cancelled while waiting for {0}")]
    Cancelled(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable version string
    #[error("Invalid version: '{0}'")]
    InvalidVersion(String),

    /// The session that owns the injection context has ended
    #[error("Injection context is no longer alive (session ended)")]
    ContextDropped,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

/// Static mistakes in how a page object is declared or addressed.
///
/// These are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("'{0}' is not an absolute URL")]
    InvalidAddress(String),

    #[error("{page} declares no plugin mount fragment")]
    MissingMountFragment { page: &'static str },

    #[error("{page} declares no tool name")]
    MissingToolName { page: &'static str },

    #[error("{page} declares no item kind")]
    MissingKind { page: &'static str },

    #[error("{page} has an invalid descriptor: {reason}")]
    InvalidDescriptor { page: &'static str, reason: String },

    #[error("No page factory registered for kind '{0}'")]
    UnknownKind(String),

    #[error("Page kind '{0}' is already registered")]
    DuplicateKind(String),

    #[error("Kind '{kind}' resolves to {actual}, not {expected}")]
    KindMismatch {
        kind: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Control path '{0}' does not end in '/repeatable-delete'")]
    UnexpectedControlPath(String),
}

fn describe_last(last: &Option<Box<Error>>) -> String {
    match last {
        Some(err) => format!("; last failure: {err}"),
        None => String::new(),
    }
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Classifies this error for wait tolerance checks.
    ///
    /// Context wrappers are transparent: the kind of the wrapped error wins.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Resolution(_) => FailureKind::Resolution,
            Error::ElementNotFound(_) => FailureKind::ElementNotFound,
            Error::Unsatisfied(_) => FailureKind::Unsatisfied,
            Error::Navigation { .. } => FailureKind::Navigation,
            Error::Driver(_) => FailureKind::Driver,
            Error::Http(_) | Error::NotTheSut { .. } => FailureKind::Http,
            Error::Startup(_) => FailureKind::Startup,
            Error::Timeout { .. } => FailureKind::Timeout,
            Error::Cancelled(_) => FailureKind::Cancelled,
            Error::Config(_)
            | Error::InvalidVersion(_)
            | Error::Url(_)
            | Error::Json(_)
            | Error::ContextDropped => FailureKind::Config,
            Error::Io(_) => FailureKind::Driver,
            Error::Context(_, inner) => inner.kind(),
        }
    }
}
