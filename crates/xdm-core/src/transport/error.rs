//! Fetch error type.

use std::fmt;

/// Error returned by a single fetch. Each one is reported against its own item only.
#[derive(Debug)]
pub enum FetchError {
    /// URL was empty or not absolute; no request was made.
    InvalidUrl { url: String, reason: String },
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Writing or finalizing the destination file failed.
    Storage(std::io::Error),
    /// The fetch did not finish within the allotted time.
    TimedOut(std::time::Duration),
    /// The fetch was stopped through its cancel flag.
    Cancelled,
    /// The worker running the fetch panicked or was cancelled.
    Join(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl { url, reason } => {
                write!(f, "invalid URL {:?}: {}", url, reason)
            }
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Storage(e) => write!(f, "storage: {}", e),
            FetchError::TimedOut(d) => write!(f, "timed out after {}s", d.as_secs()),
            FetchError::Cancelled => write!(f, "cancelled"),
            FetchError::Join(msg) => write!(f, "fetch worker failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::InvalidUrl { .. }
            | FetchError::Http(_)
            | FetchError::TimedOut(_)
            | FetchError::Cancelled
            | FetchError::Join(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Storage(e)
    }
}
