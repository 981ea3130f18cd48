//! HTTP transport: GET a URL and write the body to a local file.
//!
//! The orchestrator only depends on the [`Transport`] trait; [`CurlTransport`]
//! is the libcurl-backed implementation used by the CLI.

mod easy;
mod error;

pub use easy::CurlTransport;
pub use error::FetchError;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Suffix of the file a body is streamed into before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Shared stop signal for one in-flight fetch. Once set, the transport
/// abandons the transfer and leaves the destination untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Blocking single-file fetch. Implementations must be safe to share across worker threads.
pub trait Transport: Send + Sync {
    /// GET `url` and store the body at `destination`, replacing any existing file.
    /// Returns the number of bytes written. On error, `destination` is left untouched.
    ///
    /// Implementations poll `cancel` while transferring and return
    /// [`FetchError::Cancelled`] once it is set.
    fn fetch(&self, url: &str, destination: &Path, cancel: &CancelFlag) -> Result<u64, FetchError>;
}

/// Path for the temp file: appends `.part` to the final path (e.g. `file.pdf` → `file.pdf.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Check that `url` is an absolute URL before any I/O happens.
pub fn validate_url(url: &str) -> Result<url::Url, FetchError> {
    if url.trim().is_empty() {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "empty URL".to_string(),
        });
    }
    url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
