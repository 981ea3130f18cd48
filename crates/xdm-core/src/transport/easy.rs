//! Single-stream HTTP GET with a libcurl Easy handle.
//!
//! The body goes to `<destination>.part`; the temp file is renamed over the
//! destination only after a 2xx response, and removed on any failure.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{temp_path, validate_url, CancelFlag, FetchError, Transport};
use crate::config::TransportConfig;

/// Removes the temp file on drop unless disarmed.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Libcurl-backed transport. Each fetch uses its own Easy handle, so one
/// instance is freely shared between worker threads.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
    max_redirections: u32,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl CurlTransport {
    pub fn new(cfg: &TransportConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.fetch_timeout(),
            max_redirections: cfg.max_redirections,
        }
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, url: &str, destination: &Path, cancel: &CancelFlag) -> Result<u64, FetchError> {
        validate_url(url)?;

        let part = temp_path(destination);
        let file = File::create(&part)?;
        let mut guard = TempFileGuard {
            path: part.clone(),
            armed: true,
        };
        let mut out = BufWriter::new(file);

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        // Required for progress_function to be invoked.
        easy.progress(true)?;

        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(FetchError::Storage(e));
        }
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }

        let file = out.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        std::fs::rename(&part, destination)?;
        guard.armed = false;

        tracing::debug!(url = %url, bytes = written, "fetch complete");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("file.pdf");
        let err = CurlTransport::default()
            .fetch("", &dest, &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn missing_destination_dir_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("absent").join("file.pdf");
        let err = CurlTransport::default()
            .fetch("http://127.0.0.1:9/file", &dest, &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, FetchError::Storage(_)));
    }

    #[test]
    fn timeouts_come_from_config() {
        let cfg = TransportConfig {
            connect_timeout_secs: 3,
            fetch_timeout_secs: 42,
            max_redirections: 1,
        };
        let t = CurlTransport::new(&cfg);
        assert_eq!(t.connect_timeout, Duration::from_secs(3));
        assert_eq!(t.timeout, Duration::from_secs(42));
        assert_eq!(t.max_redirections, 1);
    }
}
