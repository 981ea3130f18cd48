//! Per-fetch outcomes and the run summary.

use std::path::PathBuf;

use crate::plan::PendingFetch;
use crate::transport::FetchError;

/// Result of one fetch, tied to the fetch it belongs to.
#[derive(Debug)]
pub struct FetchOutcome {
    pub fetch: PendingFetch,
    /// Bytes written on success.
    pub result: Result<u64, FetchError>,
}

/// Progress line for a finished fetch, sent to the caller as fetches complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchEvent {
    pub source_url: String,
    pub destination_path: PathBuf,
    /// Bytes written, or the error description.
    pub result: Result<u64, String>,
}

impl From<&FetchOutcome> for FetchEvent {
    fn from(outcome: &FetchOutcome) -> Self {
        Self {
            source_url: outcome.fetch.source_url.clone(),
            destination_path: outcome.fetch.destination_path.clone(),
            result: outcome.result.as_ref().map(|b| *b).map_err(|e| e.to_string()),
        }
    }
}

/// Aggregate result of a run.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Fetches dispatched.
    pub attempted: usize,
    pub succeeded: usize,
    /// Failed fetches, in completion order.
    pub failures: Vec<FetchOutcome>,
}

impl FetchReport {
    pub(crate) fn new(attempted: usize) -> Self {
        Self {
            attempted,
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, outcome: FetchOutcome) {
        if outcome.result.is_ok() {
            self.succeeded += 1;
        } else {
            self.failures.push(outcome);
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
