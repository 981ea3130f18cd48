//! Reading a marker's payload and composing the server URL.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::ResolveError;

/// Returns the first non-blank line of the marker at `path`, trimmed.
pub fn read_fragment(path: &Path) -> Result<String, ResolveError> {
    let unreadable = |source| ResolveError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(unreadable)?;
        let fragment = line.trim();
        if !fragment.is_empty() {
            return Ok(fragment.to_string());
        }
    }
    Err(ResolveError::Empty {
        path: path.to_path_buf(),
    })
}

/// `server + "/" + fragment`, with no further normalization.
pub fn compose_url(server: &str, fragment: &str) -> String {
    format!("{}/{}", server, fragment)
}
