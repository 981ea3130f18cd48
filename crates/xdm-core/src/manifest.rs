//! Workspace manifest: the declarative list of workspaces to sync.
//!
//! ```toml
//! [[workspace]]
//! name = "Libs"
//! server = "https://example.com/repo"
//! path = "./vendor"
//! ```
//!
//! Entries missing `name`, `server` or `path` (or with any of them empty),
//! and entries whose name is not a plain directory name, are dropped without
//! failing the load.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::workspace::Workspace;

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default, rename = "workspace")]
    workspaces: Vec<WorkspaceEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkspaceEntry {
    name: Option<String>,
    server: Option<String>,
    path: Option<String>,
}

impl WorkspaceEntry {
    fn into_workspace(self) -> Option<Workspace> {
        let name = self.name.filter(|s| !s.is_empty())?;
        let server = self.server.filter(|s| !s.is_empty())?;
        let path = self.path.filter(|s| !s.is_empty())?;
        Some(Workspace::new(name, path, server)).filter(Workspace::has_plain_name)
    }
}

/// Parse manifest text into workspaces, in declaration order. Invalid entries are skipped.
pub fn parse_workspaces(text: &str) -> Result<Vec<Workspace>> {
    let manifest: Manifest = toml::from_str(text).context("invalid workspace manifest")?;
    let total = manifest.workspaces.len();
    let workspaces: Vec<Workspace> = manifest
        .workspaces
        .into_iter()
        .filter_map(WorkspaceEntry::into_workspace)
        .collect();
    if workspaces.len() < total {
        tracing::debug!(
            "skipped {} incomplete workspace entr(y/ies)",
            total - workspaces.len()
        );
    }
    Ok(workspaces)
}

/// Load workspaces from the manifest at `path`, anchoring each at the manifest's absolute path.
///
/// Fails when the file can't be read or parsed, or when no valid workspace remains.
pub fn load_workspaces(path: &Path) -> Result<Vec<Workspace>> {
    let origin = dunce::canonicalize(path)
        .with_context(|| format!("workspace manifest not found: {}", path.display()))?;
    let text = fs::read_to_string(&origin)
        .with_context(|| format!("failed to read workspace manifest: {}", origin.display()))?;
    let workspaces: Vec<Workspace> = parse_workspaces(&text)
        .with_context(|| format!("in {}", origin.display()))?
        .into_iter()
        .map(|ws| ws.with_config_origin(&origin))
        .collect();
    if workspaces.is_empty() {
        anyhow::bail!("no valid workspaces in {}", origin.display());
    }
    tracing::debug!(
        "loaded {} workspace(s) from {}",
        workspaces.len(),
        origin.display()
    );
    Ok(workspaces)
}
