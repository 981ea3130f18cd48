//! Fetch planning: scan every workspace, resolve every marker, and split the
//! result into fetches ready for transport and markers that can't be fetched.
//!
//! Discovery for all workspaces finishes here before anything is dispatched.

use std::path::PathBuf;

use crate::config::XdmConfig;
use crate::reference::{scan_workspace, ReferenceMarker, ResolveError};
use crate::workspace::{Workspace, WorkspaceId};

/// A resolved (URL, destination) pair ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    /// Name of the workspace the marker was found under.
    pub workspace: String,
    pub marker_path: PathBuf,
    pub source_url: String,
    /// Always inside the marker's own directory.
    pub destination_path: PathBuf,
}

/// A marker that produced no URL. Never dispatched.
#[derive(Debug)]
pub struct UnresolvedMarker {
    pub workspace: String,
    pub marker_path: PathBuf,
    pub error: ResolveError,
}

/// Everything discovered across all workspaces, in workspace order then discovery order.
#[derive(Debug, Default)]
pub struct FetchPlan {
    pub pending: Vec<PendingFetch>,
    pub unresolved: Vec<UnresolvedMarker>,
}

impl FetchPlan {
    /// Number of markers found, resolved or not.
    pub fn marker_count(&self) -> usize {
        self.pending.len() + self.unresolved.len()
    }
}

/// Build the fetch plan for `workspaces`.
pub fn plan_fetches(workspaces: &[Workspace], cfg: &XdmConfig) -> FetchPlan {
    let markers: Vec<ReferenceMarker> = workspaces
        .iter()
        .enumerate()
        .flat_map(|(index, workspace)| {
            scan_workspace(WorkspaceId(index), workspace, &cfg.marker_token)
        })
        .collect();

    let mut plan = FetchPlan::default();
    for marker in markers {
        let Some(workspace) = workspaces.get(marker.workspace().index()) else {
            continue;
        };
        let marker_path = marker.disk_path().to_path_buf();
        let destination_path = marker.destination_dir().join(&cfg.destination_file_name);
        match marker.into_resolved(workspace) {
            Ok(source_url) => {
                tracing::info!(
                    url = %source_url,
                    destination = %destination_path.display(),
                    "resolved marker"
                );
                plan.pending.push(PendingFetch {
                    workspace: workspace.name().to_string(),
                    marker_path,
                    source_url,
                    destination_path,
                });
            }
            Err(error) => {
                tracing::warn!("unresolved marker, skipping: {}", error);
                plan.unresolved.push(UnresolvedMarker {
                    workspace: workspace.name().to_string(),
                    marker_path,
                    error,
                });
            }
        }
    }
    plan
}
