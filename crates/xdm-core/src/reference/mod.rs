//! Reference markers: discovery under a workspace root and URL resolution.
//!
//! Discovery only collects marker paths; reading a marker happens later, per
//! marker, so one unreadable marker never stops the walk.

mod resolve;
mod scan;

pub use resolve::{compose_url, read_fragment};
pub use scan::find_marker_paths;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::workspace::{Workspace, WorkspaceId};

/// Why a marker could not be turned into a URL.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot read marker {}: {}", .path.display(), .source)]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("marker {} holds no path (empty or blank)", .path.display())]
    Empty { path: PathBuf },
}

/// A discovered marker file, tagged with the workspace it was found under.
#[derive(Debug)]
pub struct ReferenceMarker {
    disk_path: PathBuf,
    workspace: WorkspaceId,
    resolved: OnceLock<Result<String, ResolveError>>,
}

impl ReferenceMarker {
    pub fn new(workspace: WorkspaceId, disk_path: impl Into<PathBuf>) -> Self {
        Self {
            disk_path: disk_path.into(),
            workspace,
            resolved: OnceLock::new(),
        }
    }

    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    /// Directory holding the marker; the fetched file lands here.
    pub fn destination_dir(&self) -> &Path {
        self.disk_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Server URL named by this marker: `<server>/<first non-blank line, trimmed>`.
    ///
    /// The file is read on the first call only; later calls return the cached
    /// outcome, success or failure.
    pub fn resolve_url(&self, workspace: &Workspace) -> Result<&str, &ResolveError> {
        self.resolved
            .get_or_init(|| resolve_marker(&self.disk_path, workspace))
            .as_ref()
            .map(String::as_str)
    }

    /// Consumes the marker and hands back its resolution, reusing a cached
    /// outcome when there is one.
    pub fn into_resolved(self, workspace: &Workspace) -> Result<String, ResolveError> {
        let ReferenceMarker {
            disk_path,
            resolved,
            ..
        } = self;
        resolved
            .into_inner()
            .unwrap_or_else(|| resolve_marker(&disk_path, workspace))
    }
}

fn resolve_marker(path: &Path, workspace: &Workspace) -> Result<String, ResolveError> {
    read_fragment(path).map(|fragment| compose_url(workspace.server(), &fragment))
}

/// Find every marker under `workspace`'s root, in discovery order.
///
/// A workspace whose root can't be resolved yields no markers.
pub fn scan_workspace(
    id: WorkspaceId,
    workspace: &Workspace,
    marker_token: &str,
) -> Vec<ReferenceMarker> {
    let Some(root) = workspace.root_directory() else {
        tracing::warn!(
            workspace = %workspace.name(),
            "workspace root could not be resolved; nothing to scan"
        );
        return Vec::new();
    };
    let markers: Vec<ReferenceMarker> = find_marker_paths(&root, marker_token)
        .into_iter()
        .map(|path| ReferenceMarker::new(id, path))
        .collect();
    tracing::debug!(
        workspace = %workspace.name(),
        root = %root.display(),
        "found {} marker(s)",
        markers.len()
    );
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> Workspace {
        Workspace::new("Libs", ".", "https://example.com/repo")
    }

    #[test]
    fn resolve_url_composes_server_and_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xdm_ref_path.txt");
        fs::write(&path, "\n   \n  pkg/a.tar  \nignored\n").unwrap();
        let marker = ReferenceMarker::new(WorkspaceId(0), &path);
        assert!(marker.resolved.get().is_none());
        assert_eq!(
            marker.resolve_url(&workspace()).unwrap(),
            "https://example.com/repo/pkg/a.tar"
        );
        assert!(marker.resolved.get().is_some());
        assert_eq!(marker.destination_dir(), dir.path());
    }

    #[test]
    fn resolve_url_is_computed_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xdm_ref_path.txt");
        fs::write(&path, "first.bin\n").unwrap();
        let marker = ReferenceMarker::new(WorkspaceId(0), &path);
        let ws = workspace();
        assert_eq!(marker.resolve_url(&ws).unwrap(), "https://example.com/repo/first.bin");

        fs::write(&path, "second.bin\n").unwrap();
        assert_eq!(marker.resolve_url(&ws).unwrap(), "https://example.com/repo/first.bin");
    }

    #[test]
    fn into_resolved_reuses_cached_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xdm_ref_path.txt");
        fs::write(&path, "one\n").unwrap();
        let marker = ReferenceMarker::new(WorkspaceId(0), &path);
        let ws = workspace();
        marker.resolve_url(&ws).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(marker.into_resolved(&ws).unwrap(), "https://example.com/repo/one");
    }

    #[test]
    fn blank_marker_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xdm_ref_path.txt");
        fs::write(&path, "  \n\t\n").unwrap();
        let marker = ReferenceMarker::new(WorkspaceId(0), &path);
        assert!(matches!(
            marker.resolve_url(&workspace()),
            Err(ResolveError::Empty { .. })
        ));
    }

    #[test]
    fn missing_marker_is_unreadable_error() {
        let dir = tempfile::tempdir().unwrap();
        let marker = ReferenceMarker::new(WorkspaceId(0), dir.path().join("gone.txt"));
        let err = marker.resolve_url(&workspace()).unwrap_err();
        assert!(matches!(err, ResolveError::Unreadable { .. }));
        assert!(err.to_string().contains("gone.txt"));
    }

    #[test]
    fn scan_workspace_tags_markers_with_id() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("Libs").join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("xdm_ref_path.txt"), "pkg/a.tar\n").unwrap();
        let ws = workspace().with_config_origin(dir.path().join("xdm.toml"));

        let markers = scan_workspace(WorkspaceId(4), &ws, "xdm_ref_path.txt");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].workspace(), WorkspaceId(4));
        assert!(markers[0].disk_path().ends_with("Libs/sub/xdm_ref_path.txt"));
    }

    #[test]
    fn scan_workspace_without_root_is_empty() {
        let ws = workspace();
        assert!(scan_workspace(WorkspaceId(0), &ws, "xdm_ref_path.txt").is_empty());
    }
}
