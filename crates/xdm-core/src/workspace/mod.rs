//! Workspace model: a named local root paired with a remote server base.
//!
//! A workspace is built once from the manifest and only read afterwards.
//! Its scan root is `<manifest dir>/<local path>/<name>`.

use std::path::{Component, Path, PathBuf};

/// Path fragments that mean "no sub-path": the root sits in the manifest's directory.
const CURRENT_DIR_FRAGMENTS: [&str; 4] = ["", ".", "./", ".\\"];

/// Index of a workspace in the loaded list. Markers refer back to their
/// workspace through this instead of holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(pub usize);

impl WorkspaceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named root declared in the workspace manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    name: String,
    local_path: String,
    server: String,
    config_origin: Option<PathBuf>,
}

impl Workspace {
    pub fn new(
        name: impl Into<String>,
        local_path: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            local_path: local_path.into(),
            server: server.into(),
            config_origin: None,
        }
    }

    /// Anchor relative path resolution at the manifest that declared this workspace.
    pub fn with_config_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.config_origin = Some(origin.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// True when `name` is exactly one normal path component, so joining it
    /// can't leave the configured base (no `/`, `..`, or absolute names).
    pub fn has_plain_name(&self) -> bool {
        let mut components = Path::new(&self.name).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && !self.name.contains(['/', '\\'])
    }

    pub fn config_origin(&self) -> Option<&Path> {
        self.config_origin.as_deref()
    }

    /// The local path fragment, with the current-directory spellings
    /// (`""`, `"."`, `"./"`, `".\"`, whitespace) normalized to `""`.
    pub fn effective_local_path(&self) -> &str {
        if self.local_path.trim().is_empty()
            || CURRENT_DIR_FRAGMENTS.contains(&self.local_path.as_str())
        {
            ""
        } else {
            &self.local_path
        }
    }

    /// Absolute directory to scan for markers.
    ///
    /// Returns `None` when the name is not a plain directory name, the origin
    /// is unset, or the path cannot be resolved
    /// (e.g. the local path does not exist). Callers treat `None` as
    /// "nothing to scan".
    pub fn root_directory(&self) -> Option<PathBuf> {
        if !self.has_plain_name() {
            tracing::warn!(workspace = %self.name, "workspace name is not a plain directory name");
            return None;
        }
        let origin = self.config_origin.as_deref()?;
        let config_dir = origin.parent()?;
        let base = config_dir.join(self.effective_local_path());
        match dunce::canonicalize(&base) {
            Ok(abs) => Some(abs.join(&self.name)),
            Err(e) => {
                tracing::debug!(
                    workspace = %self.name,
                    path = %base.display(),
                    "cannot resolve workspace base: {}",
                    e
                );
                None
            }
        }
    }
}
