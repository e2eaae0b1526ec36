//! Logical destination paths and folder creation.

use tracing::{debug, warn};

use crate::error::{OutputError, Result};
use crate::store::AssetStore;

/// A folder that is known to exist in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    logical: String,
}

impl ContainerHandle {
    pub(crate) fn new(logical: impl Into<String>) -> Self {
        Self {
            logical: logical.into(),
        }
    }

    /// Slash-separated path of the folder.
    pub fn logical_path(&self) -> &str {
        &self.logical
    }

    /// Logical path of an artifact inside this folder.
    pub fn artifact_path(&self, name: &str, extension: &str) -> String {
        format!("{}/{name}.{extension}", self.logical)
    }
}

/// Result of [`ensure_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredPath {
    pub handle: ContainerHandle,
    /// Folders created by this call, parents before children.
    pub created: Vec<String>,
}

/// Split a logical path into validated segments.
///
/// A trailing slash is ignored. Empty, `.` and `..` segments and segments
/// containing a backslash are rejected.
pub fn parse_logical_path(path: &str) -> Result<Vec<&str>> {
    let invalid = |reason: &str| OutputError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    let segments: Vec<&str> = trimmed.split('/').collect();
    for segment in &segments {
        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }
        if *segment == "." || *segment == ".." {
            return Err(invalid("relative segments are not allowed"));
        }
        if segment.contains('\\') {
            return Err(invalid("backslash in segment"));
        }
    }
    Ok(segments)
}

/// Make sure every folder of `logical_path` exists, creating missing ones
/// from the root down. The first segment must already exist.
///
/// When a creation fails, folders created earlier in the same call are
/// removed again before the error is returned.
pub fn ensure_path<S>(store: &S, logical_path: &str) -> Result<EnsuredPath>
where
    S: AssetStore + ?Sized,
{
    let segments = parse_logical_path(logical_path)?;
    let root = segments[0];
    if !store.container_exists(root) {
        return Err(OutputError::MissingRoot {
            root: root.to_string(),
            location: store.location(root),
        });
    }

    let mut current = root.to_string();
    let mut created = Vec::new();
    for segment in &segments[1..] {
        let next = format!("{current}/{segment}");
        if !store.container_exists(&next) {
            if let Err(error) = store.create_container(&current, segment) {
                remove_created(store, &created);
                return Err(error);
            }
            debug!(folder = %next, "created folder");
            created.push(next.clone());
        }
        current = next;
    }

    Ok(EnsuredPath {
        handle: ContainerHandle::new(current),
        created,
    })
}

/// Remove folders recorded parents first, children before their parents.
pub(crate) fn remove_created<S>(store: &S, created: &[String])
where
    S: AssetStore + ?Sized,
{
    for folder in created.iter().rev() {
        if let Err(error) = store.remove_container(folder) {
            warn!(folder = %folder, %error, "could not remove folder");
        }
    }
}

/// Check that a record name can be used as a single file name.
pub fn validate_artifact_name(name: &str) -> Result<()> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
    if bad {
        Err(OutputError::InvalidArtifactName {
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}
