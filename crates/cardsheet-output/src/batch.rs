//! All-or-nothing artifact writes for a single import run.

use std::collections::HashSet;
use std::path::PathBuf;

use cardsheet_model::Record;
use tracing::{debug, warn};

use crate::destination::{ContainerHandle, EnsuredPath, ensure_path, remove_created};
use crate::error::Result;
use crate::store::{AssetStore, StagedArtifact};

/// Collects the folders and artifacts of one run.
///
/// Artifacts are staged on disk as they arrive and only moved into place by
/// [`ArtifactBatch::commit`]. Dropping a batch without committing discards
/// every staged artifact and removes the folders it created.
pub struct ArtifactBatch<'a, S: AssetStore + ?Sized> {
    store: &'a S,
    created_folders: Vec<String>,
    staged: Vec<StagedArtifact>,
    targets: HashSet<PathBuf>,
}

impl<'a, S: AssetStore + ?Sized> ArtifactBatch<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            created_folders: Vec::new(),
            staged: Vec::new(),
            targets: HashSet::new(),
        }
    }

    /// [`ensure_path`], remembering which folders belong to this run.
    pub fn ensure(&mut self, logical_path: &str) -> Result<EnsuredPath> {
        let ensured = ensure_path(self.store, logical_path)?;
        self.created_folders.extend(ensured.created.iter().cloned());
        Ok(ensured)
    }

    /// Stage `record` as `<container>/<name>.<extension>`.
    ///
    /// Staging the same target again replaces the earlier content.
    pub fn stage(
        &mut self,
        container: &ContainerHandle,
        name: &str,
        extension: &str,
        record: &Record,
    ) -> Result<()> {
        let artifact = self.store.stage_record(container, name, extension, record)?;
        if self.targets.insert(artifact.target.clone()) {
            self.staged.push(artifact);
        } else {
            debug!(path = %artifact.target.display(), "replaced staged artifact");
        }
        Ok(())
    }

    /// Move every staged artifact into place, in staging order.
    ///
    /// If a move fails the remaining artifacts stay staged and are discarded
    /// when the batch drops.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let staged = std::mem::take(&mut self.staged);
        let mut committed = Vec::with_capacity(staged.len());
        for (index, artifact) in staged.iter().enumerate() {
            match self.store.commit_artifact(artifact) {
                Ok(path) => committed.push(path),
                Err(error) => {
                    self.staged = staged[index..].to_vec();
                    return Err(error);
                }
            }
        }
        self.created_folders.clear();
        Ok(committed)
    }
}

impl<S: AssetStore + ?Sized> Drop for ArtifactBatch<'_, S> {
    fn drop(&mut self) {
        if self.staged.is_empty() && self.created_folders.is_empty() {
            return;
        }
        debug!(
            staged = self.staged.len(),
            folders = self.created_folders.len(),
            "rolling back uncommitted import"
        );
        for artifact in self.staged.drain(..) {
            if let Err(error) = self.store.discard_artifact(&artifact) {
                warn!(%error, "could not discard staged artifact");
            }
        }
        remove_created(self.store, &self.created_folders);
    }
}
