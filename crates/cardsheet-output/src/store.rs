//! Persistence seam for folders and record artifacts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cardsheet_model::Record;
use tracing::debug;

use crate::destination::{ContainerHandle, validate_artifact_name};
use crate::error::{OutputError, Result};

/// Suffix of artifacts written but not yet committed.
const STAGED_SUFFIX: &str = "staged";

/// An artifact written next to its final location, waiting to be moved
/// into place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub staged: PathBuf,
    pub target: PathBuf,
}

/// A hierarchical store of folders and named record artifacts.
///
/// Folders are addressed by slash-separated logical paths. Artifacts are
/// written in two steps: staged beside their target, then committed over
/// whatever the target held before.
pub trait AssetStore {
    fn container_exists(&self, logical: &str) -> bool;

    /// Create `name` inside the existing folder `parent`.
    ///
    /// Must succeed when the folder already exists, so concurrent
    /// creators all proceed.
    fn create_container(&self, parent: &str, name: &str) -> Result<()>;

    /// Remove an empty folder.
    fn remove_container(&self, logical: &str) -> Result<()>;

    /// Where a logical path lives, for diagnostics.
    fn location(&self, logical: &str) -> PathBuf;

    /// Write `record` beside `<container>/<name>.<extension>` without
    /// touching that file.
    fn stage_record(
        &self,
        container: &ContainerHandle,
        name: &str,
        extension: &str,
        record: &Record,
    ) -> Result<StagedArtifact>;

    /// Move a staged artifact over its target.
    fn commit_artifact(&self, artifact: &StagedArtifact) -> Result<PathBuf>;

    /// Delete a staged artifact that will not be committed.
    fn discard_artifact(&self, artifact: &StagedArtifact) -> Result<()>;
}

/// Store rooted at a project directory; artifacts are pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, logical: &str) -> PathBuf {
        logical
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Re-open an artifact written by this store.
    ///
    /// `name_field` is the schema field used to name the record.
    pub fn read_record(&self, path: &Path, name_field: &str) -> Result<Record> {
        let contents = fs::read_to_string(path).map_err(|source| OutputError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        let record: Record =
            serde_json::from_str(&contents).map_err(|source| OutputError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(record.with_name_field(name_field))
    }
}

impl AssetStore for FsAssetStore {
    fn container_exists(&self, logical: &str) -> bool {
        self.resolve(logical).is_dir()
    }

    fn create_container(&self, parent: &str, name: &str) -> Result<()> {
        let logical = format!("{parent}/{name}");
        let path = self.resolve(&logical);
        match fs::create_dir(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(source) => Err(OutputError::FolderCreation {
                path: logical,
                source,
            }),
        }
    }

    fn remove_container(&self, logical: &str) -> Result<()> {
        fs::remove_dir(self.resolve(logical)).map_err(|source| OutputError::FolderRemoval {
            path: logical.to_string(),
            source,
        })
    }

    fn location(&self, logical: &str) -> PathBuf {
        self.resolve(logical)
    }

    fn stage_record(
        &self,
        container: &ContainerHandle,
        name: &str,
        extension: &str,
        record: &Record,
    ) -> Result<StagedArtifact> {
        validate_artifact_name(name)?;
        let folder = self.resolve(container.logical_path());
        let target = folder.join(format!("{name}.{extension}"));
        let staged = folder.join(format!(".{name}.{extension}.{STAGED_SUFFIX}"));
        let mut contents =
            serde_json::to_string_pretty(record).map_err(|source| OutputError::Json {
                path: target.clone(),
                source,
            })?;
        contents.push('\n');
        fs::write(&staged, contents).map_err(|source| OutputError::ArtifactWrite {
            path: staged.clone(),
            source,
        })?;
        debug!(path = %staged.display(), "staged artifact");
        Ok(StagedArtifact { staged, target })
    }

    fn commit_artifact(&self, artifact: &StagedArtifact) -> Result<PathBuf> {
        fs::rename(&artifact.staged, &artifact.target).map_err(|source| {
            OutputError::ArtifactCommit {
                path: artifact.target.clone(),
                source,
            }
        })?;
        debug!(path = %artifact.target.display(), "wrote artifact");
        Ok(artifact.target.clone())
    }

    fn discard_artifact(&self, artifact: &StagedArtifact) -> Result<()> {
        match fs::remove_file(&artifact.staged) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OutputError::ArtifactDiscard {
                path: artifact.staged.clone(),
                source,
            }),
        }
    }
}
