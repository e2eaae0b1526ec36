//! Output side of a card sheet import.
//!
//! - [`ensure_path`] creates the destination folder chain, root first
//! - [`AssetStore`] is the persistence seam; [`FsAssetStore`] writes one
//!   JSON artifact per record under a project directory
//! - [`ArtifactBatch`] stages a run's artifacts and commits or rolls them
//!   back together
//! - [`write_summary_json`] records what a run did

mod batch;
mod destination;
mod error;
mod report;
mod store;

pub use batch::ArtifactBatch;
pub use destination::{
    ContainerHandle, EnsuredPath, ensure_path, parse_logical_path, validate_artifact_name,
};
pub use error::{OutputError, Result};
pub use report::write_summary_json;
pub use store::{AssetStore, FsAssetStore, StagedArtifact};
