use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::manifest::{MANIFEST_NAME, Manifest};
use dlms_snapshot::flatten;
use dlms_store::Repository;
use exn::{OptionExt, ResultExt};
use facet_json::to_string as to_json;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use time::UtcDateTime;
use tracing::instrument;

/// A built snapshot of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Location of the portable database file.
    pub path: PathBuf,
    pub manifest: Manifest,
}

/// Export a version as a portable snapshot.
///
/// The version's graph is read in a single read transaction, flattened, and
/// handed to the [`Context`]'s sink. The artifact lands at
/// `<artifact_dir>/<artifact_name>` with a [`Manifest`] beside it; building
/// the same version again replaces both. Both files are staged in the
/// artifact directory and moved into place only once both are complete.
///
/// # Errors
/// - [`ErrorKind::NotFound`] if the version does not exist.
/// - [`ErrorKind::Store`] if the live store could not be read.
/// - [`ErrorKind::InvalidState`] if a content path cannot be made portable.
/// - [`ErrorKind::Io`] if the artifact could not be written. A previous
///   artifact at the same location is left untouched.
#[instrument(skip(repo, ctx))]
pub async fn build_snapshot(repo: &Repository, ctx: &Context, version_id: i64) -> Result<Artifact> {
    let graph = repo
        .load_graph(version_id)
        .await
        .or_raise(|| ErrorKind::Store)?
        .ok_or_raise(|| ErrorKind::NotFound(version_id))?;
    let rows = flatten(&graph, &ctx.content_prefix).map_err(ErrorKind::snapshot)?;
    for (table, count) in rows.counts() {
        tracing::debug!(table, count, "flattened");
    }

    let dir = ctx.artifact_dir(&graph.version);
    let path = dir.join(&ctx.artifact_name);
    tokio::fs::create_dir_all(&dir).await.or_raise(|| ErrorKind::Io)?;
    let artifact = stage(&dir)?;
    ctx.sink.write(artifact.path(), &rows).await.map_err(ErrorKind::snapshot)?;

    let bytes = tokio::fs::read(artifact.path()).await.or_raise(|| ErrorKind::Io)?;
    let checksum = blake3::hash(&bytes).to_string();
    let manifest = Manifest::new(&graph.version, &rows, checksum, UtcDateTime::now());
    let json = to_json(&manifest).or_raise(|| ErrorKind::Io)?;
    let staged_manifest = stage(&dir)?;
    tokio::fs::write(staged_manifest.path(), json).await.or_raise(|| ErrorKind::Io)?;

    // Manifest first: if it cannot be moved into place, the previous
    // artifact is still there and still matches the previous manifest.
    staged_manifest.persist(dir.join(MANIFEST_NAME)).or_raise(|| ErrorKind::Io)?;
    artifact.persist(&path).or_raise(|| ErrorKind::Io)?;

    tracing::info!(
        version_id,
        version_number = %graph.version.version_number,
        path = %path.display(),
        checksum = %manifest.checksum,
        "built library snapshot"
    );
    Ok(Artifact { path, manifest })
}

/// A hidden file in `dir`, deleted on drop unless persisted.
fn stage(dir: &Path) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".")
        .suffix(".building")
        .tempfile_in(dir)
        .or_raise(|| ErrorKind::Io)
}
