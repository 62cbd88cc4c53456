//! Build and clone operations over library versions.
//!
//! - [`build_snapshot`] exports one version of the live store as a portable
//!   SQLite artifact (plus a [`Manifest`]) under the builds root.
//! - [`clone_version`] deep-copies a version's folder tree into a new version,
//!   atomically, sharing content and modules with the source.
//!
//! Builds of *different* versions may run concurrently. Builds of the *same*
//! version write to the same artifact path and must be serialized by the
//! caller.

mod build;
mod clone;
pub mod error;
mod manifest;
#[cfg(test)]
mod test_support;

pub use crate::build::{Artifact, build_snapshot};
pub use crate::clone::{ClonedVersion, clone_version};
pub use crate::manifest::{MANIFEST_NAME, Manifest, TableCount};
use dlms_snapshot::{Sink, SqliteSink};
use dlms_store::Version;
use rslug::slugify;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_CONTENT_PREFIX: &str = "contents";
pub const DEFAULT_ARTIFACT_NAME: &str = "library.db";

/// Where and how artifacts are built.
#[derive(Clone)]
pub struct Context {
    /// Directory holding one sub-directory per built version.
    pub builds_root: PathBuf,
    /// Storage prefix stripped from content file paths.
    pub content_prefix: PathBuf,
    /// File name of the artifact inside its version directory.
    pub artifact_name: String,
    pub sink: Arc<dyn Sink>,
}
impl Context {
    pub fn new(builds_root: impl Into<PathBuf>) -> Self {
        Self {
            builds_root: builds_root.into(),
            content_prefix: PathBuf::from(DEFAULT_CONTENT_PREFIX),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            sink: Arc::new(SqliteSink),
        }
    }

    pub fn with_content_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.content_prefix = prefix.into();
        self
    }

    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self
    }

    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// `<builds_root>/<version id>-<slugified library name>`
    pub fn artifact_dir(&self, version: &Version) -> PathBuf {
        let slug = slugify!(&version.library_name);
        match slug.is_empty() {
            true => self.builds_root.join(version.id.to_string()),
            false => self.builds_root.join(format!("{}-{}", version.id, slug)),
        }
    }
}
