//! Deep copy of a version's folder tree into a new version.
//!
//! The whole clone runs in one immediate write transaction: either the new
//! version, all of its folders and all of their associations are committed
//! together, or nothing is. Content items and modules are shared with the
//! source version, never duplicated.

mod tree;

use self::tree::FolderTree;
use crate::error::{ErrorKind, Result};
use dlms_store::error::ErrorKind as StoreErrorKind;
use dlms_store::{Folder, NewFolder, NewVersion, Repository, Version, WriteTransaction};
use exn::{OptionExt, ResultExt};
use std::collections::BTreeMap;
use std::iter;
use time::UtcDateTime;
use tracing::instrument;

/// How many times a free-looking version number may be lost to a concurrent
/// writer before giving up with [`ErrorKind::Conflict`].
const MAX_CONFLICT_RETRIES: usize = 5;

/// The result of a successful clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedVersion {
    pub version: Version,
    /// Source folder id to the id of its copy.
    pub folders: BTreeMap<i64, i64>,
}

/// Clone a version: a new version row with a fresh version number, the same
/// modules and metadata-type whitelist, and a copy of every folder (same
/// shape, same content) attached to it.
///
/// The new version number is the first of `N`, `N0`, `N1`, `N2`, … (where `N`
/// is the source's number) that no version uses yet.
///
/// # Errors
/// Before anything is written:
/// - [`ErrorKind::NotFound`] if the version does not exist.
/// - [`ErrorKind::InvalidState`] if its folders do not form a tree.
/// - [`ErrorKind::Store`] if the store could not be read.
///
/// After writing started (rolled back, nothing persisted):
/// - [`ErrorKind::Conflict`] if version numbers kept being claimed concurrently.
/// - [`ErrorKind::RolledBack`] for any other failure.
#[instrument(skip(repo))]
pub async fn clone_version(repo: &Repository, version_id: i64) -> Result<ClonedVersion> {
    let mut tx = repo.begin_write().await.or_raise(|| ErrorKind::Store)?;
    let source = tx
        .get_version(version_id)
        .await
        .or_raise(|| ErrorKind::Store)?
        .ok_or_raise(|| ErrorKind::NotFound(version_id))?;
    let modules = tx.version_modules(version_id).await.or_raise(|| ErrorKind::Store)?;
    let metadata_types = tx.version_metadata_types(version_id).await.or_raise(|| ErrorKind::Store)?;
    let folders = tx.folders(version_id).await.or_raise(|| ErrorKind::Store)?;
    let tree = FolderTree::new(&folders)?;

    let version = insert_version(&mut tx, &source).await?;
    tx.set_version_modules(version.id, &modules).await.or_raise(|| ErrorKind::RolledBack)?;
    tx.set_version_metadata_types(version.id, &metadata_types)
        .await
        .or_raise(|| ErrorKind::RolledBack)?;

    let mut copies = BTreeMap::new();
    let mut stack: Vec<(&Folder, Option<i64>)> = tree.roots().iter().map(|&root| (root, None)).collect();
    while let Some((folder, parent_id)) = stack.pop() {
        let copy = NewFolder {
            folder_name: folder.folder_name.clone(),
            logo_img_id: folder.logo_img_id,
            banner_img_id: folder.banner_img_id,
            version_id: version.id,
            parent_id,
        };
        let copy = tx.insert_folder(&copy).await.or_raise(|| ErrorKind::RolledBack)?;
        let contents = tx.folder_contents(folder.id).await.or_raise(|| ErrorKind::RolledBack)?;
        tx.set_folder_contents(copy.id, &contents).await.or_raise(|| ErrorKind::RolledBack)?;
        copies.insert(folder.id, copy.id);
        stack.extend(tree.children(folder.id).iter().map(|&child| (child, Some(copy.id))));
    }

    tx.commit().await.or_raise(|| ErrorKind::RolledBack)?;
    tracing::info!(
        source = version_id,
        version_id = version.id,
        version_number = %version.version_number,
        folders = copies.len(),
        "cloned library version"
    );
    Ok(ClonedVersion { version, folders: copies })
}

/// Insert a copy of `source` under the first unused version number.
async fn insert_version(tx: &mut WriteTransaction, source: &Version) -> Result<Version> {
    let mut conflicts = 0;
    for candidate in version_number_candidates(&source.version_number) {
        if tx.version_number_exists(&candidate).await.or_raise(|| ErrorKind::Store)? {
            continue;
        }
        let version = NewVersion {
            library_name: source.library_name.clone(),
            version_number: candidate.clone(),
            library_banner_id: source.library_banner_id,
            created_on: UtcDateTime::now(),
            created_by: source.created_by.clone(),
        };
        match tx.insert_version(&version).await {
            Ok(version) => return Ok(version),
            // The unique constraint is the source of truth; the probe above
            // only avoids knowingly colliding.
            Err(err) if matches!(&*err, StoreErrorKind::Conflict) => {
                if conflicts == MAX_CONFLICT_RETRIES {
                    return Err(err).or_raise(|| ErrorKind::Conflict(candidate));
                }
                conflicts += 1;
                tracing::warn!(candidate = %candidate, conflicts, "version number already taken, trying the next one");
            },
            Err(err) => return Err(err).or_raise(|| ErrorKind::RolledBack),
        }
    }
    exn::bail!(ErrorKind::Conflict(source.version_number.clone()))
}

/// `base`, `base0`, `base1`, `base2`, …
fn version_number_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    iter::once(base.to_string()).chain((0u64..).map(move |n| format!("{base}{n}")))
}
