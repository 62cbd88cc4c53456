//! Flattening of a version graph into portable row sets.
//!
//! This is a pure transformation: everything it needs is in the
//! [`VersionGraph`], and nothing is read from or written to disk.

use crate::error::{ErrorKind, Result};
use crate::path::relativize;
use crate::rows::{
    ContentFolderRow, ContentMetadataRow, ContentRow, FolderRow, MetadataRow, MetadataTypeRow, ModuleRow, RowSets,
};
use dlms_store::{Content, VersionGraph};
use exn::ResultExt;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const PUBLISHED_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Flatten one version into the seven portable row sets.
///
/// - Metadata types are the version's whitelist; metadata is exported only if
///   its type is on that whitelist.
/// - Content file paths have `content_prefix` stripped.
/// - Content-folder edges reference exported rows only. Content-metadata
///   edges are restricted to exported contents and keep every tag, including
///   tags whose metadata type is not whitelisted.
/// - Every row set is sorted and free of duplicates, so flattening the same
///   graph twice yields equal output.
pub fn flatten(graph: &VersionGraph, content_prefix: impl AsRef<Path>) -> Result<RowSets> {
    let content_prefix = content_prefix.as_ref();
    let whitelist = graph.metadata_type_ids();

    let metadata_types = graph
        .metadata_types
        .iter()
        .map(|t| MetadataTypeRow { id: t.id, name: t.name.clone() })
        .collect::<BTreeSet<_>>();

    let metadata = graph
        .metadata
        .iter()
        .filter(|m| whitelist.contains(&m.type_id))
        .map(|m| {
            let row = MetadataRow {
                id: m.id,
                name: m.name.clone(),
                type_name: m.type_name.clone(),
                type_id: m.type_id,
            };
            (m.id, row)
        })
        .collect::<BTreeMap<_, _>>();

    let folders = graph
        .folders
        .iter()
        .map(|f| FolderRow {
            id: f.id,
            name: f.folder_name.clone(),
            logo_path: f.logo_path.clone(),
            parent_id: f.parent_id,
        })
        .collect::<BTreeSet<_>>();
    let folder_ids = folders.iter().map(|f| f.id).collect::<BTreeSet<_>>();

    let modules = graph
        .modules
        .iter()
        .map(|m| ModuleRow {
            id: m.id,
            name: m.module_name.clone(),
            logo_path: m.logo_path.clone(),
        })
        .collect::<BTreeSet<_>>();

    let mut contents = BTreeMap::new();
    for content in &graph.contents {
        if !contents.contains_key(&content.id) {
            contents.insert(content.id, content_row(content, content_prefix)?);
        }
    }

    let content_metadata = graph
        .taggings
        .iter()
        .filter(|t| contents.contains_key(&t.content_id))
        .map(|t| ContentMetadataRow {
            content_id: t.content_id,
            metadata_id: t.metadata_id,
        })
        .collect::<BTreeSet<_>>();

    // The displayed title and size of a content item are the same in every
    // folder showing it; the live store has no per-folder override.
    let content_folders = graph
        .memberships
        .iter()
        .filter(|m| folder_ids.contains(&m.folder_id))
        .filter_map(|m| contents.get(&m.content_id).map(|content| (m, content)))
        .map(|(m, content)| ContentFolderRow {
            content_id: m.content_id,
            folder_id: m.folder_id,
            title: content.title.clone(),
            filesize: content.filesize,
        })
        .collect::<BTreeSet<_>>();

    Ok(RowSets {
        metadata_types: metadata_types.into_iter().collect(),
        metadata: metadata.into_values().collect(),
        folders: folders.into_iter().collect(),
        modules: modules.into_iter().collect(),
        contents: contents.into_values().collect(),
        content_metadata: content_metadata.into_iter().collect(),
        content_folders: content_folders.into_iter().collect(),
    })
}

fn content_row(content: &Content, content_prefix: &Path) -> Result<ContentRow> {
    let published_date = content
        .published_date
        .map(|date| date.format(PUBLISHED_DATE))
        .transpose()
        .or_raise(|| ErrorKind::InvalidData("published_date"))?;
    Ok(ContentRow {
        id: content.id,
        title: content.title.clone(),
        description: content.description.clone(),
        file_path: relativize(&content.content_file, content_prefix)?,
        published_date,
        copyright_notes: content.copyright_notes.clone(),
        rights_statement: content.rights_statement.clone(),
        filesize: i64::try_from(content.filesize).or_raise(|| ErrorKind::InvalidData("filesize"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlms_store::{FolderEntry, Membership, MetadataEntry, MetadataType, ModuleEntry, Tagging, Version};
    use std::path::PathBuf;
    use time::{Date, Month, UtcDateTime};

    fn content(id: i64, title: &str, file: &str) -> Content {
        Content {
            id,
            title: title.to_string(),
            file_name: file.to_string(),
            content_file: PathBuf::from("contents").join(file),
            description: None,
            copyright_notes: None,
            rights_statement: None,
            additional_notes: None,
            published_date: None,
            reviewed_on: None,
            modified_on: UtcDateTime::UNIX_EPOCH,
            filesize: 100 * id as u64,
            active: true,
            duplicatable: false,
        }
    }

    fn folder(id: i64, name: &str, parent_id: Option<i64>) -> FolderEntry {
        FolderEntry { id, folder_name: name.to_string(), parent_id, logo_path: None }
    }

    fn graph() -> VersionGraph {
        let mut published = content(1, "Clean Water", "water.pdf");
        published.published_date = Some(Date::from_calendar_date(2019, Month::March, 7).unwrap());
        published.description = Some("Keeping water safe".to_string());
        VersionGraph {
            version: Version {
                id: 1,
                library_name: "Lib".to_string(),
                version_number: "1.0".to_string(),
                library_banner_id: None,
                created_on: UtcDateTime::UNIX_EPOCH,
                created_by: None,
            },
            metadata_types: vec![MetadataType { id: 10, name: "Subject".to_string() }],
            metadata: vec![
                MetadataEntry { id: 100, name: "Health".to_string(), type_id: 10, type_name: "Subject".to_string() },
                MetadataEntry { id: 200, name: "English".to_string(), type_id: 20, type_name: "Language".to_string() },
            ],
            folders: vec![folder(1, "Health", None), folder(2, "Water", Some(1))],
            modules: vec![ModuleEntry {
                id: 5,
                module_name: "Reader".to_string(),
                logo_path: Some("images/r.png".to_string()),
            }],
            contents: vec![published, content(2, "Hand Washing", "hands/washing.mp4")],
            memberships: vec![
                Membership { folder_id: 1, content_id: 1 },
                Membership { folder_id: 2, content_id: 1 },
                Membership { folder_id: 2, content_id: 2 },
            ],
            taggings: vec![
                Tagging { content_id: 1, metadata_id: 100 },
                Tagging { content_id: 1, metadata_id: 200 },
                Tagging { content_id: 2, metadata_id: 100 },
            ],
        }
    }

    #[test]
    fn test_metadata_restricted_to_whitelist() {
        let rows = flatten(&graph(), "contents").unwrap();
        assert_eq!(rows.metadata_types, vec![MetadataTypeRow { id: 10, name: "Subject".to_string() }]);
        assert_eq!(rows.metadata.iter().map(|m| m.id).collect::<Vec<_>>(), vec![100]);
        assert_eq!(rows.metadata[0].type_name, "Subject");
    }

    #[test]
    fn test_content_metadata_keeps_every_tag() {
        let rows = flatten(&graph(), "contents").unwrap();
        // "English" is not whitelisted, but C1's tag with it is still exported.
        assert_eq!(
            rows.content_metadata,
            vec![
                ContentMetadataRow { content_id: 1, metadata_id: 100 },
                ContentMetadataRow { content_id: 1, metadata_id: 200 },
                ContentMetadataRow { content_id: 2, metadata_id: 100 },
            ]
        );
    }

    #[test]
    fn test_empty_whitelist_exports_no_metadata() {
        let mut graph = graph();
        graph.metadata_types.clear();
        let rows = flatten(&graph, "contents").unwrap();
        assert!(rows.metadata_types.is_empty());
        assert!(rows.metadata.is_empty());
        assert_eq!(rows.content_metadata.len(), 3);
        assert_eq!(rows.contents.len(), 2);
    }

    #[test]
    fn test_content_rows() {
        let rows = flatten(&graph(), "contents").unwrap();
        assert_eq!(
            rows.contents[0],
            ContentRow {
                id: 1,
                title: "Clean Water".to_string(),
                description: Some("Keeping water safe".to_string()),
                file_path: "water.pdf".to_string(),
                published_date: Some("2019-03-07".to_string()),
                copyright_notes: None,
                rights_statement: None,
                filesize: 100,
            }
        );
        // Missing optional fields stay null.
        assert_eq!(rows.contents[1].file_path, "hands/washing.mp4");
        assert_eq!(rows.contents[1].description, None);
        assert_eq!(rows.contents[1].published_date, None);
    }

    #[test]
    fn test_content_folder_rows() {
        let rows = flatten(&graph(), "contents").unwrap();
        assert_eq!(rows.content_folders.len(), 3);
        assert!(rows.content_folders.iter().all(|row| {
            let content = rows.contents.iter().find(|c| c.id == row.content_id).unwrap();
            content.title == row.title && content.filesize == row.filesize
        }));
    }

    #[test]
    fn test_folder_and_module_rows() {
        let rows = flatten(&graph(), "contents").unwrap();
        assert_eq!(
            rows.folders,
            vec![
                FolderRow { id: 1, name: "Health".to_string(), logo_path: None, parent_id: None },
                FolderRow { id: 2, name: "Water".to_string(), logo_path: None, parent_id: Some(1) },
            ]
        );
        assert_eq!(rows.modules[0].logo_path.as_deref(), Some("images/r.png"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut graph = graph();
        graph.contents.push(graph.contents[0].clone());
        graph.metadata.push(graph.metadata[0].clone());
        graph.memberships.push(graph.memberships[0]);
        graph.taggings.push(graph.taggings[0]);
        assert_eq!(flatten(&graph, "contents").unwrap(), flatten(&self::graph(), "contents").unwrap());
    }

    #[test]
    fn test_edges_to_unknown_rows_are_dropped() {
        let mut graph = graph();
        graph.memberships.push(Membership { folder_id: 99, content_id: 1 });
        graph.memberships.push(Membership { folder_id: 1, content_id: 99 });
        graph.taggings.push(Tagging { content_id: 99, metadata_id: 100 });
        let rows = flatten(&graph, "contents").unwrap();
        assert_eq!(rows.content_folders.len(), 3);
        assert_eq!(rows.content_metadata.len(), 3);
    }

    #[test]
    fn test_content_outside_prefix_fails() {
        let mut graph = graph();
        graph.contents[1].content_file = PathBuf::from("../secret.pdf");
        let err = flatten(&graph, "contents").unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
