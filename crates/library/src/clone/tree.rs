use crate::error::{ErrorKind, Result};
use dlms_store::Folder;
use std::collections::{BTreeMap, BTreeSet};

/// A version's folders, checked to form a forest.
///
/// Every parent is a folder of the same set, and every folder is reachable
/// from a root (which rules out cycles).
pub(crate) struct FolderTree<'a> {
    roots: Vec<&'a Folder>,
    children: BTreeMap<i64, Vec<&'a Folder>>,
}

impl<'a> FolderTree<'a> {
    pub(crate) fn new(folders: &'a [Folder]) -> Result<Self> {
        let ids = folders.iter().map(|f| f.id).collect::<BTreeSet<_>>();
        let mut roots = Vec::new();
        let mut children: BTreeMap<i64, Vec<&Folder>> = BTreeMap::new();
        for folder in folders {
            match folder.parent_id {
                None => roots.push(folder),
                Some(parent) if ids.contains(&parent) => children.entry(parent).or_default().push(folder),
                Some(parent) => exn::bail!(ErrorKind::InvalidState(format!(
                    "folder {} has parent {parent} outside its version",
                    folder.id
                ))),
            }
        }

        let tree = Self { roots, children };
        let reachable = tree.walk().count();
        if reachable != folders.len() {
            exn::bail!(ErrorKind::InvalidState(format!(
                "{} folders are not reachable from a root folder",
                folders.len() - reachable
            )));
        }
        Ok(tree)
    }

    pub(crate) fn roots(&self) -> &[&'a Folder] {
        &self.roots
    }

    pub(crate) fn children(&self, id: i64) -> &[&'a Folder] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Depth-first, parents before children.
    fn walk(&self) -> impl Iterator<Item = &'a Folder> + '_ {
        let mut stack = self.roots.clone();
        std::iter::from_fn(move || {
            let folder = stack.pop()?;
            stack.extend(self.children(folder.id).iter().copied());
            Some(folder)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: i64, parent_id: Option<i64>) -> Folder {
        Folder {
            id,
            folder_name: format!("F{id}"),
            logo_img_id: None,
            banner_img_id: None,
            version_id: 1,
            parent_id,
        }
    }

    #[test]
    fn test_forest() {
        let folders = vec![
            folder(1, None),
            folder(2, Some(1)),
            folder(3, Some(1)),
            folder(4, None),
            folder(5, Some(3)),
        ];
        let tree = FolderTree::new(&folders).unwrap();
        assert_eq!(tree.roots().iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(tree.children(1).iter().map(|f| f.id).collect::<Vec<_>>(), vec![2, 3]);
        assert!(tree.children(2).is_empty());
        let mut seen = tree.walk().map(|f| f.id).collect::<Vec<_>>();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty() {
        let tree = FolderTree::new(&[]).unwrap();
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_dangling_parent() {
        let folders = vec![folder(1, None), folder(2, Some(9))];
        let err = FolderTree::new(&folders).err().unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidState(_)));
    }

    #[test]
    fn test_cycle() {
        let folders = vec![folder(1, None), folder(2, Some(3)), folder(3, Some(2))];
        let err = FolderTree::new(&folders).err().unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidState(_)));
    }
}
