//! In-memory tree model

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::metadata::FileMetadata;

/// A named node in the tree: a file leaf or a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    File(FileMetadata),
    Directory(DirectoryNode),
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    pub fn as_file(&self) -> Option<&FileMetadata> {
        match self {
            Entry::File(meta) => Some(meta),
            Entry::Directory(_) => None,
        }
    }

    pub fn as_dir(&self) -> Option<&DirectoryNode> {
        match self {
            Entry::Directory(dir) => Some(dir),
            Entry::File(_) => None,
        }
    }
}

/// Ordered mapping from child name to child entry.
///
/// Children keep the order they were inserted in, which the builder makes
/// case-insensitive alphabetical. Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryNode {
    children: Vec<(String, Entry)>,
}

impl DirectoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: String, entry: Entry) {
        self.children.push((name, entry));
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.children.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl FromIterator<(String, Entry)> for DirectoryNode {
    fn from_iter<I: IntoIterator<Item = (String, Entry)>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl Serialize for DirectoryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (name, entry) in &self.children {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

/// The result of one build: a directory node for the root.
///
/// When the root path is a file, the tree holds that single file under its
/// own name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tree(DirectoryNode);

impl Tree {
    pub fn new(root: DirectoryNode) -> Self {
        Self(root)
    }

    pub fn root(&self) -> &DirectoryNode {
        &self.0
    }

    /// Walk a `/`-separated path of child names from the root.
    pub fn lookup(&self, path: &str) -> Option<&Entry> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_dir()?.get(part)?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ModifiedTime, Size};

    fn file(size: u64) -> Entry {
        Entry::File(FileMetadata::Available {
            size: Size::Bytes(size),
            modified_time: ModifiedTime::Timestamp(0.0),
        })
    }

    #[test]
    fn test_serialization_keeps_insertion_order() {
        let dir: DirectoryNode = vec![
            ("zeta".to_string(), file(1)),
            ("alpha".to_string(), file(2)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&dir).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
    }

    #[test]
    fn test_nested_serialization() {
        let mut inner = DirectoryNode::new();
        inner.push("x.txt".to_string(), file(3));
        let mut root = DirectoryNode::new();
        root.push("a.txt".to_string(), file(5));
        root.push("b".to_string(), Entry::Directory(DirectoryNode::new()));
        root.push("c".to_string(), Entry::Directory(inner));

        let json = serde_json::to_string(&Tree::new(root)).unwrap();
        assert_eq!(
            json,
            r#"{"a.txt":{"size":5,"modified_time":0.0},"b":{},"c":{"x.txt":{"size":3,"modified_time":0.0}}}"#
        );
    }

    #[test]
    fn test_lookup() {
        let mut inner = DirectoryNode::new();
        inner.push("deep.txt".to_string(), file(1));
        let mut root = DirectoryNode::new();
        root.push("sub".to_string(), Entry::Directory(inner));
        let tree = Tree::new(root);

        assert!(tree.lookup("sub").unwrap().is_dir());
        assert!(tree.lookup("sub/deep.txt").unwrap().as_file().is_some());
        assert!(tree.lookup("sub/missing").is_none());
        assert!(tree.lookup("sub/deep.txt/nope").is_none());
        assert!(tree.lookup("").is_none());
    }
}
