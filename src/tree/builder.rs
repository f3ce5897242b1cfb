//! TreeBuilder - walks a path and builds the full tree in memory

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, NullSink};
use crate::error::TreeError;
use crate::metadata::{self, FileMetadata};

use super::config::{BuildConfig, Depth};
use super::filter::IgnoreFilter;
use super::node::{DirectoryNode, Entry, Tree};

/// Depth-first, single-threaded tree builder.
///
/// Only a bad depth or a missing root fail a build. Problems below the root
/// are reported to the diagnostic sink and leave an empty node behind.
pub struct TreeBuilder<'s> {
    config: BuildConfig,
    filter: IgnoreFilter,
    sink: &'s dyn DiagnosticSink,
}

/// A listed directory child, named and ready to sort.
struct Child {
    name: String,
    raw: OsString,
    entry: fs::DirEntry,
}

/// Type of a directory entry as reported by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryType {
    File,
    Dir,
    Symlink,
    Other,
}

impl From<fs::FileType> for EntryType {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryType::Symlink
        } else if ft.is_dir() {
            EntryType::Dir
        } else if ft.is_file() {
            EntryType::File
        } else {
            EntryType::Other
        }
    }
}

/// What a child stands for once symlinks are resolved.
#[derive(Debug)]
enum ChildKind {
    File,
    Dir,
    /// Special file or dangling link
    Skipped,
    /// The type could not be determined
    Unreadable(io::Error),
}

impl TreeBuilder<'static> {
    pub fn new(config: BuildConfig) -> Self {
        let filter = IgnoreFilter::new(&config.ignore_patterns);
        Self {
            config,
            filter,
            sink: &NullSink,
        }
    }
}

impl<'s> TreeBuilder<'s> {
    /// Send diagnostics to `sink` instead of dropping them.
    pub fn with_sink<'a>(self, sink: &'a dyn DiagnosticSink) -> TreeBuilder<'a> {
        TreeBuilder {
            config: self.config,
            filter: self.filter,
            sink,
        }
    }

    pub fn build(&self, root: &Path) -> Result<Tree, TreeError> {
        let depth = Depth::try_from(self.config.depth)?;

        if !root.exists() {
            return Err(TreeError::NotFound(root.to_path_buf()));
        }

        if root.is_file() {
            let mut node = DirectoryNode::with_capacity(1);
            node.push(root_name(root), Entry::File(self.extract(root)));
            return Ok(Tree::new(node));
        }

        Ok(Tree::new(self.build_dir(root, depth)))
    }

    fn build_dir(&self, path: &Path, depth: Depth) -> DirectoryNode {
        // Contents are elided, the directory itself still shows up as {}
        if depth.is_exhausted() {
            return DirectoryNode::new();
        }

        let Some(children) = self.read_children(path) else {
            return DirectoryNode::new();
        };

        let mut node = DirectoryNode::with_capacity(children.len());
        let mut seen = HashSet::with_capacity(children.len());
        for child in children {
            let child_path = child.entry.path();

            if self.filter.is_ignored(&child.name) {
                self.sink
                    .report(Diagnostic::debug(&child_path, DiagnosticKind::Ignored));
                continue;
            }

            // Only non-UTF-8 names can collide after escaping
            if seen.contains(&child.name) {
                self.sink
                    .report(Diagnostic::warn(&child_path, DiagnosticKind::DuplicateName));
                continue;
            }

            let entry = match classify(&child.entry) {
                ChildKind::Dir => Entry::Directory(self.build_dir(&child_path, depth.descend())),
                ChildKind::File => Entry::File(self.extract(&child_path)),
                ChildKind::Unreadable(e) => {
                    self.sink.report(Diagnostic::warn(
                        &child_path,
                        DiagnosticKind::MetadataUnreadable(e.to_string()),
                    ));
                    Entry::File(FileMetadata::Inaccessible)
                }
                ChildKind::Skipped => {
                    self.sink
                        .report(Diagnostic::debug(&child_path, DiagnosticKind::SkippedSpecial));
                    continue;
                }
            };
            seen.insert(child.name.clone());
            node.push(child.name, entry);
        }
        node
    }

    /// List a directory's children sorted case-insensitively.
    /// Returns None (after reporting a warning) when the listing fails.
    fn read_children(&self, path: &Path) -> Option<Vec<Child>> {
        let entries = match fs::read_dir(path) {
            Ok(e) => e,
            Err(e) => {
                let kind = if e.kind() == io::ErrorKind::PermissionDenied {
                    DiagnosticKind::PermissionDenied
                } else {
                    DiagnosticKind::ListingFailed(e.to_string())
                };
                self.sink.report(Diagnostic::warn(path, kind));
                return None;
            }
        };

        let mut children: Vec<Child> = self
            .collect_listing(path, entries)
            .into_iter()
            .map(|entry| {
                let raw = entry.file_name();
                Child {
                    name: entry_name(&raw),
                    raw,
                    entry,
                }
            })
            .collect();
        children.sort_by_cached_key(|c| (c.name.to_lowercase(), c.name.clone(), c.raw.clone()));
        Some(children)
    }

    /// Keep the readable items of a listing, warning about each failed one.
    fn collect_listing<T>(
        &self,
        dir: &Path,
        entries: impl Iterator<Item = io::Result<T>>,
    ) -> Vec<T> {
        entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    self.sink.report(Diagnostic::warn(
                        dir,
                        DiagnosticKind::ListingFailed(e.to_string()),
                    ));
                    None
                }
            })
            .collect()
    }

    fn extract(&self, path: &Path) -> FileMetadata {
        metadata::extract(path, self.config.human_readable, self.sink)
    }
}

fn classify(entry: &fs::DirEntry) -> ChildKind {
    resolve_kind(entry.file_type().map(EntryType::from), || {
        fs::metadata(entry.path()).map(|m| EntryType::from(m.file_type()))
    })
}

/// Decide what an entry stands for. `target` stats through a symlink and is
/// only called for links.
fn resolve_kind(
    own: io::Result<EntryType>,
    target: impl FnOnce() -> io::Result<EntryType>,
) -> ChildKind {
    let resolved = match own {
        Ok(EntryType::Symlink) => match target() {
            Err(e) if is_dangling(&e) => return ChildKind::Skipped,
            other => other,
        },
        other => other,
    };
    match resolved {
        Ok(EntryType::File) => ChildKind::File,
        Ok(EntryType::Dir) => ChildKind::Dir,
        Ok(EntryType::Symlink | EntryType::Other) => ChildKind::Skipped,
        Err(e) => ChildKind::Unreadable(e),
    }
}

/// A link whose target path does not exist.
fn is_dangling(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Name of a child as a JSON string. Bytes that are not valid UTF-8 are
/// written as `\xNN` so distinct names stay distinct.
#[cfg(unix)]
fn entry_name(name: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;

    let mut out = String::with_capacity(name.len());
    for chunk in name.as_bytes().utf8_chunks() {
        out.push_str(chunk.valid());
        for byte in chunk.invalid() {
            out.push_str(&format!("\\x{:02x}", byte));
        }
    }
    out
}

#[cfg(not(unix))]
fn entry_name(name: &OsStr) -> String {
    name.to_string_lossy().to_string()
}

fn root_name(path: &Path) -> String {
    path.file_name()
        .map(entry_name)
        .unwrap_or_else(|| path.display().to_string())
}

/// Build a tree with diagnostics discarded.
pub fn build_tree(root: &Path, depth: i64, human_readable: bool) -> Result<Tree, TreeError> {
    let config = BuildConfig {
        depth,
        human_readable,
        ..Default::default()
    };
    TreeBuilder::new(config).build(root)
}
