//! Hard failures of a tree build

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a build.
///
/// Everything else the filesystem throws at a traversal (unreadable files,
/// unlistable directories, entries vanishing mid-scan) is absorbed into the
/// tree as an empty node and reported through a [`DiagnosticSink`].
///
/// [`DiagnosticSink`]: crate::DiagnosticSink
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("'depth' must be -1 (unlimited) or >= 0, got {0}")]
    InvalidDepth(i64),

    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),
}
