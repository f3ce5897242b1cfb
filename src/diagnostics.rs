//! Diagnostic reporting for recoverable traversal problems
//!
//! The tree builder never writes to a global logger. It hands every
//! non-fatal event to a [`DiagnosticSink`] passed in by the caller, so the
//! same traversal can log through `tracing`, collect messages in a test, or
//! stay silent.

use std::fmt;
use std::path::{Path, PathBuf};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// What went wrong (or was noticed) for a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The entry disappeared between listing and inspection.
    Vanished,
    /// File metadata could not be read.
    MetadataUnreadable(String),
    /// Listing a directory failed because of permissions.
    PermissionDenied,
    /// Listing a directory failed for another OS reason.
    ListingFailed(String),
    /// The entry is neither a regular file nor a directory.
    SkippedSpecial,
    /// The entry matched an ignore pattern.
    Ignored,
    /// The entry's name collides with an earlier sibling once escaped.
    DuplicateName,
}

/// A structured, non-fatal message emitted during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub path: PathBuf,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(level: Level, path: &Path, kind: DiagnosticKind) -> Self {
        Self {
            level,
            path: path.to_path_buf(),
            kind,
        }
    }

    pub fn warn(path: &Path, kind: DiagnosticKind) -> Self {
        Self::new(Level::Warn, path, kind)
    }

    pub fn debug(path: &Path, kind: DiagnosticKind) -> Self {
        Self::new(Level::Debug, path, kind)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            DiagnosticKind::Vanished => write!(f, "File does not exist: {}", path),
            DiagnosticKind::MetadataUnreadable(reason) => {
                write!(f, "Cannot access file info for: {} ({})", path, reason)
            }
            DiagnosticKind::PermissionDenied => write!(f, "Permission denied: {}", path),
            DiagnosticKind::ListingFailed(reason) => {
                write!(f, "Cannot list directory: {} ({})", path, reason)
            }
            DiagnosticKind::SkippedSpecial => {
                write!(f, "Skipping non-file, non-dir entry: {}", path)
            }
            DiagnosticKind::Ignored => write!(f, "Skipping ignored entry: {}", path),
            DiagnosticKind::DuplicateName => {
                write!(f, "Skipping entry with duplicate name: {}", path)
            }
        }
    }
}

/// Receiver for diagnostics produced while building a tree.
///
/// Builds are single-threaded, so sinks take `&self` and are free to use
/// interior mutability without locking.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Drops every diagnostic. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Debug => tracing::debug!("{}", diagnostic),
            Level::Info => tracing::info!("{}", diagnostic),
            Level::Warn => tracing::warn!("{}", diagnostic),
        }
    }
}
