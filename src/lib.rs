//! dirtree - snapshot a directory tree with file metadata as JSON

pub mod diagnostics;
pub mod error;
pub mod metadata;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Level, NullSink, TracingSink};
pub use error::TreeError;
pub use metadata::{FileMetadata, ModifiedTime, Size, extract, format_size, format_time};
pub use output::{parse_json, print_json, to_json, write_json};
pub use tree::{BuildConfig, Depth, DirectoryNode, Entry, Tree, TreeBuilder, build_tree};
