//! Directory tree building
//!
//! `TreeBuilder` walks a root path depth-first and produces a [`Tree`]:
//! directories become ordered mappings, regular files become metadata
//! leaves. The whole tree is held in memory and returned in one piece.

mod builder;
mod config;
mod filter;
mod node;

pub use builder::{TreeBuilder, build_tree};
pub use config::{BuildConfig, DEFAULT_DEPTH, Depth};
pub use filter::IgnoreFilter;
pub use node::{DirectoryNode, Entry, Tree};
