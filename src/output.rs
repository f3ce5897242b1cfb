//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::tree::Tree;

const INDENT: &[u8] = b"    ";

/// Render a tree as pretty-printed JSON with 4-space indentation.
///
/// Keys appear in tree order and non-ASCII names are written as-is.
pub fn to_json(tree: &Tree) -> io::Result<String> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    tree.serialize(&mut ser).map_err(io::Error::other)?;
    String::from_utf8(buf).map_err(io::Error::other)
}

/// Write a tree as JSON followed by a newline.
pub fn write_json<W: Write>(tree: &Tree, mut writer: W) -> io::Result<()> {
    let json = to_json(tree)?;
    writeln!(writer, "{}", json)?;
    writer.flush()
}

/// Print a tree as pretty-printed JSON to stdout.
pub fn print_json(tree: &Tree) -> io::Result<()> {
    write_json(tree, io::stdout().lock())
}

/// Parse a JSON document back into a generic value, keeping key order.
pub fn parse_json(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text)
}
