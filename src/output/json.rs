//! JSON output formatting

use std::io::{self, Write};

use crate::tree::JsonTree;

/// Write the document pretty-printed with two-space indentation and a
/// trailing newline.
pub fn write_json<W: Write>(out: &mut W, tree: &JsonTree) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, tree).map_err(io::Error::other)?;
    writeln!(out)
}
