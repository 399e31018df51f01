//! Tree formatting and display
//!
//! - `config` - output configuration
//! - `line` - per-entry line formatting (colored or plain)
//! - `json` - pretty-printed JSON documents
//! - `summary` - the statistics block printed after a text tree

mod config;
mod json;
mod line;
mod summary;

pub use config::OutputConfig;
pub use json::write_json;
pub use line::{LineFormatter, class_color};
pub use summary::{SummaryContext, write_summary};

use std::io::{self, Write};

/// Write tree lines, one per line.
pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
