//! Statistics summary printed after a text tree

use std::io;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::entry::format_size_precise;
use crate::remote::RATE_LIMIT_WARNING;
use crate::stats::DisplayStatistics;

/// What the walk that produced the statistics was asked to do.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryContext {
    pub remote: bool,
    pub depth_limited: bool,
    pub show_hidden: bool,
    pub filtered: bool,
}

/// Write the summary block, starting with a blank line.
///
/// Remote and depth-limited walks report what was displayed; full local
/// walks report raw totals.
pub fn write_summary<W: WriteColor>(
    out: &mut W,
    stats: &DisplayStatistics,
    ctx: SummaryContext,
) -> io::Result<()> {
    let (directories, files, size) = if ctx.remote || ctx.depth_limited {
        (
            stats.displayed_directories,
            stats.displayed_files,
            stats.displayed_size,
        )
    } else {
        (
            stats.totals.total_directories,
            stats.totals.total_files,
            stats.totals.total_size,
        )
    };

    writeln!(out)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "Statistics:")?;
    out.reset()?;
    writeln!(out)?;

    writeln!(out, "  Directories: {}", directories)?;
    writeln!(out, "  Files: {}", files)?;
    writeln!(out, "  Total size: {}", format_size_precise(size))?;

    if ctx.remote {
        writeln!(out, "  API requests: {}", stats.api_requests)?;
        if stats.api_requests >= RATE_LIMIT_WARNING {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, "  Close to the GitHub API limit (60 requests/hour)")?;
            out.reset()?;
            writeln!(out)?;
        }
    }

    if ctx.depth_limited && stats.hidden_by_depth > 0 {
        writeln!(
            out,
            "  Hidden by depth: {} directories",
            stats.hidden_by_depth
        )?;
    }

    if stats.hidden_objects > 0 && !ctx.show_hidden {
        writeln!(
            out,
            "  Hidden entries: {} (use -a to show them)",
            stats.hidden_objects
        )?;
    }

    if ctx.filtered {
        writeln!(out, "  (filters applied)")?;
    }

    out.flush()
}
