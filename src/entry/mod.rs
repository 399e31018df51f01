//! Per-entry metadata inspection
//!
//! `inspect` turns a path into an `EntryDescriptor`. It never fails: when the
//! operating system refuses access, the descriptor carries sentinel values
//! and the walk continues.

mod classify;
mod size;

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use walkdir::WalkDir;

pub use classify::{FileClass, classify, classify_name};
pub use size::{SizeFormat, format_number, format_size, format_size_precise};

/// Timestamp layout used for display and for date filters.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown in place of a timestamp that could not be read.
pub const UNAVAILABLE_TIME: &str = "N/A";

/// Shown in place of permissions that could not be read.
pub const UNAVAILABLE_PERMISSIONS: &str = "---------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// Normalized metadata for one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    pub name: String,
    pub kind: EntryKind,
    /// File length, or the summed size of every regular file below a directory.
    pub size: u64,
    pub size_formatted: String,
    /// Local time as `YYYY-MM-DD HH:MM:SS`, or `N/A`.
    pub last_modified: String,
    /// `rwxrwxrwx`-style string.
    pub permissions: String,
    pub is_hidden: bool,
    pub is_executable: bool,
    pub is_symlink: bool,
}

impl EntryDescriptor {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Parse `last_modified` back into a timestamp.
    pub fn modified_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.last_modified, TIME_FORMAT).ok()
    }

    pub fn class(&self) -> FileClass {
        classify(self)
    }
}

/// Inspect a path.
pub fn inspect(path: &Path, size_format: SizeFormat) -> EntryDescriptor {
    let name = entry_name(path);
    let is_hidden = is_hidden_name(OsStr::new(&name));
    let is_symlink = path
        .symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);

    match path.metadata() {
        Ok(meta) => {
            let kind = if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let size = match kind {
                EntryKind::Directory => directory_size(path),
                EntryKind::File => meta.len(),
            };
            let last_modified = meta
                .modified()
                .map(format_time)
                .unwrap_or_else(|_| UNAVAILABLE_TIME.to_string());

            EntryDescriptor {
                name,
                kind,
                size,
                size_formatted: size_format.format(size),
                last_modified,
                permissions: format_permissions(&meta),
                is_hidden,
                is_executable: is_executable(&meta),
                is_symlink,
            }
        }
        Err(err) => {
            log::debug!("cannot stat {}: {}", path.display(), err);
            EntryDescriptor {
                name,
                kind: EntryKind::File,
                size: 0,
                size_formatted: size_format.format(0),
                last_modified: UNAVAILABLE_TIME.to_string(),
                permissions: UNAVAILABLE_PERMISSIONS.to_string(),
                is_hidden,
                is_executable: false,
                is_symlink,
            }
        }
    }
}

/// Name of a path, falling back to its full display form (e.g. for `.` or `/`).
pub fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Entries whose name starts with a dot are hidden.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Sum the sizes of all regular files below `path`. Unreadable entries are skipped.
pub fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Format a timestamp in local time.
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIME_FORMAT).to_string()
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

/// Render the nine permission bits as `rwxrwxrwx`, with `-` for unset bits.
pub fn format_permissions(meta: &Metadata) -> String {
    permission_string(mode_bits(meta))
}

fn permission_string(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}

fn is_executable(meta: &Metadata) -> bool {
    mode_bits(meta) & 0o111 != 0
}
