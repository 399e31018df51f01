//! Single-line rendering of entries
//!
//! `LineFormatter` knows nothing about tree position; callers prepend the
//! prefix and connector. Colored and plain output go through the same code,
//! the only difference being whether the termcolor buffer emits escapes.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::entry::{EntryDescriptor, FileClass, classify_name, format_size};
use crate::remote::RemoteEntry;

fn spec(color: Color, bold: bool) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(bold);
    spec
}

/// Color of an entry name for a display class.
pub fn class_color(class: FileClass) -> ColorSpec {
    match class {
        FileClass::Hidden => spec(Color::Black, true),
        FileClass::Directory => spec(Color::Blue, true),
        FileClass::Symlink => spec(Color::Cyan, false),
        FileClass::Executable => spec(Color::Green, true),
        FileClass::Image => spec(Color::Magenta, false),
        FileClass::Video => spec(Color::Magenta, true),
        FileClass::Audio => spec(Color::Cyan, true),
        FileClass::Archive => spec(Color::Red, false),
        FileClass::Config => spec(Color::Yellow, false),
        FileClass::Document => spec(Color::White, false),
        FileClass::SourceCode => spec(Color::Green, false),
        FileClass::Data => spec(Color::Yellow, false),
        FileClass::Backup => spec(Color::Black, false),
        FileClass::Font => spec(Color::Magenta, false),
        FileClass::Other => spec(Color::White, false),
    }
}

/// Formats descriptors as `name [DIR] | date | permissions` or
/// `name (size) | date | permissions`.
#[derive(Debug, Clone, Copy)]
pub struct LineFormatter {
    use_color: bool,
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self { use_color: true }
    }
}

impl LineFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn render<F>(&self, write: F) -> String
    where
        F: FnOnce(&mut Buffer) -> io::Result<()>,
    {
        let mut buf = if self.use_color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        // In-memory writes cannot fail.
        let _ = write(&mut buf);
        String::from_utf8_lossy(buf.as_slice()).into_owned()
    }

    /// Line for the root of a local walk.
    pub fn root_marker(&self) -> String {
        self.render(|buf| paint(buf, &spec(Color::Blue, true), "[DIR]"))
    }

    pub fn format(&self, entry: &EntryDescriptor) -> String {
        self.render(|buf| write_entry(buf, entry))
    }

    /// Directory line for a directory the depth limit stopped at.
    pub fn format_contents_hidden(&self, entry: &EntryDescriptor) -> String {
        self.render(|buf| {
            write_entry(buf, entry)?;
            write!(buf, " ")?;
            paint(buf, spec(Color::Yellow, false).set_intense(true), "(contents hidden)")
        })
    }

    /// Root line of a remote walk.
    pub fn remote_root(&self, owner: &str, repo: &str, branch: &str) -> String {
        let text = format!("[GITHUB] {}/{} ({})", owner, repo, branch);
        self.render(|buf| paint(buf, &spec(Color::Blue, true), &text))
    }

    pub fn format_remote(&self, entry: &RemoteEntry) -> String {
        self.render(|buf| {
            let class = if entry.is_dir() {
                FileClass::Directory
            } else {
                classify_name(&entry.name)
            };
            paint(buf, &class_color(class), &entry.name)?;
            if entry.is_dir() {
                write!(buf, " ")?;
                paint(buf, &spec(Color::Cyan, false), "[DIR]")?;
            } else if entry.size > 0 {
                write!(buf, " (")?;
                paint(buf, &spec(Color::Green, false), &format_size(entry.size))?;
                write!(buf, ")")?;
            }
            write!(buf, " | ")?;
            paint(buf, &spec(Color::Yellow, false), &entry.last_modified)
        })
    }

    /// Marker placed under a remote directory the depth limit stopped at.
    pub fn depth_limited(&self) -> String {
        self.render(|buf| {
            paint(buf, spec(Color::Yellow, false).set_intense(true), "(depth limited)")
        })
    }
}

fn paint(buf: &mut Buffer, spec: &ColorSpec, text: &str) -> io::Result<()> {
    buf.set_color(spec)?;
    write!(buf, "{}", text)?;
    buf.reset()
}

fn write_entry(buf: &mut Buffer, entry: &EntryDescriptor) -> io::Result<()> {
    paint(buf, &class_color(entry.class()), &entry.name)?;
    if entry.is_dir() {
        write!(buf, " ")?;
        paint(buf, &spec(Color::Cyan, false), "[DIR]")?;
        write!(buf, " | ")?;
    } else {
        write!(buf, " (")?;
        paint(buf, &spec(Color::Green, false), &entry.size_formatted)?;
        write!(buf, ") | ")?;
    }
    paint(buf, &spec(Color::Yellow, false), &entry.last_modified)?;
    write!(buf, " | ")?;
    paint(buf, &spec(Color::Magenta, false), &entry.permissions)
}
