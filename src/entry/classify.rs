//! File type classification used to pick display colors

use super::EntryDescriptor;

/// Display category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Hidden,
    Symlink,
    Executable,
    Directory,
    Image,
    Video,
    Audio,
    Archive,
    Config,
    Document,
    SourceCode,
    Data,
    Backup,
    Font,
    Other,
}

/// Classify an entry.
///
/// Hidden, symlink, executable and directory take precedence, in that order,
/// over extension-based classification. The execute bit of a directory is
/// its search permission, so only non-directories count as executable.
pub fn classify(entry: &EntryDescriptor) -> FileClass {
    if entry.is_hidden {
        return FileClass::Hidden;
    }
    if entry.is_symlink {
        return FileClass::Symlink;
    }
    if entry.is_executable && !entry.is_dir() {
        return FileClass::Executable;
    }
    if entry.is_dir() {
        return FileClass::Directory;
    }
    classify_name(&entry.name)
}

/// Classify a file purely by its extension.
pub fn classify_name(name: &str) -> FileClass {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return FileClass::Other,
    };

    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "tiff" => FileClass::Image,
        "mov" | "mp4" | "avi" | "mkv" | "wmv" | "flv" | "webm" | "m4v" | "mpeg" => {
            FileClass::Video
        }
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" => FileClass::Audio,
        "zip" | "rar" | "tar" | "gz" | "7z" | "bz2" | "xz" | "lz" | "arj" => FileClass::Archive,
        "conf" | "config" | "ini" | "json" | "xml" | "yaml" | "yml" | "toml" | "properties" => {
            FileClass::Config
        }
        "txt" | "doc" | "docx" | "pdf" | "rtf" | "odt" | "xls" | "xlsx" | "ppt" | "pptx"
        | "epub" | "mobi" => FileClass::Document,
        "cpp" | "h" | "hpp" | "c" | "java" | "py" | "js" | "html" | "css" | "php" | "rb"
        | "go" | "rs" | "swift" | "kt" | "ts" | "scala" | "pl" | "lua" | "sh" | "bat" | "ps1"
        | "md" | "tex" => FileClass::SourceCode,
        "db" | "sql" | "sqlite" | "mdb" | "csv" | "tsv" | "dat" | "log" => FileClass::Data,
        "bak" | "backup" | "old" | "tmp" | "temp" => FileClass::Backup,
        "ttf" | "otf" | "woff" | "woff2" | "eot" => FileClass::Font,
        _ => FileClass::Other,
    }
}
