//! Byte count formatting

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

const KB: u64 = 1000;
const MB: u64 = KB * 1000;
const GB: u64 = MB * 1000;

/// How a byte count is rendered next to a file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeFormat {
    /// Single base-1024 unit, integer-truncated: `12 KB`.
    #[default]
    Compact,
    /// Binary and decimal forms plus the raw count:
    /// `11.7 KiB / 12.0 KB (12,000 bytes)`.
    Precise,
}

impl SizeFormat {
    pub fn format(self, bytes: u64) -> String {
        match self {
            SizeFormat::Compact => format_size(bytes),
            SizeFormat::Precise => format_size_precise(bytes),
        }
    }
}

/// Format a size using a single base-1024 unit, truncating the fraction.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{} KB", bytes / KIB)
    } else if bytes < GIB {
        format!("{} MB", bytes / MIB)
    } else if bytes < TIB {
        format!("{} GB", bytes / GIB)
    } else {
        format!("{} TB", bytes / TIB)
    }
}

/// Format a size in both binary and decimal units with one decimal digit.
pub fn format_size_precise(bytes: u64) -> String {
    let binary = if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    };

    let decimal = if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    };

    format!("{} / {} ({} bytes)", binary, decimal, format_number(bytes))
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
