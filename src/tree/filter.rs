//! Size, modification time and name filters
//!
//! Filters only ever exclude files. Directories are always traversed and
//! always shown, even when none of their files pass.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Regex, RegexBuilder};

use crate::entry::{EntryDescriptor, TIME_FORMAT};
use crate::error::{Error, Result};

/// Comparison operator of a size or date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    pub fn compare<T: PartialOrd>(self, value: &T, threshold: &T) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::Less => value < threshold,
            Comparison::Equal => value == threshold,
            Comparison::GreaterOrEqual => value >= threshold,
            Comparison::LessOrEqual => value <= threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::Equal => "==",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
        }
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ">" => Ok(Comparison::Greater),
            "<" => Ok(Comparison::Less),
            "==" => Ok(Comparison::Equal),
            ">=" => Ok(Comparison::GreaterOrEqual),
            "<=" => Ok(Comparison::LessOrEqual),
            other => Err(format!(
                "unknown operator '{}' (expected >, <, ==, >= or <=)",
                other
            )),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One inclusion rule.
#[derive(Debug, Clone)]
pub enum Filter {
    Size { op: Comparison, bytes: u64 },
    Modified { op: Comparison, at: NaiveDateTime },
    Name { pattern: Regex, include: bool },
}

impl Filter {
    /// Parse a size filter such as `> 100MB`, `<=1.5KiB` or `== 0`.
    pub fn size(spec: &str) -> Result<Self> {
        let (op, value) = split_operator(spec).map_err(|e| Error::filter_spec("size", spec, e))?;
        let bytes = parse_size(value).map_err(|e| Error::filter_spec("size", spec, e))?;
        Ok(Filter::Size { op, bytes })
    }

    /// Parse a date filter such as `> 2024-01-01` or `<= 2024-01-01 12:00:00`.
    pub fn modified(spec: &str) -> Result<Self> {
        let (op, value) = split_operator(spec).map_err(|e| Error::filter_spec("date", spec, e))?;
        let at = parse_date(value).map_err(|e| Error::filter_spec("date", spec, e))?;
        Ok(Filter::Modified { op, at })
    }

    /// Build a case-insensitive wildcard name filter.
    ///
    /// `include = true` keeps matching files; `include = false` drops them.
    pub fn name(pattern: &str, include: bool) -> Result<Self> {
        let regex = RegexBuilder::new(&wildcard_to_regex(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::filter_spec("name", pattern, e.to_string()))?;
        Ok(Filter::Name {
            pattern: regex,
            include,
        })
    }

    /// Check a single descriptor against this filter.
    pub fn matches(&self, entry: &EntryDescriptor) -> bool {
        match self {
            Filter::Size { op, bytes } => op.compare(&entry.size, bytes),
            // Entries without a readable timestamp are not excluded.
            Filter::Modified { op, at } => entry
                .modified_at()
                .is_none_or(|modified| op.compare(&modified, at)),
            Filter::Name { pattern, include } => pattern.is_match(&entry.name) == *include,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Size { op, bytes } => write!(f, "size {} {} bytes", op, bytes),
            Filter::Modified { op, at } => write!(f, "modified {} {}", op, at.format(TIME_FORMAT)),
            Filter::Name { pattern, include } => {
                let verb = if *include { "matches" } else { "excludes" };
                write!(f, "name {} {}", verb, pattern.as_str())
            }
        }
    }
}

/// Ordered list of filters combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: Filter) {
        log::debug!("added filter: {}", filter);
        self.filters.push(filter);
    }

    pub fn with(mut self, filter: Filter) -> Self {
        self.add(filter);
        self
    }

    /// Add a filter that was parsed at runtime; a malformed one is dropped with a warning.
    pub fn add_or_warn(&mut self, filter: Result<Filter>) {
        match filter {
            Ok(f) => self.add(f),
            Err(e) => log::warn!("ignoring filter: {}", e),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Directories always pass; files must pass every filter.
    pub fn matches(&self, entry: &EntryDescriptor) -> bool {
        entry.is_dir() || self.filters.iter().all(|f| f.matches(entry))
    }
}

/// Split a leading comparison operator from the value that follows it.
fn split_operator(spec: &str) -> std::result::Result<(Comparison, &str), String> {
    let spec = spec.trim();
    let op_len = spec
        .find(|c: char| !matches!(c, '<' | '>' | '='))
        .unwrap_or(spec.len());
    let (op, value) = spec.split_at(op_len);
    if op.is_empty() {
        return Err("missing comparison operator".to_string());
    }
    let value = value.trim();
    if value.is_empty() {
        return Err("missing value".to_string());
    }
    Ok((op.parse()?, value))
}

/// Parse a size such as `100`, `10KB`, `1.5 MiB`.
///
/// Units without `i` are decimal (1000-based), units with `i` are binary.
pub fn parse_size(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    let multiplier: u64 = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "MB" | "M" => 1_000_000,
        "GB" | "G" => 1_000_000_000,
        "TB" | "T" => 1_000_000_000_000,
        "KIB" => 1 << 10,
        "MIB" => 1 << 20,
        "GIB" => 1 << 30,
        "TIB" => 1 << 40,
        other => return Err(format!("unknown unit '{}'", other)),
    };

    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid number '{}'", number))?;

    Ok((value * multiplier as f64) as u64)
}

/// Parse `YYYY-MM-DD` (midnight) or `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date(s: &str) -> std::result::Result<NaiveDateTime, String> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, TIME_FORMAT) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS".to_string())
}

/// Translate a wildcard pattern into an anchored regular expression.
///
/// `*` matches any run of characters, `?` a single character; everything
/// else is matched literally.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            c => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');
    regex
}
