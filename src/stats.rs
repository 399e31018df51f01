//! Traversal statistics
//!
//! Raw totals count everything the walk visited. Display counts only cover
//! what made it into the output after hidden-entry skipping, filtering and
//! depth limiting. Both are reset at the start of every build.

use serde::Serialize;

use crate::entry::format_size;

/// Raw totals of one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_files: usize,
    pub total_directories: usize,
    pub total_size: u64,
}

/// Totals plus what was actually displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStatistics {
    #[serde(flatten)]
    pub totals: Statistics,
    pub displayed_files: usize,
    pub displayed_directories: usize,
    pub displayed_size: u64,
    /// Directories whose contents were elided by the depth limit.
    pub hidden_by_depth: usize,
    /// Entries skipped because they are hidden and hidden entries were not requested.
    pub hidden_objects: usize,
    /// Network calls made by the remote builder.
    pub api_requests: usize,
}

impl DisplayStatistics {
    pub fn statistics(&self) -> Statistics {
        self.totals
    }

    /// Count a file that was visited and inspected.
    pub fn record_file(&mut self, size: u64) {
        self.totals.total_files += 1;
        self.totals.total_size += size;
    }

    /// Count a file line or node that was emitted.
    pub fn display_file(&mut self, size: u64) {
        self.displayed_files += 1;
        self.displayed_size += size;
    }

    /// Count a directory that was visited and emitted.
    pub fn record_directory(&mut self) {
        self.totals.total_directories += 1;
        self.displayed_directories += 1;
    }

    pub fn record_hidden_by_depth(&mut self) {
        self.hidden_by_depth += 1;
    }

    pub fn record_hidden_object(&mut self) {
        self.hidden_objects += 1;
    }

    pub fn record_api_request(&mut self) {
        self.api_requests += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Statistics block embedded in the JSON document root.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonStatistics {
    pub directories: usize,
    pub files: usize,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub displayed_directories: usize,
    pub displayed_files: usize,
    pub displayed_size: u64,
    pub hidden_by_depth: usize,
    pub hidden_objects: usize,
}

impl From<&DisplayStatistics> for JsonStatistics {
    fn from(stats: &DisplayStatistics) -> Self {
        Self {
            directories: stats.totals.total_directories,
            files: stats.totals.total_files,
            total_size: stats.totals.total_size,
            total_size_formatted: format_size(stats.totals.total_size),
            displayed_directories: stats.displayed_directories,
            displayed_files: stats.displayed_files,
            displayed_size: stats.displayed_size,
            hidden_by_depth: stats.hidden_by_depth,
            hidden_objects: stats.hidden_objects,
        }
    }
}
