//! Remote tree builder backed by the GitHub contents API
//!
//! The walk mirrors the local one: directories first, then byte-ordered
//! names, hidden entries skipped unless requested, and a depth gate. Each
//! directory listing costs one request. Entries without a timestamp in the
//! listing cost one more request for the latest commit touching them. Both
//! lookups are cached for the lifetime of the builder, and only requests that
//! actually hit the network are counted.

use std::collections::HashMap;
use std::vec;

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::entry::{TIME_FORMAT, UNAVAILABLE_TIME};
use crate::error::{Error, Result};
use crate::output::LineFormatter;
use crate::stats::{DisplayStatistics, Statistics};
use crate::tree::{Branch, DepthGate, TREE_LAST_BRANCH};

use super::client::{HttpClient, ReqwestClient};
use super::config::RemoteConfig;
use super::url::RepoLocation;

pub const EMPTY_REPOSITORY: &str = "(repository is empty or unavailable)";

/// One item of a contents API listing.
#[derive(Debug, Clone, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    sha: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: Option<String>,
}

/// A file or directory in a remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub path: String,
    pub name: String,
    /// `dir`, `file`, or another API type such as `symlink` or `submodule`.
    pub kind: String,
    pub size: u64,
    pub sha: String,
    pub url: String,
    pub last_modified: String,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "dir"
    }
}

/// Render an RFC 3339 API timestamp in local time, or `N/A`.
pub fn format_remote_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Local).format(TIME_FORMAT).to_string())
        .unwrap_or_else(|_| UNAVAILABLE_TIME.to_string())
}

struct Frame {
    entries: vec::IntoIter<RemoteEntry>,
    prefix: String,
    depth: usize,
}

pub struct GitHubTreeBuilder<C = ReqwestClient> {
    url: String,
    location: Option<RepoLocation>,
    config: RemoteConfig,
    client: C,
    listings: HashMap<String, Vec<ContentItem>>,
    commit_times: HashMap<String, String>,
    stats: DisplayStatistics,
}

impl GitHubTreeBuilder<ReqwestClient> {
    pub fn new(url: &str, config: RemoteConfig) -> Result<Self> {
        let client = ReqwestClient::new(config.token.clone())?;
        Ok(Self::with_client(url, config, client))
    }
}

impl<C: HttpClient> GitHubTreeBuilder<C> {
    /// Create a builder using `client` for every request. An invalid URL
    /// leaves the builder invalid; builds then yield a single error line.
    pub fn with_client(url: &str, config: RemoteConfig, client: C) -> Self {
        let location = match url.parse::<RepoLocation>() {
            Ok(location) => Some(location),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };
        Self {
            url: url.to_string(),
            location,
            config,
            client,
            listings: HashMap::new(),
            commit_times: HashMap::new(),
            stats: DisplayStatistics::default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.location.is_some()
    }

    pub fn location(&self) -> Option<&RepoLocation> {
        self.location.as_ref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn statistics(&self) -> Statistics {
        self.stats.statistics()
    }

    pub fn display_statistics(&self) -> &DisplayStatistics {
        &self.stats
    }

    /// Build the annotated text tree, root line first.
    pub fn build_lines(&mut self, formatter: LineFormatter) -> Vec<String> {
        self.stats.reset();

        let Some(location) = self.location.clone() else {
            return vec![format!("error: {}", Error::InvalidRepoUrl(self.url.clone()))];
        };

        let mut lines = vec![formatter.remote_root(
            &location.owner,
            &location.repo,
            &location.branch,
        )];

        let root = self.children(&location, &location.base_path);
        if root.is_empty() {
            lines.push(format!("{}{}", TREE_LAST_BRANCH, EMPTY_REPOSITORY));
            return lines;
        }

        let gate = DepthGate::new(Some(self.config.max_depth));
        let mut stack = vec![Frame {
            entries: root.into_iter(),
            prefix: String::new(),
            depth: 1,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };
            let branch = Branch {
                prefix: &frame.prefix,
                is_last: frame.entries.len() == 0,
            };
            let depth = frame.depth;

            lines.push(format!(
                "{}{}{}",
                branch.prefix,
                branch.connector(),
                formatter.format_remote(&entry)
            ));

            if !entry.is_dir() {
                self.stats.record_file(entry.size);
                self.stats.display_file(entry.size);
                continue;
            }

            self.stats.record_directory();
            let prefix = branch.child_prefix();
            if !gate.descends(depth) {
                self.stats.record_hidden_by_depth();
                lines.push(format!(
                    "{}{}{}",
                    prefix,
                    TREE_LAST_BRANCH,
                    formatter.depth_limited()
                ));
                continue;
            }

            let children = self.children(&location, &entry.path);
            if !children.is_empty() {
                stack.push(Frame {
                    entries: children.into_iter(),
                    prefix,
                    depth: depth + 1,
                });
            }
        }

        log::info!("remote walk used {} API requests", self.stats.api_requests);
        lines
    }

    /// Visible children of `path` in display order, with timestamps resolved.
    fn children(&mut self, location: &RepoLocation, path: &str) -> Vec<RemoteEntry> {
        let mut items = self.list(location, path);
        items.retain(|item| {
            let keep = self.config.show_hidden || !item.name.starts_with('.');
            if !keep {
                self.stats.record_hidden_object();
            }
            keep
        });
        items.sort_by(|a, b| {
            (b.kind == "dir")
                .cmp(&(a.kind == "dir"))
                .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
        });

        items
            .into_iter()
            .map(|item| {
                let last_modified = match item.updated_at.as_deref() {
                    Some(ts) if !ts.is_empty() => format_remote_time(ts),
                    _ => self.last_commit_time(location, &item.path),
                };
                RemoteEntry {
                    size: if item.kind == "dir" { 0 } else { item.size },
                    path: item.path,
                    name: item.name,
                    kind: item.kind,
                    sha: item.sha,
                    url: item.url,
                    last_modified,
                }
            })
            .collect()
    }

    /// Raw listing of `path`. Failures yield an empty listing and are not cached.
    fn list(&mut self, location: &RepoLocation, path: &str) -> Vec<ContentItem> {
        if let Some(cached) = self.listings.get(path) {
            log::debug!("listing cache hit for '{}'", path);
            return cached.clone();
        }

        let url = location.contents_url(&self.config.api_base, path);
        self.stats.record_api_request();
        let items = self
            .client
            .get(&url)
            .and_then(|body| serde_json::from_str::<Vec<ContentItem>>(&body).map_err(|e| {
                Error::Remote {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            }));

        match items {
            Ok(items) => {
                self.listings.insert(path.to_string(), items.clone());
                items
            }
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Time of the latest commit touching `path`, or `N/A`.
    fn last_commit_time(&mut self, location: &RepoLocation, path: &str) -> String {
        if let Some(cached) = self.commit_times.get(path) {
            log::debug!("commit time cache hit for '{}'", path);
            return cached.clone();
        }

        let url = location.last_commit_url(&self.config.api_base, path);
        self.stats.record_api_request();
        let date = self
            .client
            .get(&url)
            .and_then(|body| {
                serde_json::from_str::<Vec<CommitItem>>(&body).map_err(|e| Error::Remote {
                    url: url.clone(),
                    reason: e.to_string(),
                })
            })
            .map(|commits| {
                commits
                    .into_iter()
                    .next()
                    .and_then(|c| c.commit.author)
                    .and_then(|author| author.date)
            });

        let formatted = match date {
            Ok(Some(date)) => format_remote_time(&date),
            Ok(None) => UNAVAILABLE_TIME.to_string(),
            Err(e) => {
                log::warn!("{}", e);
                UNAVAILABLE_TIME.to_string()
            }
        };
        self.commit_times.insert(path.to_string(), formatted.clone());
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const API: &str = "https://api.test";

    #[derive(Default)]
    struct FakeClient {
        responses: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeClient {
        fn respond(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), body.to_string());
            self
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl HttpClient for FakeClient {
        fn get(&self, url: &str) -> Result<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.responses.get(url).cloned().ok_or_else(|| Error::Remote {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            })
        }
    }

    const STAMP: &str = "2024-01-02T03:04:05Z";

    fn commit_url(path: &str) -> String {
        format!(
            "{}/repos/owner/repo/commits?path={}&sha=main&per_page=1",
            API, path
        )
    }

    fn sample_client() -> FakeClient {
        let commit = format!(r#"[{{"commit":{{"author":{{"date":"{}"}}}}}}]"#, STAMP);
        FakeClient::default()
            .respond(
                &format!("{}/repos/owner/repo/contents?ref=main", API),
                r#"[
                    {"name":"README.md","path":"README.md","type":"file","size":2048,"sha":"1","url":"u1"},
                    {"name":".github","path":".github","type":"dir","size":0,"sha":"2","url":"u2"},
                    {"name":"src","path":"src","type":"dir","size":0,"sha":"3","url":"u3"}
                ]"#,
            )
            .respond(
                &format!("{}/repos/owner/repo/contents/src?ref=main", API),
                r#"[{"name":"lib.rs","path":"src/lib.rs","type":"file","size":10,"sha":"4","url":"u4"}]"#,
            )
            .respond(&commit_url("README.md"), &commit)
            .respond(&commit_url("src"), &commit)
            .respond(&commit_url("src/lib.rs"), &commit)
    }

    fn config(max_depth: usize) -> RemoteConfig {
        RemoteConfig {
            max_depth,
            api_base: API.to_string(),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn test_remote_tree_lines() {
        let mut builder = GitHubTreeBuilder::with_client(
            "https://github.com/owner/repo",
            config(3),
            sample_client(),
        );
        let lines = builder.build_lines(LineFormatter::new(false));
        let stamp = format_remote_time(STAMP);

        assert_eq!(
            lines,
            vec![
                "[GITHUB] owner/repo (main)".to_string(),
                format!("├── src [DIR] | {}", stamp),
                format!("│   └── lib.rs (10 B) | {}", stamp),
                format!("└── README.md (2 KB) | {}", stamp),
            ]
        );

        let stats = builder.display_statistics();
        assert_eq!(stats.totals.total_directories, 1);
        assert_eq!(stats.totals.total_files, 2);
        assert_eq!(stats.totals.total_size, 2058);
        assert_eq!(stats.hidden_objects, 1);
        // Two listings and three commit lookups.
        assert_eq!(stats.api_requests, 5);
    }

    #[test]
    fn test_cache_avoids_repeat_requests() {
        let mut builder = GitHubTreeBuilder::with_client(
            "https://github.com/owner/repo",
            config(3),
            sample_client(),
        );
        let first = builder.build_lines(LineFormatter::new(false));
        let second = builder.build_lines(LineFormatter::new(false));

        assert_eq!(first, second);
        assert_eq!(builder.display_statistics().api_requests, 0);
        assert_eq!(builder.client().request_count(), 5);
    }

    #[test]
    fn test_depth_limit_marker() {
        let mut builder = GitHubTreeBuilder::with_client(
            "https://github.com/owner/repo",
            config(1),
            sample_client(),
        );
        let lines = builder.build_lines(LineFormatter::new(false));

        assert_eq!(lines[2], "│   └── (depth limited)");
        assert_eq!(lines.len(), 4);
        assert_eq!(builder.display_statistics().hidden_by_depth, 1);
        assert_eq!(builder.display_statistics().api_requests, 3);
    }

    #[test]
    fn test_show_hidden_lists_dot_entries() {
        let mut builder = GitHubTreeBuilder::with_client(
            "https://github.com/owner/repo",
            RemoteConfig {
                show_hidden: true,
                ..config(1)
            },
            sample_client(),
        );
        let lines = builder.build_lines(LineFormatter::new(false));
        assert!(lines[1].starts_with("├── .github [DIR] | N/A"));
        assert_eq!(builder.display_statistics().hidden_objects, 0);
    }

    #[test]
    fn test_unreachable_repository() {
        let mut builder = GitHubTreeBuilder::with_client(
            "https://github.com/owner/missing/tree/dev",
            config(3),
            FakeClient::default(),
        );
        let lines = builder.build_lines(LineFormatter::new(false));
        assert_eq!(
            lines,
            vec![
                "[GITHUB] owner/missing (dev)".to_string(),
                "└── (repository is empty or unavailable)".to_string(),
            ]
        );
        assert_eq!(builder.display_statistics().api_requests, 1);
    }

    #[test]
    fn test_invalid_url_yields_error_line() {
        let mut builder = GitHubTreeBuilder::with_client(
            "https://example.com/owner/repo",
            config(3),
            FakeClient::default(),
        );
        assert!(!builder.is_valid());
        let lines = builder.build_lines(LineFormatter::new(false));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("error: invalid GitHub repository URL"));
        assert_eq!(builder.client().request_count(), 0);
    }

    #[test]
    fn test_listing_timestamp_skips_commit_lookup() {
        let client = FakeClient::default().respond(
            &format!("{}/repos/owner/repo/contents?ref=main", API),
            r#"[{"name":"a.txt","path":"a.txt","type":"file","size":1,"updated_at":"2024-01-02T03:04:05Z"}]"#,
        );
        let mut builder =
            GitHubTreeBuilder::with_client("https://github.com/owner/repo", config(3), client);
        let lines = builder.build_lines(LineFormatter::new(false));
        assert_eq!(lines[1], format!("└── a.txt (1 B) | {}", format_remote_time(STAMP)));
        assert_eq!(builder.display_statistics().api_requests, 1);
    }

    #[test]
    fn test_failed_subdirectory_listings_are_empty_and_retried() {
        let client = FakeClient::default()
            .respond(
                &format!("{}/repos/owner/repo/contents?ref=main", API),
                &format!(
                    r#"[
                        {{"name":"z.txt","path":"z.txt","type":"file","size":3,"updated_at":"{0}"}},
                        {{"name":"b","path":"b","type":"dir","size":0,"updated_at":"{0}"}},
                        {{"name":"a","path":"a","type":"dir","size":0,"updated_at":"{0}"}}
                    ]"#,
                    STAMP
                ),
            )
            .respond(&format!("{}/repos/owner/repo/contents/b?ref=main", API), "not json");
        let mut builder =
            GitHubTreeBuilder::with_client("https://github.com/owner/repo", config(3), client);
        let stamp = format_remote_time(STAMP);

        let lines = builder.build_lines(LineFormatter::new(false));
        assert_eq!(
            lines,
            vec![
                "[GITHUB] owner/repo (main)".to_string(),
                format!("├── a [DIR] | {}", stamp),
                format!("├── b [DIR] | {}", stamp),
                format!("└── z.txt (3 B) | {}", stamp),
            ]
        );
        assert_eq!(builder.display_statistics().api_requests, 3);
        assert_eq!(builder.display_statistics().totals.total_directories, 2);
        assert_eq!(builder.display_statistics().totals.total_files, 1);

        let again = builder.build_lines(LineFormatter::new(false));
        assert_eq!(again, lines);
        assert_eq!(builder.display_statistics().api_requests, 2);
        let requests = builder.client().requests.borrow();
        assert_eq!(requests.len(), 5);
        assert!(requests[3..].iter().all(|url| !url.contains("contents?ref")));
    }

    #[test]
    fn test_remote_time_format() {
        assert_eq!(format_remote_time("garbage"), "N/A");
        assert_eq!(format_remote_time(STAMP).len(), "2024-01-02 03:04:05".len());
    }
}
