//! GitHub repository URL parsing

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

pub const DEFAULT_BRANCH: &str = "main";

static REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?github\.com/([^/]+)/([^/]+?)(?:\.git)?(?:/tree/([^/]+)(?:/(.*))?)?/?$",
    )
    .expect("REPO_URL regex is invalid")
});

/// Where in a repository a remote walk starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Directory inside the repository, empty for the repository root.
    pub base_path: String,
}

impl RepoLocation {
    /// Contents API URL listing `path` on this location's branch.
    pub fn contents_url(&self, api_base: &str, path: &str) -> String {
        let mut url = format!(
            "{}/repos/{}/{}/contents",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        );
        if !path.is_empty() {
            url.push('/');
            url.push_str(path);
        }
        format!("{}?ref={}", url, encode_query_value(&self.branch))
    }

    /// Commits API URL returning the latest commit that touched `path`.
    pub fn last_commit_url(&self, api_base: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/commits?path={}&sha={}&per_page=1",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            encode_query_value(path),
            encode_query_value(&self.branch)
        )
    }
}

impl FromStr for RepoLocation {
    type Err = Error;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let caps = REPO_URL
            .captures(url.trim())
            .ok_or_else(|| Error::InvalidRepoUrl(url.to_string()))?;

        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let branch = match group(3) {
            "" => DEFAULT_BRANCH,
            b => b,
        };

        Ok(Self {
            owner: group(1).to_string(),
            repo: group(2).to_string(),
            branch: branch.to_string(),
            base_path: group(4).trim_end_matches('/').to_string(),
        })
    }
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.owner, self.repo, self.branch)
    }
}

/// Percent-encode the characters that would end or split a query value.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            '=' => out.push_str("%3D"),
            ' ' => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_repository_url() {
        let loc: RepoLocation = "https://github.com/rust-lang/cargo".parse().unwrap();
        assert_eq!(loc.owner, "rust-lang");
        assert_eq!(loc.repo, "cargo");
        assert_eq!(loc.branch, "main");
        assert_eq!(loc.base_path, "");
    }

    #[test]
    fn test_git_suffix_and_trailing_slash() {
        let loc: RepoLocation = "https://www.github.com/owner/repo.git".parse().unwrap();
        assert_eq!(loc.repo, "repo");
        let loc: RepoLocation = "http://github.com/owner/repo/".parse().unwrap();
        assert_eq!(loc.repo, "repo");
    }

    #[test]
    fn test_branch_and_path() {
        let loc: RepoLocation = "https://github.com/owner/repo/tree/dev/src/bin/"
            .parse()
            .unwrap();
        assert_eq!(loc.branch, "dev");
        assert_eq!(loc.base_path, "src/bin");
        assert_eq!(loc.to_string(), "owner/repo (dev)");
    }

    #[test]
    fn test_rejects_other_hosts() {
        for url in [
            "https://gitlab.com/owner/repo",
            "github.com/owner/repo",
            "https://github.com/owner",
            "not a url",
        ] {
            assert!(matches!(
                url.parse::<RepoLocation>(),
                Err(Error::InvalidRepoUrl(_))
            ));
        }
    }

    #[test]
    fn test_api_urls() {
        let loc: RepoLocation = "https://github.com/o/r/tree/main".parse().unwrap();
        assert_eq!(
            loc.contents_url("https://api.github.com/", ""),
            "https://api.github.com/repos/o/r/contents?ref=main"
        );
        assert_eq!(
            loc.contents_url("https://api.github.com", "src/lib"),
            "https://api.github.com/repos/o/r/contents/src/lib?ref=main"
        );
        assert_eq!(
            loc.last_commit_url("https://api.github.com", "a b&c.txt"),
            "https://api.github.com/repos/o/r/commits?path=a%20b%26c.txt&sha=main&per_page=1"
        );
    }
}
