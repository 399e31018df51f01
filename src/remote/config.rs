//! Configuration for remote walks

pub const DEFAULT_REMOTE_DEPTH: usize = 3;
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Request count at which callers should warn about the anonymous limit of
/// 60 requests per hour.
pub const RATE_LIMIT_WARNING: usize = 50;

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Levels of entries shown below the root. 0 = unlimited.
    pub max_depth: usize,
    pub show_hidden: bool,
    pub api_base: String,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_REMOTE_DEPTH,
            show_hidden: false,
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
        }
    }
}

impl RemoteConfig {
    /// Defaults plus a token from `GITHUB_TOKEN`, if set and non-empty.
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            ..Self::default()
        }
    }
}
