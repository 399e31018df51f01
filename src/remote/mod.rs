//! Trees of GitHub repositories
//!
//! - `url` - repository URL parsing and API URLs
//! - `client` - the `HttpClient` seam and its reqwest implementation
//! - `config` - remote walk settings
//! - `fetcher` - the cached, request-counting tree builder

mod client;
mod config;
mod fetcher;
mod url;

pub use client::{HttpClient, REQUEST_TIMEOUT, ReqwestClient};
pub use config::{DEFAULT_API_BASE, DEFAULT_REMOTE_DEPTH, RATE_LIMIT_WARNING, RemoteConfig};
pub use fetcher::{EMPTY_REPOSITORY, GitHubTreeBuilder, RemoteEntry, format_remote_time};
pub use url::{DEFAULT_BRANCH, RepoLocation};
