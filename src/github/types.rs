use serde::{Deserialize, Serialize};

/// The subset of `GET /repos/{owner}/{repo}` the site reads.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RepoInfo {
    pub stargazers_count: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub browser_download_url: String,
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    pub tag_name: String,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}
