use anyhow::{Result, anyhow};
use std::str::FromStr;

const GITHUB_HOST: &str = "github.com/";

#[derive(Debug, PartialEq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    /// Extract owner and repository name from a GitHub URL.
    ///
    /// The first `github.com/<owner>/<repo>` occurrence anywhere in `url` wins;
    /// owner and repo are the non-empty runs of characters up to the next `/`.
    /// Scheme, host prefix and trailing path segments are ignored.
    pub fn from_url(url: &str) -> Option<Self> {
        url.match_indices(GITHUB_HOST).find_map(|(pos, _)| {
            let rest = &url[pos + GITHUB_HOST.len()..];
            let (owner, rest) = rest.split_once('/')?;
            let repo = rest.split('/').next()?;
            if owner.is_empty() || repo.is_empty() {
                return None;
            }
            Some(GitHubRepo {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
        })
    }

    /// The public web page of the repository.
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    /// The "latest release" page, used when no platform asset is available.
    pub fn latest_release_url(&self) -> String {
        format!("{}/releases/latest", self.html_url())
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    /// Accepts either `owner/repo` or a GitHub URL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(repo) = GitHubRepo::from_url(s) {
            return Ok(repo);
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!(
                "Invalid repository format. Expected 'owner/repo' or a github.com URL."
            ))
        } else {
            Ok(GitHubRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}
