use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::repo::GitHubRepo;
use super::types::{Release, RepoInfo};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn get_repo_info(&self, repo: &GitHubRepo) -> Result<RepoInfo>;
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release>;
}

pub struct GitHub {
    pub client: Client,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: Client, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { client, api_url }
    }
}

#[async_trait]
impl GitHubApi for GitHub {
    #[tracing::instrument(skip(self, repo))]
    async fn get_repo_info(&self, repo: &GitHubRepo) -> Result<RepoInfo> {
        GitHub::fetch_repo_info(repo, &self.client, &self.api_url).await
    }

    #[tracing::instrument(skip(self, repo))]
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release> {
        GitHub::fetch_latest_release(repo, &self.client, &self.api_url).await
    }
}

impl GitHub {
    /// Single `GET /repos/{owner}/{repo}`, no retries.
    #[tracing::instrument(skip(client, api_url))]
    pub async fn fetch_repo_info(
        repo: &GitHubRepo,
        client: &Client,
        api_url: &str,
    ) -> Result<RepoInfo> {
        let url = format!("{}/repos/{}/{}", api_url, repo.owner, repo.repo);

        debug!("Fetching repo info from {}...", url);

        let response = client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to GitHub API")?;

        let response = response
            .error_for_status()
            .context("GitHub API returned an error status")?;

        response
            .json::<RepoInfo>()
            .await
            .context("Failed to parse JSON response from GitHub API")
    }

    #[tracing::instrument(skip(client, api_url))]
    pub async fn fetch_latest_release(
        repo: &GitHubRepo,
        client: &Client,
        api_url: &str,
    ) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            api_url, repo.owner, repo.repo
        );

        debug!("Fetching latest release from {}...", url);

        let response = client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to GitHub API")?;

        let response = response
            .error_for_status()
            .context("GitHub API returned an error status")?;

        response
            .json::<Release>()
            .await
            .context("Failed to parse JSON response from GitHub API")
    }
}
