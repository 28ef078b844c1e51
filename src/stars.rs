//! Repository star count.
//!
//! [`fetch_stars`] performs the one-shot lookup and folds the outcome into a
//! [`StarState`]. [`StarTracker`] runs it in the background for a caller that
//! may go away before the request finishes.

use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::github::{GitHubApi, GitHubRepo};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StarError {
    #[error("Invalid GitHub URL")]
    InvalidUrl,
    #[error("Failed to fetch GitHub data: {0}")]
    Fetch(String),
}

/// Star count as seen by a consumer: absent while loading or after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarState {
    pub stars: Option<u64>,
    pub loading: bool,
    pub error: Option<StarError>,
}

impl StarState {
    pub fn loading() -> Self {
        Self {
            stars: None,
            loading: true,
            error: None,
        }
    }

    pub fn loaded(stars: u64) -> Self {
        Self {
            stars: Some(stars),
            loading: false,
            error: None,
        }
    }

    pub fn failed(error: StarError) -> Self {
        Self {
            stars: None,
            loading: false,
            error: Some(error),
        }
    }
}

impl Default for StarState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Look up the star count of the repository behind `repo_url`.
///
/// A URL without a `github.com/<owner>/<repo>` part fails with
/// [`StarError::InvalidUrl`] before any request is made. Otherwise exactly one
/// request is issued; it is not retried.
#[tracing::instrument(skip(github))]
pub async fn fetch_stars<G: GitHubApi + ?Sized>(github: &G, repo_url: &str) -> StarState {
    match GitHubRepo::from_url(repo_url) {
        Some(repo) => fetch_repo_stars(github, &repo).await,
        None => {
            debug!("Not a GitHub repository URL: {}", repo_url);
            StarState::failed(StarError::InvalidUrl)
        }
    }
}

async fn fetch_repo_stars<G: GitHubApi + ?Sized>(github: &G, repo: &GitHubRepo) -> StarState {
    match github.get_repo_info(repo).await {
        Ok(info) => {
            debug!("{} has {} stars", repo, info.stargazers_count);
            StarState::loaded(info.stargazers_count)
        }
        Err(e) => {
            warn!("Failed to fetch star count for {}: {:#}", repo, e);
            StarState::failed(StarError::Fetch(format!("{:#}", e)))
        }
    }
}

/// Background star-count lookup owned by a single consumer.
///
/// Dropping the tracker aborts the request. A result that arrives after every
/// receiver is gone is discarded instead of being published.
pub struct StarTracker {
    state: watch::Receiver<StarState>,
    task: Option<JoinHandle<()>>,
}

impl StarTracker {
    pub fn spawn<G>(github: Arc<G>, repo_url: impl Into<String>) -> Self
    where
        G: GitHubApi + ?Sized + 'static,
    {
        let repo_url = repo_url.into();

        let Some(repo) = GitHubRepo::from_url(&repo_url) else {
            debug!("Not a GitHub repository URL: {}", repo_url);
            let (_tx, rx) = watch::channel(StarState::failed(StarError::InvalidUrl));
            return Self {
                state: rx,
                task: None,
            };
        };

        let (tx, rx) = watch::channel(StarState::loading());
        let task = tokio::spawn(async move {
            let state = fetch_repo_stars(github.as_ref(), &repo).await;
            if tx.is_closed() {
                debug!("Star count for {} arrived after its consumer left", repo);
                return;
            }
            let _ = tx.send(state);
        });

        Self {
            state: rx,
            task: Some(task),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StarState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StarState> {
        self.state.clone()
    }

    /// Wait until loading has finished, one way or the other.
    pub async fn settled(&mut self) -> StarState {
        if let Ok(state) = self.state.wait_for(|s| !s.loading).await {
            return state.clone();
        }
        self.state()
    }
}

impl Drop for StarTracker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{MockGitHubApi, Release, RepoInfo};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    fn repo_info(stars: u64) -> RepoInfo {
        RepoInfo {
            stargazers_count: stars,
            description: None,
            html_url: None,
        }
    }

    /// A GitHub whose repo lookup never completes.
    struct PendingGitHub;

    #[async_trait]
    impl GitHubApi for PendingGitHub {
        async fn get_repo_info(&self, _repo: &GitHubRepo) -> Result<RepoInfo> {
            std::future::pending().await
        }

        async fn get_latest_release(&self, _repo: &GitHubRepo) -> Result<Release> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_fetch_stars_success() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_repo_info()
            .withf(|repo| repo.owner == "acme" && repo.repo == "widget")
            .times(1)
            .returning(|_| Ok(repo_info(42)));

        let state = fetch_stars(&github, "https://github.com/acme/widget").await;

        assert_eq!(state.stars, Some(42));
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_fetch_stars_invalid_url_makes_no_request() {
        let mut github = MockGitHubApi::new();
        github.expect_get_repo_info().times(0);

        let state = fetch_stars(&github, "https://example.com/acme/widget").await;

        assert_eq!(state, StarState::failed(StarError::InvalidUrl));
        assert_eq!(state.error.unwrap().to_string(), "Invalid GitHub URL");
    }

    #[test_log::test(tokio::test)]
    async fn test_fetch_stars_request_failure() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_repo_info()
            .times(1)
            .returning(|_| Err(anyhow!("HTTP status server error (500)")));

        let state = fetch_stars(&github, "https://github.com/acme/widget").await;

        assert_eq!(state.stars, None);
        assert!(!state.loading);
        assert!(matches!(state.error, Some(StarError::Fetch(ref msg)) if msg.contains("500")));
    }

    #[test]
    fn test_default_state_is_loading() {
        let state = StarState::default();
        assert!(state.loading);
        assert_eq!(state.stars, None);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_tracker_settles_with_count() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_repo_info()
            .times(1)
            .returning(|_| Ok(repo_info(42)));

        let mut tracker = StarTracker::spawn(Arc::new(github), "https://github.com/acme/widget");
        let state = tracker.settled().await;

        assert_eq!(state, StarState::loaded(42));
        assert_eq!(tracker.state(), StarState::loaded(42));
    }

    #[tokio::test]
    async fn test_tracker_invalid_url_settles_immediately() {
        let mut github = MockGitHubApi::new();
        github.expect_get_repo_info().times(0);

        let tracker = StarTracker::spawn(Arc::new(github), "not a url");

        assert_eq!(tracker.state(), StarState::failed(StarError::InvalidUrl));
    }

    #[tokio::test]
    async fn test_tracker_is_loading_while_request_outstanding() {
        let tracker = StarTracker::spawn(Arc::new(PendingGitHub), "https://github.com/acme/widget");
        tokio::task::yield_now().await;

        assert_eq!(tracker.state(), StarState::loading());
    }

    #[tokio::test]
    async fn test_dropping_tracker_cancels_request() {
        let github = Arc::new(PendingGitHub);
        let tracker = StarTracker::spawn(github.clone(), "https://github.com/acme/widget");
        tokio::task::yield_now().await;
        assert_eq!(Arc::strong_count(&github), 2);

        drop(tracker);

        // The aborted task releases its handle on the client once the runtime reaps it
        for _ in 0..10 {
            if Arc::strong_count(&github) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(Arc::strong_count(&github), 1);
    }
}
