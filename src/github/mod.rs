mod client;
mod repo;
mod types;

#[cfg(test)]
pub use client::MockGitHubApi;
pub use client::{DEFAULT_API_URL, GitHub, GitHubApi};
pub use repo::GitHubRepo;
pub use types::{Release, ReleaseAsset, RepoInfo};
