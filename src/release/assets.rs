use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use super::AssetKind;
use crate::config::DownloadLinks;
use crate::github::{GitHubApi, GitHubRepo, Release};
use crate::platform::Platform;

/// Read-only lookup from platform to download URLs, most preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseAssets {
    urls: BTreeMap<Platform, Vec<String>>,
}

impl ReleaseAssets {
    /// Append a URL for `platform`. URLs for [`Platform::Unknown`] are dropped.
    pub fn insert(&mut self, platform: Platform, url: impl Into<String>) {
        if platform == Platform::Unknown {
            return;
        }
        self.urls.entry(platform).or_default().push(url.into());
    }

    pub fn urls(&self, platform: Platform) -> &[String] {
        self.urls.get(&platform).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn preferred(&self, platform: Platform) -> Option<&str> {
        self.urls(platform).first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.urls.values().all(Vec::is_empty)
    }

    /// One entry per configured platform link.
    pub fn from_links(links: &DownloadLinks) -> Self {
        let mut assets = Self::default();
        let entries = [
            (Platform::MacOS, &links.mac),
            (Platform::Windows, &links.windows),
            (Platform::Linux, &links.linux),
        ];
        for (platform, url) in entries {
            if let Some(url) = url.as_deref().filter(|u| !u.is_empty()) {
                assets.insert(platform, url);
            }
        }
        assets
    }

    /// Classify the installers attached to a GitHub release.
    ///
    /// Per platform the order is: Apple Silicon, universal, Intel, plain
    /// `.dmg` on macOS; `.exe` before `.msi` on Windows; AppImage, `.deb`,
    /// `.rpm` on Linux. Assets of the same kind keep their release order.
    #[tracing::instrument(skip(release), fields(tag = %release.tag_name))]
    pub fn from_release(release: &Release) -> Self {
        let mut classified: Vec<(AssetKind, &str)> = release
            .assets
            .iter()
            .filter_map(|asset| {
                let kind = AssetKind::classify(&asset.name);
                if kind.is_none() {
                    debug!("Skipping non-installer asset {}", asset.name);
                }
                kind.map(|k| (k, asset.browser_download_url.as_str()))
            })
            .collect();

        classified.sort_by_key(|(kind, _)| *kind);

        let mut assets = Self::default();
        for (kind, url) in classified {
            assets.insert(kind.platform(), url);
        }
        assets
    }

    /// Installers of the latest published release of `repo`.
    #[tracing::instrument(skip(github))]
    pub async fn fetch_latest<G: GitHubApi + ?Sized>(github: &G, repo: &GitHubRepo) -> Result<Self> {
        let release = github
            .get_latest_release(repo)
            .await
            .with_context(|| format!("Failed to fetch latest release of {}", repo))?;
        debug!("Latest release of {} is {}", repo, release.tag_name);
        Ok(Self::from_release(&release))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{MockGitHubApi, ReleaseAsset};
    use anyhow::anyhow;

    fn make_release(names: &[&str]) -> Release {
        Release {
            tag_name: "v0.2.0".to_string(),
            assets: names
                .iter()
                .map(|name| ReleaseAsset {
                    name: name.to_string(),
                    size: 1000,
                    browser_download_url: format!("https://example.com/{}", name),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_release_orders_by_preference() {
        let release = make_release(&[
            "BlinkDo_0.2.0_x64.dmg",
            "BlinkDo_0.2.0_x64_en-US.msi",
            "blinkdo_0.2.0_amd64.deb",
            "BlinkDo_0.2.0_aarch64.dmg",
            "BlinkDo_0.2.0_x64-setup.exe",
            "BlinkDo_0.2.0_amd64.AppImage",
            "BlinkDo_0.2.0_aarch64.dmg.sig",
        ]);

        let assets = ReleaseAssets::from_release(&release);

        assert_eq!(
            assets.urls(Platform::MacOS),
            [
                "https://example.com/BlinkDo_0.2.0_aarch64.dmg",
                "https://example.com/BlinkDo_0.2.0_x64.dmg",
            ]
        );
        assert_eq!(
            assets.preferred(Platform::Windows),
            Some("https://example.com/BlinkDo_0.2.0_x64-setup.exe")
        );
        assert_eq!(
            assets.urls(Platform::Linux),
            [
                "https://example.com/BlinkDo_0.2.0_amd64.AppImage",
                "https://example.com/blinkdo_0.2.0_amd64.deb",
            ]
        );
        assert_eq!(assets.preferred(Platform::Unknown), None);
    }

    #[test]
    fn test_from_release_without_installers() {
        let assets = ReleaseAssets::from_release(&make_release(&["checksums.txt", "latest.json"]));
        assert!(assets.is_empty());
        assert_eq!(assets.preferred(Platform::MacOS), None);
    }

    #[test]
    fn test_from_links() {
        let links = DownloadLinks {
            mac: Some("https://example.com/mac.dmg".to_string()),
            windows: None,
            linux: Some(String::new()),
            fallback: "https://example.com/releases".to_string(),
        };

        let assets = ReleaseAssets::from_links(&links);

        assert_eq!(assets.preferred(Platform::MacOS), Some("https://example.com/mac.dmg"));
        assert_eq!(assets.preferred(Platform::Windows), None);
        assert_eq!(assets.preferred(Platform::Linux), None);
    }

    #[test]
    fn test_insert_unknown_is_ignored() {
        let mut assets = ReleaseAssets::default();
        assets.insert(Platform::Unknown, "https://example.com/whatever");
        assert!(assets.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_latest_release()
            .withf(|repo| repo.to_string() == "simcmoi/blinkdo")
            .times(1)
            .returning(|_| Ok(make_release(&["BlinkDo_0.2.0_amd64.deb"])));

        let repo: GitHubRepo = "simcmoi/blinkdo".parse().unwrap();
        let assets = ReleaseAssets::fetch_latest(&github, &repo).await.unwrap();

        assert_eq!(
            assets.preferred(Platform::Linux),
            Some("https://example.com/BlinkDo_0.2.0_amd64.deb")
        );
    }

    #[tokio::test]
    async fn test_fetch_latest_error_has_context() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_latest_release()
            .returning(|_| Err(anyhow!("HTTP status client error (404 Not Found)")));

        let repo: GitHubRepo = "simcmoi/blinkdo".parse().unwrap();
        let err = ReleaseAssets::fetch_latest(&github, &repo).await.unwrap_err();

        assert!(err.to_string().contains("simcmoi/blinkdo"));
    }
}
