use log::debug;

use super::ReleaseAssets;
use crate::platform::Platform;

/// Installer flavours published with a release, in preference order per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetKind {
    MacArm64,
    MacUniversal,
    MacIntel,
    MacDmg,
    WindowsExe,
    WindowsMsi,
    LinuxAppImage,
    LinuxDeb,
    LinuxRpm,
}

impl AssetKind {
    /// Classify a release asset by its file name.
    ///
    /// Only installer formats are recognised; signatures, checksums and
    /// updater bundles yield `None`.
    pub fn classify(name: &str) -> Option<Self> {
        let name = name.to_lowercase();

        if name.ends_with(".dmg") {
            let kind = if name.contains("aarch64") || name.contains("arm64") {
                AssetKind::MacArm64
            } else if name.contains("universal") {
                AssetKind::MacUniversal
            } else if name.contains("x64")
                || name.contains("x86_64")
                || name.contains("amd64")
                || name.contains("intel")
            {
                AssetKind::MacIntel
            } else {
                AssetKind::MacDmg
            };
            return Some(kind);
        }

        if name.ends_with(".exe") {
            Some(AssetKind::WindowsExe)
        } else if name.ends_with(".msi") {
            Some(AssetKind::WindowsMsi)
        } else if name.ends_with(".appimage") {
            Some(AssetKind::LinuxAppImage)
        } else if name.ends_with(".deb") {
            Some(AssetKind::LinuxDeb)
        } else if name.ends_with(".rpm") {
            Some(AssetKind::LinuxRpm)
        } else {
            None
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            AssetKind::MacArm64 | AssetKind::MacUniversal | AssetKind::MacIntel | AssetKind::MacDmg => {
                Platform::MacOS
            }
            AssetKind::WindowsExe | AssetKind::WindowsMsi => Platform::Windows,
            AssetKind::LinuxAppImage | AssetKind::LinuxDeb | AssetKind::LinuxRpm => Platform::Linux,
        }
    }
}

/// Pick the download URL for `platform`.
///
/// Returns the platform's preferred asset when the mapping has one, otherwise
/// `fallback` (the "latest releases" page). Never fails and never checks
/// that the URL is reachable.
#[tracing::instrument(skip(assets, fallback))]
pub fn select_download_url(
    platform: Platform,
    assets: Option<&ReleaseAssets>,
    fallback: &str,
) -> String {
    match assets.and_then(|assets| assets.preferred(platform)) {
        Some(url) => url.to_string(),
        None => {
            debug!("No {} asset available, using fallback {}", platform, fallback);
            fallback.to_string()
        }
    }
}
