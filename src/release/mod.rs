//! Release asset mapping and download-link selection
//!
//! A [`ReleaseAssets`] maps each platform to an ordered list of installer
//! URLs, built either from a GitHub release or from the static links in the
//! site configuration. [`select_download_url`] turns a platform into the one
//! URL a visitor should be sent to.

mod assets;
mod picker;

pub use assets::ReleaseAssets;
pub use picker::{AssetKind, select_download_url};
