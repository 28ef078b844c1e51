//! Site configuration and HTTP client setup.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::environment::Environment;
use crate::github::GitHub;

pub const CONFIG_DIR_NAME: &str = "blinkdo-site";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Static per-platform download links plus the generic releases page.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DownloadLinks {
    pub mac: Option<String>,
    pub windows: Option<String>,
    pub linux: Option<String>,
    /// Where visitors land when no platform link applies.
    pub fallback: String,
}

impl Default for DownloadLinks {
    fn default() -> Self {
        Self {
            mac: Some(
                "https://github.com/simonfessy/todo-overlay/releases/latest/download/TodoOverlay-mac.dmg"
                    .to_string(),
            ),
            windows: Some(
                "https://github.com/simonfessy/todo-overlay/releases/latest/download/TodoOverlay-windows.exe"
                    .to_string(),
            ),
            linux: Some(
                "https://github.com/simonfessy/todo-overlay/releases/latest/download/TodoOverlay-linux.AppImage"
                    .to_string(),
            ),
            fallback: "https://github.com/simonfessy/todo-overlay/releases/latest".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Repository whose stars are shown and whose releases are offered.
    pub repository: String,
    /// GitHub API base URL; `None` means api.github.com.
    pub api_url: Option<String>,
    pub downloads: DownloadLinks,
    /// Auto-advance dwell time of the testimonial carousel.
    pub carousel_dwell_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            repository: "https://github.com/simonfessy/todo-overlay".to_string(),
            api_url: None,
            downloads: DownloadLinks::default(),
            carousel_dwell_ms: 5000,
        }
    }
}

impl SiteConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `<config dir>/blinkdo-site/config.json`
    /// is read when present, otherwise the built-in defaults are used.
    #[tracing::instrument(skip(env))]
    pub fn load<E: Environment + ?Sized>(env: &E, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path(env) {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn default_path<E: Environment + ?Sized>(env: &E) -> Option<PathBuf> {
        env.config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Build the GitHub client; `api_url` overrides the configured base URL.
    pub fn github<E: Environment + ?Sized>(
        &self,
        env: &E,
        api_url: Option<String>,
    ) -> Result<GitHub> {
        let client = build_client(env)?;
        Ok(GitHub::new(client, api_url.or_else(|| self.api_url.clone())))
    }
}

/// HTTP client with a user agent and, when `GITHUB_TOKEN` is set, bearer auth.
pub fn build_client<E: Environment + ?Sized>(env: &E) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Ok(token) = env.env_var("GITHUB_TOKEN") {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using GITHUB_TOKEN for authentication: {}", mask_token(&token));
    }

    let client = Client::builder()
        .user_agent(concat!("blinkdo-site/", env!("BLINKDO_VERSION")))
        .default_headers(headers)
        .build()?;

    Ok(client)
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
