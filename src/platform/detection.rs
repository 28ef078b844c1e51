use crate::environment::Environment;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Operating system classification of a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Platform {
    #[serde(rename = "macOS")]
    MacOS,
    Windows,
    Linux,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Platform {
    /// Classify a user-agent string.
    ///
    /// Matching is a case-insensitive substring test in a fixed order:
    /// `mac`, then `win`, then `linux`. Anything else is [`Platform::Unknown`].
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        if ua.contains("mac") {
            Platform::MacOS
        } else if ua.contains("win") {
            Platform::Windows
        } else if ua.contains("linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }

    /// Human readable name, empty for [`Platform::Unknown`].
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::MacOS => "macOS",
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::Unknown => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Unknown => write!(f, "unknown"),
            other => write!(f, "{}", other.display_name()),
        }
    }
}

/// Platform classification together with presentation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub display_name: String,
    /// The user agent cannot distinguish Apple Silicon from Intel Macs, so
    /// every macOS visitor is assumed to be on Apple Silicon.
    pub is_apple_silicon: bool,
}

impl PlatformInfo {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let platform = Platform::from_user_agent(user_agent);
        Self {
            platform,
            display_name: platform.display_name().to_string(),
            is_apple_silicon: platform == Platform::MacOS,
        }
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self {
            platform: Platform::Unknown,
            display_name: String::new(),
            is_apple_silicon: false,
        }
    }
}

/// Read the user agent once from `env` and classify it.
#[tracing::instrument(skip(env))]
pub fn detect<E: Environment + ?Sized>(env: &E) -> PlatformInfo {
    let user_agent = env.user_agent();
    let info = PlatformInfo::from_user_agent(&user_agent);
    debug!("Classified user agent {:?} as {}", user_agent, info.platform);
    info
}
