//! Ambient environment reads.
//!
//! Everything the crate needs from the process environment goes through the
//! [`Environment`] trait, so classification and configuration logic can be
//! tested with fixed inputs.

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the user agent seen by [`RealEnvironment`].
pub const USER_AGENT_VAR: &str = "BLINKDO_USER_AGENT";

#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    fn env_var(&self, key: &str) -> Result<String, env::VarError>;

    /// The user-agent string the visitor's platform is classified from.
    fn user_agent(&self) -> String;

    fn config_dir(&self) -> Option<PathBuf>;
}

pub struct RealEnvironment;

impl Environment for RealEnvironment {
    #[tracing::instrument(skip(self))]
    fn env_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    fn user_agent(&self) -> String {
        match self.env_var(USER_AGENT_VAR) {
            Ok(ua) if !ua.trim().is_empty() => ua,
            _ => target_user_agent(),
        }
    }

    #[tracing::instrument(skip(self))]
    fn config_dir(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }
}

/// A browser-like user agent for the OS this binary was compiled for.
pub fn target_user_agent() -> String {
    #[cfg(target_os = "macos")]
    {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string()
    }
    #[cfg(target_os = "windows")]
    {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
    }
    #[cfg(target_os = "linux")]
    {
        format!("Mozilla/5.0 (X11; Linux {})", env::consts::ARCH)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        format!("Mozilla/5.0 ({})", env::consts::OS)
    }
}
