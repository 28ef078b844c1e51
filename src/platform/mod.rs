//! Platform detection
//!
//! This module classifies the visitor's operating system from a user-agent
//! string. The classification drives which release asset is offered for
//! download.

mod detection;

pub use detection::{Platform, PlatformInfo, detect};
