//! Client-side logic of the BlinkDo landing page: platform detection,
//! download-link selection, the GitHub star counter and the testimonial
//! carousel.

pub mod carousel;
pub mod config;
pub mod content;
pub mod environment;
pub mod github;
pub mod platform;
pub mod release;
pub mod stars;
