//! Testimonial carousel
//!
//! [`Carousel`] is the pure state machine: an index into a fixed, non-empty
//! list, a direction used to orient the transition animation, and a pause flag
//! that gates automatic advancing. [`CarouselDriver`] runs one carousel on the
//! tokio timer and accepts user commands over a channel.

mod driver;
mod state;

pub use driver::{CarouselCommand, CarouselDriver, CarouselSnapshot, VISIBLE_CARDS};
pub use state::{Carousel, DEFAULT_DWELL, Direction, Phase, Transition};
