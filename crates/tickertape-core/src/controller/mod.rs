//! Marquee controller: measure, decide, drive, and react to interruptions
//!
//! [`MarqueeController`] is a cheap handle to a task that owns all marquee
//! state. Every request is queued and applied in order; the resulting state is
//! published as a [`MarqueeSnapshot`] over a watch channel.

mod handle;
mod service;
mod state;


pub use crate::animation::DriveMode;
pub use handle::{MarqueeBuilder, MarqueeController};
pub use service::Observer;
pub use state::{select_mode, MarqueeSnapshot, MarqueeState};
