//! Animation primitives and the drive layer
//!
//! ## Primitives
//! - `easing` - pure easing curves
//! - `timing` - progress, interpolation and default durations
//! - `value` - the shared animated scalar
//! - `tween` - tween engine seam and the default frame-stepped engine
//!
//! ## Drives
//! - `driver` - scroll and bounce drives built on the primitives

pub mod easing;
pub mod timing;
pub mod tween;
pub mod value;

pub mod driver;

pub use driver::{
    bounce_legs, scroll_target, AnimationDriver, DriveConfig, DriveEvent, DriveEventKind, DriveId,
    DriveMode, EdgePadding,
};
pub use easing::{Easing, EasingFn};
pub use tween::{FrameTween, Tween, TweenEngine, TweenOutcome};
pub use value::AnimatedValue;
