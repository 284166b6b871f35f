pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;

#[cfg(test)]
mod testing;

pub use animation::{AnimatedValue, AnimationDriver, DriveConfig, Easing, FrameTween, Tween, TweenEngine};
pub use config::{AnimationType, AppConfig, BouncePadding, MarqueeConfig};
pub use controller::{DriveMode, MarqueeBuilder, MarqueeController, MarqueeSnapshot, MarqueeState};
pub use error::{Error, Result};
pub use metrics::{FitDecision, FitThresholds, MeasureHost, Metrics, MetricsProber, NodeId, TextDirection};
