//! Measurement of the container/content pair and the fit decision derived from it
//!
//! - `fit` - pure fit/overflow evaluation
//! - `prober` - cancellable, race-safe width measurement against a host

mod fit;
mod prober;

pub use fit::{evaluate, FitDecision, FitThresholds};
pub use prober::{MeasureHost, Metrics, MetricsProber, NodeId, TextDirection};
