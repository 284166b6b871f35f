//! Pure fit evaluation: does the content fit, and if not, bounce or scroll?

use serde::{Deserialize, Serialize};

/// Outcome of comparing content width against container width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitDecision {
    pub content_fits: bool,
    /// Only meaningful when the content does not fit
    pub should_bounce: bool,
}

/// Tuning constants for the fit decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitThresholds {
    /// Overflow up to this distance still counts as fitting
    pub rounding_slack: f64,
    /// Bounce while overflow < container width / bounce_ratio
    pub bounce_ratio: f64,
}

impl Default for FitThresholds {
    fn default() -> Self {
        Self {
            rounding_slack: 1.0,
            bounce_ratio: 8.0,
        }
    }
}

impl FitThresholds {
    pub fn evaluate(&self, container_width: f64, content_width: f64, threshold: f64) -> FitDecision {
        let distance = content_width - container_width + threshold;
        let content_fits = distance <= self.rounding_slack;
        let should_bounce = !content_fits && distance < container_width / self.bounce_ratio;
        FitDecision {
            content_fits,
            should_bounce,
        }
    }
}

/// Evaluate with the default constants (slack 1, bounce below width / 8)
#[inline]
pub fn evaluate(container_width: f64, content_width: f64, threshold: f64) -> FitDecision {
    FitThresholds::default().evaluate(container_width, content_width, threshold)
}
