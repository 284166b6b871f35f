//! Time calculation utilities for tweens
//!
//! Uses tokio's clock so paused-time tests see the same progress as the engine.

use std::time::Duration;

use tokio::time::Instant;

/// Calculate animation progress (0.0 to 1.0) from start time and duration
///
/// # Arguments
/// * `start` - Animation start time
/// * `duration` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = start.elapsed();
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start: Instant, duration: Duration) -> bool {
    start.elapsed() >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Default duration proportional to content length
///
/// `per_unit_ms` is the configured speed (milliseconds per content character).
pub fn length_proportional(units: usize, per_unit_ms: f64) -> Duration {
    let millis = units as f64 * per_unit_ms;
    if millis.is_finite() && millis > 0.0 {
        Duration::from_secs_f64(millis / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// Shortest drive a cycle may take, one frame at 60fps
pub const MIN_DRIVE_DURATION: Duration = Duration::from_millis(16);

/// Frame interval for a target frame rate, never shorter than 1ms
pub fn frame_interval(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16) // ~60fps fallback
    } else {
        Duration::from_millis((1000 / fps as u64).max(1))
    }
}
