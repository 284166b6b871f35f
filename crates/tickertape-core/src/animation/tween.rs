//! Tween engine seam and the default frame-stepped engine

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::easing::Easing;
use super::timing::{frame_interval, lerp, progress};
use super::value::AnimatedValue;

/// One timed transition of the animated value
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    /// Target value
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
    /// Wait before the transition begins
    pub delay: Duration,
    /// Backend hint, carries no semantics
    pub native: bool,
}

impl Tween {
    pub fn new(to: f64, duration: Duration) -> Self {
        Self {
            to,
            duration,
            easing: Easing::Linear,
            delay: Duration::ZERO,
            native: false,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }
}

/// How a tween ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenOutcome {
    /// False when the tween was interrupted
    pub finished: bool,
}

/// Scalar animation engine
#[async_trait]
pub trait TweenEngine: Send + Sync {
    /// Animate `value` from its current value to `tween.to`.
    ///
    /// Must return `finished: false` promptly once `cancel` fires, and write
    /// through [`AnimatedValue::write`] so cancelled drives cannot land values.
    async fn timing(
        &self,
        value: &AnimatedValue,
        tween: Tween,
        cancel: &CancellationToken,
    ) -> TweenOutcome;

    /// Run tweens back to back, stopping at the first interrupted one
    async fn sequence(
        &self,
        value: &AnimatedValue,
        tweens: Vec<Tween>,
        cancel: &CancellationToken,
    ) -> TweenOutcome {
        for tween in tweens {
            let outcome = self.timing(value, tween, cancel).await;
            if !outcome.finished {
                return outcome;
            }
        }
        TweenOutcome { finished: true }
    }
}

/// Default engine: samples the easing curve once per frame on tokio time
#[derive(Debug, Clone)]
pub struct FrameTween {
    frame: Duration,
}

impl Default for FrameTween {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTween {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: frame_interval(fps),
        }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }
}

#[async_trait]
impl TweenEngine for FrameTween {
    async fn timing(
        &self,
        value: &AnimatedValue,
        tween: Tween,
        cancel: &CancellationToken,
    ) -> TweenOutcome {
        const INTERRUPTED: TweenOutcome = TweenOutcome { finished: false };

        if !tween.delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return INTERRUPTED,
                _ = tokio::time::sleep(tween.delay) => {}
            }
        }

        let from = value.get();
        let start = Instant::now();
        trace!(
            from,
            to = tween.to,
            duration_ms = tween.duration.as_millis() as u64,
            native = tween.native,
            "Tween started"
        );

        let mut ticker = tokio::time::interval(self.frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return INTERRUPTED,
                _ = ticker.tick() => {}
            }

            let t = progress(start, tween.duration);
            let current = lerp(from, tween.to, tween.easing.apply(t));
            if !value.write(current, cancel) {
                return INTERRUPTED;
            }
            if t >= 1.0 {
                return TweenOutcome { finished: true };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_reaches_target() {
        let engine = FrameTween::new(50);
        let value = AnimatedValue::default();
        let start = Instant::now();

        let outcome = engine
            .timing(
                &value,
                Tween::new(-120.0, Duration::from_millis(400)),
                &CancellationToken::new(),
            )
            .await;

        assert!(outcome.finished);
        assert_eq!(value.get(), -120.0);
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_rate_above_1000_still_ticks() {
        let engine = FrameTween::new(2000);
        assert_eq!(engine.frame(), Duration::from_millis(1));

        let value = AnimatedValue::default();
        let start = Instant::now();
        let outcome = engine
            .timing(
                &value,
                Tween::new(30.0, Duration::from_millis(50)),
                &CancellationToken::new(),
            )
            .await;

        assert!(outcome.finished);
        assert_eq!(value.get(), 30.0);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_intermediate_values_follow_curve() {
        let engine = Arc::new(FrameTween::new(100));
        let value = AnimatedValue::default();
        let token = CancellationToken::new();

        let task = {
            let (engine, value, token) = (engine.clone(), value.clone(), token.clone());
            tokio::spawn(async move {
                engine
                    .timing(&value, Tween::new(100.0, Duration::from_secs(1)), &token)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(505)).await;
        let midway = value.get();
        assert!(midway > 40.0 && midway < 60.0, "midway = {}", midway);

        assert!(task.await.unwrap().finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts() {
        let engine = Arc::new(FrameTween::default());
        let value = AnimatedValue::default();
        let token = CancellationToken::new();

        let task = {
            let (engine, value, token) = (engine.clone(), value.clone(), token.clone());
            tokio::spawn(async move {
                engine
                    .timing(&value, Tween::new(100.0, Duration::from_secs(1)), &token)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(200)).await;
        token.cancel();
        value.set(0.0);

        assert!(!task.await.unwrap().finished);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(value.get(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_runs_in_order_with_delay() {
        let engine = FrameTween::new(50);
        let value = AnimatedValue::default();
        let start = Instant::now();

        let outcome = engine
            .sequence(
                &value,
                vec![
                    Tween::new(-30.0, Duration::from_millis(200)),
                    Tween::new(10.0, Duration::from_millis(200)).with_delay(Duration::from_millis(300)),
                ],
                &CancellationToken::new(),
            )
            .await;

        assert!(outcome.finished);
        assert_eq!(value.get(), 10.0);
        assert!(start.elapsed() >= Duration::from_millis(700));
    }
}
