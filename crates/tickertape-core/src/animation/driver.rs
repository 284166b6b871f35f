//! Scroll and bounce drives over the marquee's animated position
//!
//! A drive runs as its own task and reports cycle completions over a channel.
//! The driver owns at most one drive at a time; starting a new one or calling
//! [`AnimationDriver::stop`] cancels the old drive's token, after which none of
//! its writes or events can take effect.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::easing::Easing;
use super::timing::{length_proportional, MIN_DRIVE_DURATION};
use super::tween::{Tween, TweenEngine};
use super::value::AnimatedValue;
use crate::config::{BouncePadding, MarqueeConfig};
use crate::metrics::TextDirection;
use crate::{Error, Result};

/// Monotonic identifier of one drive
pub type DriveId = u64;

/// Kind of motion a drive produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveMode {
    /// Continuous wraparound past the content's end
    Scroll,
    /// Back-and-forth over the overflow distance
    Bounce,
}

/// Bounce offsets in logical (direction-relative) terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePadding {
    /// Rest offset at the end of each return leg
    pub start: f64,
    /// Extra travel past the overflow on the outbound leg
    pub end: f64,
}

impl EdgePadding {
    /// Map physical left/right padding onto the text direction
    pub fn resolve(padding: &BouncePadding, direction: TextDirection) -> Self {
        match direction {
            TextDirection::LeftToRight => Self {
                start: padding.left,
                end: padding.right,
            },
            TextDirection::RightToLeft => Self {
                start: padding.right,
                end: padding.left,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Scroll cycle duration, or the duration of each bounce leg
    pub duration: Duration,
    pub easing: Easing,
    pub looping: bool,
    pub use_native_backend: bool,
    /// Gap before the repeat copy (scroll only)
    pub repeat_spacer: f64,
    pub edge_padding: EdgePadding,
    /// Wait before the very first bounce cycle
    pub start_delay: Duration,
    /// Wait before each bounce return leg
    pub bounce_delay: Duration,
    pub direction: TextDirection,
}

impl DriveConfig {
    /// Build the drive parameters for `mode` from the marquee options.
    ///
    /// `content_units` is the content length the speed options scale with.
    pub fn from_marquee(
        config: &MarqueeConfig,
        mode: DriveMode,
        content_units: usize,
        direction: TextDirection,
    ) -> Self {
        // A zero duration counts as unset
        let duration = match config.duration_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => {
                let speed = match mode {
                    DriveMode::Scroll => config.scroll_speed,
                    DriveMode::Bounce => config.bounce_speed,
                };
                length_proportional(content_units, speed)
            }
        }
        .max(MIN_DRIVE_DURATION);

        Self {
            duration,
            easing: config.easing.clone(),
            looping: config.looping,
            use_native_backend: config.use_native_backend,
            repeat_spacer: config.repeat_spacer,
            edge_padding: EdgePadding::resolve(&config.bounce_padding, direction),
            start_delay: config.start_delay(),
            bounce_delay: config.bounce_delay(),
            direction,
        }
    }

    fn tween(&self, to: f64) -> Tween {
        Tween::new(to, self.duration)
            .with_easing(self.easing.clone())
            .with_native(self.use_native_backend)
    }
}

/// Target of one scroll cycle: the content plus spacer, travelling outward
pub fn scroll_target(content_width: f64, cfg: &DriveConfig) -> Result<f64> {
    let target = cfg.direction.travel_sign() * (content_width + cfg.repeat_spacer);
    finite(target)
}

/// Outbound and return targets of one bounce cycle
pub fn bounce_legs(distance: f64, cfg: &DriveConfig) -> Result<(f64, f64)> {
    let sign = cfg.direction.travel_sign();
    let outbound = sign * (distance + cfg.edge_padding.end);
    let back = -sign * cfg.edge_padding.start;
    Ok((finite(outbound)?, finite(back)?))
}

fn finite(target: f64) -> Result<f64> {
    if target.is_finite() {
        Ok(target)
    } else {
        Err(Error::NonFiniteTarget(target))
    }
}

/// Progress report from a running drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveEvent {
    pub drive: DriveId,
    pub kind: DriveEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveEventKind {
    /// One natural, uninterrupted cycle completed
    CycleCompleted(DriveMode),
    /// A non-looping drive ran its single cycle and ended
    Finished(DriveMode),
}

struct ActiveDrive {
    id: DriveId,
    mode: DriveMode,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the animated position and the single running drive
pub struct AnimationDriver {
    value: AnimatedValue,
    engine: Arc<dyn TweenEngine>,
    events: mpsc::UnboundedSender<DriveEvent>,
    active: Option<ActiveDrive>,
    next_id: DriveId,
    first_loop_finished: bool,
}

impl AnimationDriver {
    pub fn new(
        value: AnimatedValue,
        engine: Arc<dyn TweenEngine>,
        events: mpsc::UnboundedSender<DriveEvent>,
    ) -> Self {
        Self {
            value,
            engine,
            events,
            active: None,
            next_id: 1,
            first_loop_finished: false,
        }
    }

    pub fn value(&self) -> &AnimatedValue {
        &self.value
    }

    /// Identifier and mode of the running drive
    pub fn active(&self) -> Option<(DriveId, DriveMode)> {
        self.active.as_ref().map(|a| (a.id, a.mode))
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn first_loop_finished(&self) -> bool {
        self.first_loop_finished
    }

    /// Forget that a bounce cycle completed, so the start delay applies again
    pub fn reset_first_loop(&mut self) {
        self.first_loop_finished = false;
    }

    /// Start a scroll drive from the current position.
    ///
    /// Fails with `NonFiniteTarget` without touching the running drive when
    /// the target cannot be computed (metrics not known yet).
    pub fn drive_scroll(&mut self, content_width: f64, cfg: &DriveConfig) -> Result<DriveId> {
        let target = scroll_target(content_width, cfg)?;
        self.halt();

        let (id, token) = self.next_drive();
        debug!(drive = id, target, duration_ms = cfg.duration.as_millis() as u64, "Starting scroll drive");

        let handle = tokio::spawn(run_scroll(self.context(id, &token), target, cfg.clone()));
        self.active = Some(ActiveDrive {
            id,
            mode: DriveMode::Scroll,
            token,
            handle,
        });
        Ok(id)
    }

    /// Start a bounce drive from rest. The start delay applies only while no
    /// bounce cycle has completed yet.
    pub fn drive_bounce(&mut self, distance: f64, cfg: &DriveConfig) -> Result<DriveId> {
        let legs = bounce_legs(distance, cfg)?;
        self.halt();
        self.value.set(0.0);

        let (id, token) = self.next_drive();
        let pre_delay = if self.first_loop_finished {
            Duration::ZERO
        } else {
            cfg.start_delay
        };
        debug!(drive = id, outbound = legs.0, back = legs.1, "Starting bounce drive");

        let handle = tokio::spawn(run_bounce(
            self.context(id, &token),
            legs,
            cfg.clone(),
            pre_delay,
        ));
        self.active = Some(ActiveDrive {
            id,
            mode: DriveMode::Bounce,
            token,
            handle,
        });
        Ok(id)
    }

    /// Interrupt any drive and zero the position
    pub fn stop(&mut self) {
        self.halt();
        self.value.set(0.0);
    }

    /// Apply a drive event to driver bookkeeping.
    ///
    /// Returns false for events from drives that are no longer current.
    pub fn on_event(&mut self, event: &DriveEvent) -> bool {
        if self.active.as_ref().map(|a| a.id) != Some(event.drive) {
            return false;
        }
        match event.kind {
            DriveEventKind::CycleCompleted(DriveMode::Bounce) => {
                self.first_loop_finished = true;
            }
            DriveEventKind::CycleCompleted(DriveMode::Scroll) => {}
            DriveEventKind::Finished(_) => {
                self.active = None;
            }
        }
        true
    }

    fn next_drive(&mut self) -> (DriveId, CancellationToken) {
        let id = self.next_id;
        self.next_id += 1;
        (id, CancellationToken::new())
    }

    fn context(&self, id: DriveId, token: &CancellationToken) -> DriveContext {
        DriveContext {
            id,
            value: self.value.clone(),
            engine: Arc::clone(&self.engine),
            token: token.clone(),
            events: self.events.clone(),
        }
    }

    fn halt(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            active.handle.abort();
            debug!(drive = active.id, mode = ?active.mode, "Drive stopped");
        }
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Everything a running drive task needs
struct DriveContext {
    id: DriveId,
    value: AnimatedValue,
    engine: Arc<dyn TweenEngine>,
    token: CancellationToken,
    events: mpsc::UnboundedSender<DriveEvent>,
}

impl DriveContext {
    fn emit(&self, kind: DriveEventKind) {
        // Receiver gone means the owner was torn down
        let _ = self.events.send(DriveEvent { drive: self.id, kind });
    }
}

async fn run_scroll(ctx: DriveContext, target: f64, cfg: DriveConfig) {
    loop {
        let outcome = ctx.engine.timing(&ctx.value, cfg.tween(target), &ctx.token).await;
        if !outcome.finished || ctx.token.is_cancelled() {
            return;
        }

        ctx.emit(DriveEventKind::CycleCompleted(DriveMode::Scroll));
        if !cfg.looping {
            ctx.emit(DriveEventKind::Finished(DriveMode::Scroll));
            return;
        }

        // Wrap around: the repeat copy now sits where the content started
        if !ctx.value.write(0.0, &ctx.token) {
            return;
        }
    }
}

async fn run_bounce(ctx: DriveContext, (outbound, back): (f64, f64), cfg: DriveConfig, mut pre_delay: Duration) {
    loop {
        if !pre_delay.is_zero() {
            tokio::select! {
                biased;
                _ = ctx.token.cancelled() => return,
                _ = tokio::time::sleep(pre_delay) => {}
            }
        }

        let legs = vec![
            cfg.tween(outbound),
            cfg.tween(back).with_delay(cfg.bounce_delay),
        ];
        let outcome = ctx.engine.sequence(&ctx.value, legs, &ctx.token).await;
        if !outcome.finished || ctx.token.is_cancelled() {
            return;
        }

        ctx.emit(DriveEventKind::CycleCompleted(DriveMode::Bounce));
        if !cfg.looping {
            ctx.emit(DriveEventKind::Finished(DriveMode::Bounce));
            return;
        }
        pre_delay = Duration::ZERO;
    }
}
