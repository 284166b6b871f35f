use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::state::{select_mode, MarqueeSnapshot, MarqueeState};
use crate::animation::{AnimationDriver, DriveConfig, DriveEvent, DriveEventKind, DriveMode};
use crate::config::MarqueeConfig;
use crate::metrics::{FitDecision, Metrics, MetricsProber, TextDirection};
use crate::Result;

/// Callback fired on controller notifications
pub type Observer = Arc<dyn Fn() + Send + Sync>;

#[derive(Default, Clone)]
pub(crate) struct Observers {
    pub on_scroll_start: Option<Observer>,
    pub on_marquee_complete: Option<Observer>,
}

/// Requests sent from a [`super::MarqueeController`] handle
#[derive(Debug)]
pub(crate) enum Command {
    Start { delay: Duration },
    Stop,
    SetContent(String),
    LayoutChanged,
    UserScrollBegan,
    UserScrollEnded,
    SetDisabled(bool),
    Flush(oneshot::Sender<()>),
    Dispose(oneshot::Sender<()>),
}

/// Lifecycle phase, independent of the disabled flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Measuring,
    Driving(DriveMode),
    UserScrolling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    /// Pending start (or content-change restart)
    Start,
    /// Restart after a manual scroll ended
    Resume,
    /// Re-measure once layout settles
    Remeasure,
}

struct ScheduledTask {
    deadline: Instant,
    action: TimerAction,
}

struct LiveMeasurement {
    id: u64,
    token: CancellationToken,
}

struct MeasureOutcome {
    id: u64,
    result: Result<Metrics>,
}

/// Channels connecting the service to its handle
pub(crate) struct ServiceChannels {
    pub commands: mpsc::UnboundedReceiver<Command>,
    pub snapshot: watch::Sender<MarqueeSnapshot>,
    pub drive_events: mpsc::UnboundedReceiver<DriveEvent>,
}

/// Single task owning all marquee state.
///
/// Commands, measurement results, drive events and the one pending timer are
/// handled strictly one at a time, so no transition observes another half done.
pub(crate) struct MarqueeService {
    config: MarqueeConfig,
    prober: MetricsProber,
    driver: AnimationDriver,
    observers: Observers,
    content: String,

    phase: Phase,
    disabled: bool,
    /// Set by a start request, cleared by stop and by a finished single-run drive
    armed: bool,
    metrics: Option<Metrics>,
    fit: Option<FitDecision>,

    timer: Option<ScheduledTask>,
    measurement: Option<LiveMeasurement>,
    next_measurement: u64,

    measure_tx: mpsc::UnboundedSender<MeasureOutcome>,
    measure_rx: mpsc::UnboundedReceiver<MeasureOutcome>,
    channels: ServiceChannels,
}

impl MarqueeService {
    pub fn new(
        config: MarqueeConfig,
        prober: MetricsProber,
        driver: AnimationDriver,
        observers: Observers,
        content: String,
        channels: ServiceChannels,
    ) -> Self {
        let (measure_tx, measure_rx) = mpsc::unbounded_channel();
        let disabled = config.disabled;
        Self {
            config,
            prober,
            driver,
            observers,
            content,
            phase: Phase::Idle,
            disabled,
            armed: false,
            metrics: None,
            fit: None,
            timer: None,
            measurement: None,
            next_measurement: 1,
            measure_tx,
            measure_rx,
            channels,
        }
    }

    pub async fn run(mut self) {
        self.mount();
        self.publish();

        let ack = loop {
            let deadline = self.timer.as_ref().map(|task| task.deadline);

            tokio::select! {
                biased;

                command = self.channels.commands.recv() => {
                    match command {
                        Some(Command::Dispose(ack)) => break Some(ack),
                        Some(command) => self.handle_command(command),
                        None => {
                            debug!("Marquee handle dropped");
                            break None;
                        }
                    }
                }

                Some(outcome) = self.measure_rx.recv() => {
                    self.on_measured(outcome);
                }

                Some(event) = self.channels.drive_events.recv() => {
                    self.on_drive_event(event);
                }

                _ = wait_for(deadline) => {
                    self.on_timer();
                }
            }

            self.publish();
        };

        self.teardown();
        if let Some(ack) = ack {
            let _ = ack.send(());
        }
        debug!("Marquee controller stopped");
    }

    fn mount(&mut self) {
        if self.disabled {
            debug!("Marquee mounted disabled");
            return;
        }
        if self.config.marquee_on_mount {
            self.start(self.config.start_delay());
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { delay } => self.start(delay),
            Command::Stop => self.stop(),
            Command::SetContent(text) => self.set_content(text),
            Command::LayoutChanged => self.layout_changed(),
            Command::UserScrollBegan => self.user_scroll_began(),
            Command::UserScrollEnded => self.user_scroll_ended(),
            Command::SetDisabled(disabled) => self.set_disabled(disabled),
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
            // Intercepted by the run loop
            Command::Dispose(_) => {}
        }
    }

    /// Whether a start request should be ignored
    fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
            || self
                .timer
                .as_ref()
                .is_some_and(|task| task.action != TimerAction::Remeasure)
    }

    fn start(&mut self, delay: Duration) {
        if self.disabled {
            debug!("Start ignored while disabled");
            return;
        }
        if self.is_animating() {
            trace!(phase = ?self.phase, "Start ignored, already animating");
            return;
        }

        self.armed = true;
        if delay.is_zero() {
            self.timer = None;
            self.begin_measurement();
        } else {
            self.schedule(TimerAction::Start, delay);
        }
    }

    fn stop(&mut self) {
        self.halt();
        self.armed = false;
        debug!("Marquee stopped");
    }

    /// Cancel every pending or running activity and zero the position
    fn halt(&mut self) {
        self.timer = None;
        self.cancel_measurement();
        self.driver.stop();
        self.phase = Phase::Idle;
    }

    fn set_content(&mut self, text: String) {
        if text == self.content {
            return;
        }
        debug!(chars = text.chars().count(), "Marquee content changed");
        self.content = text;
        self.invalidate_metrics();
        self.driver.reset_first_loop();

        // A pending resume re-measures anyway
        if self.disabled || self.phase == Phase::UserScrolling {
            return;
        }

        let restart = self.armed || self.config.marquee_on_mount;
        self.halt();
        if restart {
            self.start(self.config.start_delay());
        }
    }

    fn layout_changed(&mut self) {
        if self.disabled || !self.armed || self.phase == Phase::UserScrolling {
            return;
        }
        if self
            .timer
            .as_ref()
            .is_some_and(|task| task.action != TimerAction::Remeasure)
        {
            return;
        }
        self.schedule(TimerAction::Remeasure, self.config.settle_delay());
    }

    fn user_scroll_began(&mut self) {
        if self.disabled || !self.config.scroll {
            return;
        }
        if !self.snapshot().user_scroll_enabled(self.config.scroll) {
            trace!("Manual scroll ignored, content fits");
            return;
        }
        self.halt();
        self.phase = Phase::UserScrolling;
        debug!("Manual scroll began");
    }

    fn user_scroll_ended(&mut self) {
        if self.phase != Phase::UserScrolling {
            return;
        }
        self.armed = true;
        self.schedule(TimerAction::Resume, self.config.resume_delay());
        debug!("Manual scroll ended");
    }

    fn set_disabled(&mut self, disabled: bool) {
        if disabled == self.disabled {
            return;
        }
        self.disabled = disabled;
        if disabled {
            self.halt();
            info!("Marquee disabled");
        } else {
            info!("Marquee enabled");
            if self.config.marquee_on_mount {
                self.start(self.config.start_delay());
            }
        }
    }

    fn schedule(&mut self, action: TimerAction, delay: Duration) {
        if let Some(previous) = &self.timer {
            trace!(previous = ?previous.action, "Replacing pending timer");
        }
        debug!(?action, delay_ms = delay.as_millis() as u64, "Scheduling marquee timer");
        self.timer = Some(ScheduledTask {
            deadline: Instant::now() + delay,
            action,
        });
    }

    fn on_timer(&mut self) {
        let Some(task) = self.timer.take() else {
            return;
        };
        match task.action {
            TimerAction::Start | TimerAction::Remeasure => self.begin_measurement(),
            TimerAction::Resume => {
                self.phase = Phase::Idle;
                self.begin_measurement();
            }
        }
    }

    fn begin_measurement(&mut self) {
        self.cancel_measurement();

        let id = self.next_measurement;
        self.next_measurement += 1;
        let token = CancellationToken::new();

        let prober = self.prober.clone();
        let results = self.measure_tx.clone();
        let cancel = token.clone();
        tokio::spawn(async move {
            if let Some(result) = prober.measure(&cancel).await {
                let _ = results.send(MeasureOutcome { id, result });
            }
        });

        self.measurement = Some(LiveMeasurement { id, token });
        if self.phase == Phase::Idle {
            self.phase = Phase::Measuring;
        }
        debug!(measurement = id, "Measuring marquee");
    }

    fn cancel_measurement(&mut self) {
        if let Some(live) = self.measurement.take() {
            live.token.cancel();
            trace!(measurement = live.id, "Measurement cancelled");
        }
    }

    fn on_measured(&mut self, outcome: MeasureOutcome) {
        let current = self
            .measurement
            .as_ref()
            .is_some_and(|live| live.id == outcome.id && !live.token.is_cancelled());
        if !current {
            trace!(measurement = outcome.id, "Dropping stale measurement");
            return;
        }
        self.measurement = None;

        match outcome.result {
            Ok(metrics) => self.apply_metrics(metrics),
            Err(e) => {
                warn!("Could not measure marquee: {}", e);
                if self.phase == Phase::Measuring {
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    fn apply_metrics(&mut self, metrics: Metrics) {
        let fit = metrics.decide(&self.config.fit_thresholds());
        let unchanged = self.metrics == Some(metrics);
        self.metrics = Some(metrics);
        self.fit = Some(fit);
        debug!(
            container = metrics.container_width,
            content = metrics.content_width,
            distance = metrics.distance(),
            fits = fit.content_fits,
            bounce = fit.should_bounce,
            "Marquee measured"
        );

        let Some(mode) = select_mode(self.config.animation_type, self.config.bounce, &fit) else {
            self.driver.stop();
            self.phase = Phase::Idle;
            return;
        };

        if self.phase == Phase::Driving(mode) && unchanged && self.driver.is_active() {
            trace!("Metrics unchanged, keeping current drive");
            return;
        }
        self.drive(mode, metrics);
    }

    fn drive(&mut self, mode: DriveMode, metrics: Metrics) {
        let cfg = DriveConfig::from_marquee(
            &self.config,
            mode,
            self.content.chars().count(),
            self.direction(),
        );

        self.driver.stop();
        let started = match mode {
            DriveMode::Scroll => self.driver.drive_scroll(metrics.content_width, &cfg),
            DriveMode::Bounce => self.driver.drive_bounce(metrics.distance(), &cfg),
        };

        match started {
            Ok(drive) => {
                let entering = !matches!(self.phase, Phase::Driving(_));
                self.phase = Phase::Driving(mode);
                info!(drive, ?mode, "Marquee animating");
                if entering {
                    notify(&self.observers.on_scroll_start);
                }
            }
            Err(e) => {
                warn!("Marquee drive not started: {}", e);
                self.invalidate_metrics();
                self.phase = Phase::Idle;
                self.schedule(TimerAction::Remeasure, self.config.settle_delay());
            }
        }
    }

    fn on_drive_event(&mut self, event: DriveEvent) {
        if !self.driver.on_event(&event) {
            trace!(drive = event.drive, "Dropping event from stale drive");
            return;
        }
        match event.kind {
            DriveEventKind::CycleCompleted(DriveMode::Scroll) => {
                trace!(drive = event.drive, "Scroll cycle completed");
                notify(&self.observers.on_marquee_complete);
            }
            DriveEventKind::CycleCompleted(DriveMode::Bounce) => {
                trace!(drive = event.drive, "Bounce cycle completed");
            }
            DriveEventKind::Finished(mode) => {
                debug!(drive = event.drive, ?mode, "Single-run drive finished");
                if matches!(self.phase, Phase::Driving(_)) {
                    self.phase = Phase::Idle;
                }
                self.armed = false;
            }
        }
    }

    fn invalidate_metrics(&mut self) {
        self.metrics = None;
        self.fit = None;
    }

    fn direction(&self) -> TextDirection {
        match self.config.is_rtl {
            Some(is_rtl) => TextDirection::from_rtl(is_rtl),
            None => self.prober.host().layout_direction(),
        }
    }

    fn snapshot(&self) -> MarqueeSnapshot {
        let state = if self.disabled {
            MarqueeState::Disabled
        } else {
            match self.phase {
                Phase::Idle => MarqueeState::Idle,
                Phase::Measuring => MarqueeState::Measuring,
                Phase::Driving(mode) => MarqueeState::Driving(mode),
                Phase::UserScrolling => MarqueeState::UserScrolling,
            }
        };
        MarqueeSnapshot {
            state,
            metrics: self.metrics,
            fit: self.fit,
            direction: self.direction(),
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.channels.snapshot.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn teardown(&mut self) {
        self.halt();
        self.disabled = false;
        self.publish();
    }
}

fn notify(observer: &Option<Observer>) {
    if let Some(observer) = observer {
        observer();
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}
