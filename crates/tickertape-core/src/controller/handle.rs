use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::service::{Command, MarqueeService, Observer, Observers, ServiceChannels};
use super::state::{MarqueeSnapshot, MarqueeState};
use crate::animation::{AnimatedValue, AnimationDriver, FrameTween, TweenEngine};
use crate::config::MarqueeConfig;
use crate::metrics::{MeasureHost, MetricsProber, TextDirection};
use crate::{Error, Result};

/// Configures and spawns a [`MarqueeController`]
pub struct MarqueeBuilder {
    config: MarqueeConfig,
    content: String,
    engine: Option<Arc<dyn TweenEngine>>,
    observers: Observers,
}

impl MarqueeBuilder {
    /// Initial content; its character count scales the default durations
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.content = text.into();
        self
    }

    /// Tween engine driving the position. Defaults to a 60 fps [`FrameTween`].
    pub fn engine(mut self, engine: Arc<dyn TweenEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Called on every transition into a drive
    pub fn on_scroll_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.observers.on_scroll_start = Some(Arc::new(f) as Observer);
        self
    }

    /// Called after every completed scroll cycle
    pub fn on_marquee_complete(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.observers.on_marquee_complete = Some(Arc::new(f) as Observer);
        self
    }

    /// Mount the controller on `host`. Must be called inside a tokio runtime.
    pub fn spawn(self, host: Arc<dyn MeasureHost>) -> MarqueeController {
        let engine = self
            .engine
            .unwrap_or_else(|| Arc::new(FrameTween::default()));

        let direction = match self.config.is_rtl {
            Some(is_rtl) => TextDirection::from_rtl(is_rtl),
            None => host.layout_direction(),
        };
        let initial = if self.config.disabled {
            MarqueeState::Disabled
        } else {
            MarqueeState::Idle
        };

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(MarqueeSnapshot::new(initial, direction));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let position = AnimatedValue::default();
        let driver = AnimationDriver::new(position.clone(), engine, event_tx);
        let prober = MetricsProber::new(host, self.config.should_animate_threshold);

        let service = MarqueeService::new(
            self.config,
            prober,
            driver,
            self.observers,
            self.content,
            ServiceChannels {
                commands: command_rx,
                snapshot: snapshot_tx,
                drive_events: event_rx,
            },
        );
        let task = tokio::spawn(service.run());

        MarqueeController {
            commands: command_tx,
            snapshot: snapshot_rx,
            position,
            task,
        }
    }
}

/// Handle to a running marquee.
///
/// All requests are queued to the controller task and applied in order.
/// Dropping the handle tears the controller down like [`dispose`](Self::dispose).
#[derive(Debug)]
pub struct MarqueeController {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<MarqueeSnapshot>,
    position: AnimatedValue,
    task: JoinHandle<()>,
}

impl MarqueeController {
    pub fn builder(config: MarqueeConfig) -> MarqueeBuilder {
        MarqueeBuilder {
            config,
            content: String::new(),
            engine: None,
            observers: Observers::default(),
        }
    }

    /// Spawn with default engine, empty content and no callbacks
    pub fn spawn(config: MarqueeConfig, host: Arc<dyn MeasureHost>) -> Self {
        Self::builder(config).spawn(host)
    }

    /// Measure and animate after `delay`. Ignored while disabled or already animating.
    pub fn start_animation(&self, delay: Duration) {
        self.send(Command::Start { delay });
    }

    pub fn stop_animation(&self) {
        self.send(Command::Stop);
    }

    pub fn set_content(&self, text: impl Into<String>) {
        self.send(Command::SetContent(text.into()));
    }

    /// Report a container or content resize
    pub fn layout_changed(&self) {
        self.send(Command::LayoutChanged);
    }

    pub fn user_scroll_began(&self) {
        self.send(Command::UserScrollBegan);
    }

    pub fn user_scroll_ended(&self) {
        self.send(Command::UserScrollEnded);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.send(Command::SetDisabled(disabled));
    }

    pub fn snapshot(&self) -> MarqueeSnapshot {
        *self.snapshot.borrow()
    }

    pub fn state(&self) -> MarqueeState {
        self.snapshot.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<MarqueeSnapshot> {
        self.snapshot.clone()
    }

    /// Current content offset; render the content translated by this value
    pub fn position(&self) -> &AnimatedValue {
        &self.position
    }

    /// Wait until every request sent so far has been applied
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Flush(tx))
            .map_err(|_| Error::Disposed)?;
        rx.await.map_err(|_| Error::Disposed)
    }

    /// Cancel everything and wait for the controller task to exit
    pub async fn dispose(self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Dispose(tx)).is_ok() {
            let _ = rx.await;
        }
        let _ = self.task.await;
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("Marquee controller already stopped");
        }
    }
}
