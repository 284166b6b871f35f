use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use tickertape_core::{
    AppConfig, FrameTween, MarqueeController, MarqueeSnapshot, MarqueeState, TextDirection,
};

use crate::host::TerminalHost;
use crate::input::Action;
use crate::theme::Theme;

/// Cells moved per manual scroll step
const MANUAL_STEP: f64 = 4.0;
/// Manual scrolling counts as finished after this long without input
const MANUAL_IDLE: Duration = Duration::from_millis(800);

/// Notification counts reported by the controller callbacks
#[derive(Debug, Default)]
pub struct Counters {
    pub scroll_starts: AtomicUsize,
    pub completed_cycles: AtomicUsize,
}

impl Counters {
    pub fn scroll_starts(&self) -> usize {
        self.scroll_starts.load(Ordering::Relaxed)
    }

    pub fn completed_cycles(&self) -> usize {
        self.completed_cycles.load(Ordering::Relaxed)
    }
}

/// Demo application state: one marquee line cycling through texts
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub host: Arc<TerminalHost>,
    pub marquee: MarqueeController,
    pub counters: Arc<Counters>,

    texts: Vec<String>,
    current: usize,

    /// Offset shown while the user drives the line by hand
    manual_offset: f64,
    /// Time of the last manual scroll input, while one is in progress
    last_manual_input: Option<Instant>,

    pub disabled: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Mount the marquee for the first text. Falls back to the configured
    /// texts when `texts` is empty. Must be called inside a tokio runtime.
    pub fn new(config: Arc<AppConfig>, texts: Vec<String>) -> Self {
        let mut texts = if texts.is_empty() {
            config.ui.texts.clone()
        } else {
            texts
        };
        if texts.is_empty() {
            texts.push(String::new());
        }

        let host = Arc::new(TerminalHost::new());
        host.set_content(&texts[0]);

        let counters = Arc::new(Counters::default());
        let marquee = MarqueeController::builder(config.marquee.clone())
            .content(texts[0].clone())
            .engine(Arc::new(FrameTween::new(config.ui.animation_fps)))
            .on_scroll_start({
                let counters = counters.clone();
                move || {
                    counters.scroll_starts.fetch_add(1, Ordering::Relaxed);
                }
            })
            .on_marquee_complete({
                let counters = counters.clone();
                move || {
                    counters.completed_cycles.fetch_add(1, Ordering::Relaxed);
                }
            })
            .spawn(host.clone());

        Self {
            disabled: config.marquee.disabled,
            config,
            theme: Theme::default(),
            host,
            marquee,
            counters,
            texts,
            current: 0,
            manual_offset: 0.0,
            last_manual_input: None,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.texts[self.current]
    }

    pub fn snapshot(&self) -> MarqueeSnapshot {
        self.marquee.snapshot()
    }

    /// Horizontal offset to draw the text at
    pub fn offset(&self) -> f64 {
        if self.last_manual_input.is_some() || self.snapshot().state == MarqueeState::UserScrolling {
            self.manual_offset
        } else {
            self.marquee.position().get()
        }
    }

    /// Whether the next frame should come at animation rate
    pub fn is_animating(&self) -> bool {
        self.last_manual_input.is_some()
            || matches!(
                self.snapshot().state,
                MarqueeState::Measuring | MarqueeState::Driving(_)
            )
    }

    /// Record the width the marquee line was drawn at
    pub fn on_layout(&self, width: u16) {
        if self.host.set_container(width) {
            debug!(width, "Marquee line resized");
            self.marquee.layout_changed();
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollLeft => self.manual_scroll(MANUAL_STEP),
            Action::ScrollRight => self.manual_scroll(-MANUAL_STEP),
            Action::ToggleDisabled => {
                self.disabled = !self.disabled;
                self.marquee.set_disabled(self.disabled);
                self.set_status(if self.disabled {
                    "Marquee disabled"
                } else {
                    "Marquee enabled"
                });
            }
            Action::NextText => self.next_text(),
            Action::Start => {
                self.marquee.start_animation(Duration::ZERO);
                self.clear_status();
            }
            Action::Stop => {
                self.marquee.stop_animation();
                self.set_status("Stopped");
            }
            Action::None => {}
        }
    }

    /// Periodic housekeeping: ends a manual scroll once input goes quiet
    pub fn on_tick(&mut self) {
        if let Some(last) = self.last_manual_input {
            if last.elapsed() >= MANUAL_IDLE {
                self.last_manual_input = None;
                self.marquee.user_scroll_ended();
            }
        }
    }

    fn manual_scroll(&mut self, delta: f64) {
        let snapshot = self.snapshot();
        if self.disabled || !snapshot.user_scroll_enabled(self.config.marquee.scroll) {
            return;
        }
        if self.last_manual_input.is_none() && snapshot.state != MarqueeState::UserScrolling {
            // Dragging starts from rest
            self.manual_offset = 0.0;
            self.marquee.user_scroll_began();
        }

        let (min, max) = manual_bounds(&snapshot);
        self.manual_offset = (self.manual_offset + delta).clamp(min, max);
        self.last_manual_input = Some(Instant::now());
    }

    fn next_text(&mut self) {
        if self.texts.len() < 2 {
            return;
        }
        self.current = (self.current + 1) % self.texts.len();
        let text = self.texts[self.current].clone();
        info!(index = self.current, "Switching marquee text");
        self.host.set_content(&text);
        self.marquee.set_content(text);
        self.clear_status();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Tear the marquee down
    pub async fn shutdown(self) {
        self.marquee.dispose().await;
    }
}

/// Range a manual drag may move the text within
fn manual_bounds(snapshot: &MarqueeSnapshot) -> (f64, f64) {
    let overflow = snapshot
        .metrics
        .map_or(0.0, |m| (m.content_width - m.container_width).max(0.0));
    match snapshot.direction {
        TextDirection::LeftToRight => (-overflow, 0.0),
        TextDirection::RightToLeft => (0.0, overflow),
    }
}
