use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::FitThresholds;

/// Resume delay after a manual scroll when `marquee_delay_ms` is unset
pub const DEFAULT_RESUME_DELAY_MS: u64 = 3000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub marquee: MarqueeConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Which drive a controller runs once content overflows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    /// Follow the fit evaluator's bounce recommendation
    #[default]
    Auto,
    Scroll,
    Bounce,
}

/// Easing curve applied to every drive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Jump to the end value when the duration elapses
    None,
    Linear,
    /// cubic-bezier(0.42, 0, 1, 1)
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    Cubic,
    Quintic,
    Exponential,
    /// Caller-supplied curve, only available programmatically
    #[serde(skip)]
    Custom(EasingFn),
}

/// Shared easing function mapping progress [0, 1] to eased progress
#[derive(Clone)]
pub struct EasingFn(pub Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl EasingFn {
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for EasingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EasingFn(..)")
    }
}

impl PartialEq for EasingFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Extra travel past each edge during a bounce, in layout units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BouncePadding {
    #[serde(default = "default_bounce_padding")]
    pub left: f64,
    #[serde(default = "default_bounce_padding")]
    pub right: f64,
}

impl Default for BouncePadding {
    fn default() -> Self {
        Self {
            left: default_bounce_padding(),
            right: default_bounce_padding(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// Fixed drive duration in milliseconds, overrides the speed-derived default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Repeat drives indefinitely
    #[serde(rename = "loop", default = "default_true")]
    pub looping: bool,
    /// Allow bounce mode when `animation_type` is auto
    #[serde(default = "default_true")]
    pub bounce: bool,
    /// Let the user drag the line; when false manual scroll signals are ignored
    #[serde(default = "default_true")]
    pub scroll: bool,
    /// Start automatically once attached (and again when re-enabled)
    #[serde(default = "default_true")]
    pub marquee_on_mount: bool,
    /// Delay before the first measurement, and the resume delay after a manual scroll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marquee_delay_ms: Option<u64>,
    /// Backend hint handed to the tween engine
    #[serde(default = "default_true")]
    pub use_native_backend: bool,
    /// Gap between the content and its repeat copy in scroll mode
    #[serde(default = "default_repeat_spacer")]
    pub repeat_spacer: f64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub animation_type: AnimationType,
    /// Milliseconds per content character for a scroll cycle
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f64,
    /// Milliseconds per content character for each bounce leg
    #[serde(default = "default_bounce_speed")]
    pub bounce_speed: f64,
    #[serde(default)]
    pub bounce_padding: BouncePadding,
    /// Delay before the return leg of every bounce cycle
    #[serde(default)]
    pub bounce_delay_ms: u64,
    /// Extra overflow slack before content is considered to fit
    #[serde(default)]
    pub should_animate_threshold: f64,
    #[serde(default)]
    pub disabled: bool,
    /// Overrides the host's text direction detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rtl: Option<bool>,
    /// Debounce window for layout change notifications
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Overflow up to this many units still counts as fitting
    #[serde(default = "default_rounding_slack")]
    pub rounding_slack: f64,
    /// Bounce is preferred while overflow < container width / ratio
    #[serde(default = "default_bounce_ratio")]
    pub bounce_ratio: f64,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            duration_ms: None,
            looping: default_true(),
            bounce: default_true(),
            scroll: default_true(),
            marquee_on_mount: default_true(),
            marquee_delay_ms: None,
            use_native_backend: default_true(),
            repeat_spacer: default_repeat_spacer(),
            easing: Easing::default(),
            animation_type: AnimationType::default(),
            scroll_speed: default_scroll_speed(),
            bounce_speed: default_bounce_speed(),
            bounce_padding: BouncePadding::default(),
            bounce_delay_ms: 0,
            should_animate_threshold: 0.0,
            disabled: false,
            is_rtl: None,
            settle_delay_ms: default_settle_delay(),
            rounding_slack: default_rounding_slack(),
            bounce_ratio: default_bounce_ratio(),
        }
    }
}

impl MarqueeConfig {
    /// Delay before the first measurement after mount, and before a content-change restart
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.marquee_delay_ms.unwrap_or(0))
    }

    /// Delay between the end of a manual scroll and the automatic restart.
    /// A configured delay wins even when it is zero.
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.marquee_delay_ms.unwrap_or(DEFAULT_RESUME_DELAY_MS))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn bounce_delay(&self) -> Duration {
        Duration::from_millis(self.bounce_delay_ms)
    }

    pub fn fit_thresholds(&self) -> FitThresholds {
        FitThresholds {
            rounding_slack: self.rounding_slack,
            bounce_ratio: self.bounce_ratio,
        }
    }

    /// Check the numeric options are usable
    pub fn validate(&self) -> crate::Result<()> {
        let fields = [
            ("repeat_spacer", self.repeat_spacer),
            ("bounce_padding.left", self.bounce_padding.left),
            ("bounce_padding.right", self.bounce_padding.right),
            ("should_animate_threshold", self.should_animate_threshold),
            ("rounding_slack", self.rounding_slack),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::Config(format!(
                    "marquee.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        let positive = [
            ("scroll_speed", self.scroll_speed),
            ("bounce_speed", self.bounce_speed),
            ("bounce_ratio", self.bounce_ratio),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(crate::Error::Config(format!(
                    "marquee.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Input poll interval in milliseconds when nothing animates
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate for the default tween engine and redraws
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Lines cycled through by the demo (`n` key)
    #[serde(default = "default_texts")]
    pub texts: Vec<String>,
}

impl UiConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if !(1..=1000).contains(&self.animation_fps) {
            return Err(crate::Error::Config(format!(
                "ui.animation_fps must be between 1 and 1000, got {}",
                self.animation_fps
            )));
        }
        Ok(())
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            texts: default_texts(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickertape")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_repeat_spacer() -> f64 {
    50.0
}

fn default_scroll_speed() -> f64 {
    150.0
}

fn default_bounce_speed() -> f64 {
    50.0
}

fn default_bounce_padding() -> f64 {
    10.0
}

fn default_settle_delay() -> u64 {
    100
}

fn default_rounding_slack() -> f64 {
    1.0 // absorbs sub-pixel rounding in host layout
}

fn default_bounce_ratio() -> f64 {
    8.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_texts() -> Vec<String> {
    vec![
        "Short line".to_string(),
        "A line that is only slightly too wide for the box".to_string(),
        "Breaking: this headline is far too long to fit on a single terminal line, so it scrolls around and around".to_string(),
    ]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.marquee.validate()?;
        config.ui.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/tickertape/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tickertape")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("tickertape.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
