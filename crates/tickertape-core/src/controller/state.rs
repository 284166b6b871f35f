use crate::animation::DriveMode;
use crate::config::AnimationType;
use crate::metrics::{FitDecision, Metrics, TextDirection};

/// Observable controller state. `Disabled` overrides every other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeState {
    Idle,
    Measuring,
    Driving(DriveMode),
    UserScrolling,
    Disabled,
}

impl MarqueeState {
    #[inline]
    pub fn is_driving(&self) -> bool {
        matches!(self, MarqueeState::Driving(_))
    }
}

/// Point-in-time view of a controller, published after every transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeSnapshot {
    pub state: MarqueeState,
    /// `None` until measured, and again after every invalidation
    pub metrics: Option<Metrics>,
    pub fit: Option<FitDecision>,
    pub direction: TextDirection,
}

impl MarqueeSnapshot {
    pub fn new(state: MarqueeState, direction: TextDirection) -> Self {
        Self {
            state,
            metrics: None,
            fit: None,
            direction,
        }
    }

    /// Unknown metrics count as fitting
    pub fn content_fits(&self) -> bool {
        self.fit.map_or(true, |fit| fit.content_fits)
    }

    /// Whether the duplicate used for seamless wraparound should be rendered
    pub fn shows_repeat_copy(&self) -> bool {
        !self.content_fits() && self.state != MarqueeState::UserScrolling
    }

    /// Whether the host viewport should accept manual drags
    pub fn user_scroll_enabled(&self, scroll: bool) -> bool {
        scroll && !self.content_fits()
    }
}

/// Pick the drive for a fit decision; `None` when the content fits
pub fn select_mode(
    animation_type: AnimationType,
    allow_bounce: bool,
    fit: &FitDecision,
) -> Option<DriveMode> {
    if fit.content_fits {
        return None;
    }
    Some(match animation_type {
        AnimationType::Scroll => DriveMode::Scroll,
        AnimationType::Bounce => DriveMode::Bounce,
        AnimationType::Auto if fit.should_bounce && allow_bounce => DriveMode::Bounce,
        AnimationType::Auto => DriveMode::Scroll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FITS: FitDecision = FitDecision {
        content_fits: true,
        should_bounce: false,
    };
    const SMALL: FitDecision = FitDecision {
        content_fits: false,
        should_bounce: true,
    };
    const LARGE: FitDecision = FitDecision {
        content_fits: false,
        should_bounce: false,
    };

    #[test]
    fn test_mode_table() {
        let cases = [
            (AnimationType::Auto, true, FITS, None),
            (AnimationType::Scroll, true, FITS, None),
            (AnimationType::Auto, true, SMALL, Some(DriveMode::Bounce)),
            (AnimationType::Auto, false, SMALL, Some(DriveMode::Scroll)),
            (AnimationType::Auto, true, LARGE, Some(DriveMode::Scroll)),
            (AnimationType::Scroll, true, SMALL, Some(DriveMode::Scroll)),
            (AnimationType::Bounce, true, LARGE, Some(DriveMode::Bounce)),
            (AnimationType::Bounce, false, LARGE, Some(DriveMode::Bounce)),
        ];
        for (animation_type, allow_bounce, fit, expected) in cases {
            assert_eq!(
                select_mode(animation_type, allow_bounce, &fit),
                expected,
                "{:?} bounce={} {:?}",
                animation_type,
                allow_bounce,
                fit
            );
        }
    }

    #[test]
    fn test_unknown_metrics_count_as_fitting() {
        let snapshot = MarqueeSnapshot::new(MarqueeState::Idle, TextDirection::LeftToRight);
        assert!(snapshot.content_fits());
        assert!(!snapshot.shows_repeat_copy());
        assert!(!snapshot.user_scroll_enabled(true));
    }

    #[test]
    fn test_repeat_copy_hidden_while_user_scrolling() {
        let mut snapshot = MarqueeSnapshot::new(MarqueeState::Driving(DriveMode::Scroll), TextDirection::LeftToRight);
        snapshot.fit = Some(LARGE);
        assert!(snapshot.shows_repeat_copy());
        assert!(snapshot.user_scroll_enabled(true));
        assert!(!snapshot.user_scroll_enabled(false));

        snapshot.state = MarqueeState::UserScrolling;
        assert!(!snapshot.shows_repeat_copy());
    }
}
