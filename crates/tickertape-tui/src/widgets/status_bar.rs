use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use tickertape_core::{DriveMode, MarqueeSnapshot, MarqueeState};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let snapshot = app.snapshot();

        let status_text = match &app.status_message {
            Some(msg) => format!(" {}", msg),
            None => Self::describe(&snapshot, app),
        };

        let help_hint = " q:quit ←/→:scroll d:disable n:next s:start x:stop ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let state_color = match snapshot.state {
            MarqueeState::Driving(_) => theme.accent,
            MarqueeState::Disabled => theme.warning,
            MarqueeState::UserScrolling => theme.info,
            _ => theme.fg0,
        };

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(state_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn describe(snapshot: &MarqueeSnapshot, app: &App) -> String {
        let state = match snapshot.state {
            MarqueeState::Idle => "IDLE",
            MarqueeState::Measuring => "MEASURING",
            MarqueeState::Driving(DriveMode::Scroll) => "SCROLL",
            MarqueeState::Driving(DriveMode::Bounce) => "BOUNCE",
            MarqueeState::UserScrolling => "MANUAL",
            MarqueeState::Disabled => "DISABLED",
        };

        let widths = match snapshot.metrics {
            Some(m) => format!("{:.0}/{:.0}", m.content_width, m.container_width),
            None => "-/-".to_string(),
        };

        format!(
            " {} | {} cells | offset {:.0} | starts: {} cycles: {}",
            state,
            widths,
            app.offset(),
            app.counters.scroll_starts(),
            app.counters.completed_cycles()
        )
    }
}
