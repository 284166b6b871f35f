use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame, Terminal,
};
use tracing::info;

use tickertape_core::AppConfig;
use tickertape_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_wheel},
    widgets::{MarqueeWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, texts: Vec<String>) -> Result<()> {
    info!("Starting tickertape");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("tickertape"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), texts);
    let event_handler = EventHandler::new(config.ui.tick_rate_ms, config.ui.animation_fps);

    let result = event_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.shutdown().await;
    info!("tickertape stopped");
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if let Some(event) = event_handler.next(app.is_animating())? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key);
                    app.handle_action(action);
                }
                AppEvent::Wheel(delta) => app.handle_action(handle_wheel(delta)),
                // Picked up by the next draw
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => app.on_tick(),
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Marquee box centred vertically, status bar at the bottom
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" tickertape ")
        .border_style(Style::default().fg(app.theme.grey2))
        .style(Style::default().bg(app.theme.bg1));
    let inner = block.inner(rows[1]);
    frame.render_widget(block, rows[1]);

    app.on_layout(inner.width);

    let snapshot = app.snapshot();
    let spacer = u16::try_from(app.config.marquee.repeat_spacer.round() as i64).ok();
    let marquee = MarqueeWidget::new(app.text())
        .offset(app.offset())
        .direction(snapshot.direction)
        .repeat(spacer.filter(|_| snapshot.shows_repeat_copy()))
        .style(Style::default().fg(app.theme.fg0).bg(app.theme.bg1));
    frame.render_widget(marquee, inner);

    StatusBarWidget::render(frame, rows[3], app);
}
