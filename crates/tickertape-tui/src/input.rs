use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Manual scroll toward the start of the text
    ScrollLeft,
    /// Manual scroll toward the end of the text
    ScrollRight,
    ToggleDisabled,
    NextText,
    Start,
    Stop,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        // Manual scrolling
        (KeyCode::Left, KeyModifiers::NONE) => Action::ScrollLeft,
        (KeyCode::Right, KeyModifiers::NONE) => Action::ScrollRight,
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::ScrollLeft,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::ScrollRight,

        // Marquee control
        (KeyCode::Char('d'), KeyModifiers::NONE) => Action::ToggleDisabled,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NextText,
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Start,
        (KeyCode::Char('x'), KeyModifiers::NONE) => Action::Stop,

        _ => Action::None,
    }
}

/// Map a mouse wheel notch onto a manual scroll
pub fn handle_wheel(delta: i8) -> Action {
    match delta.signum() {
        -1 => Action::ScrollLeft,
        1 => Action::ScrollRight,
        _ => Action::None,
    }
}
