pub mod app;
pub mod event;
pub mod host;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use host::TerminalHost;
pub use theme::Theme;
