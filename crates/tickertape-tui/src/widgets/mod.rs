mod marquee;
mod status_bar;

pub use marquee::MarqueeWidget;
pub use status_bar::StatusBarWidget;
