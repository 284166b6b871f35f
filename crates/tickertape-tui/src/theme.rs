use ratatui::style::Color;

/// Colors used by the marquee demo
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg1: Color,
    pub bg2: Color,
    pub fg0: Color,
    pub grey2: Color,

    // Semantic colors
    pub accent: Color,
    pub warning: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            accent: Color::Rgb(0xa9, 0xb6, 0x65),
            warning: Color::Rgb(0xd8, 0xa6, 0x57),
            info: Color::Rgb(0x7d, 0xae, 0xa3),
        }
    }
}
