use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use tickertape_core::TextDirection;

/// One line of text translated horizontally by the marquee position.
///
/// Characters that would straddle the area edge are not drawn, so wide
/// glyphs never render half-clipped.
#[derive(Debug, Clone)]
pub struct MarqueeWidget<'a> {
    text: &'a str,
    offset: f64,
    repeat_spacer: Option<u16>,
    direction: TextDirection,
    style: Style,
}

impl<'a> MarqueeWidget<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0.0,
            repeat_spacer: None,
            direction: TextDirection::LeftToRight,
            style: Style::default(),
        }
    }

    /// Horizontal translation in cells; negative moves the text left
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Draw the wraparound copy this many cells past the content
    pub fn repeat(mut self, spacer: Option<u16>) -> Self {
        self.repeat_spacer = spacer;
        self
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn draw_at(&self, start: i32, area: Rect, buf: &mut Buffer) {
        let mut column = start;
        let mut symbol = [0u8; 4];
        for c in self.text.chars() {
            let width = c.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            if column >= 0 && column + width <= i32::from(area.width) {
                let x = area.x + column as u16;
                buf.set_stringn(x, area.y, c.encode_utf8(&mut symbol), width as usize, self.style);
            }
            column += width;
            if column >= i32::from(area.width) {
                break;
            }
        }
    }
}

impl Widget for MarqueeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(Rect { height: 1, ..area }, self.style);

        let content = self.text.width() as i32;
        let offset = self.offset.round() as i32;
        let line = Rect { height: 1, ..area };

        match self.direction {
            TextDirection::LeftToRight => {
                self.draw_at(offset, line, buf);
                if let Some(spacer) = self.repeat_spacer {
                    self.draw_at(offset + content + i32::from(spacer), line, buf);
                }
            }
            TextDirection::RightToLeft => {
                // Anchored to the right edge, the copy trails to the left
                let start = i32::from(area.width) - content + offset;
                self.draw_at(start, line, buf);
                if let Some(spacer) = self.repeat_spacer {
                    self.draw_at(start - content - i32::from(spacer), line, buf);
                }
            }
        }
    }
}
