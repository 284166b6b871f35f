use async_trait::async_trait;
use tokio::sync::watch;
use unicode_width::UnicodeWidthStr;

use tickertape_core::{Error, MeasureHost, NodeId, Result, TextDirection};

/// Last laid-out widths of the marquee line, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineLayout {
    /// `None` until the first frame is drawn
    pub container: Option<u16>,
    pub content: Option<u16>,
    pub direction: TextDirection,
}

/// Measurement host backed by what the terminal last rendered.
///
/// The container width is recorded on every draw and the content width
/// whenever the text changes. Queries before the first draw fail with
/// `NodeNotReady`.
#[derive(Debug)]
pub struct TerminalHost {
    layout: watch::Sender<LineLayout>,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalHost {
    pub fn new() -> Self {
        let (layout, _) = watch::channel(LineLayout::default());
        Self { layout }
    }

    /// Record the container width of the current frame.
    /// Returns true when it differs from the previous frame.
    pub fn set_container(&self, width: u16) -> bool {
        self.layout.send_if_modified(|layout| {
            if layout.container == Some(width) {
                return false;
            }
            layout.container = Some(width);
            true
        })
    }

    /// Record the text about to be displayed.
    /// Returns true when its width or direction changed.
    pub fn set_content(&self, text: &str) -> bool {
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let direction = detect_direction(text);
        self.layout.send_if_modified(|layout| {
            if layout.content == Some(width) && layout.direction == direction {
                return false;
            }
            layout.content = Some(width);
            layout.direction = direction;
            true
        })
    }

    /// Forget the container, as if the line was hidden
    pub fn detach(&self) {
        self.layout.send_modify(|layout| layout.container = None);
    }

    pub fn layout(&self) -> LineLayout {
        *self.layout.borrow()
    }
}

#[async_trait]
impl MeasureHost for TerminalHost {
    async fn measure_width(&self, node: NodeId) -> Result<f64> {
        let layout = self.layout();
        let width = match node {
            NodeId::Container => layout.container,
            NodeId::Content => layout.content,
        };
        width.map(f64::from).ok_or(Error::NodeNotReady(node))
    }

    fn layout_direction(&self) -> TextDirection {
        self.layout().direction
    }
}

/// Direction of the first strongly directional character
pub fn detect_direction(text: &str) -> TextDirection {
    text.chars()
        .find_map(|c| {
            if is_rtl_char(c) {
                Some(TextDirection::RightToLeft)
            } else if c.is_alphabetic() {
                Some(TextDirection::LeftToRight)
            } else {
                None
            }
        })
        .unwrap_or_default()
}

fn is_rtl_char(c: char) -> bool {
    matches!(
        c as u32,
        0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF | 0x10800..=0x10FFF | 0x1E800..=0x1EFFF
    )
}
