//! Domain types for slide content and slide geometry.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// EMUs (English Metric Units) per inch, the native OOXML length unit.
pub const EMU_PER_INCH: i64 = 914_400;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Emu(pub i64);

impl Emu {
    /// Convert inches to EMU, truncating toward zero.
    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * EMU_PER_INCH as f64) as i64)
    }
}

impl Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl AddAssign for Emu {
    fn add_assign(&mut self, rhs: Emu) {
        self.0 += rhs.0;
    }
}

impl Sub for Emu {
    type Output = Emu;

    fn sub(self, rhs: Emu) -> Emu {
        Emu(self.0 - rhs.0)
    }
}

impl fmt::Display for Emu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex form used by `a:srgbClr`, e.g. `3B82F6`.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// The fixed drawing surface shared by every slide of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: Emu,
    pub height: Emu,
    pub margin_left: Emu,
    pub margin_right: Emu,
    pub margin_top: Emu,
    pub margin_bottom: Emu,
}

impl Canvas {
    /// 16:9 canvas, 10in × 5.625in with half-inch margins.
    pub fn widescreen() -> Self {
        let margin = Emu::from_inches(0.5);
        Self {
            width: Emu::from_inches(10.0),
            height: Emu::from_inches(5.625),
            margin_left: margin,
            margin_right: margin,
            margin_top: margin,
            margin_bottom: margin,
        }
    }

    /// Width available between the left and right margins.
    pub fn content_width(&self) -> Emu {
        self.width - self.margin_left - self.margin_right
    }

    /// The cursor position at or past which nothing more is placed.
    pub fn content_bottom(&self) -> Emu {
        self.height - self.margin_bottom
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::widescreen()
    }
}

/// Size tier of a slide title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleTier {
    /// Sourced from an `h1`.
    Primary,
    /// Sourced from an `h2`.
    Secondary,
}

/// The optional heading shown at the top of a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub text: String,
    pub tier: TitleTier,
}

impl Title {
    pub fn new(text: impl Into<String>, tier: TitleTier) -> Self {
        Self {
            text: text.into(),
            tier,
        }
    }
}

/// One piece of extracted text with a semantic role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading(String),
    Paragraph(String),
    ListItem(String),
    Highlight(String),
    TableNotice(String),
}

impl ContentBlock {
    /// The normalized text carried by the block.
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Heading(t)
            | ContentBlock::Paragraph(t)
            | ContentBlock::ListItem(t)
            | ContentBlock::Highlight(t)
            | ContentBlock::TableNotice(t) => t,
        }
    }

    /// The text as it appears on the slide. List items get a bullet prefix.
    pub fn display_text(&self) -> String {
        match self {
            ContentBlock::ListItem(t) => format!("• {}", t),
            other => other.text().to_string(),
        }
    }

    pub fn kind(&self) -> BoxKind {
        match self {
            ContentBlock::Heading(_) => BoxKind::Heading,
            ContentBlock::Paragraph(_) => BoxKind::Paragraph,
            ContentBlock::ListItem(_) => BoxKind::ListItem,
            ContentBlock::Highlight(_) => BoxKind::Highlight,
            ContentBlock::TableNotice(_) => BoxKind::TableNotice,
        }
    }
}

/// The extracted content of one `<section>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideContent {
    pub title: Option<Title>,
    /// Blocks in document order.
    pub blocks: Vec<ContentBlock>,
}

impl SlideContent {
    pub fn new(title: Option<Title>, blocks: Vec<ContentBlock>) -> Self {
        Self { title, blocks }
    }
}

/// What a placed box was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Title,
    Heading,
    Paragraph,
    ListItem,
    Highlight,
    TableNotice,
}

/// A positioned, styled text box ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutBox {
    pub kind: BoxKind,
    pub text: String,
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
    /// Font size in whole points.
    pub font_size: u32,
    pub bold: bool,
    pub color: Rgb,
    /// Solid background behind the text, if any.
    pub fill: Option<Rgb>,
}

impl LayoutBox {
    /// Bottom edge of the box.
    pub fn bottom(&self) -> Emu {
        self.top + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emu_from_inches() {
        assert_eq!(Emu::from_inches(1.0), Emu(914_400));
        assert_eq!(Emu::from_inches(0.5), Emu(457_200));
        assert_eq!(Emu::from_inches(5.625), Emu(5_143_500));
    }

    #[test]
    fn test_widescreen_canvas() {
        let canvas = Canvas::widescreen();
        assert_eq!(canvas.width, Emu(9_144_000));
        assert_eq!(canvas.height, Emu(5_143_500));
        assert_eq!(canvas.content_width(), Emu(8_229_600));
        assert_eq!(canvas.content_bottom(), Emu(4_686_300));
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(59, 130, 246).hex(), "3B82F6");
        assert_eq!(Rgb(0, 0, 0).hex(), "000000");
    }

    #[test]
    fn test_list_item_display_text() {
        assert_eq!(ContentBlock::ListItem("One".into()).display_text(), "• One");
        assert_eq!(ContentBlock::Paragraph("One".into()).display_text(), "One");
        assert_eq!(ContentBlock::ListItem("One".into()).text(), "One");
    }
}
