//! Vertical layout of extracted slide content.
//!
//! Boxes are stacked top to bottom with a running cursor. Heights come from
//! a character-count heuristic rather than font metrics: every 80 characters
//! count as one more line. Once the cursor reaches the bottom margin the
//! remaining blocks of the slide are dropped.

use crate::types::{BoxKind, Canvas, ContentBlock, Emu, LayoutBox, Rgb, SlideContent, Title, TitleTier};
use std::ops::ControlFlow;

/// Characters assumed to fit on one rendered line.
const CHARS_PER_LINE: usize = 80;

const ACCENT: Rgb = Rgb(59, 130, 246);
const MUTED: Rgb = Rgb(100, 116, 139);
const DARK: Rgb = Rgb(30, 41, 59);
const FAINT: Rgb = Rgb(156, 163, 175);
const HIGHLIGHT_FILL: Rgb = Rgb(239, 246, 255);

/// Height of the title band.
const TITLE_HEIGHT_IN: f64 = 0.8;
/// Cursor advance below the title band.
const TITLE_ADVANCE_IN: f64 = 1.0;

/// Sizing and styling for one block variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    /// Left offset from the margin, in inches.
    pub indent: f64,
    /// Height for a single estimated line, in inches.
    pub base_height: f64,
    /// Extra height per estimated line, in inches. Zero means fixed height.
    pub line_height: f64,
    /// Space left below the box, in inches.
    pub gap: f64,
    pub font_size: u32,
    pub bold: bool,
    pub color: Rgb,
    pub fill: Option<Rgb>,
}

impl BlockStyle {
    /// Style used for a block variant.
    pub fn for_block(block: &ContentBlock) -> Self {
        match block {
            ContentBlock::Heading(_) => Self {
                indent: 0.0,
                base_height: 0.4,
                line_height: 0.0,
                gap: 0.1,
                font_size: 20,
                bold: true,
                color: ACCENT,
                fill: None,
            },
            ContentBlock::Paragraph(_) => Self {
                indent: 0.0,
                base_height: 0.2,
                line_height: 0.15,
                gap: 0.1,
                font_size: 14,
                bold: false,
                color: MUTED,
                fill: None,
            },
            ContentBlock::ListItem(_) => Self {
                indent: 0.2,
                base_height: 0.2,
                line_height: 0.15,
                gap: 0.05,
                font_size: 14,
                bold: false,
                color: MUTED,
                fill: None,
            },
            ContentBlock::Highlight(_) => Self {
                indent: 0.0,
                base_height: 0.3,
                line_height: 0.15,
                gap: 0.15,
                font_size: 16,
                bold: true,
                color: DARK,
                fill: Some(HIGHLIGHT_FILL),
            },
            ContentBlock::TableNotice(_) => Self {
                indent: 0.0,
                base_height: 0.3,
                line_height: 0.0,
                gap: 0.1,
                font_size: 12,
                bold: false,
                color: FAINT,
                fill: None,
            },
        }
    }

    /// Estimated box height for the given displayed text.
    pub fn height_for(&self, text: &str) -> Emu {
        if self.line_height == 0.0 {
            return Emu::from_inches(self.base_height);
        }
        let lines = estimated_lines(text);
        Emu::from_inches(self.base_height + lines as f64 * self.line_height)
    }
}

/// Number of lines a text is assumed to occupy.
pub fn estimated_lines(text: &str) -> usize {
    (text.chars().count() / CHARS_PER_LINE).max(1)
}

/// Result of laying out one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideLayout {
    /// Placed boxes, title first, then blocks in extraction order.
    pub boxes: Vec<LayoutBox>,
    /// Cursor position after the last placed box.
    pub cursor: Emu,
    /// Blocks left out because the slide ran out of vertical space.
    pub dropped: usize,
}

/// Accumulator threaded through the block fold.
struct Placement {
    boxes: Vec<LayoutBox>,
    cursor: Emu,
}

/// Stacks slide content onto a fixed canvas.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    canvas: Canvas,
}

impl LayoutEngine {
    /// Create a layout engine for the given canvas.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Lay out one slide's title and blocks.
    pub fn layout(&self, slide: &SlideContent) -> SlideLayout {
        let canvas = &self.canvas;
        let mut initial = Placement {
            boxes: Vec::with_capacity(slide.blocks.len() + 1),
            cursor: canvas.margin_top,
        };

        if let Some(title) = &slide.title {
            initial.boxes.push(self.title_box(title, initial.cursor));
            initial.cursor += Emu::from_inches(TITLE_ADVANCE_IN);
        }

        let limit = canvas.content_bottom();
        let placed = match slide
            .blocks
            .iter()
            .try_fold(initial, |mut acc, block| {
                if acc.cursor >= limit {
                    return ControlFlow::Break(acc);
                }
                let (placed, advance) = self.block_box(block, acc.cursor);
                acc.boxes.push(placed);
                acc.cursor += advance;
                ControlFlow::Continue(acc)
            }) {
            ControlFlow::Continue(acc) | ControlFlow::Break(acc) => acc,
        };

        let title_boxes = usize::from(slide.title.is_some());
        let dropped = slide.blocks.len() - (placed.boxes.len() - title_boxes);

        SlideLayout {
            boxes: placed.boxes,
            cursor: placed.cursor,
            dropped,
        }
    }

    fn title_box(&self, title: &Title, top: Emu) -> LayoutBox {
        let font_size = match title.tier {
            TitleTier::Primary => 32,
            TitleTier::Secondary => 28,
        };
        LayoutBox {
            kind: BoxKind::Title,
            text: title.text.clone(),
            left: self.canvas.margin_left,
            top,
            width: self.canvas.content_width(),
            height: Emu::from_inches(TITLE_HEIGHT_IN),
            font_size,
            bold: true,
            color: ACCENT,
            fill: None,
        }
    }

    /// Place a block at `top`, returning the box and the cursor advance.
    fn block_box(&self, block: &ContentBlock, top: Emu) -> (LayoutBox, Emu) {
        let style = BlockStyle::for_block(block);
        let text = block.display_text();
        let indent = Emu::from_inches(style.indent);
        let height = style.height_for(&text);

        log::debug!(
            "{:?} at y={} h={} ({} chars)",
            block.kind(),
            top,
            height,
            text.chars().count()
        );

        let placed = LayoutBox {
            kind: block.kind(),
            text,
            left: self.canvas.margin_left + indent,
            top,
            width: self.canvas.content_width() - indent,
            height,
            font_size: style.font_size,
            bold: style.bold,
            color: style.color,
            fill: style.fill,
        };
        (placed, height + Emu::from_inches(style.gap))
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(Canvas::widescreen())
    }
}
