//! Slide content extraction.
//!
//! Each `<section>` becomes one slide. The first `h1`/`h2` is the title;
//! `h3`, `p`, `ul`, `div.highlight-box` and `table` elements become content
//! blocks in document order.

use crate::dom::{Document, Element};
use deck_core::{ContentBlock, Result, SlideContent, TextNormalizer, Title, TitleTier};

/// Placeholder shown where a table was in the source.
pub const TABLE_NOTICE_TEXT: &str = "[Table: see the HTML source for details]";

/// Class marking a `div` as an emphasized callout.
const HIGHLIGHT_CLASS: &str = "highlight-box";

/// Paragraphs this short (in characters) are treated as decoration.
const MIN_PARAGRAPH_CHARS: usize = 3;

/// Parents whose paragraphs are never emitted on their own.
const CONTAINER_PARENTS: &[&str] = &["li", "td", "th"];

/// Extracts typed content blocks from slide sections.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    normalizer: TextNormalizer,
}

impl ContentExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
        }
    }

    /// Parse a whole HTML document into per-slide content.
    pub fn extract_document(&self, html: &str) -> Result<Vec<SlideContent>> {
        let document = Document::parse(html)?;
        Ok(document
            .sections()
            .iter()
            .map(|section| self.extract_slide(section))
            .collect())
    }

    /// Extract the title and content blocks of one section.
    pub fn extract_slide(&self, section: &Element) -> SlideContent {
        let title = self.title(section);
        let mut blocks = Vec::new();
        self.walk(section, &mut blocks);

        log::debug!(
            "section: title={:?}, {} blocks",
            title.as_ref().map(|t| t.text.as_str()),
            blocks.len()
        );

        SlideContent::new(title, blocks)
    }

    /// First `h1` or `h2` in document order, whichever comes first.
    fn title(&self, section: &Element) -> Option<Title> {
        let heading = section.find_first(&["h1", "h2"])?;
        let tier = if heading.is("h1") {
            TitleTier::Primary
        } else {
            TitleTier::Secondary
        };
        Some(Title::new(self.normalizer.normalize(&heading.text()), tier))
    }

    /// Pre-order walk over the children of `element`.
    ///
    /// A `ul` emits its direct `li` children and its subtree is not walked
    /// any further, so nothing inside a list is emitted twice.
    fn walk(&self, element: &Element, blocks: &mut Vec<ContentBlock>) {
        for child in element.children() {
            match child.tag() {
                "ul" => {
                    self.list_items(&child, blocks);
                    continue;
                }
                "h3" => {
                    if let Some(text) = self.normalizer.normalize_non_empty(&child.text()) {
                        blocks.push(ContentBlock::Heading(text));
                    }
                }
                "p" => {
                    if let Some(text) = self.paragraph(element, &child) {
                        blocks.push(ContentBlock::Paragraph(text));
                    }
                }
                "div" if child.has_class(HIGHLIGHT_CLASS) => {
                    if let Some(text) = self.normalizer.normalize_non_empty(&child.text()) {
                        blocks.push(ContentBlock::Highlight(text));
                    }
                }
                "table" => self.table(&child, blocks),
                _ => {}
            }
            self.walk(&child, blocks);
        }
    }

    fn paragraph(&self, parent: &Element, p: &Element) -> Option<String> {
        if CONTAINER_PARENTS.contains(&parent.tag()) {
            return None;
        }
        let text = self.normalizer.normalize(&p.text());
        if text.chars().count() <= MIN_PARAGRAPH_CHARS {
            log::debug!("skipping short paragraph {:?}", text);
            return None;
        }
        Some(text)
    }

    fn list_items(&self, ul: &Element, blocks: &mut Vec<ContentBlock>) {
        for li in ul.children_by_tag(&["li"]) {
            if let Some(text) = self.normalizer.normalize_non_empty(&li.text()) {
                blocks.push(ContentBlock::ListItem(text));
            }
        }
    }

    /// A notice that a table was here, plus its header row when it has one.
    fn table(&self, table: &Element, blocks: &mut Vec<ContentBlock>) {
        blocks.push(ContentBlock::TableNotice(TABLE_NOTICE_TEXT.to_string()));

        let header_row = table
            .find_first(&["thead"])
            .or_else(|| table.find_first(&["tr"]));
        let Some(header_row) = header_row else {
            return;
        };

        let headers: Vec<String> = header_row
            .descendants_by_tag(&["th", "td"])
            .iter()
            .map(|cell| self.normalizer.normalize(&cell.text()))
            .collect();

        if headers.iter().any(|h| !h.is_empty()) {
            blocks.push(ContentBlock::Paragraph(headers.join(" | ")));
        }
    }
}
