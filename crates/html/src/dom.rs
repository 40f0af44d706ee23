//! A navigable view over an html5ever DOM.
//!
//! Parsing follows the HTML5 tree-construction rules, so malformed markup
//! is repaired rather than rejected.

use deck_core::{Error, Result};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// A parsed HTML document.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse HTML text into a document tree.
    ///
    /// Any text is accepted, NUL characters included. Only input with no
    /// markup at all that starts with a known binary container signature
    /// is rejected.
    pub fn parse(html: &str) -> Result<Self> {
        if let Some(kind) = binary_signature(html) {
            return Err(Error::ParseError(format!(
                "input looks like a {} file, not an HTML document",
                kind
            )));
        }

        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        log::debug!("parser diagnostics: {:?}", dom.errors);

        Ok(Self { dom })
    }

    /// All `<section>` elements in document order.
    pub fn sections(&self) -> Vec<Element> {
        let mut found = Vec::new();
        collect_descendants(&self.dom.document, &["section"], &mut found);
        found
    }
}

/// An element node in the document tree.
#[derive(Clone)]
pub struct Element(Handle);

impl Element {
    /// Lower-case local tag name.
    pub fn tag(&self) -> &str {
        match &self.0.data {
            NodeData::Element { name, .. } => &*name.local,
            _ => "",
        }
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag() == tag
    }

    /// Value of an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == name)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// Parent element, if the parent is an element and not the document.
    pub fn parent(&self) -> Option<Element> {
        let weak = self.0.parent.take();
        let parent = weak.as_ref().and_then(|w| w.upgrade());
        self.0.parent.set(weak);

        parent
            .filter(|p| matches!(p.data, NodeData::Element { .. }))
            .map(Element)
    }

    /// Direct element children.
    pub fn children(&self) -> Vec<Element> {
        self.0
            .children
            .borrow()
            .iter()
            .filter(|c| matches!(c.data, NodeData::Element { .. }))
            .cloned()
            .map(Element)
            .collect()
    }

    /// Direct children whose tag is in `tags`.
    pub fn children_by_tag(&self, tags: &[&str]) -> Vec<Element> {
        self.children()
            .into_iter()
            .filter(|c| tags.contains(&c.tag()))
            .collect()
    }

    /// All descendants whose tag is in `tags`, in document order.
    /// The element itself is not included.
    pub fn descendants_by_tag(&self, tags: &[&str]) -> Vec<Element> {
        let mut found = Vec::new();
        collect_descendants(&self.0, tags, &mut found);
        found
    }

    /// First descendant whose tag is in `tags`, in document order.
    pub fn find_first(&self, tags: &[&str]) -> Option<Element> {
        find_descendant(&self.0, tags)
    }

    /// Concatenated text of every text node in the subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.0, &mut out);
        out
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.tag())
    }
}

/// Name of the binary format `text` starts with, if it has no markup.
fn binary_signature(text: &str) -> Option<&'static str> {
    if text.contains('<') {
        return None;
    }
    // ZIP (docx/pptx), PDF, OLE/CFB (doc/ppt, lossily decoded)
    const SIGNATURES: &[(&str, &str)] = &[
        ("PK\u{3}\u{4}", "ZIP"),
        ("%PDF-", "PDF"),
        ("\u{fffd}\u{fffd}\u{11}\u{fffd}", "OLE"),
    ];
    SIGNATURES
        .iter()
        .find(|(magic, _)| text.starts_with(magic))
        .map(|(_, kind)| *kind)
}

fn element_tag(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn collect_descendants(node: &Handle, tags: &[&str], found: &mut Vec<Element>) {
    for child in node.children.borrow().iter() {
        if let Some(tag) = element_tag(child) {
            if tags.contains(&tag) {
                found.push(Element(child.clone()));
            }
        }
        collect_descendants(child, tags, found);
    }
}

fn find_descendant(node: &Handle, tags: &[&str]) -> Option<Element> {
    for child in node.children.borrow().iter() {
        if let Some(tag) = element_tag(child) {
            if tags.contains(&tag) {
                return Some(Element(child.clone()));
            }
        }
        if let Some(found) = find_descendant(child, tags) {
            return Some(found);
        }
    }
    None
}

fn collect_text(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_document_order() {
        let doc = Document::parse(
            "<html><body><section id='a'></section><div><section id='b'></section></div>\
             <section id='c'></section></body></html>",
        )
        .unwrap();

        let ids: Vec<String> = doc.sections().iter().filter_map(|s| s.attr("id")).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_sections() {
        let doc = Document::parse("<p>just a paragraph</p>").unwrap();
        assert!(doc.sections().is_empty());
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let doc = Document::parse("<section><p>unclosed <b>bold<section>next").unwrap();
        assert_eq!(doc.sections().len(), 2);
    }

    #[test]
    fn test_nul_inside_markup_is_accepted() {
        let doc = Document::parse("<section><h1>Intro</h1><p>Hello\0 world.</p></section>").unwrap();
        let sections = doc.sections();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].text().starts_with("IntroHello"));
    }

    #[test]
    fn test_binary_container_is_rejected() {
        let err = Document::parse("PK\u{3}\u{4}\0\0binary").err().unwrap();
        assert!(matches!(err, Error::ParseError(ref m) if m.contains("ZIP")));
        assert!(Document::parse("%PDF-1.7\n%\u{fffd}").is_err());
    }

    #[test]
    fn test_plain_text_without_tags_is_accepted() {
        let doc = Document::parse("just some words").unwrap();
        assert!(doc.sections().is_empty());
    }

    #[test]
    fn test_text_and_classes() {
        let doc = Document::parse(
            "<section><div class=' note  highlight-box '>Key <em>insight</em>\n here</div></section>",
        )
        .unwrap();
        let section = &doc.sections()[0];
        let div = section.find_first(&["div"]).unwrap();

        assert_eq!(div.text(), "Key insight\n here");
        assert_eq!(div.classes(), vec!["note", "highlight-box"]);
        assert!(div.has_class("highlight-box"));
        assert!(!div.has_class("highlight"));
    }

    #[test]
    fn test_parent_and_children() {
        let doc = Document::parse("<section><ul><li>One<ul><li>Deep</li></ul></li><li>Two</li></ul></section>").unwrap();
        let ul = doc.sections()[0].find_first(&["ul"]).unwrap();

        assert_eq!(ul.children_by_tag(&["li"]).len(), 2);
        assert_eq!(ul.descendants_by_tag(&["li"]).len(), 3);
        assert_eq!(ul.parent().map(|p| p.tag().to_string()), Some("section".to_string()));
    }

    #[test]
    fn test_find_first_either_tag() {
        let doc = Document::parse("<section><h2>Second</h2><h1>First</h1></section>").unwrap();
        let title = doc.sections()[0].find_first(&["h1", "h2"]).unwrap();
        assert_eq!(title.tag(), "h2");
        assert_eq!(title.text(), "Second");
    }
}
