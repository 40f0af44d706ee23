//! Reads a written deck back into per-slide text boxes.
//!
//! Slide order comes from the `p:sldIdLst` in `ppt/presentation.xml`,
//! resolved to part names through the presentation relationships.

use crate::package::{PRESENTATION_PATH, PRESENTATION_RELS_PATH};
use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// A text box found on a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeText {
    pub text: String,
    /// Offset in EMU.
    pub x: i64,
    pub y: i64,
    /// Whether the shape has a solid background fill.
    pub filled: bool,
    /// Run font size in whole points, if the run sets one.
    pub font_size: Option<u32>,
    pub bold: bool,
}

/// One slide of a deck, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSlide {
    /// 1-based slide number.
    pub number: usize,
    /// Text boxes in shape-tree order.
    pub shapes: Vec<ShapeText>,
}

impl ReadSlide {
    pub fn texts(&self) -> Vec<&str> {
        self.shapes.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Reader for `.pptx` decks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read the deck stored at `path`.
    pub fn open(&self, path: &Path) -> Result<Vec<ReadSlide>> {
        let file = File::open(path).map_err(|e| Error::from_input_io(path, e))?;
        self.read(BufReader::new(file))
    }

    /// Read a deck from any seekable source.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<ReadSlide>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let order = self.slide_order(&mut archive)?;
        log::debug!("Deck has {} slides", order.len());

        order
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let xml = read_part(&mut archive, path)?;
                Ok(ReadSlide {
                    number: idx + 1,
                    shapes: parse_shapes(&xml)?,
                })
            })
            .collect()
    }

    /// Part names of the slides, in presentation order.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = read_part(archive, PRESENTATION_RELS_PATH)?;
        let targets = relationship_targets(&rels)?;

        let presentation = read_part(archive, PRESENTATION_PATH)?;
        let mut reader = Reader::from_str(&presentation);
        let mut order = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let rel_id = attr_value(e, b"r:id").ok_or_else(|| {
                        Error::CorruptedFile("slide entry without a relationship id".to_string())
                    })?;
                    let target = targets.get(&rel_id).ok_or_else(|| {
                        Error::CorruptedFile(format!("unknown slide relationship '{}'", rel_id))
                    })?;
                    order.push(target.clone());
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing presentation: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(order)
    }
}

/// Map relationship ids to archive part names.
fn relationship_targets(rels: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(rels);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr_value(e, b"Id"), attr_value(e, b"Target")) {
                    let full_path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    targets.insert(id, full_path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Collect the text shapes of a slide part.
fn parse_shapes(xml: &str) -> Result<Vec<ShapeText>> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();

    let mut current: Option<ShapeText> = None;
    let mut in_shape_props = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeText::default()),
                b"spPr" => in_shape_props = true,
                b"solidFill" if in_shape_props => {
                    if let Some(shape) = current.as_mut() {
                        shape.filled = true;
                    }
                }
                b"rPr" => read_run_props(e, current.as_mut()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" if in_shape_props => {
                    if let Some(shape) = current.as_mut() {
                        shape.x = attr_value(e, b"x").and_then(|v| v.parse().ok()).unwrap_or(0);
                        shape.y = attr_value(e, b"y").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                }
                b"rPr" => read_run_props(e, current.as_mut()),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                if let Some(shape) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Bad slide text: {}", e)))?;
                    shape.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some(shape) = current.take() {
                        shapes.push(shape);
                    }
                }
                b"spPr" => in_shape_props = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

fn read_run_props(e: &BytesStart, shape: Option<&mut ShapeText>) {
    if let Some(shape) = shape {
        if let Some(size) = attr_value(e, b"sz").and_then(|v| v.parse::<u32>().ok()) {
            shape.font_size = Some(size / 100);
        }
        shape.bold = attr_value(e, b"b").is_some_and(|v| v == "1" || v == "true");
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Read a part from the ZIP archive.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
