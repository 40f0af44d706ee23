//! Deck writer: collects rendered slides and saves them as a `.pptx`.

use crate::package;
use crate::render::SlideRenderer;
use deck_core::{Canvas, Error, LayoutBox, Result};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a presentation one slide at a time and writes it out.
#[derive(Debug, Clone)]
pub struct DeckWriter {
    canvas: Canvas,
    renderer: SlideRenderer,
    title: Option<String>,
    /// Rendered slide XML, in order.
    slides: Vec<String>,
}

impl DeckWriter {
    /// Create an empty deck with the given slide size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            renderer: SlideRenderer::new(),
            title: None,
            slides: Vec::new(),
        }
    }

    /// Set the document title stored in the package properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of slides added so far.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Render the boxes on a new blank slide and append it to the deck.
    pub fn add_slide(&mut self, boxes: &[LayoutBox]) -> Result<()> {
        let xml = self.renderer.render(boxes)?;
        self.slides.push(xml);
        log::info!(
            "Rendered slide {} with {} text boxes",
            self.slides.len(),
            boxes.len()
        );
        Ok(())
    }

    /// Serialize the whole package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self
            .write_package(Cursor::new(Vec::new()))
            .map_err(|e| Error::ZipError(format!("Failed to build package: {}", e)))?;
        Ok(cursor.into_inner())
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// The archive is assembled in memory first, so a failed build never
    /// leaves a file behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|source| Error::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn write_package<W: Write + Seek>(&self, inner: W) -> ZipResult<W> {
        let mut zip = ZipWriter::new(inner);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let count = self.slides.len();

        let part = |zip: &mut ZipWriter<W>, name: &str, content: &str| -> ZipResult<()> {
            log::debug!("Writing part {}", name);
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        part(&mut zip, "[Content_Types].xml", &package::content_types(count))?;
        part(&mut zip, "_rels/.rels", &package::root_rels())?;
        part(
            &mut zip,
            "docProps/core.xml",
            &package::core_properties(self.title.as_deref()),
        )?;
        part(&mut zip, "docProps/app.xml", &package::app_properties(count))?;
        part(
            &mut zip,
            package::PRESENTATION_PATH,
            &package::presentation(&self.canvas, count),
        )?;
        part(
            &mut zip,
            package::PRESENTATION_RELS_PATH,
            &package::presentation_rels(count),
        )?;
        part(&mut zip, "ppt/presProps.xml", &package::pres_props())?;
        part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &package::slide_master())?;
        part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &package::slide_master_rels(),
        )?;
        part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &package::blank_layout())?;
        part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &package::blank_layout_rels(),
        )?;
        part(&mut zip, "ppt/theme/theme1.xml", &package::theme())?;

        for (idx, slide) in self.slides.iter().enumerate() {
            let number = idx + 1;
            part(&mut zip, &package::slide_path(number), slide)?;
            part(&mut zip, &package::slide_rels_path(number), &package::slide_rels())?;
        }

        zip.finish()
    }
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new(Canvas::widescreen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{BoxKind, Emu, Rgb};
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_box(text: &str) -> LayoutBox {
        LayoutBox {
            kind: BoxKind::Paragraph,
            text: text.to_string(),
            left: Emu(457_200),
            top: Emu(457_200),
            width: Emu(8_229_600),
            height: Emu(320_040),
            font_size: 14,
            bold: false,
            color: Rgb(100, 116, 139),
            fill: None,
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_parts() {
        let mut deck = DeckWriter::default().with_title("Review");
        deck.add_slide(&[sample_box("one")]).unwrap();
        deck.add_slide(&[]).unwrap();
        assert_eq!(deck.slide_count(), 2);

        let bytes = deck.to_bytes().unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(!names.contains(&"ppt/slides/slide3.xml"));

        assert!(read_part(&bytes, "ppt/slides/slide1.xml").contains("<a:t>one</a:t>"));
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Review</dc:title>"));
        assert!(read_part(&bytes, "docProps/app.xml").contains("<Slides>2</Slides>"));
    }

    #[test]
    fn test_empty_deck() {
        let deck = DeckWriter::default();
        let bytes = deck.to_bytes().unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"cx="9144000" cy="5143500""#));
        assert!(!presentation.contains("sldId "));
    }

    #[test]
    fn test_save_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"stale").unwrap();

        let mut deck = DeckWriter::default();
        deck.add_slide(&[sample_box("fresh")]).unwrap();
        deck.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert!(read_part(&bytes, "ppt/slides/slide1.xml").contains("fresh"));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("deck.pptx");

        let err = DeckWriter::default().save(&path).unwrap_err();
        assert!(matches!(err, Error::WriteError { .. }));
        assert!(!path.exists());
    }
}
