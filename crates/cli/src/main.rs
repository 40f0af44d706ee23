//! CLI tool for converting a sectioned HTML presentation to PowerPoint.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{Canvas, Error, LayoutEngine};
use deck_html::ContentExtractor;
use deck_pptx::DeckWriter;
use std::path::{Path, PathBuf};

/// Convert an HTML presentation (one `<section>` per slide) to a .pptx file.
#[derive(Parser, Debug)]
#[command(name = "html2pptx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input HTML file
    input: PathBuf,

    /// Output PowerPoint file (overwritten if it exists)
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let total = convert(&args.input, &args.output)?;

    println!("\nPowerPoint file saved: {}", args.output.display());
    println!("Total slides created: {}", total);

    Ok(())
}

/// Run the whole pipeline, returning the number of slides written.
fn convert(input: &Path, output: &Path) -> Result<usize> {
    let html = std::fs::read_to_string(input).map_err(|e| Error::from_input_io(input, e))?;

    let extractor = ContentExtractor::new();
    let slides = extractor
        .extract_document(&html)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    println!("Found {} slides", slides.len());

    let canvas = Canvas::widescreen();
    let engine = LayoutEngine::new(canvas);
    let mut deck = DeckWriter::new(canvas);
    if let Some(stem) = input.file_stem().and_then(|s| s.to_str()) {
        deck = deck.with_title(stem);
    }

    for (idx, slide) in slides.iter().enumerate() {
        println!("Processing slide {}...", idx + 1);

        let layout = engine.layout(slide);
        if layout.dropped > 0 {
            log::warn!(
                "Slide {}: {} of {} blocks did not fit and were left out",
                idx + 1,
                layout.dropped,
                slide.blocks.len()
            );
        }
        deck.add_slide(&layout.boxes)
            .with_context(|| format!("Failed to render slide {}", idx + 1))?;
    }

    deck.save(output)?;

    Ok(deck.slide_count())
}
