//! PPTX (Office Open XML) backend: renders laid-out slides, writes them as
//! a presentation package, and reads written decks back.

pub mod package;
pub mod reader;
pub mod render;
pub mod writer;

pub use reader::{DeckReader, ReadSlide, ShapeText};
pub use render::SlideRenderer;
pub use writer::DeckWriter;
