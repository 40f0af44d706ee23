//! Core domain types, text normalization, and slide layout for
//! HTML to PowerPoint conversion.

pub mod error;
pub mod layout;
pub mod normalize;
pub mod types;

pub use error::{Error, Result};
pub use layout::{BlockStyle, LayoutEngine, SlideLayout};
pub use normalize::TextNormalizer;
pub use types::{
    BoxKind, Canvas, ContentBlock, Emu, LayoutBox, Rgb, SlideContent, Title, TitleTier,
    EMU_PER_INCH,
};
