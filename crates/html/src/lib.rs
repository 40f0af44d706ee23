//! HTML front end: parses a sectioned HTML presentation and extracts the
//! content of each slide.

pub mod dom;
pub mod extract;

pub use dom::{Document, Element};
pub use extract::{ContentExtractor, TABLE_NOTICE_TEXT};
