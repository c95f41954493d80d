//! Markdown tutorial to slide model.
//!
//! The parser is a line-classification state machine: it never fails on malformed input,
//! it only produces fewer or emptier slides.

pub mod images;
pub mod lines;
pub mod parser;
pub mod slide;
pub mod text;
