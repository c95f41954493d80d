//! Slide documents: markup, styling and inlined media.

pub mod html;
pub mod inline;
pub mod media;
pub mod theme;

pub use html::{SlideDocument, SlideRenderer, render};
pub use theme::{StyleTarget, StylesheetProvider, ThemeSelector};
