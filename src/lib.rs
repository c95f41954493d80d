//! Docreel compiles a Markdown tutorial into a paginated PDF and an animated MP4 slide deck.
//!
//! The pipeline is:
//!
//! - Parse the document into a typed [`Slide`] deck ([`document`])
//! - Time every slide's entry, hold and dim phases ([`animation`])
//! - Render each (slide, phase) pair to HTML and rasterize it through a [`RenderEngine`], one
//!   browser session for the whole run
//! - Encode frames or per-slide clips with ffmpeg and concatenate them ([`assemble`], [`encode`])
//!
//! [`export_pdf`] and [`export_video`] run the whole thing from an [`ExportConfig`].
#![forbid(unsafe_code)]

pub mod animation;
pub mod assemble;
pub mod capture;
pub mod config;
pub mod document;
pub mod encode;
pub mod engine;
pub mod export;
pub mod foundation;
pub mod render;

pub use crate::foundation::core::{Fps, FrameIndex, Resolution};
pub use crate::foundation::error::{DocreelError, DocreelResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::timing::{Transition, TransitionKind, estimate_duration};
pub use crate::assemble::{CaptureAction, Scene, SceneContext, ScriptedAction, load_scenes};
pub use crate::capture::Progress;
pub use crate::config::{ExportConfig, VideoConfig, VideoMode};
pub use crate::document::parser::{ParseOptions, parse, parse_file, parse_with};
pub use crate::document::slide::{Slide, SlideBody, SlideKind};
pub use crate::encode::EncoderLocator;
pub use crate::engine::{ChromiumEngine, LivePage, RecordingSession, RenderEngine};
pub use crate::export::{ExportReport, export_pdf, export_video, load_deck};
pub use crate::render::ThemeSelector;
