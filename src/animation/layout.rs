//! Staggered reveal of slide elements as a function of phase.
//!
//! Every element owns a reveal window inside `[0, 0.8]`; its local progress is the phase's
//! position inside that window, clamped to `[0, 1]`. Windows start later for elements further
//! along the reading order, so a slide assembles top-to-bottom and left-to-right. Everything is
//! fully revealed before the dim band, where only the stage fades.

/// Latest phase at which any element window may still be opening.
const LAST_WINDOW_START: f64 = 0.55;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// The whole slide surface; its opacity tracks the phase directly.
    Stage,
    Logo,
    /// Section number, badges, the parent-section label.
    Accent,
    Title,
    Subtitle,
    Meta,
    Prose,
    /// The `n`th list entry.
    Item(usize),
    /// The `n`th image.
    Image(usize),
    Footer,
}

/// Visual state of one element at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementLayout {
    pub opacity: f64,
    /// Pixels.
    pub offset_x: f64,
    /// Pixels.
    pub offset_y: f64,
    pub scale: f64,
}

impl ElementLayout {
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Inline CSS declarations for this layout.
    pub fn to_css(self) -> String {
        format!(
            "opacity:{:.3};transform:translate({:.1}px,{:.1}px) scale({:.3});",
            self.opacity, self.offset_x, self.offset_y, self.scale
        )
    }
}

/// `(start, span)` of an element's reveal window.
fn window(kind: ElementKind) -> (f64, f64) {
    match kind {
        ElementKind::Stage => (0.0, 1.0),
        ElementKind::Logo => (0.0, 0.3),
        ElementKind::Accent => (0.05, 0.3),
        ElementKind::Title => (0.0, 0.35),
        ElementKind::Subtitle => (0.15, 0.35),
        ElementKind::Meta => (0.3, 0.35),
        ElementKind::Prose => (0.3, 0.3),
        ElementKind::Item(n) => ((0.25 + 0.06 * n as f64).min(LAST_WINDOW_START), 0.25),
        ElementKind::Image(n) => ((0.35 + 0.1 * n as f64).min(LAST_WINDOW_START), 0.25),
        ElementKind::Footer => (0.5, 0.3),
    }
}

/// Progress of `kind` through its own reveal window at `phase`.
pub fn reveal(kind: ElementKind, phase: f64) -> f64 {
    let (start, span) = window(kind);
    ((phase - start) / span).clamp(0.0, 1.0)
}

/// Opacity, offset and scale of `kind` at `phase`.
pub fn layout_for(kind: ElementKind, phase: f64) -> ElementLayout {
    let local = reveal(kind, phase);
    let hidden = 1.0 - local;
    match kind {
        ElementKind::Stage => ElementLayout {
            opacity: local,
            ..ElementLayout::VISIBLE
        },
        ElementKind::Item(_) => ElementLayout {
            opacity: local,
            offset_x: -32.0 * hidden,
            offset_y: 0.0,
            scale: 1.0,
        },
        ElementKind::Image(_) | ElementKind::Logo => ElementLayout {
            opacity: local,
            offset_x: 0.0,
            offset_y: 16.0 * hidden,
            scale: 0.94 + 0.06 * local,
        },
        _ => ElementLayout {
            opacity: local,
            offset_x: 0.0,
            offset_y: 24.0 * hidden,
            scale: 1.0,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/layout.rs"]
mod tests;
