use std::path::PathBuf;

/// Discriminant of a [`Slide`], matching the `type` tag in serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    Cover,
    Toc,
    SectionTitle,
    Content,
    Closing,
}

/// One discrete unit of the deck.
///
/// Slides are built once per export run and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Slide {
    /// Display title; may contain line breaks.
    pub title: String,
    /// Screen time in seconds, always `> 0`.
    pub duration: f64,
    #[serde(flatten)]
    pub body: SlideBody,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlideBody {
    Cover(CoverSlide),
    Toc {
        items: Vec<String>,
    },
    SectionTitle {
        section_number: String,
    },
    Content(ContentSlide),
    Closing {
        subtitle: String,
        footer: String,
    },
    /// A slide recipe whose type this build does not know; rendered as a placeholder.
    Unsupported {
        kind: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct CoverSlide {
    pub subtitle: String,
    pub logo: Option<ImageRef>,
    pub version: String,
    pub classification: String,
    pub footer: String,
    /// Always populated: the configured date or the date of the export run.
    pub date: String,
    pub meta: Vec<MetaEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetaEntry {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ContentSlide {
    /// Title of the enclosing section, empty when the subsection precedes any section.
    pub parent_section: String,
    /// Body with image markup, metadata lines and rules stripped.
    pub text: String,
    /// Flattened prose, at most 200 characters plus an ellipsis marker.
    pub prose: String,
    pub bullets: Vec<String>,
    pub steps: Vec<String>,
    pub images: Vec<ImageRef>,
}

impl ContentSlide {
    /// List shown on screen: numbered steps win over bullets.
    pub fn display_list(&self) -> DisplayList<'_> {
        if !self.steps.is_empty() {
            DisplayList::Steps(&self.steps)
        } else if !self.bullets.is_empty() {
            DisplayList::Bullets(&self.bullets)
        } else {
            DisplayList::None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DisplayList<'a> {
    Steps(&'a [String]),
    Bullets(&'a [String]),
    None,
}

/// An image reference that resolved to an existing file at parse time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ImageRef {
    pub alt: String,
    pub path: PathBuf,
}

impl Slide {
    pub fn kind(&self) -> Option<SlideKind> {
        match &self.body {
            SlideBody::Cover(_) => Some(SlideKind::Cover),
            SlideBody::Toc { .. } => Some(SlideKind::Toc),
            SlideBody::SectionTitle { .. } => Some(SlideKind::SectionTitle),
            SlideBody::Content(_) => Some(SlideKind::Content),
            SlideBody::Closing { .. } => Some(SlideKind::Closing),
            SlideBody::Unsupported { .. } => None,
        }
    }

    pub fn is_section_title(&self) -> bool {
        matches!(self.body, SlideBody::SectionTitle { .. })
    }

    pub fn as_content(&self) -> Option<&ContentSlide> {
        match &self.body {
            SlideBody::Content(c) => Some(c),
            _ => None,
        }
    }
}
