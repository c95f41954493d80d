use super::*;
use crate::document::slide::{ImageRef, MetaEntry};
use std::path::PathBuf;

fn content_slide(content: ContentSlide) -> Slide {
    Slide {
        title: "1.1 Setup".to_string(),
        duration: 8.0,
        body: SlideBody::Content(content),
    }
}

fn res() -> Resolution {
    Resolution {
        width: 1280,
        height: 720,
    }
}

#[test]
fn document_is_self_contained_and_sized() {
    let slide = content_slide(ContentSlide::default());
    let doc = render(&slide, 1.0, ".stage{}", res());
    assert!(doc.html.starts_with("<!DOCTYPE html>"));
    assert!(doc.html.contains("width: 1280px; height: 720px;"));
    assert!(doc.html.contains(".stage{}"));
    assert!(!doc.html.contains("file://"));
}

#[test]
fn steps_take_precedence_over_bullets() {
    let slide = content_slide(ContentSlide {
        bullets: vec!["bullet a".into()],
        steps: vec!["step one".into(), "step two".into()],
        ..ContentSlide::default()
    });
    let html = render(&slide, 1.0, "", res()).html;
    assert!(html.contains("<ol>"));
    assert!(html.contains("step two"));
    assert!(!html.contains("bullet a"));
}

#[test]
fn stage_opacity_tracks_phase() {
    let slide = content_slide(ContentSlide::default());
    let html = render(&slide, 0.85, "", res()).html;
    assert!(html.contains("class=\"stage content no-media\" style=\"opacity:0.850;\""));
}

#[test]
fn elements_are_hidden_at_phase_zero_and_visible_at_one() {
    let slide = content_slide(ContentSlide {
        prose: "Hello world".into(),
        ..ContentSlide::default()
    });
    let start = render(&slide, 0.0, "", res()).html;
    assert!(start.contains("opacity:0.000;"));
    let end = render(&slide, 1.0, "", res()).html;
    assert!(!end.contains("class=\"el title\" style=\"opacity:0.000"));
    assert!(end.contains("class=\"el prose\" style=\"opacity:1.000;"));
}

#[test]
fn text_is_escaped_and_inline_markup_translated() {
    let slide = content_slide(ContentSlide {
        bullets: vec!["run `a < b` **now**".into()],
        ..ContentSlide::default()
    });
    let html = render(&slide, 1.0, "", res()).html;
    assert!(html.contains("run <code>a &lt; b</code> <strong>now</strong>"));
}

#[test]
fn images_are_inlined_and_missing_ones_skipped() {
    let dir = PathBuf::from("target").join("unit_html");
    std::fs::create_dir_all(&dir).unwrap();
    let present = dir.join("shot.png");
    std::fs::write(&present, b"png").unwrap();

    let slide = content_slide(ContentSlide {
        images: vec![
            ImageRef {
                alt: "shot".into(),
                path: present,
            },
            ImageRef {
                alt: "gone".into(),
                path: dir.join("gone.png"),
            },
        ],
        ..ContentSlide::default()
    });
    let mut renderer = SlideRenderer::new("", res());
    let html = renderer.render(&slide, 1.0).html;
    assert!(html.contains("src=\"data:image/png;base64,cG5n\""));
    assert!(!html.contains("alt=\"gone\""));
}

#[test]
fn cover_shows_badges_meta_and_footer() {
    let slide = Slide {
        title: "Guide".into(),
        duration: 5.0,
        body: SlideBody::Cover(CoverSlide {
            subtitle: "For admins".into(),
            version: "v2".into(),
            classification: "Internal".into(),
            footer: "ACME".into(),
            date: "01/02/2026".into(),
            meta: vec![MetaEntry {
                label: "Owner".into(),
                value: "Ops".into(),
            }],
            ..CoverSlide::default()
        }),
    };
    let html = render(&slide, 1.0, "", res()).html;
    for needle in ["For admins", "v2", "Internal", "<th>Owner</th>", "ACME", "01/02/2026"] {
        assert!(html.contains(needle), "missing {needle}");
    }
}

#[test]
fn section_number_shown_when_present() {
    let slide = Slide {
        title: "3. Deploy".into(),
        duration: 4.0,
        body: SlideBody::SectionTitle {
            section_number: "3".into(),
        },
    };
    let html = render(&slide, 1.0, "", res()).html;
    assert!(html.contains("class=\"el number\""));
    assert!(html.contains(">3</div>"));
}

#[test]
fn unsupported_slide_renders_placeholder() {
    let slide = Slide {
        title: "Mystery".into(),
        duration: 3.0,
        body: SlideBody::Unsupported {
            kind: "chart".into(),
        },
    };
    let html = render(&slide, 0.5, "", res()).html;
    assert!(html.contains("stage placeholder"));
    assert!(html.contains("Unsupported slide type: <code>chart</code>"));
}

#[test]
fn out_of_range_phase_is_clamped() {
    let slide = content_slide(ContentSlide::default());
    assert_eq!(
        render(&slide, 7.0, "", res()),
        render(&slide, 1.0, "", res())
    );
}
