use super::*;
use crate::document::slide::SlideKind;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_parser").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn kinds(slides: &[Slide]) -> Vec<SlideKind> {
    slides.iter().filter_map(Slide::kind).collect()
}

#[test]
fn index_block_is_skipped_and_toc_is_generated() {
    let md = "# T\n## Índice\n- a\n## 1. Intro\n### 1.1 Sub\nHello world";
    let slides = parse(md, Path::new("no-images"), 6.0);

    assert_eq!(
        kinds(&slides),
        vec![
            SlideKind::Toc,
            SlideKind::SectionTitle,
            SlideKind::Content,
            SlideKind::Closing
        ]
    );
    assert_eq!(
        slides[0].body,
        SlideBody::Toc {
            items: vec!["1. Intro".to_string()]
        }
    );
    assert_eq!(slides[1].title, "1. Intro");
    assert_eq!(
        slides[1].body,
        SlideBody::SectionTitle {
            section_number: "1".to_string()
        }
    );
    let content = slides[2].as_content().unwrap();
    assert_eq!(slides[2].title, "1.1 Sub");
    assert_eq!(slides[2].duration, 6.0);
    assert_eq!(content.prose, "Hello world");
    assert_eq!(content.parent_section, "1. Intro");
}

#[test]
fn nested_headings_inside_index_are_ignored() {
    let md = "## Contents\n### 1.1 Not a slide\n- x\n## Setup\n### Install\nRun it.";
    let slides = parse(md, Path::new("no-images"), 6.0);
    let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Contents", "Setup", "Install", "Thank you"]);
}

#[test]
fn subtitle_heading_is_dropped_without_ending_subsection() {
    let md = "## Subtítulo: a guide\n## A\n### B\ntext";
    let slides = parse(md, Path::new("no-images"), 6.0);
    assert_eq!(
        kinds(&slides),
        vec![
            SlideKind::Toc,
            SlideKind::SectionTitle,
            SlideKind::Content,
            SlideKind::Closing
        ]
    );
}

#[test]
fn section_named_like_the_subtitle_marker_keeps_its_subsections() {
    let md = "## 1. Intro\n### 1.1 Setup\n## Subtitles and captions\n### 2.1 Burn-in\ntext";
    let slides = parse(md, Path::new("no-images"), 6.0);
    let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Contents",
            "1. Intro",
            "1.1 Setup",
            "Subtitles and captions",
            "2.1 Burn-in",
            "Thank you"
        ]
    );
    let burn_in = slides[4].as_content().unwrap();
    assert_eq!(burn_in.parent_section, "Subtitles and captions");
}

#[test]
fn empty_subsection_round_trip() {
    let slides = parse("## S\n### Sub", Path::new("no-images"), 6.0);
    assert_eq!(slides[1].kind(), Some(SlideKind::SectionTitle));
    let content = slides[2].as_content().unwrap();
    assert!(content.bullets.is_empty());
    assert!(content.steps.is_empty());
    assert!(content.prose.is_empty());
    assert!(content.images.is_empty());
}

#[test]
fn lists_and_metadata_are_extracted() {
    let md = "## S\n### Sub\n**Versión:** 2.0\n---\nIntro text.\n- one\n* two\n1. first\n2. second\n";
    let slides = parse(md, Path::new("no-images"), 6.0);
    let content = slides[2].as_content().unwrap();
    assert_eq!(content.bullets, vec!["one", "two"]);
    assert_eq!(content.steps, vec!["first", "second"]);
    assert_eq!(content.prose, "Intro text.");
    assert!(!content.text.contains("Versión"));
    assert!(!content.text.contains("---"));
}

#[test]
fn list_markers_inside_code_are_not_bullets() {
    let md = "## S\n### Sub\n```yaml\n- name: x\n```\n- real";
    let slides = parse(md, Path::new("no-images"), 6.0);
    assert_eq!(slides[2].as_content().unwrap().bullets, vec!["real"]);
}

#[test]
fn body_text_before_first_subsection_is_dropped() {
    let slides = parse("## S\nloose text\n### Sub\nkept", Path::new("no-images"), 6.0);
    assert_eq!(slides[2].as_content().unwrap().prose, "kept");
}

#[test]
fn image_bonus_applies_above_one_image() {
    let dir = scratch("image_bonus");
    std::fs::write(dir.join("a.png"), b"png").unwrap();
    std::fs::write(dir.join("b.png"), b"png").unwrap();

    let one = parse("## S\n### One\n![a](a.png)\n![gone](zzz.png)", &dir, 6.0);
    assert_eq!(one[2].duration, 6.0);
    assert_eq!(one[2].as_content().unwrap().images.len(), 1);

    let two = parse("## S\n### Two\n![a](a.png) ![b](b.png)", &dir, 6.0);
    assert_eq!(two[2].duration, 6.0 + MULTI_IMAGE_BONUS_SECS);
    assert!(!two[2].as_content().unwrap().text.contains("!["));
}

#[test]
fn cover_comes_first_and_uses_document_title_fallback() {
    let opts = ParseOptions::new("no-images").with_cover(Some(CoverMeta {
        footer: "ACME".to_string(),
        date: Some("01/02/2026".to_string()),
        ..CoverMeta::default()
    }));
    let slides = parse_with("# Guide\n## A\n### B", &opts);
    assert_eq!(slides[0].kind(), Some(SlideKind::Cover));
    assert_eq!(slides[0].title, "Guide");
    assert_eq!(slides[1].kind(), Some(SlideKind::Toc));
    match &slides[0].body {
        SlideBody::Cover(c) => assert_eq!(c.date, "01/02/2026"),
        other => panic!("unexpected body {other:?}"),
    }
    match &slides.last().unwrap().body {
        SlideBody::Closing { footer, .. } => assert_eq!(footer, "ACME"),
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn cover_date_defaults_to_today() {
    let opts = ParseOptions::new("no-images").with_cover(Some(CoverMeta::default()));
    let slides = parse_with("## A", &opts);
    match &slides[0].body {
        SlideBody::Cover(c) => assert_eq!(c.date, today()),
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn no_sections_means_no_toc() {
    let slides = parse("just text\n### Orphan\nbody", Path::new("no-images"), 6.0);
    assert_eq!(kinds(&slides), vec![SlideKind::Content, SlideKind::Closing]);
    assert_eq!(slides[0].as_content().unwrap().parent_section, "");
}

#[test]
fn toc_lists_every_section_in_order() {
    let md = "## 1. A\n### a\n## 2. B\n## 3. C\n### c";
    let slides = parse(md, Path::new("no-images"), 6.0);
    let tocs: Vec<&Slide> = slides
        .iter()
        .filter(|s| s.kind() == Some(SlideKind::Toc))
        .collect();
    assert_eq!(tocs.len(), 1);
    assert_eq!(
        tocs[0].body,
        SlideBody::Toc {
            items: vec!["1. A".into(), "2. B".into(), "3. C".into()]
        }
    );
}

#[test]
fn missing_file_is_fatal() {
    let err = parse_file(Path::new("target/definitely/missing.md"), &ParseOptions::new("x"))
        .unwrap_err();
    assert!(err.to_string().contains("parse error:"));
}
