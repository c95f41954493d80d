use super::*;

fn classify_all(src: &str) -> Vec<LineClass<'_>> {
    let mut c = LineClassifier::default();
    src.lines().map(|l| c.classify(l)).collect()
}

#[test]
fn heading_levels() {
    assert_eq!(
        classify_all("# T\n## 1. Intro\n### 1.1 Sub\n#### deep\nbody"),
        vec![
            LineClass::Title("T"),
            LineClass::Section("1. Intro"),
            LineClass::Subsection("1.1 Sub"),
            LineClass::Text("#### deep"),
            LineClass::Text("body"),
        ]
    );
}

#[test]
fn index_markers_are_accent_and_case_insensitive() {
    assert_eq!(
        classify_all("## Índice\n## INDICE\n## Table of Contents\n## Indices"),
        vec![
            LineClass::IndexHeading,
            LineClass::IndexHeading,
            LineClass::IndexHeading,
            LineClass::Section("Indices"),
        ]
    );
}

#[test]
fn subtitle_marker_matches_prefix() {
    assert_eq!(
        classify_all("## Subtítulo: guía rápida"),
        vec![LineClass::SubtitleHeading]
    );
}

#[test]
fn words_starting_with_the_subtitle_marker_are_sections() {
    assert_eq!(
        classify_all("## Subtitle\n## Subtitles and captions\n## Subtitulos"),
        vec![
            LineClass::SubtitleHeading,
            LineClass::Section("Subtitles and captions"),
            LineClass::Section("Subtitulos"),
        ]
    );
}

#[test]
fn hashes_inside_code_fences_are_text() {
    let got = classify_all("```bash\n# install\n```\n# Real");
    assert_eq!(got[1], LineClass::Text("# install"));
    assert_eq!(got[3], LineClass::Title("Real"));
}

#[test]
fn hashtag_without_space_is_text() {
    assert_eq!(classify_all("#hashtag"), vec![LineClass::Text("#hashtag")]);
}

#[test]
fn closing_hashes_are_trimmed() {
    assert_eq!(classify_all("## Setup ##"), vec![LineClass::Section("Setup")]);
}

#[test]
fn fence_state_is_visible_between_lines() {
    let mut c = LineClassifier::default();
    c.classify("```");
    assert!(c.in_fence());
    c.classify("![x](a.png)");
    assert!(c.in_fence());
    c.classify("```");
    assert!(!c.in_fence());
}
