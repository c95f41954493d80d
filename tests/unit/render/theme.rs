use super::*;

#[test]
fn builtin_themes_resolve_for_both_targets() {
    for name in builtin_names() {
        let slides = ThemeSelector::Builtin(name.to_string())
            .stylesheet(StyleTarget::Slides)
            .unwrap();
        assert!(slides.contains("--accent"));
        assert!(slides.contains(".stage"));
        let print = ThemeSelector::Builtin(name.to_string())
            .stylesheet(StyleTarget::Print)
            .unwrap();
        assert!(print.contains(".cover-page"));
    }
}

#[test]
fn builtin_lookup_is_case_insensitive() {
    assert!(BuiltinThemes.resolve("DARK", StyleTarget::Slides).is_ok());
}

#[test]
fn unknown_builtin_lists_alternatives() {
    let err = BuiltinThemes
        .resolve("neon", StyleTarget::Slides)
        .unwrap_err()
        .to_string();
    assert!(err.contains("neon"));
    assert!(err.contains("default"));
}

#[test]
fn file_stylesheet_layers_over_default() {
    let dir = PathBuf::from("target").join("unit_theme");
    std::fs::create_dir_all(&dir).unwrap();
    let css = dir.join("brand.css");
    std::fs::write(&css, ".stage { background: hotpink; }").unwrap();

    let out = ThemeSelector::File(css).stylesheet(StyleTarget::Slides).unwrap();
    let base_at = out.find(".stage {").unwrap();
    let extra_at = out.find("hotpink").unwrap();
    assert!(base_at < extra_at);
}

#[test]
fn missing_file_stylesheet_is_an_error() {
    let sel = ThemeSelector::File(PathBuf::from("target/nope/missing.css"));
    assert!(sel.stylesheet(StyleTarget::Print).is_err());
}

#[test]
fn selector_parse_distinguishes_paths() {
    assert_eq!(ThemeSelector::parse("dark"), ThemeSelector::Builtin("dark".into()));
    assert_eq!(
        ThemeSelector::parse("brand.css"),
        ThemeSelector::File(PathBuf::from("brand.css"))
    );
    assert_eq!(
        ThemeSelector::parse("themes/x"),
        ThemeSelector::File(PathBuf::from("themes/x"))
    );
}
