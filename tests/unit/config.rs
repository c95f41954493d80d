use super::*;

#[test]
fn empty_json_uses_defaults() {
    let cfg = ExportConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg.input, PathBuf::from("tutorial.md"));
    assert!(cfg.video.is_none());
    assert_eq!(cfg.theme, ThemeSelector::default());
    assert!(cfg.validate().is_ok());
}

#[test]
fn video_section_fills_missing_fields() {
    let cfg = ExportConfig::from_reader(
        r#"{ "video": { "fps": 24, "transition": { "kind": "fade_black" } } }"#.as_bytes(),
    )
    .unwrap();
    let video = cfg.video.unwrap();
    assert_eq!(video.fps, 24);
    assert_eq!(video.resolution, Resolution::default());
    assert_eq!(video.transition.kind, TransitionKind::FadeBlack);
    assert_eq!(video.transition.duration, 0.5);
    assert_eq!(video.mode, VideoMode::Animated);
}

#[test]
fn validation_catches_bad_video_values() {
    let mut video = VideoConfig::default();
    video.fps = 0;
    assert!(video.validate().is_err());

    let mut video = VideoConfig::default();
    video.resolution.width = 1921;
    assert!(video.validate().is_err());

    let mut video = VideoConfig::default();
    video.durations.content = 0.0;
    assert!(video.validate().is_err());

    let mut video = VideoConfig::default();
    video.transition.duration = -1.0;
    assert!(video.validate().is_err());

    let mut video = VideoConfig::default();
    video.mode = VideoMode::Hybrid;
    assert!(video.validate().is_err());
    video.scenes = Some(PathBuf::from("scenes.json"));
    assert!(video.validate().is_ok());
}

#[test]
fn relative_paths_resolve_against_base() {
    let mut cfg = ExportConfig::from_reader(
        r#"{
            "input": "docs/guide.md",
            "images_dir": "/abs/images",
            "theme": { "file": "brand.css" },
            "video": { "audio": "music.mp3" }
        }"#
        .as_bytes(),
    )
    .unwrap();
    cfg.resolve_paths(Path::new("/project"));
    assert_eq!(cfg.input, PathBuf::from("/project/docs/guide.md"));
    assert_eq!(cfg.images_dir, PathBuf::from("/abs/images"));
    assert_eq!(cfg.theme, ThemeSelector::File(PathBuf::from("/project/brand.css")));
    assert_eq!(
        cfg.video.unwrap().audio,
        Some(PathBuf::from("/project/music.mp3"))
    );
}

#[test]
fn unknown_mode_is_rejected() {
    let err = ExportConfig::from_reader(r#"{ "video": { "mode": "3d" } }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}
