use super::*;

#[test]
fn explicit_path_must_exist() {
    let err = EncoderLocator::resolve(Some(Path::new("target/unit_locator/missing-ffmpeg")))
        .unwrap_err()
        .to_string();
    assert!(err.starts_with("validation error:"));
    assert!(err.contains("missing-ffmpeg"));
}

#[test]
fn explicit_path_wins() {
    let dir = PathBuf::from("target").join("unit_locator");
    std::fs::create_dir_all(&dir).unwrap();
    let fake = dir.join("my-ffmpeg");
    std::fs::write(&fake, b"").unwrap();

    let loc = EncoderLocator::resolve(Some(&fake)).unwrap();
    assert_eq!(loc.binary(), fake.as_path());
    assert_eq!(loc.source(), EncoderSource::Explicit);
}

#[test]
fn check_reports_unrunnable_binary() {
    let loc = EncoderLocator::at("target/unit_locator/not-a-binary");
    assert!(loc.check().is_err());
}

#[test]
fn bundled_candidates_sit_next_to_the_executable() {
    let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
    let candidates = bundled_candidates();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|c| c.starts_with(&exe_dir)));
}
