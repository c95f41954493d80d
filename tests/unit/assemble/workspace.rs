use super::*;

#[test]
fn lives_beside_the_output() {
    assert_eq!(
        Workspace::path_for(Path::new("/out/demo.mp4")),
        PathBuf::from("/out/.demo.docreel")
    );
    assert_eq!(
        Workspace::path_for(Path::new("demo.mp4")),
        PathBuf::from(".demo.docreel")
    );
}

#[test]
fn prepare_clears_leftovers_and_finish_removes() {
    let out = PathBuf::from("target").join("unit_workspace").join("video.mp4");
    let stale = Workspace::path_for(&out).join("frames");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("frame_000000.png"), b"old").unwrap();

    let ws = Workspace::prepare(&out).unwrap();
    assert!(ws.root().is_dir());
    assert!(!ws.frames_dir().exists());
    assert!(ws.clip_path(3).ends_with("clips/clip_0003.mp4"));
    assert!(ws.still_path(0).ends_with("stills/still_0000.png"));
    assert!(ws.recording_dir(1).ends_with("recording_0001"));

    let root = ws.root().to_path_buf();
    ws.finish().unwrap();
    assert!(!root.exists());
}
