use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_frames").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn indices_increase_without_gaps() {
    let mut frames = FrameDir::create(scratch("order")).unwrap();
    for expected in 0..4 {
        let idx = frames
            .push_with(None, |p| Ok(std::fs::write(p, b"x")?))
            .unwrap();
        assert_eq!(idx, FrameIndex(expected));
    }
    assert_eq!(frames.len(), 4);
    assert!(frames.dir().join("frame_000003.png").is_file());
    assert!(frames.pattern().ends_with("frame_%06d.png"));
}

#[test]
fn repeated_key_copies_previous_frame() {
    let mut frames = FrameDir::create(scratch("dedupe")).unwrap();
    let mut writes = 0;
    for _ in 0..3 {
        frames
            .push_with(Some(7), |p| {
                writes += 1;
                Ok(std::fs::write(p, b"same")?)
            })
            .unwrap();
    }
    frames
        .push_with(Some(8), |p| {
            writes += 1;
            Ok(std::fs::write(p, b"other")?)
        })
        .unwrap();
    assert_eq!(writes, 2);
    assert_eq!(std::fs::read(frames.dir().join("frame_000002.png")).unwrap(), b"same");
}

#[test]
fn failed_write_does_not_consume_an_index() {
    let mut frames = FrameDir::create(scratch("failure")).unwrap();
    let err = frames.push_with(None, |_| Err(DocreelError::render("engine gone")));
    assert!(err.is_err());
    assert!(frames.is_empty());
}

#[test]
fn refuses_a_dir_that_already_has_frames() {
    let dir = scratch("stale");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("frame_000000.png"), b"old").unwrap();
    assert!(FrameDir::create(&dir).is_err());
}

#[test]
fn black_png_has_requested_size() {
    let dir = scratch("black");
    std::fs::create_dir_all(&dir).unwrap();
    let p = dir.join("black.png");
    write_black_png(&p, Resolution { width: 64, height: 36 }).unwrap();
    let img = image::open(&p).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (64, 36));
    assert!(img.pixels().all(|px| px.0 == [0, 0, 0]));
}
