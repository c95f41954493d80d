use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::whole(30).is_ok());
}

#[test]
fn secs_to_frames_rounds_up_partial_frames() {
    let fps = Fps::whole(30).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(0.5), 15);
    assert_eq!(fps.secs_to_frames_ceil(0.51), 16);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
    assert_eq!(fps.secs_to_frames_ceil(-2.0), 0);
}

#[test]
fn secs_to_frames_ignores_float_noise() {
    let fps = Fps::whole(30).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(0.1 + 0.2), 9);
}

#[test]
fn fractional_fps_arg() {
    assert_eq!(Fps::new(30000, 1001).unwrap().ffmpeg_arg(), "30000/1001");
    assert_eq!(Fps::whole(25).unwrap().ffmpeg_arg(), "25");
}

#[test]
fn resolution_must_be_even_and_non_zero() {
    assert!(Resolution::default().validate().is_ok());
    assert!(
        Resolution {
            width: 0,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert!(
        Resolution {
            width: 11,
            height: 10
        }
        .validate()
        .is_err()
    );
    assert_eq!(Resolution::default().to_arg('x'), "1920x1080");
}

#[test]
fn frame_index_next_increments() {
    assert_eq!(FrameIndex(4).next(), FrameIndex(5));
}
