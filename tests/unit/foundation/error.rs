use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DocreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DocreelError::parse("x").to_string().contains("parse error:"));
    assert!(DocreelError::render("x").to_string().contains("render error:"));
    assert!(DocreelError::encode("x").to_string().contains("encode error:"));
    assert!(
        DocreelError::recording("x")
            .to_string()
            .contains("recording error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DocreelError::from(base);
    assert!(err.to_string().contains("boom"));
}

#[test]
fn encode_without_status_has_none() {
    match DocreelError::encode("missing binary") {
        DocreelError::Encode { status, message } => {
            assert!(status.is_none());
            assert_eq!(message, "missing binary");
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}
