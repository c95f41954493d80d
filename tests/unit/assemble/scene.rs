use super::*;
use crate::foundation::core::Resolution;

fn ctx() -> SceneContext {
    SceneContext {
        durations: SlideDurations::default(),
        images_dir: PathBuf::from("target/unit_scene/images"),
        app_url: Some("http://localhost:3000/".to_string()),
    }
}

/// Records the calls a capture action makes.
#[derive(Default)]
struct LogSession {
    calls: Vec<String>,
}

impl RecordingSession for LogSession {
    fn viewport(&self) -> Resolution {
        Resolution::default()
    }

    fn goto(&mut self, url: &str) -> DocreelResult<()> {
        self.calls.push(format!("goto {url}"));
        Ok(())
    }

    fn move_cursor(&mut self, x: f64, y: f64, secs: f64) -> DocreelResult<()> {
        self.calls.push(format!("move {x} {y} {secs}"));
        Ok(())
    }

    fn click(&mut self, x: f64, y: f64) -> DocreelResult<()> {
        self.calls.push(format!("click {x} {y}"));
        Ok(())
    }

    fn hold(&mut self, secs: f64) -> DocreelResult<()> {
        self.calls.push(format!("hold {secs}"));
        Ok(())
    }
}

#[test]
fn parses_both_scene_kinds_in_order() {
    let json = r#"[
        {"type": "slide", "duration": 3.5, "slide": {"type": "section-title", "title": "2. Billing"}},
        {"type": "recording", "name": "invoice", "description": "Create one",
         "actions": [{"goto": "/invoices"}, {"wait": 1.0}, {"click": {"x": 10, "y": 20}}]}
    ]"#;
    let scenes = parse_scenes(json, &ctx()).unwrap();
    assert_eq!(scenes.len(), 2);

    let Scene::Slide(slide) = &scenes[0] else {
        panic!("expected slide scene");
    };
    assert_eq!(slide.duration, 3.5);
    assert_eq!(
        slide.body,
        SlideBody::SectionTitle {
            section_number: "2".into()
        }
    );

    let Scene::Recording(rec) = &scenes[1] else {
        panic!("expected recording scene");
    };
    assert_eq!(rec.name, "invoice");
    assert_eq!(scenes[1].label(), "invoice");

    let mut session = LogSession::default();
    rec.action.run(&mut session).unwrap();
    assert_eq!(
        session.calls,
        [
            "goto http://localhost:3000/invoices",
            "hold 1",
            "click 10 20"
        ]
    );
}

#[test]
fn wrapped_form_and_move_defaults() {
    let json = r#"{"scenes": [{"type": "recording", "name": "m",
        "actions": [{"goto": "https://example.org"}, {"move": {"x": 1, "y": 2}}]}]}"#;
    let scenes = parse_scenes(json, &ctx()).unwrap();
    let Scene::Recording(rec) = &scenes[0] else {
        panic!("expected recording scene");
    };
    let mut session = LogSession::default();
    rec.action.run(&mut session).unwrap();
    assert_eq!(session.calls, ["goto https://example.org", "move 1 2 0.6"]);
}

#[test]
fn slide_duration_falls_back_to_type_default() {
    let recipe = SlideRecipe {
        kind: "closing".into(),
        title: "Bye".into(),
        ..SlideRecipe::default()
    };
    assert_eq!(recipe.build(None, &ctx()).duration, 5.0);
    assert_eq!(recipe.build(Some(-1.0), &ctx()).duration, 5.0);
    assert_eq!(recipe.build(Some(2.0), &ctx()).duration, 2.0);
}

#[test]
fn content_recipe_derives_prose_and_drops_missing_images() {
    let recipe = SlideRecipe {
        kind: "content".into(),
        title: "Setup".into(),
        text: "Install   the tool.\n- a bullet".into(),
        images: vec![ImageSpec {
            alt: "x".into(),
            path: "nope.png".into(),
        }],
        ..SlideRecipe::default()
    };
    let slide = recipe.build(None, &ctx());
    let content = slide.as_content().unwrap();
    assert_eq!(content.prose, "Install the tool.");
    assert!(content.images.is_empty());
    assert_eq!(slide.duration, 8.0);
}

#[test]
fn unknown_recipe_type_becomes_placeholder() {
    let recipe = SlideRecipe {
        kind: "chart".into(),
        ..SlideRecipe::default()
    };
    let slide = recipe.build(None, &ctx());
    assert_eq!(
        slide.body,
        SlideBody::Unsupported {
            kind: "chart".into()
        }
    );
}

#[test]
fn relative_urls_need_an_app_url() {
    assert_eq!(
        join_url(Some("http://h:1/app/"), "/x").unwrap(),
        "http://h:1/app/x"
    );
    assert_eq!(join_url(None, "http://a/b").unwrap(), "http://a/b");
    assert!(matches!(
        join_url(None, "/x"),
        Err(DocreelError::Recording(_))
    ));
}

#[test]
fn closures_are_capture_actions() {
    let action = |s: &mut dyn RecordingSession| s.hold(0.25);
    let mut session = LogSession::default();
    CaptureAction::run(&action, &mut session).unwrap();
    assert_eq!(session.calls, ["hold 0.25"]);
}

#[test]
fn malformed_scene_file_is_a_parse_error() {
    let err = parse_scenes("{\"scenes\": 3}", &ctx()).unwrap_err();
    assert!(err.to_string().starts_with("parse error:"));
    assert!(load_scenes(Path::new("target/unit_scene/missing.json"), &ctx()).is_err());
}
