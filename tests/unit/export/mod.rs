use super::*;
use crate::foundation::core::Resolution;

/// Writes documents as-is and counts health checks.
#[derive(Default)]
struct TextEngine {
    checks: usize,
    fail_check: bool,
}

impl RenderEngine for TextEngine {
    fn name(&self) -> &str {
        "text"
    }

    fn check(&mut self) -> DocreelResult<()> {
        self.checks += 1;
        if self.fail_check {
            return Err(DocreelError::render("no browser"));
        }
        Ok(())
    }

    fn rasterize(&mut self, html: &str, _viewport: Resolution, out: &Path) -> DocreelResult<()> {
        std::fs::write(out, html)?;
        Ok(())
    }

    fn print_pdf(&mut self, html: &str, out: &Path) -> DocreelResult<()> {
        std::fs::write(out, html)?;
        Ok(())
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::path::absolute(PathBuf::from("target").join("unit_export").join(name)).unwrap();
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const TUTORIAL: &str = "# Billing Guide\n\
## 1. Invoices\n\
### 1.1 Create\n\
Open the invoices page.\n\
- Click new\n\
- Fill the form\n";

fn config(dir: &Path) -> ExportConfig {
    std::fs::write(dir.join("tutorial.md"), TUTORIAL).unwrap();
    let mut cfg = ExportConfig::default();
    cfg.resolve_paths(dir);
    cfg
}

#[test]
fn pdf_export_prints_the_document() {
    let dir = scratch("pdf");
    let cfg = config(&dir);
    let mut engine = TextEngine::default();

    let report = export_pdf(&cfg, &mut engine).unwrap();
    assert_eq!(engine.checks, 1);
    assert_eq!(report.output, dir.join("tutorial.pdf"));
    assert_eq!(report.mode, None);
    assert_eq!(report.items, 2);
    let printed = std::fs::read_to_string(&report.output).unwrap();
    assert_eq!(report.bytes, printed.len() as u64);
    assert!(printed.contains("@page { size: A4;"));
    assert!(printed.contains("<h1>Billing Guide</h1>"));
    assert!(report.summary().starts_with("wrote "));
}

#[test]
fn missing_source_fails_before_the_engine_is_touched() {
    let dir = scratch("missing_source");
    let mut cfg = config(&dir);
    cfg.input = dir.join("nope.md");
    let mut engine = TextEngine::default();

    let err = export_pdf(&cfg, &mut engine).unwrap_err();
    assert!(matches!(err, DocreelError::Validation(_)));
    assert_eq!(engine.checks, 0);
}

#[test]
fn engine_check_failure_is_fatal() {
    let dir = scratch("engine_check");
    let cfg = config(&dir);
    let engine = TextEngine {
        fail_check: true,
        ..TextEngine::default()
    };
    assert!(matches!(export_pdf(&cfg, engine), Err(DocreelError::Render(_))));
    assert!(!dir.join("tutorial.pdf").exists());
}

#[test]
fn video_export_needs_a_video_section() {
    let dir = scratch("no_video");
    let cfg = config(&dir);
    let err = export_video(&cfg, TextEngine::default(), |_| {}).unwrap_err();
    assert!(err.to_string().contains("no video section"));
}

#[test]
fn missing_encoder_fails_before_any_workspace_exists() {
    let dir = scratch("no_encoder");
    let mut cfg = config(&dir);
    cfg.encoder = Some(dir.join("no-ffmpeg"));
    cfg.video = Some(VideoConfig {
        output: dir.join("deck.mp4"),
        ..VideoConfig::default()
    });

    let err = export_video(&cfg, TextEngine::default(), |_| {}).unwrap_err();
    assert!(matches!(err, DocreelError::Validation(_)));
    assert!(!Workspace::path_for(&dir.join("deck.mp4")).exists());
}

#[test]
fn parse_options_follow_the_config() {
    let dir = scratch("parse_options");
    let mut cfg = config(&dir);
    cfg.cover = None;
    cfg.video = Some(VideoConfig {
        durations: SlideDurations::with_content(3.0),
        ..VideoConfig::default()
    });
    let deck = load_deck(&cfg).unwrap();
    assert!(deck.iter().all(|s| s.title != "Billing Guide"));
    let content = deck.iter().find(|s| s.as_content().is_some()).unwrap();
    assert_eq!(content.duration, 3.0);
}

/// A stand-in encoder that answers `-version` and writes its last argument.
#[cfg(unix)]
fn fake_encoder(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;
    let script = dir.join("fake-ffmpeg");
    std::fs::write(
        &script,
        "#!/bin/sh\n[ \"$1\" = \"-version\" ] && exit 0\nfor a in \"$@\"; do last=\"$a\"; done\necho encoded > \"$last\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn slides_video_export_writes_output_and_clears_workspace() {
    let dir = scratch("slides_video");
    let mut cfg = config(&dir);
    cfg.encoder = Some(fake_encoder(&dir));
    cfg.video = Some(VideoConfig {
        output: dir.join("out").join("deck.mp4"),
        resolution: Resolution {
            width: 64,
            height: 36,
        },
        fps: 10,
        mode: VideoMode::Slides,
        ..VideoConfig::default()
    });

    let mut titles = Vec::new();
    let report = export_video(&cfg, TextEngine::default(), |p| titles.push(p.title.clone())).unwrap();

    // cover, toc, section, content, closing
    assert_eq!(report.items, 5);
    assert_eq!(report.clips, 5);
    assert_eq!(report.mode, Some(VideoMode::Slides));
    assert!((report.duration - (5.0 + 6.0 + 4.0 + 8.0 + 5.0)).abs() < 1e-9);
    assert!(dir.join("out").join("deck.mp4").is_file());
    assert!(!Workspace::path_for(&dir.join("out").join("deck.mp4")).exists());
    assert_eq!(titles.last().map(String::as_str), Some("done"));
}

#[cfg(unix)]
#[test]
fn hybrid_export_with_only_failing_recordings_keeps_the_workspace() {
    let dir = scratch("hybrid_all_skipped");
    std::fs::write(
        dir.join("scenes.json"),
        r#"[{"type": "recording", "name": "tour", "actions": [{"goto": "/relative"}]}]"#,
    )
    .unwrap();
    let mut cfg = config(&dir);
    cfg.encoder = Some(fake_encoder(&dir));
    cfg.video = Some(VideoConfig {
        output: dir.join("deck.mp4"),
        mode: VideoMode::Hybrid,
        scenes: Some(dir.join("scenes.json")),
        ..VideoConfig::default()
    });

    let err = export_video(&cfg, TextEngine::default(), |_| {}).unwrap_err();
    assert!(err.to_string().contains("every scene was skipped"));
    assert!(!dir.join("deck.mp4").exists());
    assert!(Workspace::path_for(&dir.join("deck.mp4")).exists());
}

#[test]
fn report_summary_mentions_skipped_scenes() {
    let report = ExportReport {
        output: PathBuf::from("deck.mp4"),
        bytes: 2048,
        mode: Some(VideoMode::Hybrid),
        items: 3,
        duration: 12.5,
        frames: 0,
        clips: 2,
        skipped: vec!["login".to_string()],
    };
    assert_eq!(
        report.summary(),
        "wrote deck.mp4 (2.0 KiB, 12.5 s, 3 items, Hybrid mode, 2 clips); skipped: login"
    );
}
