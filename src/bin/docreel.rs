use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use docreel::{
    ChromiumEngine, ExportConfig, Progress, Resolution, ThemeSelector, TransitionKind, VideoConfig,
    VideoMode, estimate_duration,
};

#[derive(Parser, Debug)]
#[command(name = "docreel", version, about = "Markdown tutorials to PDF and MP4 slide decks")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors and skip progress output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the tutorial as a paginated PDF (requires Chromium or Chrome).
    Pdf(PdfArgs),
    /// Render the tutorial as an MP4 slide deck (requires a browser and `ffmpeg`).
    Video(VideoArgs),
    /// Print the parsed slide deck as JSON, with the estimated video length.
    Slides(SlidesArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Export config JSON; relative paths inside it resolve against its directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source Markdown document.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Directory image references are resolved against.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Built-in theme name (default, dark, corporate) or a `.css` file.
    #[arg(long)]
    theme: Option<String>,
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Chromium/Chrome binary (otherwise `$DOCREEL_BROWSER`, then `PATH`).
    #[arg(long)]
    browser: Option<PathBuf>,

    /// Run the browser without its sandbox (usually needed as root in containers).
    #[arg(long)]
    no_sandbox: bool,
}

#[derive(Args, Debug)]
struct PdfArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output PDF path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Leave out the generated table of contents.
    #[arg(long)]
    no_toc: bool,
}

#[derive(Args, Debug)]
struct VideoArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// How the video is assembled.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Scene file for hybrid mode.
    #[arg(long)]
    scenes: Option<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Output size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_resolution)]
    resolution: Option<Resolution>,

    #[arg(long, value_enum)]
    transition: Option<TransitionChoice>,

    /// Transition length in seconds.
    #[arg(long)]
    transition_secs: Option<f64>,

    /// Background audio track.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// ffmpeg binary (otherwise a bundled copy, then `PATH`).
    #[arg(long)]
    encoder: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SlidesArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Write the JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Animated,
    Slides,
    Hybrid,
}

impl From<ModeChoice> for VideoMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::Animated => Self::Animated,
            ModeChoice::Slides => Self::Slides,
            ModeChoice::Hybrid => Self::Hybrid,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransitionChoice {
    Crossfade,
    FadeBlack,
    Cut,
}

impl From<TransitionChoice> for TransitionKind {
    fn from(t: TransitionChoice) -> Self {
        match t {
            TransitionChoice::Crossfade => Self::Crossfade,
            TransitionChoice::FadeBlack => Self::FadeBlack,
            TransitionChoice::Cut => Self::Cut,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Pdf(args) => cmd_pdf(args),
        Command::Video(args) => cmd_video(args, cli.quiet),
        Command::Slides(args) => cmd_slides(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse().map_err(|e| format!("width '{w}': {e}"))?;
    let height = h.trim().parse().map_err(|e| format!("height '{h}': {e}"))?;
    Ok(Resolution { width, height })
}

fn absolute(p: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(p).with_context(|| format!("resolve path '{}'", p.display()))
}

fn load_config(args: &SourceArgs) -> anyhow::Result<ExportConfig> {
    let mut cfg = match &args.config {
        Some(path) => ExportConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => {
            let mut cfg = ExportConfig::default();
            cfg.resolve_paths(Path::new("."));
            cfg
        }
    };
    if let Some(input) = &args.in_path {
        cfg.input = absolute(input)?;
        // Without a config, images and outputs sit next to the document.
        if args.config.is_none() {
            cfg.output = cfg.input.with_extension("pdf");
            if args.images_dir.is_none()
                && let Some(parent) = cfg.input.parent()
            {
                cfg.images_dir = parent.join("images");
            }
        }
    }
    if let Some(dir) = &args.images_dir {
        cfg.images_dir = absolute(dir)?;
    }
    if let Some(theme) = &args.theme {
        cfg.theme = match ThemeSelector::parse(theme) {
            ThemeSelector::File(path) => ThemeSelector::File(absolute(&path)?),
            builtin => builtin,
        };
    }
    Ok(cfg)
}

fn make_engine(cfg: &ExportConfig, args: &EngineArgs) -> anyhow::Result<ChromiumEngine> {
    let explicit = args.browser.as_deref().or(cfg.browser.as_deref());
    let engine = ChromiumEngine::locate(explicit).context("locate headless browser")?;
    Ok(engine.with_sandbox(!args.no_sandbox))
}

fn cmd_pdf(args: PdfArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.source)?;
    if let Some(out) = &args.out {
        cfg.output = absolute(out)?;
    }
    if args.no_toc {
        cfg.pdf.toc = false;
    }
    cfg.validate()?;

    let engine = make_engine(&cfg, &args.engine)?;
    let report = docreel::export_pdf(&cfg, engine)
        .with_context(|| format!("export pdf '{}'", cfg.output.display()))?;
    eprintln!("{}", report.summary());
    Ok(())
}

fn cmd_video(args: VideoArgs, quiet: bool) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.source)?;
    let video = cfg.video.get_or_insert_with(|| VideoConfig {
        output: cfg.output.with_extension("mp4"),
        ..VideoConfig::default()
    });
    if let Some(out) = &args.out {
        video.output = absolute(out)?;
    }
    if let Some(mode) = args.mode {
        video.mode = mode.into();
    }
    if let Some(scenes) = &args.scenes {
        video.scenes = Some(absolute(scenes)?);
    }
    if let Some(fps) = args.fps {
        video.fps = fps;
    }
    if let Some(resolution) = args.resolution {
        video.resolution = resolution;
    }
    if let Some(kind) = args.transition {
        video.transition.kind = kind.into();
    }
    if let Some(secs) = args.transition_secs {
        video.transition.duration = secs;
    }
    if let Some(audio) = &args.audio {
        video.audio = Some(absolute(audio)?);
    }
    if let Some(encoder) = &args.encoder {
        cfg.encoder = Some(absolute(encoder)?);
    }
    cfg.validate()?;

    let engine = make_engine(&cfg, &args.engine)?;
    let mut last_item = None;
    let progress = |p: &Progress| {
        if quiet || last_item == Some((p.item, p.title.clone())) {
            return;
        }
        eprintln!(
            "[{:>5.1}%] {}/{} {}",
            p.percent(),
            (p.item + 1).min(p.item_count),
            p.item_count,
            p.title
        );
        last_item = Some((p.item, p.title.clone()));
    };
    let report = docreel::export_video(&cfg, engine, progress).context("export video")?;
    eprintln!("{}", report.summary());
    Ok(())
}

fn cmd_slides(args: SlidesArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.source)?;
    cfg.validate()?;
    let deck = docreel::load_deck(&cfg)?;

    let json = serde_json::to_string_pretty(&deck).context("serialize slide deck")?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, json.as_bytes())
                .with_context(|| format!("write slide json '{}'", out.display()))?;
        }
        None => println!("{json}"),
    }

    let transition = cfg
        .video
        .as_ref()
        .map(VideoConfig::transition)
        .unwrap_or_else(|| VideoConfig::default().transition());
    let durations: Vec<f64> = deck.iter().map(|s| s.duration).collect();
    eprintln!(
        "{} slides, estimated video length {:.1} s",
        deck.len(),
        estimate_duration(&durations, transition)
    );
    Ok(())
}
