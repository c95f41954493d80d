//! Headless Chromium/Chrome driven over the DevTools protocol.
//!
//! One browser process and one tab serve the whole export. The browser is launched on first
//! use, every document is loaded into the same tab, and the process is closed when the engine
//! is dropped. Recordings drive that tab directly through [`LivePage`].

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::tab::point::Point;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};

use crate::engine::{LivePage, RenderEngine};
use crate::foundation::core::Resolution;
use crate::foundation::error::{DocreelError, DocreelResult};
use crate::foundation::exec::{find_on_path, version_runs};

/// Environment variable naming the browser binary.
pub const BROWSER_ENV: &str = "DOCREEL_BROWSER";

const BROWSER_NAMES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

const BROWSER_ARGS: &[&str] = &[
    "--hide-scrollbars",
    "--mute-audio",
    "--no-first-run",
    "--no-default-browser-check",
    "--force-device-scale-factor=1",
    "--run-all-compositor-stages-before-draw",
];

/// Encoder runs between captures can be long; the DevTools connection must outlive them.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

pub struct ChromiumEngine {
    binary: PathBuf,
    scratch: PathBuf,
    sandbox: bool,
    session: Option<BrowserSession>,
    /// Why the browser could not start. Later calls fail with it instead of relaunching.
    launch_error: Option<String>,
    launches: u32,
    pages_loaded: u64,
}

impl std::fmt::Debug for ChromiumEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumEngine")
            .field("binary", &self.binary)
            .field("sandbox", &self.sandbox)
            .field("running", &self.session.is_some())
            .field("launches", &self.launches)
            .finish()
    }
}

impl ChromiumEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            scratch: std::env::temp_dir().join(format!("docreel-{}", std::process::id())),
            sandbox: true,
            session: None,
            launch_error: None,
            launches: 0,
            pages_loaded: 0,
        }
    }

    /// Explicit path, then `$DOCREEL_BROWSER`, then well-known names on `PATH`.
    pub fn locate(explicit: Option<&Path>) -> DocreelResult<Self> {
        let from_env = std::env::var_os(BROWSER_ENV).map(PathBuf::from);
        Self::locate_with(explicit, from_env.as_deref())
    }

    fn locate_with(explicit: Option<&Path>, from_env: Option<&Path>) -> DocreelResult<Self> {
        if let Some(path) = explicit.or(from_env) {
            if path.is_file() {
                return Ok(Self::new(path));
            }
            // A bare name such as "chromium" is looked up on PATH.
            if let Some(name) = path.to_str()
                && let Some(found) = find_on_path(name)
            {
                return Ok(Self::new(found));
            }
            return Err(DocreelError::validation(format!(
                "configured browser '{}' does not exist",
                path.display()
            )));
        }
        BROWSER_NAMES
            .iter()
            .find_map(|name| find_on_path(name))
            .map(Self::new)
            .ok_or_else(|| {
                DocreelError::validation(format!(
                    "no headless browser found: install Chromium or Chrome, or set {BROWSER_ENV} (looked for {})",
                    BROWSER_NAMES.join(", ")
                ))
            })
    }

    /// Directory for the scratch pages documents are loaded from.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch = dir.into();
        self
    }

    /// Run without the browser sandbox (needed as root in most containers).
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Browser processes started so far.
    pub fn launches(&self) -> u32 {
        self.launches
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    fn launch_options(&self, viewport: Resolution) -> DocreelResult<LaunchOptions<'static>> {
        LaunchOptions::default_builder()
            .path(Some(self.binary.clone()))
            .headless(true)
            .sandbox(self.sandbox)
            .window_size(Some((viewport.width, viewport.height)))
            .args(BROWSER_ARGS.iter().map(OsStr::new).collect())
            .idle_browser_timeout(IDLE_TIMEOUT)
            .build()
            .map_err(|e| DocreelError::validation(format!("browser launch options: {e}")))
    }

    fn launch(&self, viewport: Resolution) -> Result<BrowserSession, String> {
        let options = self.launch_options(viewport).map_err(|e| e.to_string())?;
        tracing::info!(
            binary = %self.binary.display(),
            width = viewport.width,
            height = viewport.height,
            sandbox = self.sandbox,
            "launching browser"
        );
        let browser = Browser::new(options)
            .map_err(|e| format!("failed to launch '{}': {e:#}", self.binary.display()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| format!("failed to open a page: {e:#}"))?;
        Ok(BrowserSession {
            tab,
            _browser: browser,
            viewport,
        })
    }

    /// The running session, launched on first use. A `viewport` other than the session's
    /// restarts the browser at the new size; `None` accepts any size.
    fn session(&mut self, viewport: Option<Resolution>) -> DocreelResult<&mut BrowserSession> {
        if let Some(reason) = &self.launch_error {
            return Err(DocreelError::render(format!("browser unavailable: {reason}")));
        }
        let relaunch = match (&self.session, viewport) {
            (None, _) => true,
            (Some(s), Some(v)) => s.viewport != v,
            (Some(_), None) => false,
        };
        if relaunch {
            if self.session.take().is_some() {
                tracing::debug!("viewport changed, restarting browser");
            }
            match self.launch(viewport.unwrap_or_default()) {
                Ok(session) => {
                    self.launches += 1;
                    self.session = Some(session);
                }
                Err(reason) => {
                    let err = DocreelError::render(format!("browser unavailable: {reason}"));
                    self.launch_error = Some(reason);
                    return Err(err);
                }
            }
        }
        self.session
            .as_mut()
            .ok_or_else(|| DocreelError::render("browser session closed"))
    }

    /// Write `html` to a scratch page and return its URL.
    fn write_page(&mut self, html: &str) -> DocreelResult<String> {
        std::fs::create_dir_all(&self.scratch).map_err(|e| {
            DocreelError::render(format!(
                "create browser scratch dir '{}': {e}",
                self.scratch.display()
            ))
        })?;
        // Alternating names make every load a fresh navigation.
        let name = format!("page-{}.html", self.pages_loaded % 2);
        self.pages_loaded += 1;
        let page = absolute(&self.scratch.join(name));
        std::fs::write(&page, html)
            .map_err(|e| DocreelError::render(format!("write '{}': {e}", page.display())))?;
        Ok(file_url(&page))
    }
}

impl RenderEngine for ChromiumEngine {
    fn name(&self) -> &str {
        "chromium"
    }

    fn check(&mut self) -> DocreelResult<()> {
        if version_runs(&self.binary, "--version") {
            Ok(())
        } else {
            Err(DocreelError::validation(format!(
                "browser '{}' could not be executed",
                self.binary.display()
            )))
        }
    }

    fn rasterize(&mut self, html: &str, viewport: Resolution, out: &Path) -> DocreelResult<()> {
        let url = self.write_page(html)?;
        let session = self.session(Some(viewport))?;
        session.load(&url)?;
        session.capture(out)
    }

    fn print_pdf(&mut self, html: &str, out: &Path) -> DocreelResult<()> {
        let url = self.write_page(html)?;
        let session = self.session(None)?;
        session.load(&url)?;
        let pdf = session
            .tab
            .print_to_pdf(Some(PrintToPdfOptions {
                print_background: Some(true),
                prefer_css_page_size: Some(true),
                display_header_footer: Some(false),
                ..Default::default()
            }))
            .map_err(|e| DocreelError::render(format!("print to pdf: {e:#}")))?;
        std::fs::write(out, pdf)
            .map_err(|e| DocreelError::render(format!("write '{}': {e}", out.display())))
    }

    fn live_page(&mut self, viewport: Resolution) -> DocreelResult<&mut dyn LivePage> {
        let session = self.session(Some(viewport))?;
        Ok(session as &mut dyn LivePage)
    }
}

impl Drop for ChromiumEngine {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!(launches = self.launches, "closing browser");
        }
        let _ = std::fs::remove_dir_all(&self.scratch);
    }
}

/// The browser process and the one tab everything is loaded into.
struct BrowserSession {
    tab: Arc<Tab>,
    // Dropping the browser closes the process; it is declared after the tab it owns.
    _browser: Browser,
    viewport: Resolution,
}

impl BrowserSession {
    /// Navigate to a scratch page; failures here are engine failures.
    fn load(&mut self, url: &str) -> DocreelResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| DocreelError::render(format!("load page: {e:#}")))?;
        Ok(())
    }

    fn capture(&mut self, out: &Path) -> DocreelResult<()> {
        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: f64::from(self.viewport.width),
            height: f64::from(self.viewport.height),
            scale: 1.0,
        };
        let png = self
            .tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| DocreelError::render(format!("capture screenshot: {e:#}")))?;
        std::fs::write(out, png)
            .map_err(|e| DocreelError::render(format!("write '{}': {e}", out.display())))
    }
}

impl LivePage for BrowserSession {
    fn navigate(&mut self, url: &str) -> DocreelResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| DocreelError::recording(format!("navigate to '{url}': {e:#}")))?;
        Ok(())
    }

    fn mouse_move(&mut self, x: f64, y: f64) -> DocreelResult<()> {
        self.tab
            .move_mouse_to_point(Point { x, y })
            .map_err(|e| DocreelError::recording(format!("move pointer to ({x}, {y}): {e:#}")))?;
        Ok(())
    }

    fn mouse_click(&mut self, x: f64, y: f64) -> DocreelResult<()> {
        self.tab
            .click_point(Point { x, y })
            .map_err(|e| DocreelError::recording(format!("click at ({x}, {y}): {e:#}")))?;
        Ok(())
    }

    fn run_script(&mut self, script: &str) -> DocreelResult<()> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| DocreelError::recording(format!("evaluate script: {e:#}")))?;
        Ok(())
    }

    fn screenshot(&mut self, out: &Path) -> DocreelResult<()> {
        self.capture(out)
    }
}

fn absolute(p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(p))
        .unwrap_or_else(|_| p.to_path_buf())
}

/// `file://` URL for an absolute path, percent-encoding the characters a URL would misread.
pub fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let mut url = String::from("file://");
    if !raw.starts_with('/') {
        url.push('/');
    }
    for c in raw.chars() {
        match c {
            ' ' => url.push_str("%20"),
            '#' => url.push_str("%23"),
            '%' => url.push_str("%25"),
            '?' => url.push_str("%3F"),
            _ => url.push(c),
        }
    }
    url
}

#[cfg(test)]
#[path = "../../tests/unit/engine/chromium.rs"]
mod tests;
