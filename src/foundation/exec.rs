//! Helpers for the external programs the pipeline drives.

use std::collections::VecDeque;
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Platform file name for an executable called `name`.
pub fn executable_name(name: &str) -> String {
    if cfg!(windows) && !name.to_ascii_lowercase().ends_with(".exe") {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// First `name` found in the directories of `path_var` (a `PATH`-style list).
pub fn find_in(path_var: &OsStr, name: &str) -> Option<PathBuf> {
    let file = executable_name(name);
    std::env::split_paths(path_var)
        .map(|dir| dir.join(&file))
        .find(|candidate| candidate.is_file())
}

/// First `name` found on the process `PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    find_in(&path_var, name)
}

/// Whether `binary -version`/`--version` runs and exits successfully.
pub fn version_runs(binary: &Path, version_flag: &str) -> bool {
    Command::new(binary)
        .arg(version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Last `limit` bytes of a diagnostic stream, lossily decoded.
///
/// The cut never splits a UTF-8 sequence in a way that matters: broken leading bytes decode to
/// replacement characters and are trimmed away.
pub fn stderr_tail(bytes: &[u8], limit: usize) -> String {
    let start = bytes.len().saturating_sub(limit);
    String::from_utf8_lossy(&bytes[start..])
        .trim_start_matches('\u{FFFD}')
        .trim()
        .to_string()
}

/// Read `reader` to its end, keeping at most its last `limit` bytes.
pub fn read_tail(mut reader: impl Read, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut tail = VecDeque::with_capacity(limit);
    let mut chunk = [0u8; 4096];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        tail.extend(&chunk[..n]);
        let excess = tail.len().saturating_sub(limit);
        tail.drain(..excess);
    }
    Ok(tail.into())
}

/// Run `cmd` to completion with stderr piped, keeping only the last `limit` bytes of it.
///
/// stdin and stdout must not be piped: only stderr is drained.
pub fn run_with_stderr_tail(cmd: &mut Command, limit: usize) -> std::io::Result<(ExitStatus, Vec<u8>)> {
    let mut child = cmd.stderr(Stdio::piped()).spawn()?;
    let tail = match child.stderr.take() {
        Some(stderr) => read_tail(stderr, limit),
        None => Ok(Vec::new()),
    };
    let status = child.wait()?;
    Ok((status, tail?))
}

pub fn ensure_parent_dir(path: &Path) -> crate::foundation::error::DocreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/exec.rs"]
mod tests;
