use std::process::ExitStatus;

/// Convenience result type used across docreel.
pub type DocreelResult<T> = Result<T, DocreelError>;

/// Top-level error taxonomy used by the export pipeline.
#[derive(thiserror::Error, Debug)]
pub enum DocreelError {
    /// Invalid configuration or user-provided values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable source document or scene file.
    #[error("parse error: {0}")]
    Parse(String),

    /// Rendering engine missing, unresponsive, or failing to rasterize.
    #[error("render error: {0}")]
    Render(String),

    /// External encoder missing or exiting with a non-zero status.
    #[error("encode error: {message}")]
    Encode {
        /// Human readable summary, including the tail of the encoder's stderr.
        message: String,
        /// Exit status when the process ran at all.
        status: Option<ExitStatus>,
    },

    /// A capture-action routine failed while driving a live session.
    #[error("recording error: {0}")]
    Recording(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocreelError {
    /// Build a [`DocreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DocreelError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`DocreelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DocreelError::Encode`] value for a failure that never produced an exit status.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
            status: None,
        }
    }

    /// Build a [`DocreelError::Encode`] value from a finished process.
    pub fn encode_status(status: ExitStatus, stderr_tail: &str) -> Self {
        Self::Encode {
            message: format!("ffmpeg exited with status {status}: {}", stderr_tail.trim()),
            status: Some(status),
        }
    }

    /// Build a [`DocreelError::Recording`] value.
    pub fn recording(msg: impl Into<String>) -> Self {
        Self::Recording(msg.into())
    }
}

impl From<std::io::Error> for DocreelError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(err))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
