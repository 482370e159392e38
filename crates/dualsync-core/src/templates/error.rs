//! Error types for template resolution and acquisition

use crate::runtime::process::describe_exit;
use crate::stack::{Preset, Side};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template \"{framework}\" with preset \"{preset}\" not found for type \"{side}\"")]
    UnknownTemplate {
        side: Side,
        framework: String,
        preset: Preset,
    },

    #[error("invalid template URL: {0}")]
    InvalidUrl(String),

    #[error("could not configure the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("local template not found: {}", .0.display())]
    LocalTemplateMissing(PathBuf),

    /// Both the tarball download and the git clone failed
    #[error(
        "could not fetch template \"{template}\" ({preset}); check that the repository {repo_url} exists \
         (download: {download}; clone: {clone})"
    )]
    FetchFailed {
        template: String,
        preset: Preset,
        repo_url: String,
        download: DownloadError,
        clone: CloneError,
    },

    #[error("failed to copy template: {0}")]
    Io(#[from] std::io::Error),
}

/// Why the direct tarball download did not produce a populated directory
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("redirect from {url} has no Location header")]
    MissingLocation { url: String },

    #[error("gave up after {limit} redirects starting at {url}")]
    TooManyRedirects { url: String, limit: usize },

    #[error("invalid redirect target '{location}'")]
    InvalidRedirect { location: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not extract archive: {0}")]
    Extract(std::io::Error),

    #[error("archive contained no files")]
    EmptyArchive,
}

/// Why the shallow git clone fallback failed
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("could not run git: {0}")]
    Spawn(std::io::Error),

    #[error("git clone exited with {}: {stderr}", describe_exit(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("git clone timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("could not remove cloned git metadata: {0}")]
    Cleanup(std::io::Error),

    #[error("{0}")]
    Url(String),
}
