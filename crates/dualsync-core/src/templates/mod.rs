//! Template resolution, fetching, and copying
//!
//! This module provides:
//! - The registry mapping (side, framework, preset) to a template repository
//! - Template fetching from a remote host (tarball, then git clone) or a local mirror
//! - Tarball extraction and recursive directory copying

pub mod archive;
pub mod copier;
pub mod error;
pub mod fetcher;
pub mod registry;

pub use copier::copy_dir;
pub use error::{CloneError, DownloadError, TemplateError};
pub use fetcher::{FetchOutcome, TemplateFetcher, TemplateSource};
pub use registry::{list_templates, repo_name, TemplateCoordinate, TemplateRegistry};
