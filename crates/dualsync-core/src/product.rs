//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to tell the library where templates live,
//! how to identify itself over HTTP and what to print once a project exists.

use crate::stack::{Database, PackageManager};
use std::path::Path;

/// Configuration trait for the scaffolding product
///
/// Defines:
/// - Product identity (name, display name)
/// - Template host, organisation and branch (with env overrides)
/// - Documentation links
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Base URL of the host serving template repositories
    fn default_template_host(&self) -> &'static str {
        "https://github.com"
    }

    /// Environment variable name for overriding the template host
    fn template_host_env(&self) -> &'static str;

    /// Organisation that owns every template repository
    fn template_org(&self) -> &'static str;

    /// Branch fetched when none is configured
    fn default_branch(&self) -> &'static str {
        "main"
    }

    /// Environment variable name for overriding the branch
    fn template_branch_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, package_manager: PackageManager, database: Database)
        -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
