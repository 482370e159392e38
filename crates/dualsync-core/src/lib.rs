//! DualSync Core - library behind the `dual` project scaffolder
//!
//! A DualSync project is a frontend and a backend side by side, each copied from a
//! template repository, plus generated `docker-compose.yml`, `.gitignore` and
//! `.env` files.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - template registry and fetcher, file generators,
//!   add-on catalog, module generator, external tool runners
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `ProjectPlan`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use dualsync_core::project::{ProjectOptions, ProjectPlan};
//! use dualsync_core::templates::TemplateFetcher;
//!
//! let fetcher = TemplateFetcher::from_config(&MyConfig)?;
//! let plan = ProjectPlan::new(&cwd, ProjectOptions::with_defaults("my-app"))?;
//! plan.materialize(&fetcher).await?;
//! let report = plan.post_setup().await;
//! ```

pub mod addons;
pub mod generate;
pub mod product;
pub mod project;
pub mod runtime;
pub mod stack;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use generate::{generate_module, GeneratedModule, ModuleError};
pub use product::ProductConfig;
pub use project::{ProjectError, ProjectOptions, ProjectPlan};
pub use stack::{BackendFramework, Database, FrontendFramework, PackageManager, Preset, Side};
pub use templates::{TemplateError, TemplateFetcher, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
