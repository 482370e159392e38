//! CRUD module boilerplate for an existing backend
//!
//! The backend framework is detected from `backend/package.json`, then a fixed
//! set of templates is rendered into `backend/src/<name>/`. Mounting the module
//! in the application is left to the operator; the returned
//! [`GeneratedModule`] carries the lines to add.

pub mod detect;
pub mod render;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("invalid module name '{0}': use letters, digits or '_', starting with a letter")]
    InvalidName(String),

    #[error("no 'backend' directory in {}; run this from the root of a DualSync project", .0.display())]
    BackendNotFound(PathBuf),

    #[error("could not read {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("failed to write module files: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend framework family a module is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Nest,
    Express,
    Hono,
}

impl BackendKind {
    pub fn id(&self) -> &'static str {
        match self {
            BackendKind::Nest => "nestjs",
            BackendKind::Express => "express",
            BackendKind::Hono => "hono",
        }
    }

    /// File the operator has to edit to mount the module
    pub fn wiring_target(&self) -> &'static str {
        match self {
            BackendKind::Nest => "app.module.ts",
            BackendKind::Express | BackendKind::Hono => "your app entry point",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validated, lowercased module name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(raw: &str) -> Result<Self, ModuleError> {
        let name = raw.trim().to_lowercase();
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(ModuleError::InvalidName(raw.to_string()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier form: `order` becomes `Order`
    pub fn capitalized(&self) -> String {
        capitalize(&self.0)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What `generate_module` wrote
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    pub kind: BackendKind,
    pub name: ModuleName,
    /// Paths relative to the project root
    pub files: Vec<PathBuf>,
    pub wiring: Vec<String>,
}

/// Generate a module named `raw_name` in `<project_root>/backend/src/`.
///
/// Nothing is written when the name is invalid or the backend is missing.
/// Files that already exist are overwritten.
pub fn generate_module(project_root: &Path, raw_name: &str) -> Result<GeneratedModule, ModuleError> {
    let name = ModuleName::new(raw_name)?;

    let backend = project_root.join("backend");
    if !backend.is_dir() {
        return Err(ModuleError::BackendNotFound(project_root.to_path_buf()));
    }

    let kind = detect::detect(&backend)?;
    debug!(%name, %kind, "generating module");

    let module_dir = Path::new("backend").join("src").join(name.as_str());
    let mut files = Vec::new();
    for artifact in render::artifacts(kind) {
        let relative = module_dir.join(render::render_for(artifact.path, &name));
        let target = project_root.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, render::render_for(artifact.template, &name))?;
        files.push(relative);
    }

    Ok(GeneratedModule {
        kind,
        wiring: render::wiring_instructions(kind, &name),
        name,
        files,
    })
}
