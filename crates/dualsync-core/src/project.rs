//! Project materialization: templates, generated files, and post-setup steps
//!
//! [`ProjectPlan::materialize`] is the fatal part of `new`: any error aborts.
//! Git initialisation, dependency installation and add-on installation come
//! after it and only ever degrade to warnings.

use crate::addons::{self, AddonError};
use crate::generate::{compose, env, gitignore};
use crate::runtime::commands;
use crate::runtime::docker::COMPOSE_FILE;
use crate::runtime::process::{self, Invocation, ProcessError, STEP_TIMEOUT};
use crate::stack::{BackendFramework, Database, FrontendFramework, PackageManager, Preset, Side};
use crate::templates::{FetchOutcome, TemplateError, TemplateFetcher};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("directory {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid project name '{0}': use letters, digits, '-', '_' or '.'")]
    InvalidName(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("could not render docker-compose.yml: {0}")]
    Compose(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every choice a new project is built from
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub name: String,
    pub frontend: FrontendFramework,
    pub backend: BackendFramework,
    pub database: Database,
    pub package_manager: PackageManager,
    pub frontend_preset: Preset,
    pub backend_preset: Preset,
    pub frontend_addons: Vec<String>,
    pub backend_addons: Vec<String>,
    pub git: bool,
    pub install: bool,
}

impl ProjectOptions {
    /// Defaults used when prompts are skipped
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frontend: FrontendFramework::Solidjs,
            backend: BackendFramework::Nestjs,
            database: Database::None,
            package_manager: PackageManager::Npm,
            frontend_preset: Preset::Standard,
            backend_preset: Preset::Standard,
            frontend_addons: Vec::new(),
            backend_addons: Vec::new(),
            git: true,
            install: false,
        }
    }
}

pub fn validate_project_name(name: &str) -> Result<(), ProjectError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ProjectError::InvalidName(name.to_string()))
    }
}

/// What `materialize` produced
#[derive(Debug, Clone)]
pub struct Materialized {
    pub root: PathBuf,
    pub frontend: FetchOutcome,
    pub backend: FetchOutcome,
    pub compose_file: Option<PathBuf>,
    pub gitignore: PathBuf,
    /// Relative to `root`
    pub env_files: Vec<PathBuf>,
}

/// Result of one non-fatal post-setup step
#[derive(Debug)]
pub enum StepOutcome<E> {
    Skipped,
    Done,
    Failed(E),
}

impl<E> StepOutcome<E> {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done)
    }

    fn from_result(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => StepOutcome::Done,
            Err(e) => StepOutcome::Failed(e),
        }
    }
}

/// An optional step run after the project is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Git,
    Install,
    Addons,
}

/// Told about every post-setup step that actually runs
pub trait SetupObserver {
    fn started(&mut self, _step: SetupStep) {}

    /// `failures` is empty when the step succeeded
    fn finished(&mut self, _step: SetupStep, _failures: &[String]) {}
}

impl SetupObserver for () {}

fn failure_messages<E: std::fmt::Display>(outcomes: &[&StepOutcome<E>]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            StepOutcome::Failed(e) => Some(e.to_string()),
            _ => None,
        })
        .collect()
}

#[derive(Debug)]
pub struct SetupReport {
    pub git: StepOutcome<ProcessError>,
    pub install: StepOutcome<ProcessError>,
    pub frontend_addons: StepOutcome<AddonError>,
    pub backend_addons: StepOutcome<AddonError>,
}

/// A validated project ready to be written under `root`
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    root: PathBuf,
    options: ProjectOptions,
}

impl ProjectPlan {
    /// Plan a project named `options.name` inside `parent`
    pub fn new(parent: &Path, options: ProjectOptions) -> Result<Self, ProjectError> {
        validate_project_name(&options.name)?;
        Ok(Self {
            root: parent.join(&options.name),
            options,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    pub fn side_dir(&self, side: Side) -> PathBuf {
        self.root.join(side.id())
    }

    /// Refuse an existing root, fetch both templates, then write generated files
    pub async fn materialize(&self, fetcher: &TemplateFetcher) -> Result<Materialized, ProjectError> {
        if self.root.exists() {
            return Err(ProjectError::AlreadyExists(self.root.clone()));
        }
        fs::create_dir_all(&self.root)?;
        info!(root = %self.root.display(), "creating project");

        let opts = &self.options;
        let frontend = fetcher
            .fetch(
                Side::Frontend,
                opts.frontend.id(),
                opts.frontend_preset,
                &self.side_dir(Side::Frontend),
            )
            .await?;
        let backend = fetcher
            .fetch(
                Side::Backend,
                opts.backend.id(),
                opts.backend_preset,
                &self.side_dir(Side::Backend),
            )
            .await?;

        let compose_file = self.write_compose()?;
        let gitignore = gitignore::write_gitignore(&self.root)?;
        let env_files = env::write_env_files(&self.root, opts.frontend, opts.database)?;

        Ok(Materialized {
            root: self.root.clone(),
            frontend,
            backend,
            compose_file,
            gitignore,
            env_files,
        })
    }

    fn write_compose(&self) -> Result<Option<PathBuf>, ProjectError> {
        match compose::generate(self.options.database)? {
            Some(document) => {
                let path = self.root.join(COMPOSE_FILE);
                fs::write(&path, document)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    /// `git init`, `git add .`, `git commit -m "Initial commit"`
    pub async fn init_git(&self) -> Result<(), ProcessError> {
        let steps = [
            Invocation::new("git", ["init"]),
            Invocation::new("git", ["add", "."]),
            Invocation::new("git", ["commit", "-m", "Initial commit"]),
        ];
        process::run_all(&steps, &self.root, STEP_TIMEOUT).await
    }

    /// Install dependencies in `frontend/` then `backend/`
    pub async fn install_dependencies(&self) -> Result<(), ProcessError> {
        let install = commands::install(self.options.package_manager);
        for side in Side::ALL {
            process::run(&install, &self.side_dir(side), STEP_TIMEOUT).await?;
        }
        Ok(())
    }

    pub async fn install_addons(&self, side: Side) -> StepOutcome<AddonError> {
        let ids = match side {
            Side::Frontend => &self.options.frontend_addons,
            Side::Backend => &self.options.backend_addons,
        };
        if ids.is_empty() {
            return StepOutcome::Skipped;
        }
        StepOutcome::from_result(
            addons::install_addons(&self.root, side, ids, self.options.package_manager)
                .await
                .map(|_| ()),
        )
    }

    /// Run the optional steps in order. Add-ons wait for a successful install.
    pub async fn post_setup(&self) -> SetupReport {
        self.post_setup_with(&mut ()).await
    }

    /// [`post_setup`](Self::post_setup), reporting each step that runs to `observer`
    pub async fn post_setup_with<O: SetupObserver>(&self, observer: &mut O) -> SetupReport {
        let git = if self.options.git {
            observer.started(SetupStep::Git);
            let outcome = StepOutcome::from_result(self.init_git().await);
            observer.finished(SetupStep::Git, &failure_messages(&[&outcome]));
            outcome
        } else {
            StepOutcome::Skipped
        };
        if let StepOutcome::Failed(e) = &git {
            warn!(error = %e, "git initialisation failed");
        }

        let install = if self.options.install {
            observer.started(SetupStep::Install);
            let outcome = StepOutcome::from_result(self.install_dependencies().await);
            observer.finished(SetupStep::Install, &failure_messages(&[&outcome]));
            outcome
        } else {
            StepOutcome::Skipped
        };
        if let StepOutcome::Failed(e) = &install {
            warn!(error = %e, "dependency installation failed");
        }

        let wants_addons =
            !(self.options.frontend_addons.is_empty() && self.options.backend_addons.is_empty());
        let (frontend_addons, backend_addons) = if install.is_done() && wants_addons {
            observer.started(SetupStep::Addons);
            let frontend = self.install_addons(Side::Frontend).await;
            let backend = self.install_addons(Side::Backend).await;
            observer.finished(SetupStep::Addons, &failure_messages(&[&frontend, &backend]));
            (frontend, backend)
        } else {
            (StepOutcome::Skipped, StepOutcome::Skipped)
        };

        SetupReport {
            git,
            install,
            frontend_addons,
            backend_addons,
        }
    }

    /// Closing summary: choices, add-ons, env files, docker hint, dev commands
    pub fn summary(&self) -> Vec<String> {
        let opts = &self.options;
        let name = &opts.name;
        let mut lines = vec![
            format!("Frontend: {} ({})", opts.frontend.display_name(), opts.frontend_preset),
            format!("Backend: {} ({})", opts.backend.display_name(), opts.backend_preset),
            format!("Database: {}", opts.database),
            format!("Package manager: {}", opts.package_manager),
        ];

        for (label, side, ids) in [
            ("Frontend add-ons", Side::Frontend, &opts.frontend_addons),
            ("Backend add-ons", Side::Backend, &opts.backend_addons),
        ] {
            if !ids.is_empty() {
                lines.push(format!("{}: {}", label, addon_names(side, ids).join(", ")));
            }
        }

        lines.push(String::new());
        lines.push(format!("{}/backend/.env (JWT_SECRET, API_KEY, ...)", name));
        lines.push(format!("{}/frontend/.env (API URL)", name));
        lines.push(".env.example files are safe to commit".to_string());

        if opts.database.is_containerized() {
            lines.push(String::new());
            lines.push(format!("cd {} && docker compose up -d", name));
        }

        let dev = commands::dev(opts.package_manager);
        lines.push(String::new());
        lines.push(format!("cd {}/frontend && {}   (terminal 1)", name, dev));
        lines.push(format!("cd {}/backend && {}   (terminal 2)", name, dev));
        lines
    }
}

/// Display names for add-on ids, falling back to the id itself
pub fn addon_names(side: Side, ids: &[String]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            addons::find(side, id)
                .map(|addon| addon.name.to_string())
                .unwrap_or_else(|| id.clone())
        })
        .collect()
}
