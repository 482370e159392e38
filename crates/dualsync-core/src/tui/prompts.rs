//! Charm-style prompts for `new` using cliclack

use crate::addons;
use crate::product::ProductConfig;
use crate::project::{
    ProjectOptions, ProjectPlan, SetupObserver, SetupReport, SetupStep, StepOutcome,
};
use crate::stack::{BackendFramework, Database, FrontendFramework, PackageManager, Preset, Side};
use crate::templates::TemplateFetcher;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Answers supplied on the command line; anything left `None` is prompted for
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub name: String,
    pub frontend: Option<FrontendFramework>,
    pub backend: Option<BackendFramework>,
    pub database: Option<Database>,
    pub package_manager: Option<PackageManager>,
    pub frontend_preset: Option<Preset>,
    pub backend_preset: Option<Preset>,
    pub frontend_addons: Option<Vec<String>>,
    pub backend_addons: Option<Vec<String>>,
    pub git: Option<bool>,
    pub install: Option<bool>,

    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Branch to fetch instead of the configured one
    pub branch: Option<String>,

    /// Take defaults for every unanswered prompt (non-interactive mode)
    pub yes: bool,
}

/// Run `new` with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: NewArgs) -> Result<()> {
    cliclack::intro(format!("{} · {}", config.display_name(), args.name))?;

    let fetcher = setup_fetcher(config, &args)?;
    let options = collect_options(&args)?;

    let parent = std::env::current_dir().context("Failed to read the current directory")?;
    let plan = ProjectPlan::new(&parent, options)?;

    create_project(&plan, &fetcher).await?;

    let report = run_post_setup(&plan).await;
    print_summary(config, &plan, &report)?;

    Ok(())
}

fn setup_fetcher<C: ProductConfig>(config: &C, args: &NewArgs) -> Result<TemplateFetcher> {
    let fetcher = match &args.template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), config.user_agent())?
        }
        None => TemplateFetcher::from_config(config)?,
    };

    Ok(match &args.branch {
        Some(branch) => fetcher.with_branch(branch.clone()),
        None => fetcher,
    })
}

fn collect_options(args: &NewArgs) -> Result<ProjectOptions> {
    let defaults = ProjectOptions::with_defaults(args.name.clone());

    let frontend = match args.frontend {
        Some(fw) => fw,
        None if args.yes => defaults.frontend,
        None => {
            let mut select = cliclack::select("Which frontend framework?");
            for fw in FrontendFramework::ALL {
                select = select.item(fw, fw.display_name(), fw.hint());
            }
            select.initial_value(defaults.frontend).interact()?
        }
    };
    let frontend_preset = select_preset(Side::Frontend, args.frontend_preset, args.yes)?;

    let backend = match args.backend {
        Some(fw) => fw,
        None if args.yes => defaults.backend,
        None => {
            let mut select = cliclack::select("Which backend framework?");
            for fw in BackendFramework::ALL {
                select = select.item(fw, fw.display_name(), fw.hint());
            }
            select.initial_value(defaults.backend).interact()?
        }
    };
    let backend_preset = select_preset(Side::Backend, args.backend_preset, args.yes)?;

    let database = match args.database {
        Some(db) => db,
        None if args.yes => defaults.database,
        None => {
            let mut select = cliclack::select("Which database?");
            for db in Database::ALL {
                select = select.item(db, db.id(), db.hint());
            }
            select.initial_value(defaults.database).interact()?
        }
    };

    let package_manager = match args.package_manager {
        Some(pm) => pm,
        None if args.yes => defaults.package_manager,
        None => {
            let mut select = cliclack::select("Which package manager?");
            for pm in PackageManager::ALL {
                select = select.item(pm, pm.id(), pm.hint());
            }
            select.initial_value(defaults.package_manager).interact()?
        }
    };

    let frontend_addons = select_addons(
        Side::Frontend,
        frontend.id(),
        args.frontend_addons.as_deref(),
        args.yes,
    )?;
    let backend_addons = select_addons(
        Side::Backend,
        backend.id(),
        args.backend_addons.as_deref(),
        args.yes,
    )?;

    let git = match args.git {
        Some(git) => git,
        None if args.yes => defaults.git,
        None => cliclack::confirm("Initialise a git repository?")
            .initial_value(defaults.git)
            .interact()?,
    };
    let install = match args.install {
        Some(install) => install,
        None if args.yes => defaults.install,
        None => cliclack::confirm("Install dependencies now?")
            .initial_value(defaults.install)
            .interact()?,
    };

    Ok(ProjectOptions {
        frontend,
        backend,
        database,
        package_manager,
        frontend_preset,
        backend_preset,
        frontend_addons,
        backend_addons,
        git,
        install,
        ..defaults
    })
}

fn select_preset(side: Side, specified: Option<Preset>, yes: bool) -> Result<Preset> {
    if let Some(preset) = specified {
        return Ok(preset);
    }
    if yes {
        return Ok(Preset::Standard);
    }
    let mut select = cliclack::select(format!("Which {} preset?", side));
    for preset in Preset::ALL {
        select = select.item(preset, preset.display_name(), preset.description());
    }
    Ok(select.initial_value(Preset::Standard).interact()?)
}

fn select_addons(
    side: Side,
    framework: &str,
    specified: Option<&[String]>,
    yes: bool,
) -> Result<Vec<String>> {
    let offered = addons::choices(side, framework);

    if let Some(ids) = specified {
        let mut selected = Vec::new();
        for id in ids {
            if offered.iter().any(|addon| addon.id == id.as_str()) {
                selected.push(id.clone());
            } else {
                cliclack::log::warning(format!(
                    "Ignoring {} add-on '{}': not offered for {}",
                    side, id, framework
                ))?;
            }
        }
        return Ok(selected);
    }

    if yes || offered.is_empty() {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect(format!("{} add-ons (optional)", capitalized(side)));
    for addon in &offered {
        multi = multi.item(addon.id, addon.name, addon.description);
    }
    let picked: Vec<&'static str> = multi.required(false).interact()?;
    Ok(picked.into_iter().map(str::to_string).collect())
}

fn capitalized(side: Side) -> &'static str {
    match side {
        Side::Frontend => "Frontend",
        Side::Backend => "Backend",
    }
}

async fn create_project(plan: &ProjectPlan, fetcher: &TemplateFetcher) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Fetching templates...");

    match plan.materialize(fetcher).await {
        Ok(done) => {
            spinner.stop(format!("Project created in {}", done.root.display()));
            if let Some(compose) = &done.compose_file {
                cliclack::log::success(format!("Generated {}", compose.display()))?;
            }
            Ok(())
        }
        Err(e) => {
            spinner.stop("Project creation failed");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Could not create project '{}'", plan.options().name);
        }
    }
}

/// Spinner per post-setup step; failures become warnings, never errors
struct SpinnerObserver {
    package_manager: PackageManager,
    spinner: Option<cliclack::ProgressBar>,
}

impl SetupObserver for SpinnerObserver {
    fn started(&mut self, step: SetupStep) {
        let spinner = cliclack::spinner();
        match step {
            SetupStep::Git => spinner.start("Initialising git..."),
            SetupStep::Install => spinner.start(format!(
                "Installing dependencies with {}...",
                self.package_manager
            )),
            SetupStep::Addons => spinner.start("Installing add-ons..."),
        }
        self.spinner = Some(spinner);
    }

    fn finished(&mut self, step: SetupStep, failures: &[String]) {
        let Some(spinner) = self.spinner.take() else {
            return;
        };
        let (done, failed) = match step {
            SetupStep::Git => (
                "Git repository initialised",
                "Git unavailable or initialisation failed",
            ),
            SetupStep::Install => ("Dependencies installed", "Dependency installation failed"),
            SetupStep::Addons => ("Add-ons installed", "Add-on installation failed"),
        };
        if failures.is_empty() {
            spinner.stop(done);
            return;
        }
        spinner.stop(failed);
        for failure in failures {
            let _ = cliclack::log::warning(failure);
        }
    }
}

async fn run_post_setup(plan: &ProjectPlan) -> SetupReport {
    let mut observer = SpinnerObserver {
        package_manager: plan.options().package_manager,
        spinner: None,
    };
    plan.post_setup_with(&mut observer).await
}

fn print_summary<C: ProductConfig>(
    config: &C,
    plan: &ProjectPlan,
    report: &SetupReport,
) -> Result<()> {
    cliclack::note("Configuration", plan.summary().join("\n"))?;

    if matches!(report.install, StepOutcome::Skipped | StepOutcome::Failed(_)) {
        cliclack::log::remark(format!(
            "Run `{}` in frontend/ and backend/ before starting the dev servers",
            crate::runtime::commands::install(plan.options().package_manager)
        ))?;
    }

    let opts = plan.options();
    let steps = config.next_steps(plan.root(), opts.package_manager, opts.database);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!("Docs: {}", config.docs_url()))?;

    Ok(())
}
