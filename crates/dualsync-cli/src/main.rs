//! DualSync CLI - scaffolding for frontend/backend project pairs

use anyhow::Result;
use clap::{Args as ClapArgs, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use dualsync_core::runtime::{self, ComposeAction};
use dualsync_core::tui::NewArgs;
use dualsync_core::{
    BackendFramework, Database, FrontendFramework, PackageManager, Preset, ProductConfig,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// DualSync product configuration
#[derive(Clone)]
pub struct DualSyncConfig;

impl ProductConfig for DualSyncConfig {
    fn name(&self) -> &'static str {
        "dual"
    }

    fn display_name(&self) -> &'static str {
        "DualSync"
    }

    fn template_host_env(&self) -> &'static str {
        "DUALSYNC_TEMPLATE_HOST"
    }

    fn template_org(&self) -> &'static str {
        "dualSync-cli"
    }

    fn template_branch_env(&self) -> &'static str {
        "DUALSYNC_TEMPLATE_BRANCH"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/dualSync-cli"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding full-stack frontend/backend projects"
    }

    fn next_steps(&self, dir: &Path, package_manager: PackageManager, database: Database) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();
        let shown = match &current {
            Some(cwd) => dir.strip_prefix(cwd).unwrap_or(dir),
            None => dir,
        };

        if database.is_containerized() {
            steps.push(format!(
                "cd {} && {} docker:dev",
                shown.display(),
                self.name()
            ));
        }

        let dev = runtime::commands::dev(package_manager);
        steps.push(format!("cd {}/frontend && {}", shown.display(), dev));
        steps.push(format!("cd {}/backend && {}", shown.display(), dev));
        steps.push(format!(
            "{} make:module <name>  (from {}, adds a CRUD module to the backend)",
            self.name(),
            shown.display()
        ));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "dual")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    New(CliNewArgs),
    /// Check that the tools a project needs are installed
    Doctor,
    /// Start the database containers (docker compose up -d)
    #[command(name = "docker:dev")]
    DockerDev,
    /// Stop the database containers (docker compose down)
    #[command(name = "docker:stop")]
    DockerStop,
    /// Follow the database container logs (docker compose logs -f)
    #[command(name = "docker:logs")]
    DockerLogs,
    /// Generate a CRUD module in backend/src/<name>
    #[command(name = "make:module")]
    MakeModule {
        /// Module name (letters, digits and '_')
        name: String,
    },
}

#[derive(ClapArgs, Debug)]
pub struct CliNewArgs {
    /// Project directory name
    pub name: String,

    #[arg(long, value_enum)]
    pub frontend: Option<FrontendFramework>,

    #[arg(long, value_enum)]
    pub backend: Option<BackendFramework>,

    #[arg(long, value_enum)]
    pub database: Option<Database>,

    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    #[arg(long = "frontend-preset", value_enum)]
    pub frontend_preset: Option<Preset>,

    #[arg(long = "backend-preset", value_enum)]
    pub backend_preset: Option<Preset>,

    /// Frontend add-ons (comma-separated ids)
    #[arg(long = "frontend-addons", value_delimiter = ',')]
    pub frontend_addons: Option<Vec<String>>,

    /// Backend add-ons (comma-separated ids)
    #[arg(long = "backend-addons", value_delimiter = ',')]
    pub backend_addons: Option<Vec<String>>,

    /// Initialise a git repository
    #[arg(long, overrides_with = "no_git")]
    pub git: bool,

    #[arg(long = "no-git", overrides_with = "git")]
    pub no_git: bool,

    /// Install dependencies after creation
    #[arg(long, overrides_with = "no_install")]
    pub install: bool,

    #[arg(long = "no-install", overrides_with = "install")]
    pub no_install: bool,

    /// Local directory to use for templates instead of fetching from remote
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template branch to fetch
    #[arg(long)]
    pub branch: Option<String>,

    /// Accept defaults for every unanswered prompt (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl From<CliNewArgs> for NewArgs {
    fn from(args: CliNewArgs) -> Self {
        NewArgs {
            name: args.name,
            frontend: args.frontend,
            backend: args.backend,
            database: args.database,
            package_manager: args.package_manager,
            frontend_preset: args.frontend_preset,
            backend_preset: args.backend_preset,
            frontend_addons: args.frontend_addons,
            backend_addons: args.backend_addons,
            git: flag_pair(args.git, args.no_git),
            install: flag_pair(args.install, args.no_install),
            template_dir: args.template_dir,
            branch: args.branch,
            yes: args.yes,
        }
    }
}

/// Parse the command line, taking the help description from the product config
fn parse_args<C: ProductConfig>(config: &C) -> Result<Args, clap::Error> {
    let matches = Args::command()
        .about(config.cli_description())
        .try_get_matches()?;
    Args::from_arg_matches(&matches)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn doctor() -> Result<()> {
    println!("{}", "DualSync doctor".cyan().bold());
    println!();

    let report = runtime::run_doctor();
    report.print();

    if !report.healthy() {
        std::process::exit(1);
    }
    Ok(())
}

async fn docker(action: ComposeAction) -> Result<()> {
    let cwd = std::env::current_dir()?;
    runtime::compose(&cwd, action).await?;
    if action == ComposeAction::Up {
        println!("{}", "Database containers started.".green());
    }
    Ok(())
}

fn make_module(name: &str) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let generated = dualsync_core::generate_module(&cwd, name)?;

    println!(
        "{} module {} ({})",
        "Created".green().bold(),
        generated.name.as_str().bold(),
        generated.kind
    );
    println!();
    for file in &generated.files {
        println!("  {} {}", "•".dimmed(), file.display());
    }
    println!();
    println!(
        "{}",
        format!("Don't forget to wire it into {}:", generated.kind.wiring_target()).yellow()
    );
    for line in &generated.wiring {
        println!("  {}", line.dimmed());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let config = DualSyncConfig;
    let args = parse_args(&config).unwrap_or_else(|e| e.exit());

    match args.command {
        Command::New(new_args) => {
            let result = dualsync_core::run(&config, new_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Command::Doctor => doctor(),
        Command::DockerDev => docker(ComposeAction::Up).await,
        Command::DockerStop => docker(ComposeAction::Down).await,
        Command::DockerLogs => docker(ComposeAction::Logs).await,
        Command::MakeModule { name } => make_module(&name),
    }
}
