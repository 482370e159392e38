//! Closed enumerations for every choice a project is built from
//!
//! Each value carries a stable identifier (`id()`) used as the registry key,
//! plus the label and hint shown in prompts.

use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Which half of the project a template or add-on belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Side {
    Frontend,
    Backend,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Frontend, Side::Backend];

    /// Identifier, also the directory name inside the project root
    pub fn id(&self) -> &'static str {
        match self {
            Side::Frontend => "frontend",
            Side::Backend => "backend",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FrontendFramework {
    Solidjs,
    Nextjs,
    Reactjs,
    Vuejs,
    Angularjs,
}

impl FrontendFramework {
    pub const ALL: [FrontendFramework; 5] = [
        FrontendFramework::Solidjs,
        FrontendFramework::Nextjs,
        FrontendFramework::Reactjs,
        FrontendFramework::Vuejs,
        FrontendFramework::Angularjs,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FrontendFramework::Solidjs => "solidjs",
            FrontendFramework::Nextjs => "nextjs",
            FrontendFramework::Reactjs => "reactjs",
            FrontendFramework::Vuejs => "vuejs",
            FrontendFramework::Angularjs => "angularjs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FrontendFramework::Solidjs => "SolidJS",
            FrontendFramework::Nextjs => "Next.js",
            FrontendFramework::Reactjs => "React",
            FrontendFramework::Vuejs => "Vue.js",
            FrontendFramework::Angularjs => "Angular",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            FrontendFramework::Solidjs => "Lightweight and reactive",
            FrontendFramework::Nextjs => "Full-featured React framework",
            FrontendFramework::Reactjs => "The classic library",
            FrontendFramework::Vuejs => "The progressive framework",
            FrontendFramework::Angularjs => "The robust framework",
        }
    }

    /// Port the framework's dev server listens on by default
    pub fn dev_port(&self) -> u16 {
        match self {
            FrontendFramework::Nextjs => 3000,
            FrontendFramework::Angularjs => 4200,
            FrontendFramework::Solidjs | FrontendFramework::Reactjs | FrontendFramework::Vuejs => {
                5173
            }
        }
    }
}

impl fmt::Display for FrontendFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BackendFramework {
    Nestjs,
    NestjsPrisma,
    Expressjs,
    ExpressjsPrisma,
    Hono,
    HonoPrisma,
}

impl BackendFramework {
    pub const ALL: [BackendFramework; 6] = [
        BackendFramework::Nestjs,
        BackendFramework::NestjsPrisma,
        BackendFramework::Expressjs,
        BackendFramework::ExpressjsPrisma,
        BackendFramework::Hono,
        BackendFramework::HonoPrisma,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BackendFramework::Nestjs => "nestjs",
            BackendFramework::NestjsPrisma => "nestjs-prisma",
            BackendFramework::Expressjs => "expressjs",
            BackendFramework::ExpressjsPrisma => "expressjs-prisma",
            BackendFramework::Hono => "hono",
            BackendFramework::HonoPrisma => "hono-prisma",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BackendFramework::Nestjs => "NestJS",
            BackendFramework::NestjsPrisma => "NestJS + Prisma",
            BackendFramework::Expressjs => "Express",
            BackendFramework::ExpressjsPrisma => "Express + Prisma",
            BackendFramework::Hono => "Hono",
            BackendFramework::HonoPrisma => "Hono + Prisma",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            BackendFramework::Nestjs => "Batteries-included framework",
            BackendFramework::NestjsPrisma => "NestJS with an ORM",
            BackendFramework::Expressjs => "Light and flexible",
            BackendFramework::ExpressjsPrisma => "Express with an ORM",
            BackendFramework::Hono => "Ultra-light, serverless friendly",
            BackendFramework::HonoPrisma => "Hono with an ORM",
        }
    }
}

impl fmt::Display for BackendFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Database {
    #[value(name = "mariadb")]
    MariaDb,
    #[value(name = "postgresql")]
    PostgreSql,
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "none", alias = "aucune")]
    None,
}

impl Database {
    pub const ALL: [Database; 4] = [
        Database::MariaDb,
        Database::PostgreSql,
        Database::Sqlite,
        Database::None,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Database::MariaDb => "MariaDB",
            Database::PostgreSql => "PostgreSQL",
            Database::Sqlite => "SQLite",
            Database::None => "None",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Database::MariaDb => "MySQL compatible",
            Database::PostgreSql => "Robust and reliable",
            Database::Sqlite => "Light and embedded",
            Database::None => "No database",
        }
    }

    /// Whether the engine runs as a container next to the project
    pub fn is_containerized(&self) -> bool {
        matches!(self, Database::MariaDb | Database::PostgreSql)
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
    Deno,
}

impl PackageManager {
    pub const ALL: [PackageManager; 5] = [
        PackageManager::Npm,
        PackageManager::Yarn,
        PackageManager::Pnpm,
        PackageManager::Bun,
        PackageManager::Deno,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
            PackageManager::Deno => "deno",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            PackageManager::Npm => "The classic",
            PackageManager::Yarn => "Fast and reliable",
            PackageManager::Pnpm => "Disk-space efficient",
            PackageManager::Bun => "Ultra-fast",
            PackageManager::Deno => "Modern and secure",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Named bundle of starter features baked into a template repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Preset {
    Minimal,
    Standard,
    Full,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Minimal, Preset::Standard, Preset::Full];

    pub fn id(&self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Standard => "standard",
            Preset::Full => "full",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Preset::Minimal => "Minimal",
            Preset::Standard => "Standard",
            Preset::Full => "Full",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Minimal => "Base framework (TypeScript, ESLint, Prettier)",
            Preset::Standard => "Minimal + Tailwind CSS",
            Preset::Full => "Standard + popular add-ons (Shadcn/Pinia, TanStack, Zod...)",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a string names no known choice
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
    expected: String,
}

fn parse_choice<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    id: impl Fn(&T) -> &'static str,
) -> Result<T, ParseChoiceError> {
    all.iter()
        .find(|candidate| id(*candidate).eq_ignore_ascii_case(value.trim()))
        .copied()
        .ok_or_else(|| ParseChoiceError {
            kind,
            value: value.to_string(),
            expected: all.iter().map(&id).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for Side {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("side", s, &Side::ALL, Side::id)
    }
}

impl FromStr for FrontendFramework {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("frontend", s, &FrontendFramework::ALL, FrontendFramework::id)
    }
}

impl FromStr for BackendFramework {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("backend", s, &BackendFramework::ALL, BackendFramework::id)
    }
}

impl FromStr for Database {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Legacy value from the French prompts
        if s.trim().eq_ignore_ascii_case("aucune") {
            return Ok(Database::None);
        }
        parse_choice("database", s, &Database::ALL, Database::id)
    }
}

impl FromStr for PackageManager {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("package manager", s, &PackageManager::ALL, PackageManager::id)
    }
}

impl FromStr for Preset {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("preset", s, &Preset::ALL, Preset::id)
    }
}
