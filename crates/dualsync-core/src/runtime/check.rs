//! Environment diagnostics for the tools a generated project relies on

use colored::Colorize;
use semver::Version;
use std::process::Command;

/// One tool checked by `doctor`
#[derive(Debug, Clone, Copy)]
pub struct ToolCheck {
    pub name: &'static str,
    pub program: &'static str,
    pub args: &'static [&'static str],
    pub required: bool,
    pub minimum: Option<&'static str>,
    pub install_hint: &'static str,
}

pub const TOOLS: &[ToolCheck] = &[
    ToolCheck {
        name: "Node.js",
        program: "node",
        args: &["--version"],
        required: true,
        minimum: Some("18.0.0"),
        install_hint: "https://nodejs.org",
    },
    ToolCheck {
        name: "npm",
        program: "npm",
        args: &["--version"],
        required: true,
        minimum: None,
        install_hint: "ships with Node.js",
    },
    ToolCheck {
        name: "Git",
        program: "git",
        args: &["--version"],
        required: true,
        minimum: None,
        install_hint: "https://git-scm.com",
    },
    ToolCheck {
        name: "Docker",
        program: "docker",
        args: &["--version"],
        required: false,
        minimum: None,
        install_hint: "https://docs.docker.com/get-docker",
    },
    ToolCheck {
        name: "Docker Compose",
        program: "docker",
        args: &["compose", "version"],
        required: false,
        minimum: None,
        install_hint: "https://docs.docker.com/compose/install",
    },
    ToolCheck {
        name: "pnpm",
        program: "pnpm",
        args: &["--version"],
        required: false,
        minimum: None,
        install_hint: "npm install -g pnpm",
    },
    ToolCheck {
        name: "yarn",
        program: "yarn",
        args: &["--version"],
        required: false,
        minimum: None,
        install_hint: "npm install -g yarn",
    },
    ToolCheck {
        name: "bun",
        program: "bun",
        args: &["--version"],
        required: false,
        minimum: None,
        install_hint: "https://bun.sh",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolState {
    Available,
    Missing,
    Outdated { minimum: &'static str },
}

/// Detection result for one tool
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub check: ToolCheck,
    pub version: Option<String>,
    pub state: ToolState,
}

impl ToolInfo {
    pub fn is_ok(&self) -> bool {
        self.state == ToolState::Available
    }
}

/// Result of probing every tool
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub tools: Vec<ToolInfo>,
}

impl DoctorReport {
    /// False when a required tool is missing or older than its minimum
    pub fn healthy(&self) -> bool {
        self.tools.iter().all(|t| !t.check.required || t.is_ok())
    }

    pub fn required(&self) -> impl Iterator<Item = &ToolInfo> {
        self.tools.iter().filter(|t| t.check.required)
    }

    pub fn optional(&self) -> impl Iterator<Item = &ToolInfo> {
        self.tools.iter().filter(|t| !t.check.required)
    }

    pub fn print(&self) {
        println!("{}", "Required".bold());
        for tool in self.required() {
            print_tool(tool);
        }
        println!();
        println!("{}", "Optional".bold());
        for tool in self.optional() {
            print_tool(tool);
        }
        println!();

        if self.healthy() {
            println!("{}", "Everything needed is installed.".green().bold());
        } else {
            println!(
                "{}",
                "Some required tools are missing or outdated.".red().bold()
            );
        }
    }
}

fn print_tool(tool: &ToolInfo) {
    let version = tool.version.as_deref().unwrap_or("");
    match &tool.state {
        ToolState::Available => {
            println!("  {} {} {}", "✓".green(), tool.check.name, version.dimmed())
        }
        ToolState::Outdated { minimum } => println!(
            "  {} {} {} (requires >= {})",
            "✗".red(),
            tool.check.name,
            version,
            minimum
        ),
        ToolState::Missing if tool.check.required => println!(
            "  {} {} not found ({})",
            "✗".red(),
            tool.check.name,
            tool.check.install_hint
        ),
        ToolState::Missing => println!(
            "  {} {} not found ({})",
            "-".yellow(),
            tool.check.name,
            tool.check.install_hint.dimmed()
        ),
    }
}

/// First stdout line with a leading `v` removed
pub fn version_text(stdout: &str) -> Option<String> {
    let line = stdout.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.strip_prefix('v').unwrap_or(line).to_string())
}

/// Find the first token of a version line that parses as semver
pub fn parse_version(text: &str) -> Option<Version> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.strip_prefix('v').unwrap_or(token))
        .find_map(|token| Version::parse(token).ok())
}

/// Classify a tool from the version text it reported, if any
pub fn evaluate(check: ToolCheck, version: Option<String>) -> ToolInfo {
    let state = match (&version, check.minimum) {
        (None, _) => ToolState::Missing,
        (Some(text), Some(minimum)) => {
            let meets = match (parse_version(text), Version::parse(minimum)) {
                (Some(found), Ok(min)) => found >= min,
                // unparseable output is not held against the tool
                _ => true,
            };
            if meets {
                ToolState::Available
            } else {
                ToolState::Outdated { minimum }
            }
        }
        (Some(_), None) => ToolState::Available,
    };
    ToolInfo {
        check,
        version,
        state,
    }
}

/// Probe a single tool by running it
pub fn check_tool(check: ToolCheck) -> ToolInfo {
    let version = match Command::new(check.program).args(check.args).output() {
        Ok(out) if out.status.success() => version_text(&String::from_utf8_lossy(&out.stdout)),
        _ => None,
    };
    evaluate(check, version)
}

/// Probe every tool in [`TOOLS`]
pub fn run_doctor() -> DoctorReport {
    DoctorReport {
        tools: TOOLS.iter().map(|check| check_tool(*check)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> ToolCheck {
        TOOLS[0]
    }

    #[test]
    fn test_version_text_strips_leading_v() {
        assert_eq!(version_text("v20.11.1\n"), Some("20.11.1".to_string()));
        assert_eq!(
            version_text("git version 2.43.0\nextra"),
            Some("git version 2.43.0".to_string())
        );
        assert_eq!(version_text(""), None);
    }

    #[test]
    fn test_parse_version_from_noisy_output() {
        assert_eq!(
            parse_version("Docker version 24.0.7, build afdd53b"),
            Some(Version::new(24, 0, 7))
        );
        assert_eq!(
            parse_version("Docker Compose version v2.23.3"),
            Some(Version::new(2, 23, 3))
        );
        assert_eq!(parse_version("unknown"), None);
    }

    #[test]
    fn test_node_minimum_version() {
        assert_eq!(
            evaluate(node(), Some("20.11.1".to_string())).state,
            ToolState::Available
        );
        assert_eq!(
            evaluate(node(), Some("18.0.0".to_string())).state,
            ToolState::Available
        );
        assert_eq!(
            evaluate(node(), Some("16.20.2".to_string())).state,
            ToolState::Outdated { minimum: "18.0.0" }
        );
        assert_eq!(evaluate(node(), None).state, ToolState::Missing);
    }

    #[test]
    fn test_health_ignores_optional_tools() {
        let tools = TOOLS
            .iter()
            .map(|check| {
                let version = check.required.then(|| "20.0.0".to_string());
                evaluate(*check, version)
            })
            .collect();
        let report = DoctorReport { tools };
        assert!(report.healthy());
        assert_eq!(report.required().count(), 3);
        assert_eq!(report.optional().count(), 5);
    }

    #[test]
    fn test_missing_required_tool_is_unhealthy() {
        let tools = TOOLS
            .iter()
            .map(|check| {
                let version = (check.program != "git").then(|| "20.0.0".to_string());
                evaluate(*check, version)
            })
            .collect();
        assert!(!DoctorReport { tools }.healthy());
    }
}
