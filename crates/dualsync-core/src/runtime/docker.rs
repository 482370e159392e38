//! `docker compose` wrappers for the generated database services

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tracing::debug;

pub const COMPOSE_FILE: &str = "docker-compose.yml";

#[derive(Debug, Error)]
pub enum DockerError {
    #[error("no docker-compose.yml in {}; run this inside a project created with a database", .0.display())]
    ComposeFileMissing(PathBuf),

    #[error("could not run docker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("`docker compose {action}` exited with {}", crate::runtime::process::describe_exit(.code))]
    Failed {
        action: ComposeAction,
        code: Option<i32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Up,
    Down,
    Logs,
}

impl ComposeAction {
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            ComposeAction::Up => &["compose", "up", "-d"],
            ComposeAction::Down => &["compose", "down"],
            ComposeAction::Logs => &["compose", "logs", "-f"],
        }
    }
}

impl fmt::Display for ComposeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args()[1..].join(" "))
    }
}

/// Run `docker compose <action>` in `dir` with the terminal attached
pub async fn compose(dir: &Path, action: ComposeAction) -> Result<(), DockerError> {
    if !dir.join(COMPOSE_FILE).is_file() {
        return Err(DockerError::ComposeFileMissing(dir.to_path_buf()));
    }

    debug!(dir = %dir.display(), %action, "running docker compose");
    let status = TokioCommand::new("docker")
        .args(action.args())
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(DockerError::Spawn)?;

    if status.success() {
        Ok(())
    } else {
        Err(DockerError::Failed {
            action,
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_action_arguments() {
        assert_eq!(ComposeAction::Up.args(), &["compose", "up", "-d"]);
        assert_eq!(ComposeAction::Down.args(), &["compose", "down"]);
        assert_eq!(ComposeAction::Logs.args(), &["compose", "logs", "-f"]);
        assert_eq!(ComposeAction::Up.to_string(), "up -d");
    }

    #[tokio::test]
    async fn test_missing_compose_file() {
        let tmp = tempdir().unwrap();
        let err = compose(tmp.path(), ComposeAction::Up).await.unwrap_err();
        assert!(matches!(err, DockerError::ComposeFileMissing(_)));
        assert!(err.to_string().contains(COMPOSE_FILE));
    }
}
