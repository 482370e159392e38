//! Running external programs (package managers, git, docker)

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

/// Upper bound for a single install/git step
pub const STEP_TIMEOUT: Duration = Duration::from_secs(600);

/// Only the tail of stderr is kept in errors
const STDERR_TAIL_LINES: usize = 20;

/// A program plus its arguments, resolved but not yet run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}{}", describe_exit(.code), format_stderr(.stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {} seconds", .limit.as_secs())]
    Timeout { command: String, limit: Duration },
}

/// Human wording for a process exit code (`None` means killed by a signal)
pub(crate) fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{}", stderr)
    }
}

fn stderr_tail(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Run an invocation in `cwd`, capturing output, bounded by `limit`
pub async fn run(invocation: &Invocation, cwd: &Path, limit: Duration) -> Result<(), ProcessError> {
    let command = invocation.to_string();
    debug!(%command, cwd = %cwd.display(), "running");

    let child = TokioCommand::new(invocation.program)
        .args(&invocation.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match timeout(limit, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => return Err(ProcessError::Spawn { command, source }),
        Err(_) => return Err(ProcessError::Timeout { command, limit }),
    };

    if output.status.success() {
        Ok(())
    } else {
        Err(ProcessError::Failed {
            command,
            code: output.status.code(),
            stderr: stderr_tail(&output.stderr),
        })
    }
}

/// Run several invocations in order, stopping at the first failure
pub async fn run_all(
    invocations: &[Invocation],
    cwd: &Path,
    limit: Duration,
) -> Result<(), ProcessError> {
    for invocation in invocations {
        run(invocation, cwd, limit).await?;
    }
    Ok(())
}
