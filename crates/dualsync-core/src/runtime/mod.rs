//! External tools: package managers, git, docker, and environment checks
//!
//! This module provides:
//! - The package-manager command table
//! - A bounded runner for external processes
//! - `doctor` diagnostics
//! - `docker compose` wrappers

pub mod check;
pub mod commands;
pub mod docker;
pub mod process;

pub use check::{run_doctor, DoctorReport, ToolInfo, ToolState};
pub use docker::{compose, ComposeAction, DockerError};
pub use process::{Invocation, ProcessError};
