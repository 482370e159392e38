//! Resolving add-on ids to packages and installing them

use super::catalog::find;
use crate::runtime::commands;
use crate::runtime::process::{self, Invocation, ProcessError, STEP_TIMEOUT};
use crate::stack::{PackageManager, Side};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AddonError {
    #[error("add-on installation failed: {0}")]
    Install(#[source] ProcessError),

    /// The production packages went in, the dev packages did not
    #[error("add-ons partially installed (`{completed}` succeeded): {source}")]
    PartialInstall {
        completed: String,
        #[source]
        source: ProcessError,
    },
}

/// Packages gathered from a list of add-on ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    pub production: Vec<&'static str>,
    pub dev: Vec<&'static str>,
}

impl InstallPlan {
    /// Collect packages for `ids`. Unknown ids are skipped; duplicates are kept.
    pub fn resolve<S: AsRef<str>>(side: Side, ids: &[S]) -> Self {
        let mut plan = Self::default();
        for id in ids {
            let id = id.as_ref();
            match find(side, id) {
                Some(addon) => {
                    plan.production.extend_from_slice(addon.packages);
                    plan.dev.extend_from_slice(addon.dev_packages);
                }
                None => debug!(%side, id, "skipping unknown add-on"),
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.dev.is_empty()
    }

    /// At most two commands: production packages, then dev packages
    pub fn invocations(&self, pm: PackageManager) -> Vec<Invocation> {
        let mut out = Vec::with_capacity(2);
        if !self.production.is_empty() {
            out.push(commands::add(pm, &self.production, false));
        }
        if !self.dev.is_empty() {
            out.push(commands::add(pm, &self.dev, true));
        }
        out
    }
}

/// Install add-ons into `<root>/<side>`. A failed dev call does not undo the production call.
pub async fn install_addons<S: AsRef<str>>(
    root: &Path,
    side: Side,
    ids: &[S],
    pm: PackageManager,
) -> Result<InstallPlan, AddonError> {
    let plan = InstallPlan::resolve(side, ids);
    let cwd = root.join(side.id());

    let mut completed: Option<String> = None;
    for invocation in plan.invocations(pm) {
        if let Err(e) = process::run(&invocation, &cwd, STEP_TIMEOUT).await {
            return Err(match completed {
                Some(completed) => {
                    warn!(%side, %completed, "dev add-on install failed after production install");
                    AddonError::PartialInstall {
                        completed,
                        source: e,
                    }
                }
                None => AddonError::Install(e),
            });
        }
        completed = Some(invocation.to_string());
    }
    Ok(plan)
}
