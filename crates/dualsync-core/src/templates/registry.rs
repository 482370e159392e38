//! Template coordinates: which repository backs a (side, framework, preset) triple

use super::error::TemplateError;
use crate::product::ProductConfig;
use crate::stack::{Preset, Side};
use url::Url;

/// Repository names for frontend templates, one row per (framework, preset)
const FRONTEND_REPOS: &[(&str, Preset, &str)] = &[
    ("solidjs", Preset::Minimal, "frontend-solidjs"),
    ("solidjs", Preset::Standard, "frontend-solidjs-tailwind"),
    ("solidjs", Preset::Full, "frontend-solidjs-full"),
    ("nextjs", Preset::Minimal, "frontend-nextjs"),
    ("nextjs", Preset::Standard, "frontend-nextjs-tailwind"),
    ("nextjs", Preset::Full, "frontend-nextjs-full"),
    ("reactjs", Preset::Minimal, "frontend-reactjs"),
    ("reactjs", Preset::Standard, "frontend-reactjs-tailwind"),
    ("reactjs", Preset::Full, "frontend-reactjs-full"),
    ("vuejs", Preset::Minimal, "frontend-vuejs"),
    ("vuejs", Preset::Standard, "frontend-vuejs-tailwind"),
    ("vuejs", Preset::Full, "frontend-vuejs-full"),
    ("angularjs", Preset::Minimal, "frontend-angularjs"),
    ("angularjs", Preset::Standard, "frontend-angularjs-tailwind"),
    ("angularjs", Preset::Full, "frontend-angularjs-full"),
];

/// Repository names for backend templates. Minimal and standard share a repository.
const BACKEND_REPOS: &[(&str, Preset, &str)] = &[
    ("nestjs", Preset::Minimal, "backend-nestjs"),
    ("nestjs", Preset::Standard, "backend-nestjs"),
    ("nestjs", Preset::Full, "backend-nestjs-full"),
    ("nestjs-prisma", Preset::Minimal, "backend-nestjs-prisma"),
    ("nestjs-prisma", Preset::Standard, "backend-nestjs-prisma"),
    ("nestjs-prisma", Preset::Full, "backend-nestjs-prisma-full"),
    ("expressjs", Preset::Minimal, "backend-expressjs"),
    ("expressjs", Preset::Standard, "backend-expressjs"),
    ("expressjs", Preset::Full, "backend-expressjs-full"),
    ("expressjs-prisma", Preset::Minimal, "backend-expressjs-prisma"),
    ("expressjs-prisma", Preset::Standard, "backend-expressjs-prisma"),
    ("expressjs-prisma", Preset::Full, "backend-expressjs-prisma-full"),
    ("hono", Preset::Minimal, "backend-hono"),
    ("hono", Preset::Standard, "backend-hono"),
    ("hono", Preset::Full, "backend-hono-full"),
    ("hono-prisma", Preset::Minimal, "backend-hono-prisma"),
    ("hono-prisma", Preset::Standard, "backend-hono-prisma"),
    ("hono-prisma", Preset::Full, "backend-hono-prisma-full"),
];

fn table(side: Side) -> &'static [(&'static str, Preset, &'static str)] {
    match side {
        Side::Frontend => FRONTEND_REPOS,
        Side::Backend => BACKEND_REPOS,
    }
}

/// Look up the repository name for a triple, without any host information
pub fn repo_name(side: Side, framework: &str, preset: Preset) -> Result<&'static str, TemplateError> {
    table(side)
        .iter()
        .find(|(fw, p, _)| *fw == framework && *p == preset)
        .map(|(_, _, repo)| *repo)
        .ok_or_else(|| TemplateError::UnknownTemplate {
            side,
            framework: framework.to_string(),
            preset,
        })
}

/// Framework identifiers registered for a side, in prompt order
pub fn list_templates(side: Side) -> Vec<&'static str> {
    let mut frameworks: Vec<&'static str> = Vec::new();
    for (fw, _, _) in table(side) {
        if !frameworks.contains(fw) {
            frameworks.push(*fw);
        }
    }
    frameworks
}

/// Remote host and organisation that template repositories live under
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    base: Url,
    org: String,
}

impl TemplateRegistry {
    pub fn new(base: Url, org: impl Into<String>) -> Self {
        Self {
            base,
            org: org.into(),
        }
    }

    /// Build a registry from a product config, honouring the host override env var
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, TemplateError> {
        let host = std::env::var(config.template_host_env())
            .unwrap_or_else(|_| config.default_template_host().to_string());
        let base = Url::parse(&host).map_err(|_| TemplateError::InvalidUrl(host.clone()))?;
        Ok(Self::new(base, config.template_org()))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// Resolve a triple to its repository coordinate
    pub fn resolve(
        &self,
        side: Side,
        framework: &str,
        preset: Preset,
    ) -> Result<TemplateCoordinate, TemplateError> {
        let repo = repo_name(side, framework, preset)?;
        Ok(TemplateCoordinate {
            base: self.base.clone(),
            org: self.org.clone(),
            repo,
        })
    }
}

/// Resolved identity of one template repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCoordinate {
    base: Url,
    org: String,
    repo: &'static str,
}

impl TemplateCoordinate {
    pub fn repo(&self) -> &'static str {
        self.repo
    }

    /// `<org>/<repo>`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// Append path segments to the host URL, preserving any existing base path
    fn build_url(&self, segments: &[&str]) -> Result<Url, TemplateError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TemplateError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Browsable repository page
    pub fn web_url(&self) -> Result<Url, TemplateError> {
        self.build_url(&[self.org.as_str(), self.repo])
    }

    /// `https://<host>/<slug>/archive/refs/heads/<branch>.tar.gz`
    pub fn tarball_url(&self, branch: &str) -> Result<Url, TemplateError> {
        let archive = format!("{}.tar.gz", branch);
        self.build_url(&[
            self.org.as_str(),
            self.repo,
            "archive",
            "refs",
            "heads",
            archive.as_str(),
        ])
    }

    /// `https://<host>/<slug>.git`
    pub fn clone_url(&self) -> Result<Url, TemplateError> {
        let repo = format!("{}.git", self.repo);
        self.build_url(&[self.org.as_str(), repo.as_str()])
    }
}
