//! Template fetching from a remote host or a local directory
//!
//! Remote templates are acquired in two stages:
//! - Download: GET the branch tarball (following redirects), stream it into a
//!   scratch directory next to the destination, extract it with the top-level
//!   directory stripped
//! - Clone: if anything in the download stage fails, `git clone --depth 1`
//!   straight into the destination and drop the `.git` directory
//!
//! Local templates are plain directories named after the repository they mirror.

use super::archive::unpack_tar_gz;
use super::copier::copy_dir;
use super::error::{CloneError, DownloadError, TemplateError};
use super::registry::{repo_name, TemplateCoordinate, TemplateRegistry};
use crate::product::ProductConfig;
use crate::stack::{Preset, Side};
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const CLONE_TIMEOUT: Duration = Duration::from_secs(180);
pub const MAX_REDIRECTS: usize = 10;

/// Prefix of the per-fetch scratch directory created beside the destination
pub const SCRATCH_PREFIX: &str = ".dualsync-temp-";

const ARCHIVE_FILE: &str = "template.tar.gz";

/// Template source - either a remote host or a local mirror directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(TemplateRegistry),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, TemplateError> {
        Ok(Self::Remote(TemplateRegistry::from_config(config)?))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Which strategy populated the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded,
    Cloned,
    Copied,
}

/// Template fetcher - retrieves one template tree per call
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    branch: String,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Result<Self, TemplateError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TemplateError::HttpClient)?;
        Ok(Self {
            source,
            client,
            branch: "main".to_string(),
        })
    }

    /// Create a fetcher from a product config, honouring the host and branch env vars
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, TemplateError> {
        let source = TemplateSource::from_config(config)?;
        let branch = std::env::var(config.template_branch_env())
            .ok()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| config.default_branch().to_string());
        Ok(Self::new(source, config.user_agent())?.with_branch(branch))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf, user_agent: &str) -> Result<Self, TemplateError> {
        Self::new(TemplateSource::local(path), user_agent)
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Populate `dest` with the template for (side, framework, preset)
    pub async fn fetch(
        &self,
        side: Side,
        framework: &str,
        preset: Preset,
        dest: &Path,
    ) -> Result<FetchOutcome, TemplateError> {
        match &self.source {
            TemplateSource::Local(dir) => {
                let repo = repo_name(side, framework, preset)?;
                let src = dir.join(repo);
                if !src.is_dir() {
                    return Err(TemplateError::LocalTemplateMissing(src));
                }
                let copied = copy_dir(&src, dest)?;
                debug!(repo, files = copied.len(), dest = %dest.display(), "copied local template");
                Ok(FetchOutcome::Copied)
            }
            TemplateSource::Remote(registry) => {
                let coordinate = registry.resolve(side, framework, preset)?;
                self.fetch_remote(&coordinate, framework, preset, dest).await
            }
        }
    }

    async fn fetch_remote(
        &self,
        coordinate: &TemplateCoordinate,
        framework: &str,
        preset: Preset,
        dest: &Path,
    ) -> Result<FetchOutcome, TemplateError> {
        let tarball_url = coordinate.tarball_url(&self.branch)?;
        let clone_url = coordinate.clone_url()?;
        let dest_existed = dest.exists();

        let download = match self.download_and_extract(&tarball_url, dest).await {
            Ok(written) => {
                info!(repo = coordinate.repo(), files = written, "template downloaded");
                return Ok(FetchOutcome::Downloaded);
            }
            Err(e) => e,
        };
        warn!(repo = coordinate.repo(), error = %download, "tarball download failed, falling back to git clone");

        // git refuses to clone into a non-empty directory
        if !dest_existed && dest.exists() {
            if let Err(e) = fs::remove_dir_all(dest).await {
                warn!(dest = %dest.display(), error = %e, "could not remove partial download");
            }
        }

        match self.clone_repository(&clone_url, dest).await {
            Ok(()) => {
                info!(repo = coordinate.repo(), "template cloned");
                Ok(FetchOutcome::Cloned)
            }
            Err(clone) => {
                let repo_url = coordinate
                    .web_url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| coordinate.slug());
                Err(TemplateError::FetchFailed {
                    template: framework.to_string(),
                    preset,
                    repo_url,
                    download,
                    clone,
                })
            }
        }
    }

    /// Download the tarball into a scratch directory and extract it into `dest`.
    ///
    /// The scratch directory is removed before returning, whatever the outcome.
    async fn download_and_extract(&self, url: &Url, dest: &Path) -> Result<usize, DownloadError> {
        let parent = scratch_parent(dest);
        fs::create_dir_all(&parent).await?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&parent)?;
        let archive = scratch.path().join(ARCHIVE_FILE);

        let outcome = self.download_into(url, &archive, dest).await;
        let cleanup = scratch.close();

        let written = outcome?;
        cleanup?;
        Ok(written)
    }

    async fn download_into(
        &self,
        url: &Url,
        archive: &Path,
        dest: &Path,
    ) -> Result<usize, DownloadError> {
        let bytes = self.download_tarball(url, archive).await?;
        debug!(bytes, archive = %archive.display(), "tarball saved");

        let (archive, dest) = (archive.to_path_buf(), dest.to_path_buf());
        let written = tokio::task::spawn_blocking(move || unpack_tar_gz(&archive, &dest, 1))
            .await
            .map_err(|e| DownloadError::Extract(std::io::Error::other(e)))?
            .map_err(DownloadError::Extract)?;

        if written == 0 {
            return Err(DownloadError::EmptyArchive);
        }
        Ok(written)
    }

    /// GET `start`, following redirects by hand, and stream the final body into `target`
    async fn download_tarball(&self, start: &Url, target: &Path) -> Result<u64, DownloadError> {
        let mut url = start.clone();
        let mut redirects = 0;

        let mut response = loop {
            debug!(url = %url, attempt = redirects + 1, "requesting tarball");
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == StatusCode::OK {
                break response;
            }
            if !is_followed_redirect(status) {
                return Err(DownloadError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            if redirects == MAX_REDIRECTS {
                return Err(DownloadError::TooManyRedirects {
                    url: start.to_string(),
                    limit: MAX_REDIRECTS,
                });
            }

            let location = response
                .headers()
                .get(LOCATION)
                .ok_or_else(|| DownloadError::MissingLocation {
                    url: url.to_string(),
                })?;
            let location = location
                .to_str()
                .map_err(|_| DownloadError::InvalidRedirect {
                    location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
                })?;
            let next = url
                .join(location)
                .map_err(|_| DownloadError::InvalidRedirect {
                    location: location.to_string(),
                })?;

            debug!(status = status.as_u16(), from = %url, to = %next, "following redirect");
            url = next;
            redirects += 1;
        };

        let mut file = fs::File::create(target).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    /// Shallow-clone `clone_url` at the configured branch into `dest`, then drop `.git`
    async fn clone_repository(&self, clone_url: &Url, dest: &Path) -> Result<(), CloneError> {
        debug!(url = %clone_url, branch = %self.branch, dest = %dest.display(), "cloning template");

        let child = TokioCommand::new("git")
            .args(["clone", "--depth", "1", "--branch", self.branch.as_str()])
            .arg(clone_url.as_str())
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match timeout(CLONE_TIMEOUT, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CloneError::Spawn(e)),
            Err(_) => return Err(CloneError::Timeout(CLONE_TIMEOUT)),
        };

        if !output.status.success() {
            return Err(CloneError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let git_dir = dest.join(".git");
        if git_dir.exists() {
            fs::remove_dir_all(&git_dir)
                .await
                .map_err(CloneError::Cleanup)?;
        }
        Ok(())
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Directory the scratch dir is created in: the destination's parent, or `.`
fn scratch_parent(dest: &Path) -> PathBuf {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tar::{Builder, Header};
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    const TARBALL_PATH: &str = "/dualSync-cli/backend-hono/archive/refs/heads/main.tar.gz";

    fn tarball(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let encoder = GzEncoder::new(&mut bytes, Compression::default());
            let mut builder = Builder::new(encoder);
            for (path, contents) in entries {
                let mut header = Header::new_gnu();
                header.set_size(contents.len() as u64);
                header.set_mode(0o644);
                builder
                    .append_data(&mut header, path, contents.as_bytes())
                    .unwrap();
            }
            builder.into_inner().unwrap().finish().unwrap();
        }
        bytes
    }

    fn ok_response(body: &[u8]) -> Vec<u8> {
        let mut raw = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/gzip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        raw.extend_from_slice(body);
        raw
    }

    fn redirect_response(location: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            location
        )
        .into_bytes()
    }

    /// Serve canned raw responses keyed by request path; anything else is a 404
    async fn serve(routes: HashMap<String, Vec<u8>>) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let text = String::from_utf8_lossy(&request);
                    let path = text.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let response = routes.get(&path).cloned().unwrap_or_else(|| {
                        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                            .to_vec()
                    });
                    let _ = socket.write_all(&response).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    fn remote_fetcher(base: Url) -> TemplateFetcher {
        TemplateFetcher::new(
            TemplateSource::Remote(TemplateRegistry::new(base, "dualSync-cli")),
            "dual-test",
        )
        .unwrap()
    }

    fn scratch_dirs_left(parent: &Path) -> Vec<String> {
        std::fs::read_dir(parent)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(SCRATCH_PREFIX))
            .collect()
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    #[tokio::test]
    async fn test_download_follows_redirect_and_strips_top_level() {
        let body = tarball(&[
            ("backend-hono-main/package.json", r#"{"dependencies":{"hono":"^4"}}"#),
            ("backend-hono-main/src/index.ts", "export default {}"),
        ]);
        let mut routes = HashMap::new();
        routes.insert(
            TARBALL_PATH.to_string(),
            redirect_response("/codeload/pkg.tar.gz"),
        );
        routes.insert("/codeload/pkg.tar.gz".to_string(), ok_response(&body));
        let base = serve(routes).await;

        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("backend");
        let outcome = remote_fetcher(base)
            .fetch(Side::Backend, "hono", Preset::Minimal, &dest)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded);
        assert!(dest.join("package.json").is_file());
        assert!(dest.join("src/index.ts").is_file());
        assert!(!dest.join("backend-hono-main").exists());
        assert!(scratch_dirs_left(tmp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let mut routes = HashMap::new();
        routes.insert("/loop".to_string(), redirect_response("/loop"));
        let base = serve(routes).await;

        let tmp = tempdir().unwrap();
        let err = remote_fetcher(base.clone())
            .download_tarball(&base.join("loop").unwrap(), &tmp.path().join("x.tar.gz"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadError::TooManyRedirects {
                limit: MAX_REDIRECTS,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_a_download_failure() {
        let base = serve(HashMap::new()).await;
        let tmp = tempdir().unwrap();
        let err = remote_fetcher(base.clone())
            .download_tarball(
                &base.join("missing.tar.gz").unwrap(),
                &tmp.path().join("x.tar.gz"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_both_strategies_failing_names_template_and_cleans_scratch() {
        // bind then drop so the port refuses connections
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("frontend");
        let err = remote_fetcher(base)
            .fetch(Side::Frontend, "reactjs", Preset::Standard, &dest)
            .await
            .unwrap_err();

        let TemplateError::FetchFailed { ref download, .. } = err else {
            panic!("expected FetchFailed, got {err:?}");
        };
        assert!(matches!(download, DownloadError::Request(_)));

        let message = err.to_string();
        assert!(message.contains("reactjs"));
        assert!(message.contains("standard"));
        assert!(message.contains("dualSync-cli/frontend-reactjs-tailwind"));
        assert!(scratch_dirs_left(tmp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_archive_triggers_fallback_and_cleans_scratch() {
        let body = tarball(&[("README.md", "only a top-level file")]);
        let mut routes = HashMap::new();
        routes.insert(TARBALL_PATH.to_string(), ok_response(&body));
        let base = serve(routes).await;

        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("backend");
        let err = remote_fetcher(base)
            .fetch(Side::Backend, "hono", Preset::Standard, &dest)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TemplateError::FetchFailed {
                download: DownloadError::EmptyArchive,
                ..
            }
        ));
        assert!(scratch_dirs_left(tmp.path()).is_empty());
    }

    #[tokio::test]
    async fn test_clone_fallback_populates_destination_without_git_dir() {
        if !git_available() {
            eprintln!("git not found, skipping");
            return;
        }

        let tmp = tempdir().unwrap();
        let remote = tmp.path().join("remote");
        let repo = remote.join("dualSync-cli").join("backend-hono.git");
        std::fs::create_dir_all(repo.join("src")).unwrap();
        std::fs::write(repo.join("package.json"), r#"{"dependencies":{"hono":"^4"}}"#).unwrap();
        std::fs::write(repo.join("src/index.ts"), "export default {}").unwrap();
        git(&repo, &["init", "-q"]);
        git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&repo, &["add", "."]);
        git(
            &repo,
            &[
                "-c",
                "user.name=DualSync Test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "-m",
                "init",
            ],
        );

        // file:// is not an HTTP scheme, so the download stage fails immediately
        let base = Url::from_directory_path(&remote).unwrap();
        let dest = tmp.path().join("app").join("backend");
        let outcome = remote_fetcher(base)
            .fetch(Side::Backend, "hono", Preset::Minimal, &dest)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Cloned);
        assert!(dest.join("package.json").is_file());
        assert!(dest.join("src/index.ts").is_file());
        assert!(!dest.join(".git").exists());
        assert!(scratch_dirs_left(&tmp.path().join("app")).is_empty());
    }

    #[tokio::test]
    async fn test_local_source_copies_repo_directory() {
        let tmp = tempdir().unwrap();
        let templates = tmp.path().join("templates");
        let repo = templates.join("frontend-vuejs-full");
        std::fs::create_dir_all(repo.join("src")).unwrap();
        std::fs::write(repo.join("src/App.vue"), "<template></template>").unwrap();

        let dest = tmp.path().join("frontend");
        let outcome = TemplateFetcher::from_local(templates, "dual-test")
            .unwrap()
            .fetch(Side::Frontend, "vuejs", Preset::Full, &dest)
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Copied);
        assert!(dest.join("src/App.vue").is_file());
    }

    #[tokio::test]
    async fn test_local_source_missing_repo_directory() {
        let tmp = tempdir().unwrap();
        let err = TemplateFetcher::from_local(tmp.path().to_path_buf(), "dual-test")
            .unwrap()
            .fetch(
                Side::Backend,
                "nestjs",
                Preset::Full,
                &tmp.path().join("backend"),
            )
            .await
            .unwrap_err();

        match err {
            TemplateError::LocalTemplateMissing(path) => {
                assert!(path.ends_with("backend-nestjs-full"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_framework_fails_before_any_io() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("frontend");
        let err = TemplateFetcher::from_local(tmp.path().to_path_buf(), "dual-test")
            .unwrap()
            .fetch(Side::Frontend, "svelte", Preset::Minimal, &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, TemplateError::UnknownTemplate { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_invalid_user_agent_is_reported_not_replaced() {
        let result = TemplateFetcher::from_local(PathBuf::from("templates"), "bad\nagent");
        assert!(matches!(result, Err(TemplateError::HttpClient(_))));
    }

    #[test]
    fn test_scratch_parent_of_bare_name_is_cwd() {
        assert_eq!(scratch_parent(Path::new("frontend")), PathBuf::from("."));
        assert_eq!(
            scratch_parent(Path::new("/tmp/app/frontend")),
            PathBuf::from("/tmp/app")
        );
    }
}
