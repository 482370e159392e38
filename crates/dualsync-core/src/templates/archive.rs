//! Gzipped tarball extraction for repository archives
//!
//! Repository archives wrap everything in a single top-level directory
//! (`<repo>-<branch>/`), so extraction strips leading path components.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};
use tracing::warn;

/// Extract `archive` into `dest`, dropping the first `strip` path components of every entry.
///
/// Returns the number of entries written. Entries that live entirely inside the
/// stripped prefix (such as the top-level directory itself) are skipped, and so
/// are links pointing outside the archive tree.
pub fn unpack_tar_gz(archive: &Path, dest: &Path, strip: usize) -> io::Result<usize> {
    let file = File::open(archive)?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

    fs::create_dir_all(dest)?;
    let root = dest.canonicalize()?;

    let mut written = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;

        // pax headers carry metadata only (GitHub stores the commit id there)
        if matches!(
            entry.header().entry_type(),
            EntryType::XGlobalHeader | EntryType::XHeader
        ) {
            continue;
        }

        let path = entry.path()?.into_owned();
        let Some(relative) = strip_components(&path, strip)? else {
            continue;
        };

        let target = root.join(&relative);
        if let Some(parent) = target.parent() {
            // a symlink already on disk may redirect the parent
            ensure_inside(&root, parent, &path)?;
            fs::create_dir_all(parent)?;
        }

        match entry.header().entry_type() {
            EntryType::Symlink => {
                let link = entry.link_name()?.map(|l| l.into_owned());
                if !link.as_deref().is_some_and(is_contained_link) {
                    warn!(entry = %path.display(), "skipping symlink that leaves the archive");
                    continue;
                }
                entry.unpack(&target)?;
            }
            EntryType::Link => {
                // hard link names are archive paths, not relative to the entry
                let source = match entry.link_name()? {
                    Some(link) => strip_components(&link, strip)?,
                    None => None,
                };
                let Some(source) = source else {
                    warn!(entry = %path.display(), "skipping hard link outside the archive tree");
                    continue;
                };
                fs::hard_link(root.join(source), &target)?;
            }
            _ => {
                entry.unpack(&target)?;
            }
        }
        written += 1;
    }

    Ok(written)
}

/// Fail unless the deepest existing ancestor of `dir` resolves inside `root`
fn ensure_inside(root: &Path, dir: &Path, entry: &Path) -> io::Result<()> {
    let existing = dir
        .ancestors()
        .find(|ancestor| ancestor.exists())
        .unwrap_or(root);
    if existing.canonicalize()?.starts_with(root) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("archive entry escapes destination: {}", entry.display()),
        ))
    }
}

/// A symlink target is kept only when it is relative and never climbs with `..`
fn is_contained_link(link: &Path) -> bool {
    link.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Drop the first `count` normal components of an archive path.
///
/// Rejects absolute paths and `..` so an entry can never land outside the destination.
fn strip_components(path: &Path, count: usize) -> io::Result<Option<PathBuf>> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unsafe path in archive: {}", path.display()),
                ));
            }
        }
    }

    if parts.len() <= count {
        return Ok(None);
    }
    Ok(Some(parts[count..].iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, Header};
    use tempfile::tempdir;

    fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
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

    #[test]
    fn test_strips_top_level_directory() {
        let tmp = tempdir().unwrap();
        let archive_path = tmp.path().join("repo.tar.gz");
        fs::write(
            &archive_path,
            build_archive(&[
                ("backend-hono-main/package.json", "{}"),
                ("backend-hono-main/src/index.ts", "export {}"),
            ]),
        )
        .unwrap();

        let dest = tmp.path().join("backend");
        let written = unpack_tar_gz(&archive_path, &dest, 1).unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read_to_string(dest.join("package.json")).unwrap(), "{}");
        assert!(dest.join("src/index.ts").is_file());
        assert!(!dest.join("backend-hono-main").exists());
    }

    #[test]
    fn test_entries_inside_stripped_prefix_are_skipped() {
        let tmp = tempdir().unwrap();
        let archive_path = tmp.path().join("repo.tar.gz");
        fs::write(
            &archive_path,
            build_archive(&[("README.md", "top"), ("repo-main/a.txt", "a")]),
        )
        .unwrap();

        let dest = tmp.path().join("out");
        let written = unpack_tar_gz(&archive_path, &dest, 1).unwrap();

        assert_eq!(written, 1);
        assert!(dest.join("a.txt").is_file());
        assert!(!dest.join("README.md").exists());
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let tmp = tempdir().unwrap();
        let archive_path = tmp.path().join("broken.tar.gz");
        fs::write(&archive_path, b"<html>not a tarball</html>").unwrap();

        assert!(unpack_tar_gz(&archive_path, &tmp.path().join("out"), 1).is_err());
    }

    fn build_archive_with_link(link: &str, link_target: &Path, file: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let encoder = GzEncoder::new(&mut bytes, Compression::default());
            let mut builder = Builder::new(encoder);

            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Symlink);
            header.set_size(0);
            header.set_mode(0o777);
            builder.append_link(&mut header, link, link_target).unwrap();

            let mut header = Header::new_gnu();
            header.set_size(4);
            header.set_mode(0o644);
            builder.append_data(&mut header, file, &b"evil"[..]).unwrap();

            builder.into_inner().unwrap().finish().unwrap();
        }
        bytes
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_destination_is_not_followed() {
        let tmp = tempdir().unwrap();
        let outside = tmp.path().join("outside");
        fs::create_dir(&outside).unwrap();

        for link_target in [outside.clone(), PathBuf::from("../../outside")] {
            let archive_path = tmp.path().join("repo.tar.gz");
            fs::write(
                &archive_path,
                build_archive_with_link("top/link", &link_target, "top/link/evil.txt"),
            )
            .unwrap();

            let dest = tmp.path().join("dest");
            let _ = fs::remove_dir_all(&dest);
            let result = unpack_tar_gz(&archive_path, &dest, 1);

            assert!(!outside.join("evil.txt").exists(), "{link_target:?} escaped");
            // the link was skipped, so the file lands in a real directory
            assert_eq!(result.unwrap(), 1);
            assert!(!dest.join("link").is_symlink());
            assert!(dest.join("link/evil.txt").is_file());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_symlink_inside_archive_is_kept() {
        let tmp = tempdir().unwrap();
        let archive_path = tmp.path().join("repo.tar.gz");
        fs::write(
            &archive_path,
            build_archive_with_link("top/link", Path::new("real"), "top/real/a.txt"),
        )
        .unwrap();

        let dest = tmp.path().join("dest");
        assert_eq!(unpack_tar_gz(&archive_path, &dest, 1).unwrap(), 2);
        assert!(dest.join("link").is_symlink());
        assert!(dest.join("link/a.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_preexisting_escape_is_refused() {
        let tmp = tempdir().unwrap();
        let outside = tmp.path().join("outside");
        fs::create_dir(&outside).unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        std::os::unix::fs::symlink(&outside, dest.join("link")).unwrap();

        let archive_path = tmp.path().join("repo.tar.gz");
        fs::write(
            &archive_path,
            build_archive(&[("top/link/nested/evil.txt", "evil")]),
        )
        .unwrap();

        let err = unpack_tar_gz(&archive_path, &dest, 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(!outside.join("nested").exists());
    }

    #[test]
    fn test_contained_links() {
        assert!(is_contained_link(Path::new("real/dir")));
        assert!(is_contained_link(Path::new("./file")));
        assert!(!is_contained_link(Path::new("/etc/passwd")));
        assert!(!is_contained_link(Path::new("a/../../b")));
    }

    #[test]
    fn test_strip_components_rejects_parent_dir() {
        let result = strip_components(Path::new("repo-main/../../etc/passwd"), 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_strip_components_keeps_nested_paths() {
        let stripped = strip_components(Path::new("./repo-main/src/app/main.ts"), 1)
            .unwrap()
            .unwrap();
        assert_eq!(stripped, PathBuf::from("src/app/main.ts"));
        assert_eq!(strip_components(Path::new("repo-main/"), 1).unwrap(), None);
    }
}
