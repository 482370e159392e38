//! Recursive template copying from a local directory

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Directory names never copied out of a template tree
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Copy every file under `src` into `dest`, preserving the relative layout.
///
/// Returns the relative paths of the copied files.
pub fn copy_dir(src: &Path, dest: &Path) -> io::Result<Vec<String>> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source directory not found: {}", src.display()),
        ));
    }

    fs::create_dir_all(dest)?;

    let mut copied = Vec::new();
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        });

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }

    Ok(copied)
}
