//! Root `.gitignore`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const IGNORED: &[&str] = &["node_modules/", "dist/", ".env", ".env.local", ".DS_Store", "*.log"];

pub fn contents() -> String {
    let mut text = IGNORED.join("\n");
    text.push('\n');
    text
}

/// Write `.gitignore` at the project root, replacing any existing one
pub fn write_gitignore(root: &Path) -> io::Result<PathBuf> {
    let path = root.join(".gitignore");
    fs::write(&path, contents())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_one_entry_per_line() {
        let lines: Vec<String> = contents().lines().map(str::to_string).collect();
        assert_eq!(
            lines,
            vec!["node_modules/", "dist/", ".env", ".env.local", ".DS_Store", "*.log"]
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(".gitignore"), "target/\n").unwrap();
        write_gitignore(tmp.path()).unwrap();
        let written = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(!written.contains("target/"));
        assert!(written.starts_with("node_modules/\n"));
    }
}
