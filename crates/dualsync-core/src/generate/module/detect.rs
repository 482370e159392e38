//! Backend framework detection from `package.json`

use super::{BackendKind, ModuleError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Marker dependency per framework, first match wins
pub const MARKERS: &[(&str, BackendKind)] = &[
    ("@nestjs/core", BackendKind::Nest),
    ("hono", BackendKind::Hono),
    ("express", BackendKind::Express),
];

pub const DEFAULT_KIND: BackendKind = BackendKind::Express;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// Classify a backend from the names of its declared dependencies
pub fn classify<'a, I>(dependencies: I) -> BackendKind
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = dependencies.into_iter().collect();
    MARKERS
        .iter()
        .find(|(marker, _)| names.contains(marker))
        .map(|(_, kind)| *kind)
        .unwrap_or(DEFAULT_KIND)
}

/// Read `<backend>/package.json` and classify it. A missing manifest means the default kind.
pub fn detect(backend_dir: &Path) -> Result<BackendKind, ModuleError> {
    let path = backend_dir.join("package.json");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(DEFAULT_KIND),
        Err(e) => {
            return Err(ModuleError::Manifest {
                path,
                reason: e.to_string(),
            })
        }
    };

    let manifest: PackageManifest =
        serde_json::from_str(&text).map_err(|e| ModuleError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    Ok(classify(
        manifest
            .dependencies
            .keys()
            .chain(manifest.dev_dependencies.keys())
            .map(String::as_str),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_priority_order() {
        assert_eq!(classify(["express", "@nestjs/core"]), BackendKind::Nest);
        assert_eq!(classify(["express", "hono"]), BackendKind::Hono);
        assert_eq!(classify(["express", "cors"]), BackendKind::Express);
    }

    #[test]
    fn test_default_without_markers() {
        assert_eq!(classify(["lodash"]), BackendKind::Express);
        assert_eq!(classify(Vec::<&str>::new()), BackendKind::Express);
    }

    #[test]
    fn test_dev_dependencies_count() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("package.json"),
            r#"{"name":"api","devDependencies":{"@nestjs/core":"^10.0.0"}}"#,
        )
        .unwrap();
        assert_eq!(detect(tmp.path()).unwrap(), BackendKind::Nest);
    }

    #[test]
    fn test_missing_manifest_defaults() {
        let tmp = tempdir().unwrap();
        assert_eq!(detect(tmp.path()).unwrap(), BackendKind::Express);
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("package.json"), "{ not json").unwrap();
        assert!(matches!(
            detect(tmp.path()),
            Err(ModuleError::Manifest { .. })
        ));
    }
}
