use std::path::{Path, PathBuf};

use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;

use crate::models::PackageIdentity;

/// NuGet restore output listing the build's resolved package graph.
pub const ASSETS_FILE_NAME: &str = "project.assets.json";

/// A package pulled in by the current build, plus where its nuspec lives.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub identity: PackageIdentity,
    pub nuspec_path: PathBuf,
}

/// Enumerate the build's resolved packages.
///
/// Reads `obj/project.assets.json`; an unrestored project has no assets file
/// and yields an empty list, not an error. Legacy projects that only carry a
/// `packages.config` are handled as a fallback, with nuspecs looked up in
/// the global packages folder. Resolution is read-only.
pub fn resolve_dependencies(project_path: &Path) -> Result<Vec<ResolvedPackage>> {
    let assets = project_path.join("obj").join(ASSETS_FILE_NAME);
    if assets.exists() {
        return parse_assets_file(&assets);
    }

    let packages_config = project_path.join("packages.config");
    if packages_config.exists() {
        return parse_packages_config(&packages_config, &global_packages_folder());
    }

    Ok(Vec::new())
}

/// `$NUGET_PACKAGES` when set, else `~/.nuget/packages`.
pub fn global_packages_folder() -> PathBuf {
    if let Ok(dir) = std::env::var("NUGET_PACKAGES") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".nuget").join("packages"))
        .unwrap_or_else(|| PathBuf::from(".nuget/packages"))
}

/// Parse the assets file: `libraries` entries of type `package` keyed as
/// `Name/Version`, searched across the file's `packageFolders`.
///
/// An unreadable or malformed assets file idles the run like a missing one;
/// the host build must not be aborted over it.
fn parse_assets_file(path: &Path) -> Result<Vec<ResolvedPackage>> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Ok(Vec::new());
    };
    let Ok(json) = serde_json::from_str::<Value>(&content) else {
        return Ok(Vec::new());
    };

    let mut folders: Vec<PathBuf> = json
        .get("packageFolders")
        .and_then(|v| v.as_object())
        .map(|m| m.keys().map(PathBuf::from).collect())
        .unwrap_or_default();
    if folders.is_empty() {
        folders.push(global_packages_folder());
    }

    let mut packages = Vec::new();
    if let Some(libraries) = json.get("libraries").and_then(|v| v.as_object()) {
        for (key, info) in libraries {
            if info.get("type").and_then(|v| v.as_str()) != Some("package") {
                continue;
            }
            let Some((name, version)) = key.split_once('/') else {
                continue;
            };
            let identity = PackageIdentity::new(name, version);
            let nuspec_path = locate_nuspec(&folders, &identity);
            packages.push(ResolvedPackage {
                identity,
                nuspec_path,
            });
        }
    }

    Ok(packages)
}

/// Parse legacy `<package id="..." version="..." />` entries.
fn parse_packages_config(path: &Path, packages_folder: &Path) -> Result<Vec<ResolvedPackage>> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Ok(Vec::new());
    };
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let folders = [packages_folder.to_path_buf()];
    let mut packages = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                if tag == "package" {
                    let mut id = String::new();
                    let mut version = String::new();
                    for attr in e.attributes().flatten() {
                        let key =
                            String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                        let val = attr.unescape_value().unwrap_or_default().into_owned();
                        match key.as_str() {
                            "id" => id = val,
                            "version" => version = val,
                            _ => {}
                        }
                    }
                    if !id.is_empty() {
                        let identity = PackageIdentity::new(id, version);
                        let nuspec_path = locate_nuspec(&folders, &identity);
                        packages.push(ResolvedPackage {
                            identity,
                            nuspec_path,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(packages)
}

/// Packages folders hold one nuspec per package at
/// `<folder>/<name>/<version>/<name>.nuspec`, all lowercase.
///
/// When no folder contains the file, the first folder's expected path is
/// returned so the package is still examined (and reported as unknown)
/// rather than silently dropped.
fn locate_nuspec(folders: &[PathBuf], identity: &PackageIdentity) -> PathBuf {
    let name = identity.name.to_lowercase();
    let version = identity.version.to_lowercase();
    let relative = PathBuf::from(&name)
        .join(&version)
        .join(format!("{name}.nuspec"));

    if let Some(found) = folders.iter().map(|f| f.join(&relative)).find(|p| p.exists()) {
        return found;
    }
    match folders.first() {
        Some(folder) => folder.join(&relative),
        None => relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_unrestored_project_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let packages = resolve_dependencies(dir.path()).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_parse_assets_file() {
        let dir = tempfile::tempdir().unwrap();
        let packages_dir = dir.path().join("packages");
        let nuspec = packages_dir.join("newtonsoft.json/13.0.1/newtonsoft.json.nuspec");
        fs::create_dir_all(nuspec.parent().unwrap()).unwrap();
        fs::write(&nuspec, "<package/>").unwrap();

        let assets = serde_json::json!({
            "version": 3,
            "libraries": {
                "Newtonsoft.Json/13.0.1": { "type": "package", "path": "newtonsoft.json/13.0.1" },
                "MyCompany.Internal/2.0.0": { "type": "project" }
            },
            "packageFolders": {
                (packages_dir.to_str().unwrap()): {}
            }
        });
        let obj = dir.path().join("obj");
        fs::create_dir_all(&obj).unwrap();
        fs::write(obj.join(ASSETS_FILE_NAME), assets.to_string()).unwrap();

        let packages = resolve_dependencies(dir.path()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].identity, PackageIdentity::new("Newtonsoft.Json", "13.0.1"));
        assert_eq!(packages[0].nuspec_path, nuspec);
    }

    #[test]
    fn test_assets_file_with_unlocatable_nuspec_keeps_package() {
        let dir = tempfile::tempdir().unwrap();
        let packages_dir = dir.path().join("packages");
        fs::create_dir_all(&packages_dir).unwrap();

        let assets = serde_json::json!({
            "version": 3,
            "libraries": {
                "Missing.Package/1.2.3": { "type": "package" }
            },
            "packageFolders": {
                (packages_dir.to_str().unwrap()): {}
            }
        });
        let obj = dir.path().join("obj");
        fs::create_dir_all(&obj).unwrap();
        fs::write(obj.join(ASSETS_FILE_NAME), assets.to_string()).unwrap();

        let packages = resolve_dependencies(dir.path()).unwrap();
        assert_eq!(packages.len(), 1);
        assert!(!packages[0].nuspec_path.exists());
        assert!(packages[0]
            .nuspec_path
            .ends_with("missing.package/1.2.3/missing.package.nuspec"));
    }

    #[test]
    fn test_parse_packages_config() {
        let dir = tempfile::tempdir().unwrap();
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="13.0.1" targetFramework="net452" />
  <package id="Serilog" version="2.12.0" targetFramework="net452" />
</packages>"#;
        let config = dir.path().join("packages.config");
        fs::write(&config, xml).unwrap();

        let folder = dir.path().join("store");
        let packages = parse_packages_config(&config, &folder).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].identity, PackageIdentity::new("Newtonsoft.Json", "13.0.1"));
        assert_eq!(packages[1].identity, PackageIdentity::new("Serilog", "2.12.0"));
        assert!(packages[0]
            .nuspec_path
            .ends_with("newtonsoft.json/13.0.1/newtonsoft.json.nuspec"));
    }

    #[test]
    fn test_malformed_assets_file_idles_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("obj");
        fs::create_dir_all(&obj).unwrap();
        fs::write(obj.join(ASSETS_FILE_NAME), "not json").unwrap();

        let packages = resolve_dependencies(dir.path()).unwrap();
        assert!(packages.is_empty());
    }
}
