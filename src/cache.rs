use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::license::normalize::normalize;
use crate::models::PackageIdentity;

pub const CACHE_FILE_NAME: &str = "licenses.cache";

/// Durable `package identity → resolved license` store.
///
/// One entry per line, `name/version license`. Values written by older
/// versions (full URLs with protocol prefixes) are upgraded when the file is
/// loaded; the upgrade alone never rewrites the file.
pub struct LicenseCache {
    path: PathBuf,
    entries: HashMap<PackageIdentity, String>,
    dirty: bool,
}

impl LicenseCache {
    /// Load from disk. A missing or unreadable file is an empty cache.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => parse_entries(&content),
            Err(_) => HashMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        }
    }

    /// A cache that neither reads nor persists, for one-shot scans.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            entries: HashMap::new(),
            dirty: false,
        }
    }

    pub fn try_get(&self, identity: &PackageIdentity) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    /// Record a resolved license. Re-putting an identical entry is a no-op
    /// and does not mark the cache for rewriting.
    pub fn put(&mut self, identity: PackageIdentity, license: String) {
        match self.entries.get(&identity) {
            Some(existing) if *existing == license => {}
            _ => {
                self.entries.insert(identity, license);
                self.dirty = true;
            }
        }
    }

    /// Persist via a sibling temp file and rename, so a crashed or
    /// interleaved writer never leaves a truncated store. Skipped entirely
    /// when nothing changed since load.
    pub fn save(&self) -> Result<()> {
        if !self.dirty || self.path.as_os_str().is_empty() {
            return Ok(());
        }

        let mut lines: Vec<(&PackageIdentity, &String)> = self.entries.iter().collect();
        lines.sort_by_key(|(identity, _)| (identity.name.clone(), identity.version.clone()));

        let mut out = String::new();
        for (identity, license) in lines {
            out.push_str(&format!("{identity} {license}\n"));
        }

        let tmp = self.path.with_extension("cache.tmp");
        std::fs::write(&tmp, out)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(content: &str) -> HashMap<PackageIdentity, String> {
    let mut entries = HashMap::new();
    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let (key, license) = match line.split_once(' ') {
            Some((key, license)) => (key, license),
            None => (line, ""),
        };
        let Some((name, version)) = key.split_once('/') else {
            continue;
        };
        entries.insert(
            PackageIdentity::new(name, version),
            normalize_cached_license_url(license),
        );
    }
    entries
}

/// Upgrade a stored value written before protocol stripping existed. Same
/// rules as live normalization, so current-format values pass through.
fn normalize_cached_license_url(license: &str) -> String {
    normalize(license.trim())
}
