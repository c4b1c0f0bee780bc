use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::license::normalize::recognize_license_url;
use crate::models::PackageIdentity;

/// Allow-list file name, looked up next to the project being scanned.
pub const ALLOW_LIST_FILE_NAME: &str = "Allowed.Licenses.txt";

/// Licenses every package may use without an allow-list entry.
///
/// SPDX tokens plus a handful of normalized license URLs that predate SPDX
/// metadata in the NuGet ecosystem. Membership is case-insensitive.
const DEFAULT_ACCEPTABLE_LICENSES: &[&str] = &[
    "MIT",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "ISC",
    "Unlicense",
    "0BSD",
    "PostgreSQL",
    "github.com/dotnet/corefx/blob/master/LICENSE.TXT",
    "github.com/dotnet/standard/blob/master/LICENSE.TXT",
];

/// Package-scoped license exceptions.
///
/// Each entry binds one license string to one package name. A line carrying
/// only a license token would let any package sharing that string (a generic
/// file name like `LICENSE.md`, say) slip through, so such lines are dropped
/// at parse time and only surfaced on the debug stream.
#[derive(Debug, Default)]
pub struct AllowList {
    entries: HashSet<(String, String)>,
    rejected: Vec<String>,
}

impl AllowList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse allow-list text: one `<PackageName> <License>` pair per line,
    /// split on the first space. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashSet::new();
        let mut rejected = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(' ') {
                Some((package, license)) if !license.trim().is_empty() => {
                    entries.insert((
                        package.to_ascii_lowercase(),
                        license.trim().to_ascii_lowercase(),
                    ));
                }
                _ => rejected.push(line.to_string()),
            }
        }

        Self { entries, rejected }
    }

    /// Load from disk. A missing file is an empty allow-list, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::empty());
        }
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Whether `(package, license)` has a combined entry. Case-insensitive
    /// on both fields.
    pub fn permits(&self, package: &str, license: &str) -> bool {
        self.entries
            .contains(&(package.to_ascii_lowercase(), license.to_ascii_lowercase()))
    }

    /// Lines dropped for lacking a package qualifier.
    pub fn rejected_lines(&self) -> &[String] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two-tier acceptability policy.
pub struct Policy {
    allow_list: AllowList,
}

impl Policy {
    pub fn new(allow_list: AllowList) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Decide acceptability of `license` for `identity`.
    ///
    /// A license in the global set is acceptable for every package. Anything
    /// else needs a combined allow-list entry binding this exact package name
    /// to this exact license string — matched against the string as given,
    /// not its URL-resolved token. The empty license is never acceptable.
    pub fn is_acceptable(&self, identity: &PackageIdentity, license: &str) -> bool {
        let resolved = recognize_license_url(license).unwrap_or(license);

        if DEFAULT_ACCEPTABLE_LICENSES
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(resolved))
        {
            return true;
        }

        self.allow_list.permits(&identity.name, license)
    }
}
