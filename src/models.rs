use serde::{Deserialize, Serialize};

use crate::license::normalize::{normalize, recognize_license_url};

/// A resolved package reference: name plus exact restored version.
///
/// Uniquely keys license cache entries; a version bump produces a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for PackageIdentity {
    /// The assets-file key form, `name/version`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// A license declaration as it appears in a nuspec, before any comparison.
///
/// File names are opaque artifact names and must never be normalized; URLs
/// are. The shapes stay apart until [`as_policy_token`] collapses them.
///
/// [`as_policy_token`]: DeclaredLicense::as_policy_token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DeclaredLicense {
    /// `<license type="file">` — a file shipped inside the package.
    File(String),
    /// `<license type="expression">` — an SPDX expression.
    Expression(String),
    /// Legacy `<licenseUrl>` declaration.
    Url(String),
    /// No license metadata at all.
    #[default]
    Unknown,
}

impl DeclaredLicense {
    /// Collapse to the comparable string used by the policy and the cache.
    ///
    /// Files and expressions pass through verbatim. URLs resolve to their
    /// SPDX token when recognized, otherwise to their normalized form.
    /// An unknown license collapses to the empty string, which no policy
    /// tier accepts.
    pub fn as_policy_token(&self) -> String {
        match self {
            DeclaredLicense::File(name) => name.clone(),
            DeclaredLicense::Expression(expr) => expr.clone(),
            DeclaredLicense::Url(url) => recognize_license_url(url)
                .map(str::to_string)
                .unwrap_or_else(|| normalize(url)),
            DeclaredLicense::Unknown => String::new(),
        }
    }
}

/// License metadata extracted from one nuspec document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageLicenseInfo {
    pub license: DeclaredLicense,
    /// Normalized `<projectUrl>`, when the element is present.
    pub project_url: Option<String>,
}

/// One non-compliant package. Emitted at most once per identity per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub name: String,
    pub version: String,
    pub license: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Package '{}' {} has unacceptable license '{}'",
            self.name, self.version, self.license
        )
    }
}

/// Where a package's resolved license came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LicenseSource {
    /// Served from `licenses.cache` without touching the nuspec.
    Cache,
    /// Extracted from the package's nuspec this run.
    Manifest,
    /// The nuspec could not be located or read.
    Unknown,
}

impl std::fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseSource::Cache => write!(f, "cache"),
            LicenseSource::Manifest => write!(f, "manifest"),
            LicenseSource::Unknown => write!(f, "unknown"),
        }
    }
}

/// Debug-stream record: one per examined package, compliant or not.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub package: PackageIdentity,
    pub license: String,
    pub accepted: bool,
    pub source: LicenseSource,
}

/// Everything one engine run produced.
#[derive(Debug, Default, Serialize)]
pub struct ScanOutcome {
    pub violations: Vec<Violation>,
    pub decisions: Vec<Decision>,
    /// Allow-list lines that were dropped for lacking a package qualifier.
    pub ignored_allow_list_lines: Vec<String>,
}
