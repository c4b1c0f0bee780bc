use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::cache::LicenseCache;
use crate::license::policy::Policy;
use crate::models::{Decision, LicenseSource, ScanOutcome, Violation};
use crate::nuspec;
use crate::resolver::{self, ResolvedPackage};

/// Evaluate every resolved dependency of `project_path` against `policy`.
///
/// License lookups are served from `cache` where possible; misses parse the
/// package's nuspec and populate the cache. The caller decides when to
/// persist the cache. An unrestored project produces an empty outcome.
pub fn evaluate_dependencies(
    project_path: &Path,
    policy: &Policy,
    cache: &mut LicenseCache,
) -> Result<ScanOutcome> {
    let packages = resolver::resolve_dependencies(project_path)?;
    Ok(evaluate_packages(&packages, policy, cache))
}

/// Core pipeline over an already-resolved package list.
///
/// Emits at most one violation and one decision per identity per run;
/// duplicates from the resolver are collapsed. A package whose nuspec cannot
/// be read is treated as having no declared license — reported, never
/// auto-accepted, and not cached.
pub fn evaluate_packages(
    packages: &[ResolvedPackage],
    policy: &Policy,
    cache: &mut LicenseCache,
) -> ScanOutcome {
    let mut outcome = ScanOutcome {
        ignored_allow_list_lines: policy.allow_list().rejected_lines().to_vec(),
        ..ScanOutcome::default()
    };
    let mut seen = HashSet::new();

    for package in packages {
        if !seen.insert(package.identity.clone()) {
            continue;
        }

        let (license, source) = match cache.try_get(&package.identity) {
            Some(cached) => (cached.to_string(), LicenseSource::Cache),
            None => match std::fs::read_to_string(&package.nuspec_path) {
                Ok(xml) => {
                    let info = nuspec::extract_license_info(&xml);
                    let license = info.license.as_policy_token();
                    cache.put(package.identity.clone(), license.clone());
                    (license, LicenseSource::Manifest)
                }
                Err(_) => (String::new(), LicenseSource::Unknown),
            },
        };

        let accepted = policy.is_acceptable(&package.identity, &license);
        if !accepted {
            outcome.violations.push(Violation {
                name: package.identity.name.clone(),
                version: package.identity.version.clone(),
                license: license.clone(),
            });
        }
        outcome.decisions.push(Decision {
            package: package.identity.clone(),
            license,
            accepted,
            source,
        });
    }

    outcome
}
