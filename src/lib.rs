//! `license-gate` — resolve a .NET project's NuGet dependencies, look up
//! each package's declared license, and enforce an organizational policy.
//!
//! # Pipeline
//! 1. Resolve the build's package identities and nuspec locations
//!    ([`resolver`]).
//! 2. Per package: serve the license from the durable cache, or extract it
//!    from the nuspec ([`cache`], [`nuspec`]).
//! 3. Normalize URL-shaped declarations ([`license::normalize`]).
//! 4. Decide acceptability: built-in permissive set, then the
//!    package-scoped allow-list ([`license::policy`]).
//! 5. Collect one violation per non-compliant package plus a debug decision
//!    stream ([`engine`]).
//!
//! The engine is a plain function over explicit values — no ambient state —
//! so any wrapper (the bundled CLI, a build task) can drive it, concurrently
//! across projects if it wants to.

pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod license;
pub mod models;
pub mod nuspec;
pub mod report;
pub mod resolver;

pub use cache::LicenseCache;
pub use engine::evaluate_dependencies;
pub use license::policy::{AllowList, Policy};
pub use models::{PackageIdentity, ScanOutcome, Violation};
