//! License normalization and acceptability policy.
//!
//! - [`normalize`] — protocol-prefix stripping and the known-license-URL
//!   recognition table.
//! - [`policy`] — the built-in acceptable set plus the package-scoped
//!   allow-list.

pub mod normalize;
pub mod policy;
