//! Report renderers for scan outcomes.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects
//!   `--verbose` / `--quiet`. The JSON report is plain `serde_json` over the
//!   outcome and lives with the CLI driver.

pub mod terminal;
