use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use license_gate::cli::{Cli, ReportFormat};
use license_gate::config::{load_config, resolve_path};
use license_gate::{engine, report, AllowList, LicenseCache, Policy};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve project path
    let path = cli.path.canonicalize().unwrap_or_else(|_| cli.path.clone());

    // Load file locations
    let config = load_config(&path, cli.config.as_deref())?;

    // Build the policy from the allow-list
    let allow_list_path = cli
        .allow_list
        .clone()
        .unwrap_or_else(|| resolve_path(&path, &config.files.allow_list));
    let allow_list = AllowList::load(&allow_list_path)?;
    if !cli.quiet && !allow_list.is_empty() {
        eprintln!(
            "  {} {} allow-list entries from {}",
            "→".cyan(),
            allow_list.len(),
            allow_list_path.display()
        );
    }
    let policy = Policy::new(allow_list);

    // Load the license cache
    let cache_path = cli
        .cache
        .clone()
        .unwrap_or_else(|| resolve_path(&path, &config.files.cache));
    let mut cache = if cli.no_cache {
        LicenseCache::ephemeral()
    } else {
        LicenseCache::load(&cache_path)
    };

    let outcome = engine::evaluate_dependencies(&path, &policy, &mut cache)?;

    cache.save()?;

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&outcome, &path, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    // Exit code: 1 if any violation found
    if !outcome.violations.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
