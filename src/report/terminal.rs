use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{Decision, ScanOutcome, Violation};

/// Render a colored terminal report.
pub fn render(outcome: &ScanOutcome, path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = outcome.decisions.len();
    let accepted = outcome.decisions.iter().filter(|d| d.accepted).count();
    let violations = outcome.violations.len();

    if quiet {
        println!(
            "Total: {}  Accepted: {}  Violations: {}",
            total,
            accepted.to_string().green(),
            violations.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-gate".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}\n", path.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Packages examined  : {}", total)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Accepted        : {:>4}", "✓".green(), accepted)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Violations      : {:>4}", "✗".red(), violations)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if violations > 0 {
        println!(
            " {} Packages with unacceptable licenses:\n",
            "[VIOLATION]".red().bold()
        );
        render_violations(&outcome.violations);
        println!();
    }

    if verbose {
        if total > 0 {
            println!(" {} License decisions:\n", "[DEBUG]".cyan().bold());
            render_decisions(&outcome.decisions);
            println!();
        }
        if !outcome.ignored_allow_list_lines.is_empty() {
            println!(
                " {} Ignored allow-list lines (no package qualifier):\n",
                "[DEBUG]".cyan().bold()
            );
            for line in &outcome.ignored_allow_list_lines {
                println!("   {}", line.dimmed());
            }
            println!();
        }
    }

    Ok(())
}

fn render_violations(violations: &[Violation]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
        ]);

    for violation in violations {
        table.add_row(vec![
            Cell::new(&violation.name),
            Cell::new(&violation.version),
            Cell::new(display_license(&violation.license)).fg(Color::Red),
        ]);
    }

    println!("{}", table);
}

fn render_decisions(decisions: &[Decision]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
        ]);

    for decision in decisions {
        let (verdict_str, verdict_color) = if decision.accepted {
            ("✓ accepted", Color::Green)
        } else {
            ("✗ violation", Color::Red)
        };

        table.add_row(vec![
            Cell::new(&decision.package.name),
            Cell::new(&decision.package.version),
            Cell::new(display_license(&decision.license)),
            Cell::new(decision.source.to_string()),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn display_license(license: &str) -> &str {
    if license.is_empty() {
        "unknown"
    } else {
        license
    }
}
