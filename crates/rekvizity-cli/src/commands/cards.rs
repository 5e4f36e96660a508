//! Cards command: run the extractor over the built-in reference cards.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::debug;

use rekvizity_core::regression::{
    compare_with_baseline, run_regression, BaselineComparison, RegressionReport, REQUIRED_FIELDS,
};
use rekvizity_core::{CardExtractor, PATTERN_LIBRARY_VERSION};

/// Arguments for the cards command.
#[derive(Args)]
pub struct CardsArgs {
    /// Show fields whose values differ from the reference
    #[arg(long)]
    verbose_fields: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Compare against a report saved earlier with --save-baseline
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Save this run's report for later comparison
    #[arg(long)]
    save_baseline: Option<PathBuf>,
}

pub async fn run(args: CardsArgs) -> anyhow::Result<()> {
    let report = run_regression(&CardExtractor::new());

    let comparison = match &args.baseline {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read baseline {}", path.display()))?;
            let baseline = RegressionReport::from_json(&json)?;
            Some(compare_with_baseline(&baseline, &report))
        }
        None => None,
    };

    if let Some(path) = &args.save_baseline {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        debug!("Saved baseline to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} Pattern library {}",
            style("ℹ").blue(),
            PATTERN_LIBRARY_VERSION
        );
        println!();

        for card in &report.cards {
            let mark = if card.success {
                style("✓").green()
            } else {
                style("✗").red()
            };
            println!(
                "{} {:<28} {}/{} required",
                mark,
                card.id,
                card.required_found,
                REQUIRED_FIELDS.len()
            );

            if args.verbose_fields {
                for check in card.mismatches() {
                    println!(
                        "    {}: expected {}, got {}",
                        check.field,
                        check.expected.as_deref().unwrap_or("-"),
                        check.actual.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        println!();
        println!(
            "{} {}/{} cards successful ({:.0}%)",
            style("✓").green(),
            report.successful_cards,
            report.total_cards,
            report.success_rate() * 100.0
        );

        if let Some(comparison) = &comparison {
            print_comparison(comparison);
        }
    }

    if let Some(path) = &args.save_baseline {
        eprintln!("{} Baseline saved to {}", style("✓").green(), path.display());
    }

    if let Some(comparison) = comparison.filter(|c| !c.is_compatible()) {
        for regression in &comparison.regressions {
            eprintln!("{} {}", style("✗").red(), regression);
        }
        anyhow::bail!(
            "{} regressions against baseline {}",
            comparison.regressions.len(),
            comparison.baseline_version
        );
    }

    if !report.regressions.is_empty() {
        for regression in &report.regressions {
            eprintln!("{} {}", style("✗").red(), regression);
        }
        anyhow::bail!("{} reference card regressions", report.regressions.len());
    }

    Ok(())
}

fn print_comparison(comparison: &BaselineComparison) {
    println!();
    println!(
        "{} Baseline {} -> {}: confidence {:+.1}, success rate {:+.0}%",
        style("ℹ").blue(),
        comparison.baseline_version,
        comparison.current_version,
        comparison.confidence_change,
        comparison.success_rate_change * 100.0
    );
    for warning in &comparison.warnings {
        println!("  {} {}", style("!").yellow(), warning);
    }
}
