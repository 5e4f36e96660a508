//! Batch extraction over multiple card text files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use rekvizity_core::{CardExtractor, CompanyExtractor, ExtractedCompanyData, FieldType};

use super::extract::{format_data, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    data: Option<ExtractedCompanyData>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let format = args.format.unwrap_or_else(|| config.output.format.into());

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(CardExtractor::with_config(config.extraction.clone()));
    let jobs = args.jobs.max(1);
    let mut pending = files.into_iter();
    let mut workers = JoinSet::new();
    let mut results = Vec::new();

    loop {
        while workers.len() < jobs {
            let Some(path) = pending.next() else {
                break;
            };
            let extractor = Arc::clone(&extractor);
            workers.spawn_blocking(move || process_file(path, extractor.as_ref()));
        }

        let Some(joined) = workers.join_next().await else {
            break;
        };
        let result = joined?;
        pb.inc(1);

        if let Some(ref err) = result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), err);
            } else {
                error!("Failed to process {}: {}", result.path.display(), err);
                pb.abandon();
                workers.abort_all();
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), err);
            }
        }
        results.push(result);
    }

    pb.finish_with_message("Complete");
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful = results.iter().filter(|r| r.data.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(ref output_dir) = args.output_dir {
        let reserved: &[&str] = if args.summary { &[SUMMARY_FILE] } else { &[] };
        let names = output_names(&results, format.extension(), reserved);

        for (result, output_name) in results.iter().zip(names) {
            let Some(data) = &result.data else {
                continue;
            };
            let output_path = output_dir.join(output_name);

            let content = format_data(data, format, false, config.output.pretty)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join(SUMMARY_FILE))
            .unwrap_or_else(|| PathBuf::from(SUMMARY_FILE));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(path: PathBuf, extractor: &CardExtractor) -> FileResult {
    let file_start = Instant::now();
    let outcome = fs::read_to_string(&path).map(|text| extractor.extract(&text));
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(data) => FileResult {
            path,
            data: Some(data),
            error: None,
            processing_time_ms,
        },
        Err(e) => FileResult {
            path,
            data: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

/// Output file name for each result: `<stem>.<ext>`, with `-2`, `-3`, ...
/// appended when stems from different directories or extensions collide.
fn output_names(results: &[FileResult], extension: &str, reserved: &[&str]) -> Vec<String> {
    let mut used: HashSet<String> = reserved.iter().map(|n| n.to_string()).collect();

    results
        .iter()
        .map(|result| {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("card");

            let mut name = format!("{}.{}", stem, extension);
            let mut n = 2;
            while used.contains(&name) {
                name = format!("{}-{}.{}", stem, n, extension);
                n += 1;
            }
            if n > 2 {
                warn!(
                    "Output for {} would overwrite another file, writing {}",
                    result.path.display(),
                    name
                );
            }

            used.insert(name.clone());
            name
        })
        .collect()
}

const SUMMARY_FILE: &str = "summary.csv";

const SUMMARY_FIELDS: [FieldType; 6] = [
    FieldType::CompanyName,
    FieldType::Inn,
    FieldType::Kpp,
    FieldType::Ogrn,
    FieldType::BankAccount,
    FieldType::BankBik,
];

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(SUMMARY_FIELDS.iter().map(|f| f.name()));
    header.extend(["fields", "confidence", "processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        if let Some(data) = &result.data {
            record.push("success".to_string());
            record.extend(
                SUMMARY_FIELDS
                    .iter()
                    .map(|f| data.value(*f).unwrap_or_default().to_string()),
            );
            record.push(data.extracted_fields_count.to_string());
            record.push(data.overall_confidence.to_string());
            record.push(result.processing_time_ms.to_string());
            record.push(String::new());
        } else {
            record.push("error".to_string());
            record.extend(SUMMARY_FIELDS.iter().map(|_| String::new()));
            record.push(String::new());
            record.push(String::new());
            record.push(result.processing_time_ms.to_string());
            record.push(result.error.clone().unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str) -> FileResult {
        FileResult {
            path: PathBuf::from(path),
            data: Some(ExtractedCompanyData::default()),
            error: None,
            processing_time_ms: 0,
        }
    }

    #[test]
    fn test_colliding_stems_get_distinct_names() {
        let results = [
            result("cards/a/card.txt"),
            result("cards/b/card.txt"),
            result("cards/card.ocr"),
            result("cards/other.txt"),
        ];

        let names = output_names(&results, "json", &[]);
        assert_eq!(names, vec!["card.json", "card-2.json", "card-3.json", "other.json"]);
    }

    #[test]
    fn test_summary_name_is_reserved() {
        let results = [result("cards/summary.txt")];

        assert_eq!(output_names(&results, "csv", &[SUMMARY_FILE]), vec!["summary-2.csv"]);
        assert_eq!(output_names(&results, "json", &[SUMMARY_FILE]), vec!["summary.json"]);
    }
}
