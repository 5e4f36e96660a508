//! Extract command for a single card.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use rekvizity_core::models::config;
use rekvizity_core::{CardExtractor, CompanyExtractor, ExtractedCompanyData, FieldType};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Include confidence and source in the output
    #[arg(long)]
    show_confidence: bool,
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

impl From<config::OutputFormat> for OutputFormat {
    fn from(format: config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Json => OutputFormat::Json,
            config::OutputFormat::Csv => OutputFormat::Csv,
            config::OutputFormat::Text => OutputFormat::Text,
        }
    }
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let format = args.format.unwrap_or_else(|| config.output.format.into());

    let text = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input, e))?
    };
    debug!("Read {} chars from {}", text.chars().count(), args.input);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting requisites...");

    let extractor = CardExtractor::with_config(config.extraction.clone());
    let data = extractor.extract(&text);

    pb.finish_and_clear();

    let rendered = format_data(&data, format, args.show_confidence, config.output.pretty)?;

    if let Some(output) = args.output {
        fs::write(&output, &rendered)?;
        println!(
            "{} Extracted {} fields to {}",
            style("✓").green(),
            data.extracted_fields_count,
            output.display()
        );
    } else {
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
    }

    if args.show_confidence && format == OutputFormat::Json {
        eprintln!(
            "{} Overall confidence: {}% ({} fields)",
            style("ℹ").blue(),
            data.overall_confidence,
            data.extracted_fields_count
        );
    }

    Ok(())
}

/// Render a record in the requested format.
pub fn format_data(
    data: &ExtractedCompanyData,
    format: OutputFormat,
    show_confidence: bool,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Json => Ok(serde_json::to_string(data)?),
        OutputFormat::Csv => format_csv(data, show_confidence),
        OutputFormat::Text => Ok(format_text(data, show_confidence)),
    }
}

fn format_csv(data: &ExtractedCompanyData, show_confidence: bool) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    if show_confidence {
        wtr.write_record(["field", "value", "confidence", "source"])?;
    } else {
        wtr.write_record(["field", "value"])?;
    }

    for (field, value) in data.present_fields() {
        if show_confidence {
            wtr.write_record([
                field.name(),
                &value.value,
                &value.confidence.to_string(),
                &format!("{:?}", value.source).to_lowercase(),
            ])?;
        } else {
            wtr.write_record([field.name(), &value.value])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(data: &ExtractedCompanyData, show_confidence: bool) -> String {
    let mut output = String::new();

    for field in FieldType::ALL {
        let Some(value) = data.get(field) else {
            continue;
        };
        output.push_str(&format!("{:<12} {}", label(field), value.value));
        if show_confidence {
            output.push_str(&format!(" ({}%)", value.confidence));
        }
        output.push('\n');
    }

    if show_confidence {
        output.push_str(&format!(
            "\nFields: {}, confidence: {}%\n",
            data.extracted_fields_count, data.overall_confidence
        ));

        let missing: Vec<&str> = data.missing_fields().into_iter().map(|f| f.name()).collect();
        if !missing.is_empty() {
            output.push_str(&format!("Missing: {}\n", missing.join(", ")));
        }
    }

    output
}

fn label(field: FieldType) -> &'static str {
    match field {
        FieldType::CompanyName => "Company:",
        FieldType::LegalName => "Legal name:",
        FieldType::Inn => "INN:",
        FieldType::Kpp => "KPP:",
        FieldType::Ogrn => "OGRN:",
        FieldType::BankName => "Bank:",
        FieldType::BankAccount => "Account:",
        FieldType::CorrAccount => "Corr. acc.:",
        FieldType::BankBik => "BIK:",
        FieldType::Phone => "Phone:",
        FieldType::Email => "Email:",
        FieldType::Address => "Address:",
        FieldType::Director => "Director:",
    }
}
