//! Process command - extract structured data from a single document file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use docsift_core::{DocsiftConfig, DocumentKind, DocumentPipeline, DocumentRecord, TextRecognizer};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Document category; inferred from keywords when omitted
    #[arg(short = 'k', long)]
    category: Option<CategoryArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (line items land in a sibling `_items.csv` file)
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CategoryArg {
    Invoice,
    Safety,
    Insurance,
    Personal,
}

impl From<CategoryArg> for DocumentKind {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Invoice => DocumentKind::Invoice,
            CategoryArg::Safety => DocumentKind::Safety,
            CategoryArg::Insurance => DocumentKind::Insurance,
            CategoryArg::Personal => DocumentKind::Personal,
        }
    }
}

/// Pick the recognition backend the build provides.
pub fn build_recognizer(config: &DocsiftConfig) -> Box<dyn TextRecognizer + Send + Sync> {
    #[cfg(feature = "tesseract")]
    {
        Box::new(docsift_core::TesseractRecognizer::new(&config.ocr))
    }
    #[cfg(not(feature = "tesseract"))]
    {
        let _ = config;
        Box::new(docsift_core::UnavailableRecognizer)
    }
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsiftConfig> {
    Ok(match config_path {
        Some(path) => DocsiftConfig::from_file(Path::new(path))?,
        None => DocsiftConfig::default(),
    })
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }

    info!("processing {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Extracting...");

    let pipeline = DocumentPipeline::new(build_recognizer(&config), config);
    let record = pipeline.extract(&args.input, args.category.map(Into::into))?;

    pb.finish_with_message("Done");

    write_output(&record, args.format, args.output.as_deref())?;

    debug!("total processing time: {:?}", start.elapsed());
    Ok(())
}

pub fn write_output(
    record: &DocumentRecord,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = docsift_core::to_json(record)?;
            emit(&json, output)?;
        }
        OutputFormat::Csv => {
            let csv = docsift_core::to_csv(std::slice::from_ref(record))?;
            emit(&csv.table, output)?;
            // Variable-length item lists get their own positional table.
            if let (Some(items), Some(path)) = (&csv.items, output) {
                let items_path = sibling_items_path(path);
                fs::write(&items_path, items)?;
                println!(
                    "{} Line items written to {}",
                    style("✓").green(),
                    items_path.display()
                );
            }
        }
        OutputFormat::Text => {
            emit(&format_text(record), output)?;
        }
    }
    Ok(())
}

fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{content}");
    }
    Ok(())
}

fn sibling_items_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{stem}_items.csv"))
}

/// Human-readable summary, one shape per category.
pub fn format_text(record: &DocumentRecord) -> String {
    let mut out = String::new();
    let base = record.base();

    out.push_str(&format!("Document type: {}\n", record.kind()));
    push_field(&mut out, "Supplier/Issuer", &base.supplier_or_issuer_name);
    push_field(&mut out, "Issue date", &base.issue_date.map(|d| d.to_string()));
    push_field(
        &mut out,
        "Expiration date",
        &base.expiration_date.map(|d| d.to_string()),
    );

    match record {
        DocumentRecord::Invoice(invoice) => {
            push_field(&mut out, "Invoice number", &invoice.invoice_number);
            push_field(&mut out, "Due date", &invoice.due_date.map(|d| d.to_string()));
            push_field(&mut out, "PO number", &invoice.po_number);
            push_field(&mut out, "Bill to", &invoice.bill_to);
            push_field(&mut out, "Send to", &invoice.send_to);
            push_field(&mut out, "Subtotal", &invoice.subtotal.map(|v| v.to_string()));
            push_field(&mut out, "Tax", &invoice.tax.map(|v| v.to_string()));
            push_field(&mut out, "Total", &invoice.total.map(|v| v.to_string()));
            if !invoice.line_items.is_empty() {
                out.push_str("Items:\n");
                for item in &invoice.line_items {
                    out.push_str(&format!(
                        "  {} x{} @ {} = {}\n",
                        item.description, item.quantity, item.unit_price, item.total
                    ));
                }
            }
        }
        DocumentRecord::Safety(safety) => {
            push_field(&mut out, "Document number", &safety.document_number);
            push_field(&mut out, "Category", &safety.safety_category);
            push_field(&mut out, "Compliance", &safety.compliance_status);
            if !safety.safety_measures.is_empty() {
                out.push_str("Safety measures:\n");
                for measure in &safety.safety_measures {
                    out.push_str(&format!("  - {measure}\n"));
                }
            }
        }
        DocumentRecord::Insurance(insurance) => {
            push_field(&mut out, "Policy number", &insurance.policy_number);
            push_field(&mut out, "Insured", &insurance.insured);
            push_field(&mut out, "Coverage type", &insurance.coverage_type);
            push_field(
                &mut out,
                "Coverage amount",
                &insurance.coverage_amount.map(|v| v.to_string()),
            );
            push_field(&mut out, "Premium", &insurance.premium.map(|v| v.to_string()));
            if !insurance.beneficiaries.is_empty() {
                out.push_str(&format!(
                    "Beneficiaries: {}\n",
                    insurance.beneficiaries.join(", ")
                ));
            }
        }
        DocumentRecord::Personal(personal) => {
            push_field(&mut out, "ID number", &personal.id_number);
            push_field(&mut out, "Last name", &personal.last_name);
            push_field(&mut out, "First name", &personal.first_name);
            push_field(
                &mut out,
                "Date of birth",
                &personal.date_of_birth.map(|d| d.to_string()),
            );
            push_field(&mut out, "Nationality", &personal.nationality);
            if !personal.restrictions.is_empty() {
                out.push_str(&format!(
                    "Restrictions: {}\n",
                    personal.restrictions.join(", ")
                ));
            }
        }
    }

    out
}

fn push_field(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push_str(&format!("{label}: {value}\n"));
    }
}
