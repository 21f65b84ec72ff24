//! Statement Importer - CLI tool for turning bank statements into normalized transactions.

use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use statement_import::{
    export::{self, OutputFormat},
    parse_statement, Format, Result, Summary, TransactionRecord,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "statement_importer")]
#[command(about = "Parse OFX or CSV bank statements into normalized transactions", long_about = None)]
struct Cli {
    /// Input file path (or stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Input format (auto, ofx, csv)
    #[arg(long, default_value = "auto")]
    format: String,

    /// Output format (json, csv)
    #[arg(long = "output-format", default_value = "json")]
    output_format: String,

    /// Output file path (or stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Print credit/debit totals to stderr
    #[arg(long)]
    summary: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let output_format = cli.output_format.parse::<OutputFormat>()?;

    let content = if let Some(ref input_path) = cli.input {
        fs::read_to_string(input_path)?
    } else {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        content
    };

    let format = Format::resolve(&cli.format, cli.input.as_deref(), &content)?;
    info!(?format, bytes = content.len(), "importing statement");

    let records = parse_statement(&content, format)?;
    if records.is_empty() {
        eprintln!("No transactions found.");
    }

    if let Some(ref output_path) = cli.output {
        let mut file = File::create(output_path)?;
        write_output(&mut file, &records, output_format)?;
    } else {
        let mut stdout = io::stdout();
        write_output(&mut stdout, &records, output_format)?;
    }

    if cli.summary {
        eprintln!("{}", Summary::from_records(&records)?);
    }

    Ok(())
}

fn write_output<W: Write>(writer: &mut W, records: &[TransactionRecord], format: OutputFormat) -> Result<()> {
    export::write_records(writer, records, format)?;
    writer.flush()?;
    Ok(())
}
