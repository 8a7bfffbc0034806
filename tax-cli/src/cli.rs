use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tax_core::{AgeGroup, Currency, Regime};

use crate::utils::parse_decimal;

/// Income tax estimator for the old and new regimes.
///
/// Computes the slab tax, rebate, surcharge and cess for an income, compares
/// both regimes, and keeps a local history of accepted calculations.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "TAX_ESTIMATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// History database connection string, overriding the config file.
    /// For SQLite this is a file path (e.g. `tax-history.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log level or filter directive (e.g. `debug`, `warn,tax_core=trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Suppress log output on the console.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the full breakdown, compare regimes and record the result.
    Compute(ComputeArgs),
    /// Print the in-hand income and tax share without saving anything.
    Preview(InputArgs),
    /// Compare final tax under the old and new regimes.
    Compare(InputArgs),
    /// Inspect, clear or export the calculation history.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Forget the saved regime and currency preferences.
    Reset,
}

/// Form fields shared by every command that computes tax.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Gross annual income. Commas are accepted (e.g. `8,00,000`).
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true)]
    pub gross: Decimal,

    /// Additional income (interest, rent, ...).
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true, default_value = "0")]
    pub extra: Decimal,

    /// Deductions claimed. Ignored by the new regime.
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true, default_value = "0")]
    pub deductions: Decimal,

    /// Tax regime: `old` or `new`. Defaults to the saved preference.
    #[arg(long, value_parser = parse_regime)]
    pub regime: Option<Regime>,

    /// Age group: `<60`, `60-80` or `>80` (also `under-60`, `over-80`).
    #[arg(long, value_parser = parse_age_group)]
    pub age: Option<AgeGroup>,

    /// Display currency: `INR`, `USD` or `EUR`. Defaults to the saved preference.
    #[arg(long, value_parser = parse_currency)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Args)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Do not record the result in history or update preferences.
    #[arg(long)]
    pub no_save: bool,

    /// Rendering of the result on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the result to this file.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// File format for `--export` [default: csv].
    #[arg(long, value_enum, requires = "export")]
    pub export_format: Option<ExportFormat>,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List recorded calculations, oldest first.
    List,
    /// Delete every recorded calculation.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Write the history to a file.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Destination file. Defaults to `Tax_History.csv` or `Tax_History.txt`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Table rows per page in the document format.
        #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u16).range(1..))]
        page_size: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Document,
}

impl ExportFormat {
    pub fn default_history_file(self) -> &'static str {
        match self {
            Self::Csv => "Tax_History.csv",
            Self::Document => "Tax_History.txt",
        }
    }
}

fn parse_regime(s: &str) -> Result<Regime, String> {
    Regime::parse(s).ok_or_else(|| format!("unknown regime '{s}' (expected old or new)"))
}

fn parse_age_group(s: &str) -> Result<AgeGroup, String> {
    AgeGroup::parse(s).ok_or_else(|| format!("unknown age group '{s}' (expected <60, 60-80 or >80)"))
}

fn parse_currency(s: &str) -> Result<Currency, String> {
    Currency::parse(s).ok_or_else(|| format!("unknown currency '{s}' (expected INR, USD or EUR)"))
}
