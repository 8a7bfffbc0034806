use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use tax_core::db::RepositoryRegistry;
use tax_core::{
    HistoryRepository, NewHistoryEntry, Preferences, Regime, RegimeComparison, TaxInput,
    TaxResult, compare, compute,
};
use tax_db_sqlite::SqliteRepositoryFactory;

use crate::cli::{Command, ComputeArgs, ExportFormat, HistoryCommand, InputArgs, OutputFormat};
use crate::config::{AppConfig, Defaults};
use crate::export::{export_history, export_result, write_result_csv};
use crate::report::{render_breakdown, render_comparison, render_history, render_preview};

/// Build a [`RepositoryRegistry`] with every backend compiled into the binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Fills the form fields the user left out.
///
/// Regime and currency come from the flag, then the saved preferences, then
/// the config defaults. Age group is not remembered, so it skips the saved
/// step. The returned [`Preferences`] are the selections actually used.
pub fn resolve_input(
    args: &InputArgs,
    saved: Option<Preferences>,
    defaults: &Defaults,
) -> (TaxInput, Preferences) {
    let regime = args
        .regime
        .or(saved.map(|p| p.regime))
        .unwrap_or(defaults.regime);
    let currency = args
        .currency
        .or(saved.map(|p| p.currency))
        .unwrap_or(defaults.currency);
    let age_group = args.age.unwrap_or(defaults.age_group);

    let input = TaxInput {
        gross_income: args.gross,
        extra_income: args.extra,
        deductions: args.deductions,
        regime,
        age_group,
        currency_symbol: currency.symbol().to_string(),
    };
    (input, Preferences { regime, currency })
}

#[derive(Debug, Serialize)]
struct ComputeReport<'a> {
    result: &'a TaxResult,
    comparison: &'a RegimeComparison,
    preferred_regime: Regime,
    saving: Decimal,
}

async fn load_input(
    args: &InputArgs,
    config: &AppConfig,
    repo: &dyn HistoryRepository,
) -> Result<(TaxInput, Preferences)> {
    let saved = repo
        .load_preferences()
        .await
        .context("failed to load saved preferences")?;
    debug!(?saved, "loaded preferences");
    Ok(resolve_input(args, saved, &config.defaults))
}

/// Runs one command against `repo`, writing user-facing output to `out`.
pub async fn run<W: Write>(
    command: &Command,
    config: &AppConfig,
    repo: &dyn HistoryRepository,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Compute(args) => run_compute(args, config, repo, out).await,
        Command::Preview(args) => {
            let (input, _) = load_input(args, config, repo).await?;
            let result = compute(&input)?;
            writeln!(out, "{}", render_preview(&result))?;
            Ok(())
        }
        Command::Compare(args) => {
            let (input, _) = load_input(args, config, repo).await?;
            let comparison = compare(&input)?;
            writeln!(out, "{}", render_comparison(&comparison))?;
            Ok(())
        }
        Command::History(history) => run_history(history, repo, out).await,
        Command::Reset => {
            repo.clear_preferences()
                .await
                .context("failed to clear preferences")?;
            info!("preferences cleared");
            writeln!(out, "Preferences cleared.")?;
            Ok(())
        }
    }
}

async fn run_compute<W: Write>(
    args: &ComputeArgs,
    config: &AppConfig,
    repo: &dyn HistoryRepository,
    out: &mut W,
) -> Result<()> {
    let (input, preferences) = load_input(&args.input, config, repo).await?;
    let comparison = compare(&input)?;
    let result = comparison.result_for(input.regime);

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "{}\n", render_breakdown(result))?;
            writeln!(out, "{}", render_comparison(&comparison))?;
        }
        OutputFormat::Json => {
            let report = ComputeReport {
                result,
                comparison: &comparison,
                preferred_regime: comparison.preferred_regime(),
                saving: comparison.saving(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_result_csv(result, &mut *out)?,
    }

    if !args.no_save {
        let entry = repo
            .append_entry(NewHistoryEntry::from(result))
            .await
            .context("failed to record calculation history")?;
        repo.save_preferences(&preferences)
            .await
            .context("failed to save preferences")?;
        info!(id = entry.id, regime = %input.regime, "recorded calculation");
    }

    if let Some(path) = &args.export {
        let format = args.export_format.unwrap_or(ExportFormat::Csv);
        export_result(&comparison, input.regime, format, path)?;
        if args.format == OutputFormat::Text {
            writeln!(out, "\nResult exported to {}", path.display())?;
        }
    }

    Ok(())
}

async fn run_history<W: Write>(
    command: &HistoryCommand,
    repo: &dyn HistoryRepository,
    out: &mut W,
) -> Result<()> {
    match command {
        HistoryCommand::List => {
            let entries = repo
                .list_entries()
                .await
                .context("failed to load calculation history")?;
            writeln!(out, "{}", render_history(&entries))?;
        }
        HistoryCommand::Clear { yes } => {
            if !yes {
                bail!("this deletes every recorded calculation; re-run with --yes to confirm");
            }
            let removed = repo
                .clear_entries()
                .await
                .context("failed to clear calculation history")?;
            info!(removed, "history cleared");
            writeln!(out, "Cleared {removed} history entries.")?;
        }
        HistoryCommand::Export {
            format,
            output,
            page_size,
        } => {
            let entries = repo
                .list_entries()
                .await
                .context("failed to load calculation history")?;
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(format.default_history_file()));
            export_history(&entries, *format, &path, usize::from(*page_size))?;
            writeln!(
                out,
                "Exported {} history entries to {}",
                entries.len(),
                path.display()
            )?;
        }
    }
    Ok(())
}
