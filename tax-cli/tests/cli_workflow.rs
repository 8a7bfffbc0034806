//! End-to-end command runs against an in-memory SQLite history store.
//!
//! Each test parses real argument lists, so these also cover the wiring
//! between the clap definitions and the command handlers.

use clap::Parser;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_cli::app;
use tax_cli::cli::Cli;
use tax_cli::config::AppConfig;
use tax_core::db::{DbConfig, RepositoryFactory};
use tax_core::{Currency, HistoryRepository, Preferences, Regime};
use tax_db_sqlite::SqliteRepositoryFactory;

async fn memory_repo() -> Box<dyn HistoryRepository> {
    SqliteRepositoryFactory
        .create(&DbConfig::default())
        .await
        .expect("in-memory repository")
}

async fn exec(
    repo: &dyn HistoryRepository,
    args: &[&str],
) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("tax-estimator").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    app::run(&cli.command, &AppConfig::default(), repo, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

const SALARY: [&str; 5] = ["--gross", "8,00,000", "--deductions", "50,000", "--quiet"];

fn with_salary<'a>(command: &[&'a str]) -> Vec<&'a str> {
    command.iter().copied().chain(SALARY).collect()
}

#[tokio::test]
async fn compute_prints_breakdown_and_comparison() {
    let repo = memory_repo().await;

    let out = exec(&*repo, &with_salary(&["compute"])).await.unwrap();

    assert!(out.contains("Old Regime (Below 60)"));
    assert!(out.contains("Taxable Income:              ₹7,00,000"));
    assert!(out.contains("Health & Education Cess:     ₹2,100"));
    assert!(out.contains("Final In-Hand Income:        ₹7,45,400"));
    assert!(out.contains("₹31,200"));
    assert!(out.trim_end().ends_with("New Regime saves ₹23,400."));
}

#[tokio::test]
async fn compute_records_history_and_preferences() {
    let repo = memory_repo().await;

    exec(&*repo, &with_salary(&["compute", "--regime", "new", "--currency", "USD"]))
        .await
        .unwrap();

    let entries = repo.list_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].regime, Regime::New);
    assert_eq!(entries[0].final_tax, dec!(31200));
    assert_eq!(entries[0].final_income, dec!(768800));
    assert_eq!(entries[0].currency_symbol, "$");
    assert_eq!(
        repo.load_preferences().await.unwrap(),
        Some(Preferences {
            regime: Regime::New,
            currency: Currency::Usd,
        })
    );
}

#[tokio::test]
async fn saved_preferences_drive_later_commands() {
    let repo = memory_repo().await;
    exec(&*repo, &with_salary(&["compute", "--regime", "new", "--currency", "EUR"]))
        .await
        .unwrap();

    let out = exec(&*repo, &with_salary(&["preview"])).await.unwrap();

    assert_eq!(
        out.trim_end(),
        "Final in-hand income: €7,68,800 (3.90% of total income goes to tax)"
    );
}

#[tokio::test]
async fn compute_no_save_leaves_store_untouched() {
    let repo = memory_repo().await;

    exec(&*repo, &with_salary(&["compute", "--no-save", "--regime", "new"]))
        .await
        .unwrap();

    assert!(repo.list_entries().await.unwrap().is_empty());
    assert_eq!(repo.load_preferences().await.unwrap(), None);
}

#[tokio::test]
async fn negative_amount_is_reported_and_not_saved() {
    let repo = memory_repo().await;

    let err = exec(&*repo, &["compute", "--gross", "-1"]).await.unwrap_err();

    assert_eq!(err.to_string(), "gross income must not be negative, got -1");
    assert!(repo.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn compute_json_output() {
    let repo = memory_repo().await;

    let out = exec(&*repo, &with_salary(&["compute", "--format", "json", "--no-save"]))
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let amount = |v: &serde_json::Value| v.as_str().unwrap().parse::<Decimal>().unwrap();
    assert_eq!(value["result"]["regime"], "old");
    assert_eq!(amount(&value["result"]["final_tax"]), dec!(54600));
    assert_eq!(amount(&value["comparison"]["new"]["final_tax"]), dec!(31200));
    assert_eq!(value["preferred_regime"], "new");
    assert_eq!(amount(&value["saving"]), dec!(23400));
}

#[tokio::test]
async fn compute_csv_output() {
    let repo = memory_repo().await;

    let out = exec(&*repo, &with_salary(&["compute", "--format", "csv", "--no-save"]))
        .await
        .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("regime,age_group,gross_income"));
    assert!(lines[1].starts_with("old,<60,800000,0,50000,800000,700000,"));
}

#[tokio::test]
async fn compute_exports_result_document() {
    let repo = memory_repo().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Tax_Result.txt");
    let path_arg = path.to_str().unwrap();

    let out = exec(
        &*repo,
        &with_salary(&["compute", "--export", path_arg, "--export-format", "document"]),
    )
    .await
    .unwrap();

    assert!(out.contains("Result exported to"));
    let doc = std::fs::read_to_string(&path).unwrap();
    assert!(doc.starts_with("Tax Calculation Result"));
    assert!(doc.contains("Final In-Hand Income: ₹7,45,400"));
    assert!(doc.contains("New Regime"));
}

#[tokio::test]
async fn compare_names_cheaper_regime() {
    let repo = memory_repo().await;

    let out = exec(&*repo, &["compare", "--gross", "1000000", "--deductions", "500000"])
        .await
        .unwrap();

    assert!(out.trim_end().ends_with("Old Regime saves ₹44,200."));
    assert!(repo.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn history_list_empty_and_populated() {
    let repo = memory_repo().await;

    let empty = exec(&*repo, &["history", "list"]).await.unwrap();
    assert_eq!(empty.trim_end(), "No calculation history.");

    exec(&*repo, &with_salary(&["compute"])).await.unwrap();
    exec(&*repo, &with_salary(&["compute", "--regime", "new"])).await.unwrap();

    let listed = exec(&*repo, &["history", "list"]).await.unwrap();
    assert!(listed.contains("OLD"));
    assert!(listed.contains("NEW"));
    assert!(listed.contains("₹7,68,800"));
}

#[tokio::test]
async fn history_clear_requires_confirmation() {
    let repo = memory_repo().await;
    exec(&*repo, &with_salary(&["compute"])).await.unwrap();

    let err = exec(&*repo, &["history", "clear"]).await.unwrap_err();
    assert!(err.to_string().contains("--yes"));
    assert_eq!(repo.list_entries().await.unwrap().len(), 1);

    let out = exec(&*repo, &["history", "clear", "--yes"]).await.unwrap();
    assert_eq!(out.trim_end(), "Cleared 1 history entries.");
    assert!(repo.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn history_export_csv_and_document() {
    let repo = memory_repo().await;
    exec(&*repo, &with_salary(&["compute"])).await.unwrap();
    exec(&*repo, &with_salary(&["compute", "--regime", "new"])).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("Tax_History.csv");
    exec(&*repo, &["history", "export", "--output", csv_path.to_str().unwrap()])
        .await
        .unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Gross Income,Extra Income,Deductions,Final Income,Regime,Currency"
    );
    assert!(lines[1].ends_with(",800000,0,50000,745400,old,₹"));
    assert!(lines[2].ends_with(",800000,0,50000,768800,new,₹"));

    let doc_path = dir.path().join("Tax_History.txt");
    let out = exec(
        &*repo,
        &[
            "history",
            "export",
            "--format",
            "document",
            "--page-size",
            "1",
            "--output",
            doc_path.to_str().unwrap(),
        ],
    )
    .await
    .unwrap();
    assert!(out.starts_with("Exported 2 history entries to"));
    let doc = std::fs::read_to_string(&doc_path).unwrap();
    assert!(doc.contains("Page 1 of 2"));
    assert!(doc.contains("Page 2 of 2"));
}

#[tokio::test]
async fn history_export_fails_when_empty() {
    let repo = memory_repo().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Tax_History.csv");

    let err = exec(&*repo, &["history", "export", "--output", path.to_str().unwrap()])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "no history available to export");
    assert!(!path.exists());
}

#[tokio::test]
async fn reset_forgets_preferences_but_keeps_history() {
    let repo = memory_repo().await;
    exec(&*repo, &with_salary(&["compute", "--regime", "new"])).await.unwrap();

    let out = exec(&*repo, &["reset"]).await.unwrap();

    assert_eq!(out.trim_end(), "Preferences cleared.");
    assert_eq!(repo.load_preferences().await.unwrap(), None);
    assert_eq!(repo.list_entries().await.unwrap().len(), 1);
}
