//! Plain-text rendering of results, comparisons and history for the terminal.

use rust_decimal::Decimal;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};
use tax_core::{HistoryEntry, Regime, RegimeComparison, TaxResult};

use crate::utils::{format_amount, format_percent};

/// Timestamp layout used wherever a history entry is shown or exported.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const LABEL_WIDTH: usize = 29;
const RULE: &str = "-------------------------------------------";

pub fn regime_caption(result: &TaxResult) -> String {
    match result.regime {
        Regime::Old => format!("{} ({})", result.regime.label(), result.age_group.label()),
        Regime::New => result.regime.label().to_string(),
    }
}

fn labelled(
    label: &str,
    value: String,
) -> String {
    format!("{label:<width$}{value}", width = LABEL_WIDTH)
}

/// The itemised breakdown shown after a calculation.
pub fn render_breakdown(result: &TaxResult) -> String {
    let amount = |value: Decimal| format_amount(&result.currency_symbol, value);

    [
        labelled("Regime:", regime_caption(result)),
        labelled("Gross Annual Income:", amount(result.gross_income)),
        labelled("Additional Income:", amount(result.extra_income)),
        labelled("Total Income:", amount(result.total_income)),
        labelled("Deductions:", amount(result.deductions)),
        RULE.to_string(),
        labelled("Taxable Income:", amount(result.taxable_income)),
        RULE.to_string(),
        labelled("Tax before Cess & Surcharge:", amount(result.tax_before_surcharge)),
        labelled("Surcharge:", amount(result.surcharge)),
        labelled("Health & Education Cess:", amount(result.cess)),
        RULE.to_string(),
        labelled("Total Tax:", amount(result.final_tax)),
        labelled("Final In-Hand Income:", amount(result.final_income)),
    ]
    .join("\n")
}

#[derive(Debug, Clone, Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Regime")]
    regime: &'static str,
    #[tabled(rename = "Total Tax")]
    final_tax: String,
    #[tabled(rename = "Final Income")]
    final_income: String,
}

impl ComparisonRow {
    fn from_result(result: &TaxResult) -> Self {
        Self {
            regime: result.regime.label(),
            final_tax: format_amount(&result.currency_symbol, result.final_tax),
            final_income: format_amount(&result.currency_symbol, result.final_income),
        }
    }
}

/// Old and new regime side by side.
pub fn comparison_table(comparison: &RegimeComparison) -> String {
    let rows = Regime::ALL.map(|regime| ComparisonRow::from_result(comparison.result_for(regime)));
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

/// One line naming the cheaper regime and what it saves.
pub fn comparison_verdict(comparison: &RegimeComparison) -> String {
    let saving = comparison.saving();
    if saving.is_zero() {
        return "Both regimes result in the same tax.".to_string();
    }
    let symbol = &comparison.old.currency_symbol;
    format!(
        "{} saves {}.",
        comparison.preferred_regime().label(),
        format_amount(symbol, saving)
    )
}

pub fn render_comparison(comparison: &RegimeComparison) -> String {
    format!(
        "{}\n{}",
        comparison_table(comparison),
        comparison_verdict(comparison)
    )
}

/// The live-preview line: in-hand income and the tax share of total income.
pub fn render_preview(result: &TaxResult) -> String {
    let share = result.effective_rate().unwrap_or(Decimal::ZERO);
    format!(
        "Final in-hand income: {} ({} of total income goes to tax)",
        format_amount(&result.currency_symbol, result.final_income),
        format_percent(share)
    )
}

#[derive(Debug, Clone, Tabled)]
pub(crate) struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Income")]
    gross_income: String,
    #[tabled(rename = "Deductions")]
    deductions: String,
    #[tabled(rename = "Final Income")]
    final_income: String,
    #[tabled(rename = "Regime")]
    regime: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let symbol = &entry.currency_symbol;
        Self {
            date: entry.recorded_at.format(DATE_FORMAT).to_string(),
            gross_income: format_amount(symbol, entry.gross_income),
            deductions: format_amount(symbol, entry.deductions),
            final_income: format_amount(symbol, entry.final_income),
            regime: entry.regime.as_str().to_uppercase(),
        }
    }
}

pub(crate) fn history_table(entries: &[HistoryEntry]) -> String {
    Table::new(entries.iter().map(HistoryRow::from))
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No calculation history.".to_string();
    }
    history_table(entries)
}
