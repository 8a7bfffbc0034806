use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AgeGroup, Regime, TaxResult};

/// A persisted summary of an accepted calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub regime: Regime,
    pub age_group: AgeGroup,
    pub gross_income: Decimal,
    pub extra_income: Decimal,
    pub deductions: Decimal,
    pub final_tax: Decimal,
    pub final_income: Decimal,
    pub currency_symbol: String,
}

/// Insert shape for [`HistoryEntry`]; the store assigns `id` and `recorded_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub regime: Regime,
    pub age_group: AgeGroup,
    pub gross_income: Decimal,
    pub extra_income: Decimal,
    pub deductions: Decimal,
    pub final_tax: Decimal,
    pub final_income: Decimal,
    pub currency_symbol: String,
}

impl From<&TaxResult> for NewHistoryEntry {
    fn from(result: &TaxResult) -> Self {
        Self {
            regime: result.regime,
            age_group: result.age_group,
            gross_income: result.gross_income,
            extra_income: result.extra_income,
            deductions: result.deductions,
            final_tax: result.final_tax,
            final_income: result.final_income,
            currency_symbol: result.currency_symbol.clone(),
        }
    }
}
