use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{AgeGroup, Regime};

/// Full breakdown produced by a single computation. Every field is derived
/// from the [`crate::TaxInput`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub age_group: AgeGroup,

    // Echoed inputs
    pub gross_income: Decimal,
    pub extra_income: Decimal,
    pub deductions: Decimal,

    // Derived values
    pub total_income: Decimal,
    pub taxable_income: Decimal,
    pub tax_before_surcharge: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub final_tax: Decimal,

    /// Total income minus final tax. Not floored at zero.
    pub final_income: Decimal,

    pub currency_symbol: String,
}

impl TaxResult {
    /// Final tax as a percentage of total income, capped at 100 and rounded
    /// to two places. `None` when there is no income to divide by.
    pub fn effective_rate(&self) -> Option<Decimal> {
        if self.total_income <= Decimal::ZERO {
            return None;
        }
        let rate = self.final_tax / self.total_income * Decimal::ONE_HUNDRED;
        Some(round_half_up(rate.min(Decimal::ONE_HUNDRED)))
    }
}
