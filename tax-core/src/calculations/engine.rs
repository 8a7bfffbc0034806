//! Income tax computation under the old and new regimes.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total income = gross + additional income |
//! | 2    | Taxable income = total - standard deduction (- itemized deductions under the old regime), minimum 0 |
//! | 3    | Slab tax from the regime / age table |
//! | 4    | Rebate: if taxable income is within the limit, tax is capped |
//! | 5    | Surcharge: tier rate (by total income) x tax |
//! | 6    | Cess: 4% of (tax + surcharge) when tax is positive |
//! | 7    | Final tax = tax + surcharge + cess; final income = total - final tax |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::compute;
//! use tax_core::{AgeGroup, Regime, TaxInput};
//!
//! let input = TaxInput {
//!     gross_income: dec!(800000),
//!     extra_income: dec!(0),
//!     deductions: dec!(50000),
//!     regime: Regime::Old,
//!     age_group: AgeGroup::Under60,
//!     currency_symbol: "₹".to_string(),
//! };
//!
//! let result = compute(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(700000));
//! assert_eq!(result.final_tax, dec!(54600));
//! assert_eq!(result.final_income, dec!(745400));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::floor_at_zero;
use crate::calculations::slabs::{slab_tax, slabs_for, surcharge_rate};
use crate::models::{Regime, TaxInput, TaxResult};

/// Flat standard deduction, applied under both regimes.
pub const STANDARD_DEDUCTION: Decimal = dec!(50000);

/// Health and education cess on (tax + surcharge).
pub const CESS_RATE: Decimal = dec!(0.04);

/// Errors that reject an input before any computation happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A monetary input was below zero.
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount { field: &'static str, amount: Decimal },
}

/// Rebate rule: when taxable income is at most `limit`, slab tax is capped
/// at `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebateRule {
    pub limit: Decimal,
    pub cap: Decimal,
}

impl RebateRule {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Old => Self {
                limit: dec!(500000),
                cap: dec!(12500),
            },
            Regime::New => Self {
                limit: dec!(700000),
                cap: dec!(25000),
            },
        }
    }
}

/// Computes the full breakdown for `input`.
///
/// # Errors
///
/// Returns [`ValidationError::NegativeAmount`] if gross income, additional
/// income or deductions is negative. No partial result is produced.
pub fn compute(input: &TaxInput) -> Result<TaxResult, ValidationError> {
    TaxCalculator.calculate(input)
}

/// Stateless calculator. Every call is independent, so a single value may
/// be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxCalculator;

impl TaxCalculator {
    /// Runs every step and assembles the [`TaxResult`].
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> Result<TaxResult, ValidationError> {
        self.validate(input)?;

        let total_income = input.gross_income + input.extra_income;
        let taxable_income = self.taxable_income(input.regime, total_income, input.deductions);

        let slabs = slabs_for(input.regime, input.age_group);
        let tax = self.apply_rebate(input.regime, taxable_income, slab_tax(slabs, taxable_income));

        let surcharge = self.surcharge(total_income, tax);
        let cess = self.cess(tax, surcharge);
        let final_tax = tax + surcharge + cess;

        debug!(
            regime = %input.regime,
            age_group = %input.age_group,
            %taxable_income,
            %tax,
            %surcharge,
            %cess,
            "computed tax"
        );

        Ok(TaxResult {
            regime: input.regime,
            age_group: input.age_group,
            gross_income: input.gross_income,
            extra_income: input.extra_income,
            deductions: input.deductions,
            total_income,
            taxable_income,
            tax_before_surcharge: tax,
            surcharge,
            cess,
            final_tax,
            final_income: total_income - final_tax,
            currency_symbol: input.currency_symbol.clone(),
        })
    }

    fn validate(
        &self,
        input: &TaxInput,
    ) -> Result<(), ValidationError> {
        let amounts = [
            ("gross income", input.gross_income),
            ("additional income", input.extra_income),
            ("deductions", input.deductions),
        ];

        match amounts.into_iter().find(|(_, amount)| *amount < Decimal::ZERO) {
            Some((field, amount)) => Err(ValidationError::NegativeAmount { field, amount }),
            None => Ok(()),
        }
    }

    /// Itemized deductions only reduce income under the old regime.
    fn taxable_income(
        &self,
        regime: Regime,
        total_income: Decimal,
        deductions: Decimal,
    ) -> Decimal {
        let after_standard = total_income - STANDARD_DEDUCTION;
        match regime {
            Regime::Old => floor_at_zero(after_standard - deductions),
            Regime::New => floor_at_zero(after_standard),
        }
    }

    /// Caps tax at the rebate amount when taxable income is within the limit.
    fn apply_rebate(
        &self,
        regime: Regime,
        taxable_income: Decimal,
        tax: Decimal,
    ) -> Decimal {
        let rule = RebateRule::for_regime(regime);
        if taxable_income <= rule.limit {
            tax.min(rule.cap)
        } else {
            tax
        }
    }

    /// Surcharge is tiered on total income, not taxable income.
    fn surcharge(
        &self,
        total_income: Decimal,
        tax: Decimal,
    ) -> Decimal {
        tax * surcharge_rate(total_income)
    }

    fn cess(
        &self,
        tax: Decimal,
        surcharge: Decimal,
    ) -> Decimal {
        if tax > Decimal::ZERO {
            (tax + surcharge) * CESS_RATE
        } else {
            Decimal::ZERO
        }
    }
}
