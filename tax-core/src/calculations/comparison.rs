//! Side-by-side evaluation of one input under both regimes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::engine::{ValidationError, compute};
use crate::models::{Regime, TaxInput, TaxResult};

/// The same input computed under the old and the new regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old: TaxResult,
    pub new: TaxResult,
}

impl RegimeComparison {
    /// Regime with the lower final tax. Ties go to the old regime.
    pub fn preferred_regime(&self) -> Regime {
        if self.new.final_tax < self.old.final_tax {
            Regime::New
        } else {
            Regime::Old
        }
    }

    /// Absolute difference in final tax between the two regimes.
    pub fn saving(&self) -> Decimal {
        (self.old.final_tax - self.new.final_tax).abs()
    }

    pub fn result_for(
        &self,
        regime: Regime,
    ) -> &TaxResult {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }
}

/// Computes `input` under both regimes. The regime set on `input` is ignored.
///
/// # Errors
///
/// Fails with the same [`ValidationError`] as [`compute`].
pub fn compare(input: &TaxInput) -> Result<RegimeComparison, ValidationError> {
    Ok(RegimeComparison {
        old: compute(&input.with_regime(Regime::Old))?,
        new: compute(&input.with_regime(Regime::New))?,
    })
}
