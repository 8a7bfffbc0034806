use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AgeGroup, Regime};

/// One calculation request.
///
/// Amounts are in base currency units. Non-negativity is checked by
/// [`crate::calculations::compute`], not at construction, so callers can
/// build an input straight from raw form values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_income: Decimal,
    pub extra_income: Decimal,

    /// Itemized deductions. Ignored under [`Regime::New`].
    pub deductions: Decimal,

    pub regime: Regime,

    /// Only consulted under [`Regime::Old`].
    pub age_group: AgeGroup,

    /// Display only; echoed into the result unchanged.
    pub currency_symbol: String,
}

impl TaxInput {
    /// Returns a copy of this input evaluated under `regime`.
    pub fn with_regime(
        &self,
        regime: Regime,
    ) -> Self {
        Self {
            regime,
            ..self.clone()
        }
    }
}
