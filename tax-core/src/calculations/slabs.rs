//! Slab and surcharge schedules.
//!
//! Each schedule is an ordered list of `(upper bound, rate)` rows. Upper
//! bounds are inclusive and the lower bound of a row is the upper bound of
//! the row before it (zero for the first). The final row is open-ended.
//!
//! | Schedule | Brackets (upper : rate) |
//! |----------|-------------------------|
//! | Old, below 60 | 2.5L: 0%, 5L: 5%, 10L: 20%, above: 30% |
//! | Old, 60 to 80 | 3L: 0%, 5L: 5%, 10L: 20%, above: 30% |
//! | Old, above 80 | 5L: 0%, 10L: 20%, above: 30% |
//! | New | 3L: 0%, 6L: 5%, 9L: 10%, 12L: 15%, 15L: 20%, above: 30% |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{AgeGroup, Regime};

/// One marginal bracket. `upper` is `None` for the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slab {
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// One surcharge tier, keyed on total income rather than taxable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurchargeTier {
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

const fn slab(
    upper: Decimal,
    rate: Decimal,
) -> Slab {
    Slab {
        upper: Some(upper),
        rate,
    }
}

const fn top_slab(rate: Decimal) -> Slab {
    Slab { upper: None, rate }
}

pub const OLD_UNDER_60: &[Slab] = &[
    slab(dec!(250000), dec!(0)),
    slab(dec!(500000), dec!(0.05)),
    slab(dec!(1000000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub const OLD_60_TO_80: &[Slab] = &[
    slab(dec!(300000), dec!(0)),
    slab(dec!(500000), dec!(0.05)),
    slab(dec!(1000000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub const OLD_OVER_80: &[Slab] = &[
    slab(dec!(500000), dec!(0)),
    slab(dec!(1000000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub const NEW_REGIME: &[Slab] = &[
    slab(dec!(300000), dec!(0)),
    slab(dec!(600000), dec!(0.05)),
    slab(dec!(900000), dec!(0.10)),
    slab(dec!(1200000), dec!(0.15)),
    slab(dec!(1500000), dec!(0.20)),
    top_slab(dec!(0.30)),
];

pub const SURCHARGE_TIERS: &[SurchargeTier] = &[
    SurchargeTier {
        upper: Some(dec!(5000000)),
        rate: dec!(0),
    },
    SurchargeTier {
        upper: Some(dec!(10000000)),
        rate: dec!(0.10),
    },
    SurchargeTier {
        upper: Some(dec!(20000000)),
        rate: dec!(0.15),
    },
    SurchargeTier {
        upper: Some(dec!(50000000)),
        rate: dec!(0.25),
    },
    SurchargeTier {
        upper: None,
        rate: dec!(0.37),
    },
];

/// Selects the slab table for a regime. Age only matters under the old regime.
pub fn slabs_for(
    regime: Regime,
    age_group: AgeGroup,
) -> &'static [Slab] {
    match (regime, age_group) {
        (Regime::New, _) => NEW_REGIME,
        (Regime::Old, AgeGroup::Under60) => OLD_UNDER_60,
        (Regime::Old, AgeGroup::SixtyTo80) => OLD_60_TO_80,
        (Regime::Old, AgeGroup::Over80) => OLD_OVER_80,
    }
}

/// Sums `(min(income, upper) - lower) * rate` over every bracket the income
/// reaches.
pub fn slab_tax(
    slabs: &[Slab],
    taxable_income: Decimal,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for slab in slabs {
        if taxable_income <= lower {
            break;
        }
        let top = slab.upper.map_or(taxable_income, |upper| taxable_income.min(upper));
        tax += (top - lower) * slab.rate;

        match slab.upper {
            Some(upper) => lower = upper,
            None => break,
        }
    }

    tax
}

/// Surcharge rate applicable to `total_income`.
pub fn surcharge_rate(total_income: Decimal) -> Decimal {
    SURCHARGE_TIERS
        .iter()
        .find(|tier| tier.upper.is_none_or(|upper| total_income <= upper))
        .map_or(Decimal::ZERO, |tier| tier.rate)
}
